//! Visible contact form state

use super::{ContactError, ContactMessage, ContactSubmitter, SUCCESS_MESSAGE};
use crate::helpers::html_escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

/// The message shown in the form's alert box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    /// Markup for the alert box
    pub fn to_html(&self, id: &str) -> String {
        let class = match self.kind {
            AlertKind::Success => "alert success",
            AlertKind::Error => "alert",
        };
        format!(
            r#"<div id="{}" class="{}" role="status">{}</div>"#,
            html_escape(id),
            class,
            html_escape(&self.message)
        )
    }
}

/// A contact form: current values, the alert box and the submit control
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    values: ContactMessage,
    submitting: bool,
    alert: Option<Alert>,
}

impl ContactForm {
    pub fn new(values: ContactMessage) -> Self {
        Self {
            values,
            ..Default::default()
        }
    }

    pub fn values(&self) -> &ContactMessage {
        &self.values
    }

    /// Whether the submit control is enabled
    pub fn submit_enabled(&self) -> bool {
        !self.submitting
    }

    /// The alert currently shown, if any
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Take the alert so it is shown only once
    pub fn take_alert(&mut self) -> Option<Alert> {
        self.alert.take()
    }

    /// Submit the current values.
    ///
    /// Success clears every field and shows the success alert. Any failure
    /// keeps the values, shows the failure alert and re-enables submit.
    pub async fn submit(&mut self, submitter: &ContactSubmitter) -> Result<(), ContactError> {
        if let Err(e) = self.values.validate() {
            self.show(AlertKind::Error, e.user_message());
            return Err(e);
        }

        self.submitting = true;
        self.alert = None;
        let result = submitter.submit(&self.values).await;
        self.submitting = false;

        match &result {
            Ok(()) => {
                self.values = ContactMessage::default();
                self.show(AlertKind::Success, SUCCESS_MESSAGE);
            }
            Err(e) => self.show(AlertKind::Error, e.user_message()),
        }
        result
    }

    fn show(&mut self, kind: AlertKind, message: &str) {
        self.alert = Some(Alert {
            kind,
            message: message.to_string(),
        });
    }
}

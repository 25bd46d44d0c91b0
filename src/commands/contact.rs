//! Send a contact message from the command line

use anyhow::Result;

use crate::api::ApiClient;
use crate::contact::{ContactMessage, ContactSubmitter};
use crate::Folio;

/// Submit one message to the configured contact backend
pub async fn run(folio: &Folio, message: ContactMessage) -> Result<()> {
    let client = ApiClient::new(&folio.config.api)?;
    let Some(submitter) = ContactSubmitter::from_config(&folio.config, client) else {
        anyhow::bail!("No contact endpoint: set contact.endpoint or api.base in _config.yml");
    };

    tracing::info!("Sending message to {}", submitter.endpoint());
    submitter.submit(&message).await?;
    Ok(())
}

//! Stats counter animation

use std::time::Duration;

use crate::document::{get_attribute, has_class, Document};

pub const DEFAULT_COUNTER_DURATION: Duration = Duration::from_millis(1200);

/// Class of the counter elements inside the stats container
const COUNTER_CLASS: &str = "h-num";

/// Linear count-up from zero to `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterAnimation {
    target: i64,
    duration: Duration,
}

impl CounterAnimation {
    pub fn new(target: i64) -> Self {
        Self::with_duration(target, DEFAULT_COUNTER_DURATION)
    }

    pub fn with_duration(target: i64, duration: Duration) -> Self {
        Self { target, duration }
    }

    pub fn target(&self) -> i64 {
        self.target
    }

    /// Fraction of the animation done after `elapsed`, in `0.0..=1.0`
    fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Displayed value after `elapsed`; exactly `target` once finished
    pub fn value_at(&self, elapsed: Duration) -> i64 {
        let p = self.progress(elapsed);
        if p >= 1.0 {
            return self.target;
        }
        (self.target as f64 * p).floor() as i64
    }

    pub fn is_done(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    /// Values shown at each frame tick, ending with the target
    pub fn frames(&self, frame: Duration) -> Vec<i64> {
        let mut values = Vec::new();
        if frame.is_zero() {
            values.push(self.target);
            return values;
        }

        let mut elapsed = Duration::ZERO;
        loop {
            values.push(self.value_at(elapsed));
            if self.is_done(elapsed) {
                break;
            }
            elapsed += frame;
        }
        values
    }
}

/// Parse a `data-count` value: leading integer, anything unparsable is 0.
/// Values beyond the `i64` range saturate.
pub fn parse_count(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| i64::from(b - b'0'))
        .fold(0i64, |acc, d| {
            let acc = acc.saturating_mul(10);
            if negative {
                acc.saturating_sub(d)
            } else {
                acc.saturating_add(d)
            }
        })
}

/// Targets of every counter in the stats container, in document order
pub fn counter_targets(doc: &Document, container_id: &str) -> Vec<i64> {
    doc.open_tags_within(container_id)
        .iter()
        .filter(|tag| has_class(tag, COUNTER_CLASS))
        .filter_map(|tag| get_attribute(tag, "data-count"))
        .map(|raw| parse_count(&raw))
        .collect()
}

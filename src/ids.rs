//! Identifier and timestamp generation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Source of fresh identifiers and the current time.
pub trait IdGenerator {
    /// A new globally unique identifier.
    fn next_id(&mut self) -> String;

    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Random UUIDs and the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemIds;

impl IdGenerator for SystemIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic generator for tests: `{prefix}-1`, `{prefix}-2`, ... and a
/// clock that advances one second per id.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    counter: u64,
    start: DateTime<Utc>,
}

#[cfg(test)]
impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        use chrono::TimeZone;
        Self {
            prefix: prefix.to_string(),
            counter: 0,
            start: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }
}

#[cfg(test)]
impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("{}-{}", self.prefix, self.counter)
    }

    fn now(&self) -> DateTime<Utc> {
        self.start + chrono::Duration::seconds(self.counter as i64)
    }
}

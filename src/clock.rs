//! Timestamp sources for new blocks.

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Produces the opaque timestamp string stamped on each new block.
pub trait Clock: Send + Sync {
    fn now(&self) -> String;
}

/// Wall clock, RFC3339 in UTC.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        let now = OffsetDateTime::now_utc();
        now.format(&Rfc3339)
            .unwrap_or_else(|_| now.unix_timestamp().to_string())
    }
}

/// Always returns the same string. Makes chains reproducible.
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl Clock for FixedClock {
    fn now(&self) -> String {
        self.0.clone()
    }
}

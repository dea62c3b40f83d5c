use std::sync::Mutex;
use std::time::{Duration, Instant};

use shared::LedgerSummary;
use tracing::info;

/// How long a posted message stays visible
pub const STATUS_TTL: Duration = Duration::from_millis(2500);

/// Holds the latest transient status message.
///
/// Once a message expires the board falls back to the ledger summary line.
pub struct StatusBoard {
    ttl: Duration,
    current: Mutex<Option<(String, Instant)>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::with_ttl(STATUS_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            current: Mutex::new(None),
        }
    }

    /// Replace the visible message
    pub fn post(&self, message: impl Into<String>) {
        let message = message.into();
        info!("📣 {}", message);
        if let Ok(mut current) = self.current.lock() {
            *current = Some((message, Instant::now()));
        }
    }

    /// The live message, or the summary line once it has expired
    pub fn current(&self, summary: &LedgerSummary) -> String {
        let Ok(mut current) = self.current.lock() else {
            return summary.status_line();
        };
        match current.as_ref() {
            Some((message, posted_at)) if posted_at.elapsed() < self.ttl => message.clone(),
            _ => {
                *current = None;
                summary.status_line()
            }
        }
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

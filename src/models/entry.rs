use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point-in-time cost snapshot for a session, as stored in the ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub session_id: String,
    pub cost: f64,
    pub timestamp: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(session_id: impl Into<String>, cost: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            cost,
            timestamp,
        }
    }

    /// Snapshot stamped with the current time.
    pub fn now(session_id: impl Into<String>, cost: f64) -> Self {
        Self::new(session_id, cost, Utc::now())
    }
}

//! Audit event and log types.
//!
//! `AuditEvent` is one entry in the hash chain: a `GrantChangeRecord` with
//! its position and the hashes linking it to its neighbours. `AuditLog` is
//! the sealed export of a whole trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nuzum_contracts::change::GrantChangeRecord;

/// A single entry in the hash chain of one audit trail.
///
/// Modifying any field, including those of the embedded `record`,
/// invalidates `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The trail this event belongs to.
    pub trail_id: String,

    pub record: GrantChangeRecord,

    /// Hex SHA-256 of the previous event, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// Hex SHA-256 over (trail_id, sequence, prev_hash, canonical JSON of
    /// record), as computed by `hash_event()`.
    pub this_hash: String,
}

impl AuditEvent {
    /// The `prev_hash` of the first event in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A sealed export of an audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub trail_id: String,

    /// All events in chain order.
    pub events: Vec<AuditEvent>,

    /// When the log was exported (UTC).
    pub exported_at: DateTime<Utc>,

    /// `this_hash` of the last event. Empty if the log is empty.
    pub terminal_hash: String,
}

impl AuditLog {
    /// Records concerning one user, in chain order.
    pub fn for_user(&self, user_id: nuzum_contracts::user::UserId) -> Vec<&GrantChangeRecord> {
        self.events
            .iter()
            .map(|e| &e.record)
            .filter(|r| r.user_id == user_id)
            .collect()
    }
}

//! Hash-chain primitives.
//!
//! Hash input layout (bytes, in order):
//!   1. trail_id as UTF-8
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 (64 ASCII hex chars)
//!   4. canonical JSON of the record (serde_json, compact)

use sha2::{Digest, Sha256};

use nuzum_contracts::{
    change::GrantChangeRecord,
    error::{NuzumError, NuzumResult},
};

use crate::event::AuditEvent;

/// Compute the SHA-256 hash for one audit event, as lowercase hex.
///
/// Fails only if the record cannot be serialized, which is reported as
/// `AuditWriteFailed`.
pub fn hash_event(
    trail_id: &str,
    sequence: u64,
    record: &GrantChangeRecord,
    prev_hash: &str,
) -> NuzumResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| NuzumError::AuditWriteFailed {
        reason: format!("grant change record is not serializable: {}", e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(trail_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify the integrity of a hash chain.
///
/// Valid when every event links to its predecessor (`GENESIS_HASH` for the
/// first), every `this_hash` matches a recomputation, and sequences run
/// 0, 1, 2, … without gaps. An empty chain is valid.
pub fn verify_chain(events: &[AuditEvent]) -> bool {
    let mut expected_prev = AuditEvent::GENESIS_HASH.to_string();

    for (position, event) in events.iter().enumerate() {
        if event.sequence != position as u64 || event.prev_hash != expected_prev {
            return false;
        }

        match hash_event(&event.trail_id, event.sequence, &event.record, &event.prev_hash) {
            Ok(recomputed) if recomputed == event.this_hash => {}
            _ => return false,
        }

        expected_prev = event.this_hash.clone();
    }

    true
}

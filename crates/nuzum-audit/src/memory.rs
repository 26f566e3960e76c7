//! In-memory implementation of `AuditWriter`.
//!
//! Events are kept in a `Vec` behind a `Mutex`; the writer is `Send + Sync`
//! and can be shared with the provisioner while tests or the CLI keep a
//! handle for `export_log()` and `verify_integrity()`.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::debug;

use nuzum_contracts::{
    change::GrantChangeRecord,
    error::{NuzumError, NuzumResult},
};
use nuzum_core::traits::AuditWriter;

use crate::{
    chain::{hash_event, verify_chain},
    event::{AuditEvent, AuditLog},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct InMemoryState {
    pub(crate) events: Vec<AuditEvent>,
    /// Next sequence number to assign.
    pub(crate) sequence: u64,
    /// `this_hash` of the last event, or `GENESIS_HASH` before the first.
    pub(crate) last_hash: String,
}

// ── Public writer ─────────────────────────────────────────────────────────────

/// An append-only audit writer backed by a SHA-256 hash chain.
///
/// Clones share the same trail.
#[derive(Clone)]
pub struct InMemoryAuditWriter {
    trail_id: String,
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryAuditWriter {
    pub fn new(trail_id: impl Into<String>) -> Self {
        let state = InMemoryState {
            events: Vec::new(),
            sequence: 0,
            last_hash: AuditEvent::GENESIS_HASH.to_string(),
        };
        Self {
            trail_id: trail_id.into(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Export a sealed `AuditLog` of every event written so far.
    pub fn export_log(&self) -> NuzumResult<AuditLog> {
        let state = self.lock()?;
        let terminal_hash = state
            .events
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        Ok(AuditLog {
            trail_id: self.trail_id.clone(),
            events: state.events.clone(),
            exported_at: Utc::now(),
            terminal_hash,
        })
    }

    /// True if the in-memory chain has not been tampered with.
    pub fn verify_integrity(&self) -> bool {
        self.lock()
            .map(|state| verify_chain(&state.events))
            .unwrap_or(false)
    }

    /// Number of events written so far.
    pub fn len(&self) -> NuzumResult<usize> {
        Ok(self.lock()?.events.len())
    }

    pub fn is_empty(&self) -> NuzumResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> NuzumResult<std::sync::MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| NuzumError::AuditWriteFailed {
            reason: format!("audit state lock poisoned: {}", e),
        })
    }
}

// ── AuditWriter impl ──────────────────────────────────────────────────────────

impl AuditWriter for InMemoryAuditWriter {
    /// Append one record to the chain.
    fn write(&self, record: &GrantChangeRecord) -> NuzumResult<()> {
        let mut state = self.lock()?;

        let prev_hash = state.last_hash.clone();
        let sequence = state.sequence;
        let this_hash = hash_event(&self.trail_id, sequence, record, &prev_hash)?;

        state.events.push(AuditEvent {
            sequence,
            trail_id: self.trail_id.clone(),
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.sequence += 1;
        state.last_hash = this_hash;

        debug!(
            trail_id = %self.trail_id,
            sequence,
            user_id = %record.user_id,
            "grant change audited"
        );

        Ok(())
    }
}

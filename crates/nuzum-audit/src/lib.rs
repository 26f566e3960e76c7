//! # nuzum-audit
//!
//! Append-only, SHA-256 hash-chained audit trail for grant changes.
//!
//! ## Overview
//!
//! Every mutation the provisioner applies produces a `GrantChangeRecord`.
//! [`InMemoryAuditWriter`] wraps each one in an [`AuditEvent`] linked to the
//! previous event by hash, so altering any stored record is detected by
//! [`verify_chain`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nuzum_audit::InMemoryAuditWriter;
//!
//! let audit = InMemoryAuditWriter::new("user-admin");
//! let provisioner = Provisioner::new(policy, store, Box::new(audit.clone()));
//! // ... mutations ...
//! assert!(audit.verify_integrity());
//! let log = audit.export_log()?;
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{hash_event, verify_chain};
pub use event::{AuditEvent, AuditLog};
pub use memory::InMemoryAuditWriter;

// ── Tests ─────────────────────────────────────────────────────────────────────

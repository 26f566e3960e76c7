//! # nuzum-ref
//!
//! Reference wiring for the Nuzum access-control core.
//!
//! [`ReferenceStack`] connects the provisioner to the in-memory store and
//! audit trail. The [`scenarios`] exercise it end to end:
//!
//! 1. **HR provisioning**: preset expansion and label rendering.
//! 2. **Administrator access**: ADMIN covers every module and permission;
//!    missing or deactivated sessions are refused.
//! 3. **Document revocation**: deleting one row closes one module only.
//! 4. **Role drift**: relabel keeps grants; reprovision rebuilds them.
//!
//! All account data is fictional.

pub mod mock_data;
pub mod report;
pub mod scenarios;
pub mod stack;

pub use report::ScenarioReport;
pub use stack::ReferenceStack;

// ── Tests ─────────────────────────────────────────────────────────────────────

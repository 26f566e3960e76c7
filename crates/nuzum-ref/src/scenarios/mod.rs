//! Runnable access-control scenarios.
//!
//! Each scenario builds its own `ReferenceStack` with the given role policy,
//! provisions seed accounts through the `Provisioner`, evaluates access
//! checks against freshly loaded principals, and returns a `ScenarioReport`.

pub mod admin_access;
pub mod document_revocation;
pub mod hr_provisioning;
pub mod role_drift;

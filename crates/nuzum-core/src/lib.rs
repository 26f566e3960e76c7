//! # nuzum-core
//!
//! Access-control evaluation and grant provisioning for Nuzum.
//!
//! This crate provides:
//! - The access checks in [`access`] (`has_permission`, `can_access_module`,
//!   `authorize`, formatting helpers)
//! - The three collaborator traits (`RolePolicy`, `GrantStore`, `AuditWriter`)
//! - The [`Provisioner`] that applies grant changes through them
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nuzum_core::access::{can_access_module, authorize};
//!
//! if !can_access_module(&principal, Module::Employees, Some(Permission::Create)) {
//!     // redirect
//! }
//! ```

pub mod access;
pub mod provisioning;
pub mod traits;

pub use access::{
    accessible_modules, authorize, bitwise_and, can_access_module, format_permissions,
    format_permissions_in, has_permission, has_permission_bits, landing_module, AccessDecision,
};
pub use provisioning::Provisioner;

// ── Tests ─────────────────────────────────────────────────────────────────────

//! # nuzum-policy
//!
//! Role → grant expansion for Nuzum.
//!
//! ## Overview
//!
//! [`expand_role_to_grants`] turns a role into the default grant table a new
//! account receives. The policy is a static table, [`ROLE_PRESETS`], served
//! through [`StaticRolePolicy`]. Deployments that need different presets
//! load a TOML document with [`TomlRolePolicy`]; roles it does not mention
//! keep the built-in preset.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use nuzum_policy::TomlRolePolicy;
//!
//! let policy = TomlRolePolicy::from_file(Path::new("policies/default_roles.toml"))?;
//! // Pass `policy` to `nuzum_core::Provisioner::new(...)`.
//! ```

pub mod engine;
pub mod preset;

pub use engine::{PolicyConfig, TomlRolePolicy};
pub use preset::{expand_role_to_grants, StaticRolePolicy, ROLE_PRESETS};

/// The TOML rendition of the built-in presets.
pub const DEFAULT_ROLES_TOML: &str = include_str!("../policies/default_roles.toml");

// ── Tests ─────────────────────────────────────────────────────────────────────

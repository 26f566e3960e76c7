//! TOML-driven role policy.
//!
//! `TomlRolePolicy` loads per-role presets from a TOML document and
//! implements the `RolePolicy` trait from nuzum-core.
//!
//! Document shape:
//!
//! ```toml
//! [roles.fleet]
//! vehicles = ["view", "create", "edit", "manage"]
//! reports = ["view"]
//!
//! [roles.user]
//! "*" = ["view"]
//! ```
//!
//! Resolution, per role:
//!
//! 1. The `"*"` key, if present, applies to every module.
//! 2. Each named module key then replaces the mask for that module.
//! 3. An empty list means no grant.
//!
//! Roles the document does not mention keep their built-in preset. Every
//! name is validated at load time, so evaluation never fails.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use nuzum_contracts::{
    error::{NuzumError, NuzumResult},
    grant::GrantTable,
    module::Module,
    permission::{Permission, PermissionMask},
    role::Role,
};
use nuzum_core::traits::RolePolicy;

use crate::preset::{apply_entries, expand_role_to_grants, PresetEntry, Scope};

/// The module key that applies to every module.
pub const WILDCARD: &str = "*";

/// The top-level structure deserialized from a TOML role policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Role name → module name (or `"*"`) → permission names.
    #[serde(default)]
    pub roles: BTreeMap<String, BTreeMap<String, Vec<Permission>>>,
}

/// A `RolePolicy` whose presets come from a TOML document.
#[derive(Debug, Clone, Default)]
pub struct TomlRolePolicy {
    overrides: BTreeMap<Role, GrantTable>,
}

impl TomlRolePolicy {
    /// Parse `s` as TOML and resolve every role it mentions.
    ///
    /// Returns `NuzumError::ConfigError` if the TOML is malformed or names
    /// an unknown role, module or permission.
    pub fn from_toml_str(s: &str) -> NuzumResult<Self> {
        let config: PolicyConfig = toml::from_str(s).map_err(|e| NuzumError::ConfigError {
            reason: format!("failed to parse role policy TOML: {}", e),
        })?;
        Self::from_config(&config)
    }

    /// Read the file at `path` and parse it as a TOML role policy.
    pub fn from_file(path: &Path) -> NuzumResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| NuzumError::ConfigError {
            reason: format!("failed to read role policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_config(config: &PolicyConfig) -> NuzumResult<Self> {
        let mut overrides = BTreeMap::new();

        for (role_name, modules) in &config.roles {
            let role: Role = role_name.parse().map_err(|e| NuzumError::ConfigError {
                reason: format!("role policy: {}", e),
            })?;

            // Wildcard first so named modules override it.
            let mut entries: Vec<PresetEntry> = Vec::with_capacity(modules.len());
            if let Some(perms) = modules.get(WILDCARD) {
                entries.push((Scope::Every, PermissionMask::of(perms)));
            }
            for (module_name, perms) in modules.iter().filter(|(k, _)| k.as_str() != WILDCARD) {
                let module: Module = module_name.parse().map_err(|e| NuzumError::ConfigError {
                    reason: format!("role policy for '{}': {}", role, e),
                })?;
                entries.push((Scope::Only(module), PermissionMask::of(perms)));
            }

            let table = apply_entries(&entries);
            debug!(role = %role, grant_count = table.len(), "role preset loaded from policy");
            overrides.insert(role, table);
        }

        Ok(Self { overrides })
    }

    /// True if the document defined a preset for `role`.
    pub fn overrides(&self, role: Role) -> bool {
        self.overrides.contains_key(&role)
    }
}

impl RolePolicy for TomlRolePolicy {
    fn expand(&self, role: Role) -> GrantTable {
        match self.overrides.get(&role) {
            Some(table) => table.clone(),
            None => {
                debug!(role = %role, "no policy override; using built-in preset");
                expand_role_to_grants(role)
            }
        }
    }
}

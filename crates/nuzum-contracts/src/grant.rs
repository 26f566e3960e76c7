//! Per-module grants.
//!
//! A `UserPermission` is one persisted row: `(user_id, module, mask)`.
//! A `GrantTable` is the in-memory snapshot of all rows for one user. A
//! module with no row reads as the empty mask; a table never holds an empty
//! mask, so "no row" and "mask 0" are the same state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{module::Module, permission::PermissionMask, user::UserId};

/// One grant row, unique per `(user_id, module)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermission {
    pub user_id: UserId,
    pub module: Module,
    pub permissions: PermissionMask,
}

/// The effective permission mask for every module of one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantTable {
    inner: BTreeMap<Module, PermissionMask>,
}

impl GrantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored mask for `module`, or the empty mask if there is no row.
    pub fn mask_for(&self, module: Module) -> PermissionMask {
        self.inner.get(&module).copied().unwrap_or_default()
    }

    /// Set the mask for `module`. An empty mask removes the entry.
    pub fn set(&mut self, module: Module, mask: PermissionMask) {
        if mask.is_empty() {
            self.inner.remove(&module);
        } else {
            self.inner.insert(module, mask);
        }
    }

    /// Remove the entry for `module`, returning the mask it held.
    pub fn remove(&mut self, module: Module) -> Option<PermissionMask> {
        self.inner.remove(&module)
    }

    pub fn contains(&self, module: Module) -> bool {
        self.inner.contains_key(&module)
    }

    /// Entries in module declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Module, PermissionMask)> + '_ {
        self.inner.iter().map(|(m, p)| (*m, *p))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// One row per non-empty entry, ready to persist for `user_id`.
    pub fn to_rows(&self, user_id: UserId) -> Vec<UserPermission> {
        self.iter()
            .map(|(module, permissions)| UserPermission {
                user_id,
                module,
                permissions,
            })
            .collect()
    }
}

impl FromIterator<(Module, PermissionMask)> for GrantTable {
    fn from_iter<I: IntoIterator<Item = (Module, PermissionMask)>>(iter: I) -> Self {
        let mut table = GrantTable::new();
        for (module, mask) in iter {
            table.set(module, mask);
        }
        table
    }
}

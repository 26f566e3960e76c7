//! Grant-change records written to the audit trail.
//!
//! Every mutation the provisioner performs produces exactly one
//! `GrantChangeRecord`. Records are appended and never modified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    grant::GrantTable, module::Module, permission::PermissionMask, role::Role, user::UserId,
};

/// What happened to a user's grants or account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrantChange {
    /// A new account was created and its role preset expanded.
    Provisioned { role: Role, grants: GrantTable },

    /// One module's mask was set. An empty `after` means the row was removed.
    GrantUpdated {
        module: Module,
        before: PermissionMask,
        after: PermissionMask,
    },

    /// One module's row was deleted.
    GrantRevoked { module: Module, before: PermissionMask },

    /// The full permission matrix was rewritten by an administrator.
    GrantsReplaced { before: GrantTable, after: GrantTable },

    /// The role label changed; grants were left as they were.
    RoleRelabeled { from: Role, to: Role },

    /// The role changed and grants were rebuilt from the new preset.
    Reprovisioned {
        from: Role,
        to: Role,
        grants: GrantTable,
    },

    ActivationChanged { active: bool },

    /// The account and all of its grant rows were removed.
    AccountDeleted { grants_removed: usize },
}

/// One immutable audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantChangeRecord {
    /// The account whose grants changed.
    pub user_id: UserId,
    /// The administrator who made the change, if known.
    pub actor: Option<UserId>,
    pub change: GrantChange,
    pub timestamp: DateTime<Utc>,
}

impl GrantChangeRecord {
    /// Stamp a change with the current time.
    pub fn now(user_id: UserId, actor: Option<UserId>, change: GrantChange) -> Self {
        Self {
            user_id,
            actor,
            change,
            timestamp: Utc::now(),
        }
    }
}

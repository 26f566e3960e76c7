//! A fully wired access-control stack over the in-memory collaborators.

use nuzum_audit::InMemoryAuditWriter;
use nuzum_contracts::{
    error::NuzumResult,
    user::{Principal, UserId},
};
use nuzum_core::{traits::RolePolicy, Provisioner};
use nuzum_policy::StaticRolePolicy;
use nuzum_store::InMemoryGrantStore;

/// Provisioner plus handles on the store and audit trail it writes to.
pub struct ReferenceStack {
    pub provisioner: Provisioner,
    pub store: InMemoryGrantStore,
    pub audit: InMemoryAuditWriter,
}

impl ReferenceStack {
    pub fn new(policy: Box<dyn RolePolicy>, trail_id: &str) -> Self {
        let store = InMemoryGrantStore::new();
        let audit = InMemoryAuditWriter::new(trail_id);
        let provisioner = Provisioner::new(policy, Box::new(store.clone()), Box::new(audit.clone()));
        Self {
            provisioner,
            store,
            audit,
        }
    }

    /// A stack using the built-in role presets.
    pub fn with_builtin_policy(trail_id: &str) -> Self {
        Self::new(Box::new(StaticRolePolicy), trail_id)
    }

    /// The principal for a session bound to `user_id`.
    ///
    /// A user id with no account behaves like no session at all.
    pub fn principal(&self, user_id: UserId) -> NuzumResult<Principal> {
        Ok(self
            .provisioner
            .load_user(user_id)?
            .map(Principal::Authenticated)
            .unwrap_or(Principal::Anonymous))
    }
}

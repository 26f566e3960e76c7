//! The provisioner: the grant lifecycle for user accounts.
//!
//! Every mutation follows the same order:
//!
//!   load account → compute change → write store → audit
//!
//! The role policy is consulted only by `provision` and `reprovision`.
//! `change_role` relabels an account without touching its grants, so the
//! role label and the grants can drift apart; `reprovision` is the explicit
//! way to bring them back in line.

use tracing::{debug, info, warn};

use nuzum_contracts::{
    change::{GrantChange, GrantChangeRecord},
    error::{NuzumError, NuzumResult},
    grant::GrantTable,
    module::Module,
    permission::PermissionMask,
    role::Role,
    user::{User, UserAccount, UserId},
};

use crate::traits::{AuditWriter, GrantStore, RolePolicy};

/// Owns the trusted collaborators and applies grant changes through them.
pub struct Provisioner {
    policy: Box<dyn RolePolicy>,
    store: Box<dyn GrantStore>,
    audit: Box<dyn AuditWriter>,
}

impl Provisioner {
    pub fn new(
        policy: Box<dyn RolePolicy>,
        store: Box<dyn GrantStore>,
        audit: Box<dyn AuditWriter>,
    ) -> Self {
        Self { policy, store, audit }
    }

    /// Create an account and its default grants from the role preset.
    ///
    /// One row is inserted per module with a non-empty mask. An id without an
    /// account must have no grant rows either: a leftover row returns
    /// `DuplicateGrant` and nothing is written. If an insert still fails, the
    /// rows written so far and the account are removed before the error is
    /// returned.
    pub fn provision(&self, account: UserAccount, actor: Option<UserId>) -> NuzumResult<User> {
        let user_id = account.id;
        if self.store.account(user_id)?.is_some() {
            return Err(NuzumError::DuplicateUser { user_id });
        }

        let grants = self.policy.expand(account.role);
        if let Some((module, _)) = self.store.grants(user_id)?.iter().next() {
            warn!(user_id = %user_id, module = %module, "stale grant row blocks provisioning");
            return Err(NuzumError::DuplicateGrant { user_id, module });
        }

        self.store.insert_account(&account)?;
        let mut inserted = Vec::with_capacity(grants.len());
        for row in grants.to_rows(user_id) {
            if let Err(e) = self.store.insert_grant(&row) {
                self.roll_back_provision(user_id, &inserted);
                return Err(e);
            }
            inserted.push(row.module);
        }

        info!(
            user_id = %account.id,
            role = %account.role,
            grant_count = grants.len(),
            "user provisioned"
        );

        self.record(
            account.id,
            actor,
            GrantChange::Provisioned {
                role: account.role,
                grants: grants.clone(),
            },
        )?;

        Ok(User { account, grants })
    }

    /// Load an account with a snapshot of its grants.
    pub fn load_user(&self, user_id: UserId) -> NuzumResult<Option<User>> {
        let Some(account) = self.store.account(user_id)? else {
            return Ok(None);
        };
        let grants = self.store.grants(user_id)?;
        Ok(Some(User { account, grants }))
    }

    /// Set one module's mask. An empty mask removes the row.
    pub fn set_grant(
        &self,
        user_id: UserId,
        module: Module,
        mask: PermissionMask,
        actor: Option<UserId>,
    ) -> NuzumResult<()> {
        self.require_account(user_id)?;

        let before = self.store.upsert_grant(user_id, module, mask)?;

        info!(
            user_id = %user_id,
            module = %module,
            before = before.bits(),
            after = mask.bits(),
            "grant updated"
        );

        self.record(
            user_id,
            actor,
            GrantChange::GrantUpdated {
                module,
                before,
                after: mask,
            },
        )
    }

    /// Delete one module's row. Other modules are untouched.
    ///
    /// Returns false when there was no row; nothing is audited in that case.
    pub fn revoke_grant(
        &self,
        user_id: UserId,
        module: Module,
        actor: Option<UserId>,
    ) -> NuzumResult<bool> {
        self.require_account(user_id)?;

        let Some(before) = self.store.delete_grant(user_id, module)? else {
            debug!(user_id = %user_id, module = %module, "no grant to revoke");
            return Ok(false);
        };

        info!(user_id = %user_id, module = %module, "grant revoked");
        self.record(user_id, actor, GrantChange::GrantRevoked { module, before })?;
        Ok(true)
    }

    /// Rewrite the whole permission matrix for a user.
    pub fn replace_grants(
        &self,
        user_id: UserId,
        grants: GrantTable,
        actor: Option<UserId>,
    ) -> NuzumResult<()> {
        self.require_account(user_id)?;

        let before = self.store.grants(user_id)?;
        self.store.delete_grants(user_id)?;
        for row in grants.to_rows(user_id) {
            self.store.insert_grant(&row)?;
        }

        info!(
            user_id = %user_id,
            grant_count = grants.len(),
            "grant matrix replaced"
        );

        self.record(
            user_id,
            actor,
            GrantChange::GrantsReplaced {
                before,
                after: grants,
            },
        )
    }

    /// Change the role label only. Existing grants are kept as they are.
    pub fn change_role(&self, user_id: UserId, role: Role, actor: Option<UserId>) -> NuzumResult<()> {
        let mut account = self.require_account(user_id)?;
        let from = account.role;
        if from == role {
            return Ok(());
        }

        account.role = role;
        self.store.update_account(&account)?;

        warn!(
            user_id = %user_id,
            from = %from,
            to = %role,
            "role relabeled without re-expanding grants"
        );

        self.record(user_id, actor, GrantChange::RoleRelabeled { from, to: role })
    }

    /// Change the role and rebuild grants from the new preset.
    pub fn reprovision(
        &self,
        user_id: UserId,
        role: Role,
        actor: Option<UserId>,
    ) -> NuzumResult<GrantTable> {
        let mut account = self.require_account(user_id)?;
        let from = account.role;

        let grants = self.policy.expand(role);
        self.store.delete_grants(user_id)?;
        for row in grants.to_rows(user_id) {
            self.store.insert_grant(&row)?;
        }
        account.role = role;
        self.store.update_account(&account)?;

        info!(
            user_id = %user_id,
            from = %from,
            to = %role,
            grant_count = grants.len(),
            "user reprovisioned"
        );

        self.record(
            user_id,
            actor,
            GrantChange::Reprovisioned {
                from,
                to: role,
                grants: grants.clone(),
            },
        )?;

        Ok(grants)
    }

    /// Activate or deactivate an account. Grants are kept.
    pub fn set_active(&self, user_id: UserId, active: bool, actor: Option<UserId>) -> NuzumResult<()> {
        let mut account = self.require_account(user_id)?;
        if account.is_active == active {
            return Ok(());
        }

        account.is_active = active;
        self.store.update_account(&account)?;

        info!(user_id = %user_id, active, "account activation changed");
        self.record(user_id, actor, GrantChange::ActivationChanged { active })
    }

    /// Remove an account together with all of its grant rows.
    pub fn delete_user(&self, user_id: UserId, actor: Option<UserId>) -> NuzumResult<()> {
        let grants_removed = self
            .store
            .delete_account(user_id)?
            .ok_or(NuzumError::UserNotFound { user_id })?;

        info!(user_id = %user_id, grants_removed, "user deleted");
        self.record(user_id, actor, GrantChange::AccountDeleted { grants_removed })
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn require_account(&self, user_id: UserId) -> NuzumResult<UserAccount> {
        self.store
            .account(user_id)?
            .ok_or(NuzumError::UserNotFound { user_id })
    }

    /// Best effort: a failure here is logged and the original error wins.
    fn roll_back_provision(&self, user_id: UserId, inserted: &[Module]) {
        for module in inserted {
            if let Err(e) = self.store.delete_grant(user_id, *module) {
                warn!(user_id = %user_id, module = %module, error = %e, "rollback: grant row left behind");
            }
        }
        if let Err(e) = self.store.delete_account(user_id) {
            warn!(user_id = %user_id, error = %e, "rollback: account left behind");
        }
        warn!(user_id = %user_id, rows = inserted.len(), "provisioning rolled back");
    }

    fn record(&self, user_id: UserId, actor: Option<UserId>, change: GrantChange) -> NuzumResult<()> {
        self.audit
            .write(&GrantChangeRecord::now(user_id, actor, change))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use nuzum_contracts::{
        change::{GrantChange, GrantChangeRecord},
        error::{NuzumError, NuzumResult},
        grant::{GrantTable, UserPermission},
        module::Module,
        permission::{Permission, PermissionMask},
        role::Role,
        user::{UserAccount, UserId},
    };

    use crate::traits::{AuditWriter, GrantStore, RolePolicy};

    use super::Provisioner;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    /// Admin gets ADMIN on users, everyone else VIEW on documents and reports.
    struct MockPolicy;

    impl RolePolicy for MockPolicy {
        fn expand(&self, role: Role) -> GrantTable {
            match role {
                Role::Admin => [(Module::Users, Permission::Admin.mask())].into_iter().collect(),
                _ => [
                    (Module::Documents, Permission::View.mask()),
                    (Module::Reports, Permission::View.mask()),
                ]
                .into_iter()
                .collect(),
            }
        }
    }

    #[derive(Default)]
    struct MockStoreState {
        accounts: HashMap<UserId, UserAccount>,
        grants: HashMap<(UserId, Module), PermissionMask>,
        /// `insert_grant` on this module fails with `StoreFailed`.
        reject_module: Option<Module>,
    }

    #[derive(Clone, Default)]
    struct MockStore {
        state: Arc<Mutex<MockStoreState>>,
    }

    impl GrantStore for MockStore {
        fn insert_account(&self, account: &UserAccount) -> NuzumResult<()> {
            let mut s = self.state.lock().unwrap();
            if s.accounts.contains_key(&account.id) {
                return Err(NuzumError::DuplicateUser { user_id: account.id });
            }
            s.accounts.insert(account.id, account.clone());
            Ok(())
        }

        fn account(&self, user_id: UserId) -> NuzumResult<Option<UserAccount>> {
            Ok(self.state.lock().unwrap().accounts.get(&user_id).cloned())
        }

        fn update_account(&self, account: &UserAccount) -> NuzumResult<()> {
            self.state
                .lock()
                .unwrap()
                .accounts
                .insert(account.id, account.clone());
            Ok(())
        }

        fn grants(&self, user_id: UserId) -> NuzumResult<GrantTable> {
            let s = self.state.lock().unwrap();
            Ok(s.grants
                .iter()
                .filter(|((u, _), _)| *u == user_id)
                .map(|((_, m), p)| (*m, *p))
                .collect())
        }

        fn insert_grant(&self, grant: &UserPermission) -> NuzumResult<()> {
            let mut s = self.state.lock().unwrap();
            if s.reject_module == Some(grant.module) {
                return Err(NuzumError::StoreFailed {
                    reason: "connection reset".to_string(),
                });
            }
            let key = (grant.user_id, grant.module);
            if s.grants.contains_key(&key) {
                return Err(NuzumError::DuplicateGrant {
                    user_id: grant.user_id,
                    module: grant.module,
                });
            }
            s.grants.insert(key, grant.permissions);
            Ok(())
        }

        fn upsert_grant(
            &self,
            user_id: UserId,
            module: Module,
            mask: PermissionMask,
        ) -> NuzumResult<PermissionMask> {
            let mut s = self.state.lock().unwrap();
            let before = if mask.is_empty() {
                s.grants.remove(&(user_id, module))
            } else {
                s.grants.insert((user_id, module), mask)
            };
            Ok(before.unwrap_or_default())
        }

        fn delete_grant(&self, user_id: UserId, module: Module) -> NuzumResult<Option<PermissionMask>> {
            Ok(self.state.lock().unwrap().grants.remove(&(user_id, module)))
        }

        fn delete_grants(&self, user_id: UserId) -> NuzumResult<usize> {
            let mut s = self.state.lock().unwrap();
            let before = s.grants.len();
            s.grants.retain(|(u, _), _| *u != user_id);
            Ok(before - s.grants.len())
        }

        fn delete_account(&self, user_id: UserId) -> NuzumResult<Option<usize>> {
            if self.state.lock().unwrap().accounts.remove(&user_id).is_none() {
                return Ok(None);
            }
            self.delete_grants(user_id).map(Some)
        }
    }

    #[derive(Clone, Default)]
    struct MockAudit {
        records: Arc<Mutex<Vec<GrantChangeRecord>>>,
    }

    impl AuditWriter for MockAudit {
        fn write(&self, record: &GrantChangeRecord) -> NuzumResult<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct FailingAudit;

    impl AuditWriter for FailingAudit {
        fn write(&self, _record: &GrantChangeRecord) -> NuzumResult<()> {
            Err(NuzumError::AuditWriteFailed {
                reason: "disk full".to_string(),
            })
        }
    }

    fn setup() -> (Provisioner, MockStore, MockAudit) {
        let store = MockStore::default();
        let audit = MockAudit::default();
        let provisioner = Provisioner::new(
            Box::new(MockPolicy),
            Box::new(store.clone()),
            Box::new(audit.clone()),
        );
        (provisioner, store, audit)
    }

    fn account(id: i64, role: Role) -> UserAccount {
        UserAccount::new(id, format!("user{id}@example.com"), format!("User {id}"), role)
    }

    fn last_change(audit: &MockAudit) -> GrantChange {
        audit.records.lock().unwrap().last().unwrap().change.clone()
    }

    // ── provision ────────────────────────────────────────────────────────────

    #[test]
    fn provision_persists_expanded_rows_and_audits() {
        let (p, store, audit) = setup();

        let user = p.provision(account(1, Role::Hr), Some(UserId(99))).unwrap();

        assert_eq!(user.grants.len(), 2);
        assert_eq!(store.grants(UserId(1)).unwrap(), user.grants);

        let records = audit.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].actor, Some(UserId(99)));
        match &records[0].change {
            GrantChange::Provisioned { role, grants } => {
                assert_eq!(*role, Role::Hr);
                assert_eq!(grants.len(), 2);
            }
            other => panic!("expected Provisioned, got {:?}", other),
        }
    }

    #[test]
    fn provision_twice_fails_loudly() {
        let (p, _store, _audit) = setup();
        p.provision(account(1, Role::User), None).unwrap();

        match p.provision(account(1, Role::User), None) {
            Err(NuzumError::DuplicateUser { user_id }) => assert_eq!(user_id, UserId(1)),
            other => panic!("expected DuplicateUser, got {:?}", other),
        }
    }

    #[test]
    fn provision_surfaces_duplicate_grant_rows() {
        let (p, store, audit) = setup();
        // A stale row left behind for an id that is about to be reused.
        store
            .insert_grant(&UserPermission {
                user_id: UserId(5),
                module: Module::Documents,
                permissions: Permission::Edit.mask(),
            })
            .unwrap();

        match p.provision(account(5, Role::User), None) {
            Err(NuzumError::DuplicateGrant { user_id, module }) => {
                assert_eq!(user_id, UserId(5));
                assert_eq!(module, Module::Documents);
            }
            other => panic!("expected DuplicateGrant, got {:?}", other),
        }

        // Nothing half-created: no account, only the stale row, no audit.
        assert!(p.load_user(UserId(5)).unwrap().is_none());
        assert_eq!(store.grants(UserId(5)).unwrap().len(), 1);
        assert!(audit.records.lock().unwrap().is_empty());
    }

    #[test]
    fn provision_retry_succeeds_after_stale_row_is_cleared() {
        let (p, store, _audit) = setup();
        store
            .insert_grant(&UserPermission {
                user_id: UserId(5),
                module: Module::Reports,
                permissions: Permission::Edit.mask(),
            })
            .unwrap();
        assert!(p.provision(account(5, Role::User), None).is_err());

        store.delete_grant(UserId(5), Module::Reports).unwrap();
        let user = p.provision(account(5, Role::User), None).unwrap();
        assert_eq!(user.grants.mask_for(Module::Reports), Permission::View.mask());
    }

    #[test]
    fn provision_rolls_back_when_a_grant_insert_fails() {
        let (p, store, audit) = setup();
        store.state.lock().unwrap().reject_module = Some(Module::Reports);

        match p.provision(account(1, Role::User), None) {
            Err(NuzumError::StoreFailed { reason }) => assert!(reason.contains("connection reset")),
            other => panic!("expected StoreFailed, got {:?}", other),
        }

        // Documents was written before Reports failed; it is gone again.
        assert!(p.load_user(UserId(1)).unwrap().is_none());
        assert!(store.grants(UserId(1)).unwrap().is_empty());
        assert!(audit.records.lock().unwrap().is_empty());
    }

    // ── grant mutation ───────────────────────────────────────────────────────

    #[test]
    fn set_grant_records_before_and_after() {
        let (p, store, audit) = setup();
        p.provision(account(1, Role::User), None).unwrap();

        let edit = Permission::View | Permission::Edit;
        p.set_grant(UserId(1), Module::Documents, edit, None).unwrap();

        assert_eq!(store.grants(UserId(1)).unwrap().mask_for(Module::Documents), edit);
        assert_eq!(
            last_change(&audit),
            GrantChange::GrantUpdated {
                module: Module::Documents,
                before: Permission::View.mask(),
                after: edit,
            }
        );
    }

    #[test]
    fn set_grant_with_empty_mask_removes_row() {
        let (p, store, _audit) = setup();
        p.provision(account(1, Role::User), None).unwrap();

        p.set_grant(UserId(1), Module::Reports, PermissionMask::empty(), None)
            .unwrap();

        assert!(!store.grants(UserId(1)).unwrap().contains(Module::Reports));
    }

    #[test]
    fn revoke_missing_grant_is_not_audited() {
        let (p, _store, audit) = setup();
        p.provision(account(1, Role::User), None).unwrap();

        assert!(!p.revoke_grant(UserId(1), Module::Vehicles, None).unwrap());
        assert_eq!(audit.records.lock().unwrap().len(), 1);

        assert!(p.revoke_grant(UserId(1), Module::Documents, None).unwrap());
        assert_eq!(audit.records.lock().unwrap().len(), 2);
    }

    #[test]
    fn replace_grants_rewrites_matrix() {
        let (p, store, audit) = setup();
        p.provision(account(1, Role::User), None).unwrap();

        let matrix: GrantTable = [(Module::Fees, Permission::View | Permission::Create)]
            .into_iter()
            .collect();
        p.replace_grants(UserId(1), matrix.clone(), None).unwrap();

        assert_eq!(store.grants(UserId(1)).unwrap(), matrix);
        match last_change(&audit) {
            GrantChange::GrantsReplaced { before, after } => {
                assert_eq!(before.len(), 2);
                assert_eq!(after, matrix);
            }
            other => panic!("expected GrantsReplaced, got {:?}", other),
        }
    }

    // ── role changes ─────────────────────────────────────────────────────────

    #[test]
    fn change_role_keeps_existing_grants() {
        let (p, store, audit) = setup();
        let before = p.provision(account(1, Role::User), None).unwrap().grants;

        p.change_role(UserId(1), Role::Admin, None).unwrap();

        let user = p.load_user(UserId(1)).unwrap().unwrap();
        assert_eq!(user.account.role, Role::Admin);
        assert_eq!(store.grants(UserId(1)).unwrap(), before);
        assert_eq!(
            last_change(&audit),
            GrantChange::RoleRelabeled {
                from: Role::User,
                to: Role::Admin,
            }
        );
    }

    #[test]
    fn reprovision_rebuilds_grants_from_new_role() {
        let (p, store, _audit) = setup();
        p.provision(account(1, Role::User), None).unwrap();

        let grants = p.reprovision(UserId(1), Role::Admin, None).unwrap();

        assert_eq!(store.grants(UserId(1)).unwrap(), grants);
        assert!(grants.contains(Module::Users));
        assert!(!grants.contains(Module::Documents));
        assert_eq!(p.load_user(UserId(1)).unwrap().unwrap().account.role, Role::Admin);
    }

    // ── account lifecycle ────────────────────────────────────────────────────

    #[test]
    fn set_active_toggles_without_touching_grants() {
        let (p, store, _audit) = setup();
        p.provision(account(1, Role::User), None).unwrap();

        p.set_active(UserId(1), false, None).unwrap();

        let user = p.load_user(UserId(1)).unwrap().unwrap();
        assert!(!user.account.is_active);
        assert_eq!(store.grants(UserId(1)).unwrap().len(), 2);
    }

    #[test]
    fn delete_user_cascades_to_grants() {
        let (p, store, audit) = setup();
        p.provision(account(1, Role::User), None).unwrap();

        p.delete_user(UserId(1), None).unwrap();

        assert!(p.load_user(UserId(1)).unwrap().is_none());
        assert!(store.grants(UserId(1)).unwrap().is_empty());
        assert_eq!(
            last_change(&audit),
            GrantChange::AccountDeleted { grants_removed: 2 }
        );
    }

    #[test]
    fn mutations_on_unknown_user_fail() {
        let (p, _store, _audit) = setup();

        assert!(matches!(
            p.set_grant(UserId(404), Module::Fees, Permission::View.mask(), None),
            Err(NuzumError::UserNotFound { .. })
        ));
        assert!(matches!(
            p.change_role(UserId(404), Role::Hr, None),
            Err(NuzumError::UserNotFound { .. })
        ));
        assert!(matches!(
            p.delete_user(UserId(404), None),
            Err(NuzumError::UserNotFound { .. })
        ));
        assert!(p.load_user(UserId(404)).unwrap().is_none());
    }

    #[test]
    fn audit_failure_is_returned() {
        let p = Provisioner::new(
            Box::new(MockPolicy),
            Box::new(MockStore::default()),
            Box::new(FailingAudit),
        );

        match p.provision(account(1, Role::User), None) {
            Err(NuzumError::AuditWriteFailed { reason }) => assert!(reason.contains("disk full")),
            other => panic!("expected AuditWriteFailed, got {:?}", other),
        }
    }
}

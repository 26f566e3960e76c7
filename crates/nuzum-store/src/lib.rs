//! # nuzum-store
//!
//! In-memory reference implementation of the
//! [`GrantStore`](nuzum_core::traits::GrantStore) trait.
//!
//! [`InMemoryGrantStore`] enforces the storage contract the access-control
//! core relies on:
//!
//! - at most one grant row per `(user_id, module)`; a duplicate insert fails
//!   with `DuplicateGrant`
//! - deleting an account deletes its grant rows
//! - grants of an unknown user read as an empty table

pub mod memory;

pub use memory::InMemoryGrantStore;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use nuzum_contracts::{
        error::NuzumError,
        grant::UserPermission,
        module::Module,
        permission::{Permission, PermissionMask},
        role::Role,
        user::{UserAccount, UserId},
    };
    use nuzum_core::traits::GrantStore;

    use super::InMemoryGrantStore;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn row(user: i64, module: Module, mask: PermissionMask) -> UserPermission {
        UserPermission {
            user_id: UserId(user),
            module,
            permissions: mask,
        }
    }

    fn seeded() -> InMemoryGrantStore {
        let store = InMemoryGrantStore::new();
        for id in [1, 2] {
            store
                .insert_account(&UserAccount::new(id, format!("{id}@example.com"), "T", Role::User))
                .unwrap();
        }
        store
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn duplicate_grant_insert_fails() {
        let store = seeded();
        store.insert_grant(&row(1, Module::Fees, Permission::View.mask())).unwrap();

        match store.insert_grant(&row(1, Module::Fees, Permission::Edit.mask())) {
            Err(NuzumError::DuplicateGrant { user_id, module }) => {
                assert_eq!(user_id, UserId(1));
                assert_eq!(module, Module::Fees);
            }
            other => panic!("expected DuplicateGrant, got {:?}", other),
        }

        // The original mask survives.
        assert_eq!(
            store.grants(UserId(1)).unwrap().mask_for(Module::Fees),
            Permission::View.mask()
        );
    }

    #[test]
    fn grants_are_isolated_per_user() {
        let store = seeded();
        store.insert_grant(&row(1, Module::Fees, Permission::View.mask())).unwrap();
        store.insert_grant(&row(2, Module::Vehicles, Permission::Edit.mask())).unwrap();
        store.insert_grant(&row(2, Module::Dashboard, Permission::View.mask())).unwrap();

        let one = store.grants(UserId(1)).unwrap();
        let two = store.grants(UserId(2)).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(two.len(), 2);
        assert!(!one.contains(Module::Vehicles));
    }

    #[test]
    fn unknown_user_reads_as_empty_table() {
        let store = seeded();
        assert!(store.grants(UserId(404)).unwrap().is_empty());
        assert!(store.account(UserId(404)).unwrap().is_none());
    }

    #[test]
    fn upsert_returns_previous_mask_and_empty_deletes() {
        let store = seeded();
        let edit = Permission::View | Permission::Edit;

        let before = store.upsert_grant(UserId(1), Module::Salaries, edit).unwrap();
        assert!(before.is_empty());

        let before = store
            .upsert_grant(UserId(1), Module::Salaries, PermissionMask::empty())
            .unwrap();
        assert_eq!(before, edit);
        assert!(store.grants(UserId(1)).unwrap().is_empty());
    }

    #[test]
    fn delete_account_cascades_only_to_its_grants() {
        let store = seeded();
        store.insert_grant(&row(1, Module::Fees, Permission::View.mask())).unwrap();
        store.insert_grant(&row(1, Module::Users, Permission::View.mask())).unwrap();
        store.insert_grant(&row(2, Module::Fees, Permission::View.mask())).unwrap();

        assert_eq!(store.delete_account(UserId(1)).unwrap(), Some(2));
        assert_eq!(store.grant_row_count().unwrap(), 1);
        assert_eq!(store.delete_account(UserId(1)).unwrap(), None);
        assert_eq!(store.accounts().unwrap().len(), 1);
    }

    #[test]
    fn update_missing_account_fails() {
        let store = seeded();
        let ghost = UserAccount::new(9, "g@example.com", "G", Role::Hr);
        assert!(matches!(
            store.update_account(&ghost),
            Err(NuzumError::UserNotFound { .. })
        ));
    }

    #[test]
    fn duplicate_account_insert_fails() {
        let store = seeded();
        let again = UserAccount::new(1, "again@example.com", "A", Role::Admin);
        assert!(matches!(
            store.insert_account(&again),
            Err(NuzumError::DuplicateUser { .. })
        ));
    }

    #[test]
    fn poisoned_lock_is_reported_by_row_count() {
        let store = seeded();
        let holder = store.clone();
        let _ = thread::spawn(move || {
            let _guard = holder.state.lock().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(
            store.grant_row_count(),
            Err(NuzumError::StoreFailed { .. })
        ));
    }

    /// Racing inserts for the same pair: exactly one wins, the rest fail.
    #[test]
    fn concurrent_duplicate_inserts_leave_one_row() {
        let store = Arc::new(seeded());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .insert_grant(&row(1, Module::Documents, Permission::View.mask()))
                        .is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(store.grants(UserId(1)).unwrap().len(), 1);
    }
}

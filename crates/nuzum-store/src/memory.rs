//! In-memory implementation of `GrantStore`.
//!
//! Accounts and grant rows live in two `BTreeMap`s behind one `Mutex`, so a
//! store can be cloned and shared across threads. The grant map is keyed by
//! `(user_id, module)`, which is the uniqueness constraint: a second insert
//! for the same pair is rejected.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::debug;

use nuzum_contracts::{
    error::{NuzumError, NuzumResult},
    grant::{GrantTable, UserPermission},
    module::Module,
    permission::PermissionMask,
    user::{UserAccount, UserId},
};
use nuzum_core::traits::GrantStore;

// ── Internal mutable state ────────────────────────────────────────────────────

#[derive(Default)]
pub(crate) struct StoreState {
    pub(crate) accounts: BTreeMap<UserId, UserAccount>,
    pub(crate) grants: BTreeMap<(UserId, Module), PermissionMask>,
}

// ── Public store ──────────────────────────────────────────────────────────────

/// A shared, in-memory account and grant store.
///
/// Clones share the same underlying data.
#[derive(Clone, Default)]
pub struct InMemoryGrantStore {
    pub(crate) state: Arc<Mutex<StoreState>>,
}

impl InMemoryGrantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of grant rows across all users.
    pub fn grant_row_count(&self) -> NuzumResult<usize> {
        Ok(self.lock()?.grants.len())
    }

    /// Every account, ordered by id.
    pub fn accounts(&self) -> NuzumResult<Vec<UserAccount>> {
        Ok(self.lock()?.accounts.values().cloned().collect())
    }

    fn lock(&self) -> NuzumResult<MutexGuard<'_, StoreState>> {
        self.state.lock().map_err(|e| NuzumError::StoreFailed {
            reason: format!("grant store lock poisoned: {}", e),
        })
    }
}

fn remove_user_grants(state: &mut StoreState, user_id: UserId) -> usize {
    let before = state.grants.len();
    state.grants.retain(|(owner, _), _| *owner != user_id);
    before - state.grants.len()
}

// ── GrantStore impl ───────────────────────────────────────────────────────────

impl GrantStore for InMemoryGrantStore {
    fn insert_account(&self, account: &UserAccount) -> NuzumResult<()> {
        let mut state = self.lock()?;
        if state.accounts.contains_key(&account.id) {
            return Err(NuzumError::DuplicateUser { user_id: account.id });
        }
        state.accounts.insert(account.id, account.clone());
        Ok(())
    }

    fn account(&self, user_id: UserId) -> NuzumResult<Option<UserAccount>> {
        Ok(self.lock()?.accounts.get(&user_id).cloned())
    }

    fn update_account(&self, account: &UserAccount) -> NuzumResult<()> {
        let mut state = self.lock()?;
        match state.accounts.get_mut(&account.id) {
            Some(slot) => {
                *slot = account.clone();
                Ok(())
            }
            None => Err(NuzumError::UserNotFound { user_id: account.id }),
        }
    }

    fn grants(&self, user_id: UserId) -> NuzumResult<GrantTable> {
        let state = self.lock()?;
        Ok(state
            .grants
            .range((user_id, Module::ALL[0])..=(user_id, Module::ALL[Module::ALL.len() - 1]))
            .map(|((_, module), mask)| (*module, *mask))
            .collect())
    }

    fn insert_grant(&self, grant: &UserPermission) -> NuzumResult<()> {
        let mut state = self.lock()?;
        let key = (grant.user_id, grant.module);
        if state.grants.contains_key(&key) {
            return Err(NuzumError::DuplicateGrant {
                user_id: grant.user_id,
                module: grant.module,
            });
        }
        if !grant.permissions.is_empty() {
            state.grants.insert(key, grant.permissions);
        }
        Ok(())
    }

    fn upsert_grant(
        &self,
        user_id: UserId,
        module: Module,
        mask: PermissionMask,
    ) -> NuzumResult<PermissionMask> {
        let mut state = self.lock()?;
        let previous = if mask.is_empty() {
            state.grants.remove(&(user_id, module))
        } else {
            state.grants.insert((user_id, module), mask)
        };
        debug!(user_id = %user_id, module = %module, mask = mask.bits(), "grant row written");
        Ok(previous.unwrap_or_default())
    }

    fn delete_grant(&self, user_id: UserId, module: Module) -> NuzumResult<Option<PermissionMask>> {
        Ok(self.lock()?.grants.remove(&(user_id, module)))
    }

    fn delete_grants(&self, user_id: UserId) -> NuzumResult<usize> {
        let mut state = self.lock()?;
        Ok(remove_user_grants(&mut state, user_id))
    }

    fn delete_account(&self, user_id: UserId) -> NuzumResult<Option<usize>> {
        let mut state = self.lock()?;
        if state.accounts.remove(&user_id).is_none() {
            return Ok(None);
        }
        let removed = remove_user_grants(&mut state, user_id);
        debug!(user_id = %user_id, removed, "account deleted with its grants");
        Ok(Some(removed))
    }
}

//! Trait seams between the access-control core and its collaborators.
//!
//! - `RolePolicy`  expands a role label into default grants
//! - `GrantStore`  persists accounts and grant rows
//! - `AuditWriter` records every grant change immutably
//!
//! The `Provisioner` wires them together. Access evaluation itself needs
//! none of them: it is a pure function over an already-loaded `User`.

use nuzum_contracts::{
    change::GrantChangeRecord,
    error::NuzumResult,
    grant::{GrantTable, UserPermission},
    module::Module,
    permission::PermissionMask,
    role::Role,
    user::{UserAccount, UserId},
};

/// Source of the default grant table for each role.
///
/// Implementations must be deterministic: the same role always expands to
/// the same table.
pub trait RolePolicy: Send + Sync {
    fn expand(&self, role: Role) -> GrantTable;
}

/// Persistence for accounts and their grant rows.
///
/// Implementations must enforce uniqueness of `(user_id, module)`:
/// `insert_grant` on an existing pair fails with `DuplicateGrant` rather than
/// keeping two masks. Deleting an account deletes its grants.
pub trait GrantStore: Send + Sync {
    /// Insert a new account. Fails with `DuplicateUser` if the id exists.
    fn insert_account(&self, account: &UserAccount) -> NuzumResult<()>;

    fn account(&self, user_id: UserId) -> NuzumResult<Option<UserAccount>>;

    /// Overwrite an existing account. Fails with `UserNotFound` otherwise.
    fn update_account(&self, account: &UserAccount) -> NuzumResult<()>;

    /// All grant rows for `user_id`. Unknown users read as an empty table.
    fn grants(&self, user_id: UserId) -> NuzumResult<GrantTable>;

    /// Insert one row. Fails with `DuplicateGrant` if the pair exists.
    fn insert_grant(&self, grant: &UserPermission) -> NuzumResult<()>;

    /// Insert or replace one row. An empty mask deletes the row.
    /// Returns the mask previously stored (empty if none).
    fn upsert_grant(
        &self,
        user_id: UserId,
        module: Module,
        mask: PermissionMask,
    ) -> NuzumResult<PermissionMask>;

    /// Delete one row, returning the mask it held.
    fn delete_grant(&self, user_id: UserId, module: Module) -> NuzumResult<Option<PermissionMask>>;

    /// Delete every row for `user_id`, returning how many were removed.
    fn delete_grants(&self, user_id: UserId) -> NuzumResult<usize>;

    /// Delete the account and cascade to its grants.
    /// Returns the number of grant rows removed, or `None` if no such account.
    fn delete_account(&self, user_id: UserId) -> NuzumResult<Option<usize>>;
}

/// Append-only sink for grant-change records.
///
/// A failed write is reported to the caller as `AuditWriteFailed`.
pub trait AuditWriter: Send + Sync {
    fn write(&self, record: &GrantChangeRecord) -> NuzumResult<()>;
}

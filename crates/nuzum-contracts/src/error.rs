//! Error types for the Nuzum access-control core.
//!
//! A denied access check is never an error: evaluation returns `bool` or an
//! `AccessDecision`. The variants here cover contract violations (raw values
//! outside the closed enumerations) and collaborator failures.

use thiserror::Error;

use crate::{module::Module, user::UserId};

/// The unified error type for the Nuzum crates.
#[derive(Debug, Error)]
pub enum NuzumError {
    /// A raw value was passed where exactly one permission bit is expected.
    #[error("invalid permission bits {bits:#x}: expected exactly one known permission bit")]
    InvalidPermission { bits: u32 },

    /// A raw mask carries bits outside the known permission set.
    #[error("invalid permission mask {bits:#x}: contains unknown bits")]
    InvalidMask { bits: u32 },

    #[error("unknown module '{name}'")]
    UnknownModule { name: String },

    #[error("unknown permission '{name}'")]
    UnknownPermission { name: String },

    #[error("unknown role '{name}'")]
    UnknownRole { name: String },

    /// A second grant row was inserted for the same `(user, module)` pair.
    ///
    /// Stores must fail loudly here instead of keeping two masks.
    #[error("grant for user {user_id} on module '{module}' already exists")]
    DuplicateGrant { user_id: UserId, module: Module },

    #[error("user {user_id} already exists")]
    DuplicateUser { user_id: UserId },

    #[error("user {user_id} not found")]
    UserNotFound { user_id: UserId },

    /// The grant store could not complete a read or write.
    #[error("grant store failure: {reason}")]
    StoreFailed { reason: String },

    /// The audit writer could not persist a grant-change record.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },

    /// A role policy document is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the Nuzum crates.
pub type NuzumResult<T> = Result<T, NuzumError>;

//! # nuzum-contracts
//!
//! Shared types and error definitions for the Nuzum access-control core.
//!
//! Every crate in the workspace imports from here. No business logic lives
//! in this crate, only the closed enumerations (`Module`, `Permission`,
//! `Role`), the `PermissionMask` value type, grant rows and tables, account
//! types, audit records and the error type.

pub mod change;
pub mod error;
pub mod grant;
pub mod module;
pub mod permission;
pub mod role;
pub mod user;

pub use error::{NuzumError, NuzumResult};
pub use grant::{GrantTable, UserPermission};
pub use module::Module;
pub use permission::{Locale, Permission, PermissionMask};
pub use role::Role;
pub use user::{Principal, User, UserAccount, UserId};

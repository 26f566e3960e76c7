//! Account identity and the principal presented to access checks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{grant::GrantTable, role::Role};

/// Database identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity and status of an account, without its grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub name: String,
    /// The role label. Only used to pick the preset at provisioning time.
    pub role: Role,
    pub is_active: bool,
}

impl UserAccount {
    /// An active account with the given role.
    pub fn new(id: i64, email: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId(id),
            email: email.into(),
            name: name.into(),
            role,
            is_active: true,
        }
    }
}

/// An account together with a snapshot of its grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub account: UserAccount,
    pub grants: GrantTable,
}

impl User {
    pub fn id(&self) -> UserId {
        self.account.id
    }
}

/// Whoever is making the request.
#[derive(Debug, Clone)]
pub enum Principal {
    /// No session; every check is denied.
    Anonymous,
    Authenticated(User),
}

impl Principal {
    /// The user behind this principal, if authenticated and active.
    ///
    /// Inactive accounts are treated exactly like anonymous requests.
    pub fn active_user(&self) -> Option<&User> {
        match self {
            Principal::Authenticated(user) if user.account.is_active => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::Authenticated(_))
    }
}

impl From<User> for Principal {
    fn from(user: User) -> Self {
        Principal::Authenticated(user)
    }
}

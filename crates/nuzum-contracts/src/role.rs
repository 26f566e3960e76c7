//! Coarse-grained account roles.
//!
//! A role is a preset: it is expanded into per-module grants when an account
//! is provisioned and is not consulted when access is evaluated.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::NuzumError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Hr,
    Finance,
    Fleet,
    User,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Manager,
        Role::Hr,
        Role::Finance,
        Role::Fleet,
        Role::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Hr => "hr",
            Role::Finance => "finance",
            Role::Fleet => "fleet",
            Role::User => "user",
        }
    }

    /// Arabic label shown in account forms and listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "مدير النظام",
            Role::Manager => "مدير",
            Role::Hr => "موارد بشرية",
            Role::Finance => "مالية",
            Role::Fleet => "مسؤول أسطول",
            Role::User => "مستخدم عادي",
        }
    }

    /// Map a legacy free-text role column onto a `Role`.
    ///
    /// Accounts created before roles were an enumeration stored arbitrary
    /// strings; anything unrecognised becomes a plain `User`.
    pub fn from_legacy(value: &str) -> Role {
        value.trim().to_ascii_lowercase().parse().unwrap_or(Role::User)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = NuzumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| NuzumError::UnknownRole { name: s.to_string() })
    }
}

//! Permission bits and the permission-mask value type.
//!
//! Each `Permission` is a distinct power of two, so any subset of
//! capabilities fits in one `PermissionMask` and can be recovered with a
//! bitwise AND. The mask is a dedicated type; a bare integer only becomes a
//! mask through `PermissionMask::from_raw`, which rejects unknown bits.

use std::{fmt, ops::BitOr, str::FromStr};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{NuzumError, NuzumResult};

/// An atomic capability within one module.
///
/// `Admin` conventionally implies every other permission for the module it
/// is granted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum Permission {
    View = 1,
    Create = 1 << 1,
    Edit = 1 << 2,
    Delete = 1 << 3,
    Manage = 1 << 4,
    Admin = 1 << 5,
}

/// Language used when rendering permission labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Arabic,
    English,
}

impl Permission {
    /// Every permission, in canonical display order.
    pub const ALL: [Permission; 6] = [
        Permission::View,
        Permission::Create,
        Permission::Edit,
        Permission::Delete,
        Permission::Manage,
        Permission::Admin,
    ];

    /// The raw bit for this permission.
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// A mask holding only this permission.
    pub fn mask(self) -> PermissionMask {
        PermissionMask::from_bits_retain(self.bits())
    }

    /// Recover a permission from a raw value.
    ///
    /// The value must be exactly one known bit. Anything else is a caller
    /// bug and is reported as `InvalidPermission` rather than evaluated.
    pub fn from_bits(bits: u32) -> NuzumResult<Self> {
        Permission::ALL
            .into_iter()
            .find(|p| p.bits() == bits)
            .ok_or(NuzumError::InvalidPermission { bits })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::View => "view",
            Permission::Create => "create",
            Permission::Edit => "edit",
            Permission::Delete => "delete",
            Permission::Manage => "manage",
            Permission::Admin => "admin",
        }
    }

    /// Human-readable label for display screens and reports.
    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Arabic, Permission::View) => "عرض",
            (Locale::Arabic, Permission::Create) => "إنشاء",
            (Locale::Arabic, Permission::Edit) => "تعديل",
            (Locale::Arabic, Permission::Delete) => "حذف",
            (Locale::Arabic, Permission::Manage) => "إدارة",
            (Locale::Arabic, Permission::Admin) => "مسؤول",
            (Locale::English, Permission::View) => "VIEW",
            (Locale::English, Permission::Create) => "CREATE",
            (Locale::English, Permission::Edit) => "EDIT",
            (Locale::English, Permission::Delete) => "DELETE",
            (Locale::English, Permission::Manage) => "MANAGE",
            (Locale::English, Permission::Admin) => "ADMIN",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = NuzumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| NuzumError::UnknownPermission { name: s.to_string() })
    }
}

bitflags! {
    /// A set of permissions held on a single module.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub struct PermissionMask: u32 {
        const VIEW = 1;
        const CREATE = 1 << 1;
        const EDIT = 1 << 2;
        const DELETE = 1 << 3;
        const MANAGE = 1 << 4;
        const ADMIN = 1 << 5;
    }
}

impl Default for PermissionMask {
    fn default() -> Self {
        Self::empty()
    }
}

impl PermissionMask {
    /// Build a mask from a stored integer, rejecting unknown bits.
    pub fn from_raw(bits: u32) -> NuzumResult<Self> {
        Self::from_bits(bits).ok_or(NuzumError::InvalidMask { bits })
    }

    /// Fold a list of permissions into one mask.
    pub fn of(permissions: &[Permission]) -> Self {
        permissions
            .iter()
            .fold(Self::empty(), |acc, p| acc | p.mask())
    }

    /// True if the bit for `permission` is set. No ADMIN subsumption here;
    /// that rule belongs to access evaluation.
    pub fn has_bit(&self, permission: Permission) -> bool {
        self.contains(permission.mask())
    }

    /// The permissions whose bits are set, in canonical display order.
    pub fn permissions(&self) -> impl Iterator<Item = Permission> + '_ {
        Permission::ALL.into_iter().filter(move |p| self.has_bit(*p))
    }
}

impl From<Permission> for PermissionMask {
    fn from(permission: Permission) -> Self {
        permission.mask()
    }
}

impl BitOr for Permission {
    type Output = PermissionMask;

    fn bitor(self, rhs: Permission) -> PermissionMask {
        self.mask() | rhs.mask()
    }
}

impl BitOr<Permission> for PermissionMask {
    type Output = PermissionMask;

    fn bitor(self, rhs: Permission) -> PermissionMask {
        self | rhs.mask()
    }
}

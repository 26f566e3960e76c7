//! The built-in role presets.
//!
//! Each role maps to an ordered list of entries. An entry either covers
//! every module or names one; later entries replace earlier ones for the
//! modules they cover. Adding a role or a module is an edit to
//! `ROLE_PRESETS`, not to any control flow.

use nuzum_contracts::{grant::GrantTable, module::Module, permission::PermissionMask, role::Role};
use nuzum_core::traits::RolePolicy;

/// Which modules a preset entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Every,
    Only(Module),
}

impl Scope {
    fn modules(self) -> impl Iterator<Item = Module> {
        Module::ALL
            .into_iter()
            .filter(move |m| matches!(self, Scope::Every) || self == Scope::Only(*m))
    }
}

/// One line of a preset: `scope → mask`.
pub type PresetEntry = (Scope, PermissionMask);

const VIEW: PermissionMask = PermissionMask::VIEW;
const VIEW_CREATE_EDIT: PermissionMask = PermissionMask::VIEW
    .union(PermissionMask::CREATE)
    .union(PermissionMask::EDIT);
const VIEW_CREATE_EDIT_MANAGE: PermissionMask = VIEW_CREATE_EDIT.union(PermissionMask::MANAGE);
const ALL_BUT_ADMIN: PermissionMask = VIEW_CREATE_EDIT_MANAGE.union(PermissionMask::DELETE);

/// Default grants per role.
pub static ROLE_PRESETS: [(Role, &[PresetEntry]); 6] = [
    (Role::Admin, &[(Scope::Every, PermissionMask::ADMIN)]),
    (
        Role::Manager,
        &[
            (Scope::Every, ALL_BUT_ADMIN),
            (Scope::Only(Module::Users), VIEW),
        ],
    ),
    (
        Role::Hr,
        &[
            (Scope::Only(Module::Employees), VIEW_CREATE_EDIT_MANAGE),
            (Scope::Only(Module::Attendance), VIEW_CREATE_EDIT),
            (Scope::Only(Module::Departments), VIEW_CREATE_EDIT),
            (Scope::Only(Module::Documents), VIEW_CREATE_EDIT_MANAGE),
            (Scope::Only(Module::Reports), VIEW),
            (Scope::Only(Module::Fees), VIEW_CREATE_EDIT),
        ],
    ),
    (
        Role::Finance,
        &[
            (Scope::Only(Module::Employees), VIEW),
            (Scope::Only(Module::Salaries), VIEW_CREATE_EDIT_MANAGE),
            (Scope::Only(Module::Fees), VIEW_CREATE_EDIT_MANAGE),
            (Scope::Only(Module::Reports), VIEW),
        ],
    ),
    (
        Role::Fleet,
        &[
            (Scope::Only(Module::Vehicles), VIEW_CREATE_EDIT_MANAGE),
            (Scope::Only(Module::Reports), VIEW),
        ],
    ),
    (Role::User, &[(Scope::Every, VIEW)]),
];

/// Apply preset entries in order to an empty table.
pub fn apply_entries(entries: &[PresetEntry]) -> GrantTable {
    let mut table = GrantTable::new();
    for (scope, mask) in entries {
        for module in scope.modules() {
            table.set(module, *mask);
        }
    }
    table
}

/// The default grant table for a newly provisioned user of `role`.
///
/// Modules without a grant are absent from the table, which is the same as
/// an empty mask.
pub fn expand_role_to_grants(role: Role) -> GrantTable {
    ROLE_PRESETS
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, entries)| apply_entries(entries))
        .unwrap_or_default()
}

/// `RolePolicy` backed by `ROLE_PRESETS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRolePolicy;

impl RolePolicy for StaticRolePolicy {
    fn expand(&self, role: Role) -> GrantTable {
        expand_role_to_grants(role)
    }
}

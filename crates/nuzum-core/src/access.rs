//! Access evaluation.
//!
//! Every check is a pure function over a `Principal` whose grants are
//! already loaded. The rules:
//!
//! 1. An anonymous or inactive principal is denied before any mask is read.
//! 2. A module with no grant row has the empty mask.
//! 3. The check passes if the requested bit is set, or if the module's mask
//!    carries `ADMIN`.
//!
//! The role label is never consulted here; grants are the source of truth.

use serde::{Deserialize, Serialize};
use tracing::debug;

use nuzum_contracts::{
    error::NuzumResult,
    module::Module,
    permission::{Locale, Permission, PermissionMask},
    user::Principal,
};

/// The permission checked when a caller does not name one.
pub const DEFAULT_PERMISSION: Permission = Permission::View;

/// The outcome a route guard turns into a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessDecision {
    Allowed,
    /// No active session; the caller should send the user to log in.
    LoginRequired,
    /// Authenticated, but the grant for `module` lacks `permission`.
    Forbidden {
        module: Module,
        permission: Permission,
    },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }
}

/// True if `mask` satisfies `permission`, counting `ADMIN` as every bit.
pub fn mask_allows(mask: PermissionMask, permission: Permission) -> bool {
    mask.has_bit(permission) || mask.has_bit(Permission::Admin)
}

/// Decide whether `principal` holds `permission` on `module`.
pub fn has_permission(principal: &Principal, module: Module, permission: Permission) -> bool {
    let Some(user) = principal.active_user() else {
        debug!(
            module = %module,
            permission = %permission,
            "no active session; access denied"
        );
        return false;
    };

    let mask = user.grants.mask_for(module);
    let allowed = mask_allows(mask, permission);

    if !allowed {
        debug!(
            user_id = %user.id(),
            module = %module,
            permission = %permission,
            mask = mask.bits(),
            "grant does not cover requested permission"
        );
    }

    allowed
}

/// `has_permission` for callers holding a raw permission value.
///
/// The value must be exactly one known bit; anything else returns
/// `InvalidPermission` instead of being evaluated.
pub fn has_permission_bits(principal: &Principal, module: Module, bits: u32) -> NuzumResult<bool> {
    let permission = Permission::from_bits(bits)?;
    Ok(has_permission(principal, module, permission))
}

/// The guard every route calls before rendering or mutating.
///
/// `None` checks `VIEW`.
pub fn can_access_module(
    principal: &Principal,
    module: Module,
    permission: Option<Permission>,
) -> bool {
    has_permission(principal, module, permission.unwrap_or(DEFAULT_PERMISSION))
}

/// Like `can_access_module`, but says why access was refused.
pub fn authorize(
    principal: &Principal,
    module: Module,
    permission: Option<Permission>,
) -> AccessDecision {
    let permission = permission.unwrap_or(DEFAULT_PERMISSION);

    if principal.active_user().is_none() {
        return AccessDecision::LoginRequired;
    }

    if has_permission(principal, module, permission) {
        AccessDecision::Allowed
    } else {
        AccessDecision::Forbidden { module, permission }
    }
}

/// Modules the principal can view, in declaration order.
pub fn accessible_modules(principal: &Principal) -> Vec<Module> {
    Module::ALL
        .into_iter()
        .filter(|m| can_access_module(principal, *m, None))
        .collect()
}

/// Where to send a user after login.
///
/// The dashboard if they can view it, otherwise the first viewable module in
/// `Module::NAVIGATION_ORDER`. `None` when nothing is viewable.
pub fn landing_module(principal: &Principal) -> Option<Module> {
    std::iter::once(Module::Dashboard)
        .chain(Module::NAVIGATION_ORDER)
        .find(|m| can_access_module(principal, *m, None))
}

/// Arabic labels for the capabilities in `mask`.
pub fn format_permissions(mask: PermissionMask) -> Vec<&'static str> {
    format_permissions_in(mask, Locale::Arabic)
}

/// Labels for the capabilities in `mask`, in the order VIEW, CREATE, EDIT,
/// DELETE, MANAGE, followed by ADMIN if set. ADMIN is not expanded.
///
/// Display only; carries no authorization meaning.
pub fn format_permissions_in(mask: PermissionMask, locale: Locale) -> Vec<&'static str> {
    mask.permissions().map(|p| p.label(locale)).collect()
}

/// `mask1 & mask2` on raw integers, for template and report code that
/// tests "does this stored mask contain that bit".
pub fn bitwise_and(mask1: u32, mask2: u32) -> u32 {
    mask1 & mask2
}

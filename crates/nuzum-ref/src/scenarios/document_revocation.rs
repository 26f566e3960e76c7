//! Scenario: revoking a single grant row.
//!
//! A plain user can view every module. Deleting the DOCUMENTS row closes
//! that module and leaves every other module as it was.

use nuzum_contracts::{error::NuzumResult, module::Module, role::Role, user::UserId};
use nuzum_core::{
    access::{accessible_modules, can_access_module},
    traits::RolePolicy,
};

use crate::{
    mock_data::{account, admin_account, ADMIN_ID},
    report::ScenarioReport,
    stack::ReferenceStack,
};

const CLERK_ID: i64 = 6;

pub fn run_scenario(policy: Box<dyn RolePolicy>) -> NuzumResult<ScenarioReport> {
    let stack = ReferenceStack::new(policy, "document-revocation");
    let admin = Some(UserId(ADMIN_ID));

    stack.provisioner.provision(admin_account(), None)?;
    stack.provisioner.provision(account(CLERK_ID, Role::User), admin)?;

    let mut report = ScenarioReport::new("Document grant revocation");

    let before = stack.principal(UserId(CLERK_ID))?;
    report.check(
        "clerk may view documents before revocation",
        true,
        can_access_module(&before, Module::Documents, None),
    );
    let visible_before = accessible_modules(&before);

    let revoked = stack
        .provisioner
        .revoke_grant(UserId(CLERK_ID), Module::Documents, admin)?;
    report.check("documents row existed and was deleted", true, revoked);

    let after = stack.principal(UserId(CLERK_ID))?;
    report.check(
        "clerk may view documents after revocation",
        false,
        can_access_module(&after, Module::Documents, None),
    );

    let expected_after: Vec<Module> = visible_before
        .into_iter()
        .filter(|m| *m != Module::Documents)
        .collect();
    report.check(
        "every other module unchanged",
        true,
        accessible_modules(&after) == expected_after,
    );

    report.finish(&stack.audit)
}

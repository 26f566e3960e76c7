//! Scenario: a system administrator.
//!
//! Expected:
//! - every Module × Permission pair is allowed
//! - the same account, once deactivated, is sent to log in
//! - a request without a session is denied

use nuzum_contracts::{
    error::NuzumResult,
    module::Module,
    permission::Permission,
    user::{Principal, UserId},
};
use nuzum_core::{
    access::{authorize, has_permission, AccessDecision},
    traits::RolePolicy,
};

use crate::{
    mock_data::{admin_account, ADMIN_ID},
    report::ScenarioReport,
    stack::ReferenceStack,
};

pub fn run_scenario(policy: Box<dyn RolePolicy>) -> NuzumResult<ScenarioReport> {
    let stack = ReferenceStack::new(policy, "admin-access");
    stack.provisioner.provision(admin_account(), None)?;

    let admin = stack.principal(UserId(ADMIN_ID))?;
    let mut report = ScenarioReport::new("Administrator access");

    for module in Module::ALL {
        let all_allowed = Permission::ALL
            .into_iter()
            .all(|p| has_permission(&admin, module, p));
        report.check(
            format!("admin holds every permission on {}", module),
            true,
            all_allowed,
        );
    }

    report.check(
        "request without a session may view dashboard",
        false,
        has_permission(&Principal::Anonymous, Module::Dashboard, Permission::View),
    );

    stack
        .provisioner
        .set_active(UserId(ADMIN_ID), false, Some(UserId(ADMIN_ID)))?;
    let deactivated = stack.principal(UserId(ADMIN_ID))?;
    report.check(
        "deactivated admin is sent to log in",
        true,
        authorize(&deactivated, Module::Users, Some(Permission::Manage))
            == AccessDecision::LoginRequired,
    );

    report.finish(&stack.audit)
}

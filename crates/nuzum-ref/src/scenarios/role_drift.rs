//! Scenario: changing a role label versus reprovisioning.
//!
//! Relabeling an HR officer as fleet leaves the HR grants in place, so the
//! label and the grants disagree. Reprovisioning rebuilds the grants from
//! the fleet preset.

use nuzum_contracts::{
    error::NuzumResult, module::Module, permission::Permission, role::Role, user::UserId,
};
use nuzum_core::{access::can_access_module, traits::RolePolicy};

use crate::{
    mock_data::{account, admin_account, ADMIN_ID},
    report::ScenarioReport,
    stack::ReferenceStack,
};

const STAFF_ID: i64 = 7;

pub fn run_scenario(policy: Box<dyn RolePolicy>) -> NuzumResult<ScenarioReport> {
    let stack = ReferenceStack::new(policy, "role-drift");
    let admin = Some(UserId(ADMIN_ID));
    let staff = UserId(STAFF_ID);

    stack.provisioner.provision(admin_account(), None)?;
    stack.provisioner.provision(account(STAFF_ID, Role::Hr), admin)?;

    let mut report = ScenarioReport::new("Role relabel and reprovision");

    stack.provisioner.change_role(staff, Role::Fleet, admin)?;
    let relabeled = stack.principal(staff)?;
    report.check(
        "after relabel: may create employees",
        true,
        can_access_module(&relabeled, Module::Employees, Some(Permission::Create)),
    );
    report.check(
        "after relabel: may view vehicles",
        false,
        can_access_module(&relabeled, Module::Vehicles, None),
    );

    let grants = stack.provisioner.reprovision(staff, Role::Fleet, admin)?;
    report.note(format!("Reprovisioned with {} grant row(s)", grants.len()));

    let reprovisioned = stack.principal(staff)?;
    report.check(
        "after reprovision: may create employees",
        false,
        can_access_module(&reprovisioned, Module::Employees, Some(Permission::Create)),
    );
    report.check(
        "after reprovision: may manage vehicles",
        true,
        can_access_module(&reprovisioned, Module::Vehicles, Some(Permission::Manage)),
    );

    report.finish(&stack.audit)
}

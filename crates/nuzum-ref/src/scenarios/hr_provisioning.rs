//! Scenario: an HR officer provisioned from the HR preset.
//!
//! Expected:
//! - can create employees, cannot delete them
//! - cannot see vehicles or salaries
//! - the employees grant renders as VIEW, CREATE, EDIT, MANAGE

use nuzum_contracts::{
    error::NuzumResult,
    module::Module,
    permission::{Locale, Permission},
    role::Role,
    user::UserId,
};
use nuzum_core::{
    access::{can_access_module, format_permissions, format_permissions_in, landing_module},
    traits::RolePolicy,
};

use crate::{
    mock_data::{account, admin_account, ADMIN_ID},
    report::ScenarioReport,
    stack::ReferenceStack,
};

const HR_ID: i64 = 3;

pub fn run_scenario(policy: Box<dyn RolePolicy>) -> NuzumResult<ScenarioReport> {
    let stack = ReferenceStack::new(policy, "hr-provisioning");
    let admin = Some(UserId(ADMIN_ID));

    stack.provisioner.provision(admin_account(), None)?;
    stack.provisioner.provision(account(HR_ID, Role::Hr), admin)?;

    let hr = stack.principal(UserId(HR_ID))?;
    let mut report = ScenarioReport::new("HR provisioning");

    report.check(
        "HR may create employees",
        true,
        can_access_module(&hr, Module::Employees, Some(Permission::Create)),
    );
    report.check(
        "HR may delete employees",
        false,
        can_access_module(&hr, Module::Employees, Some(Permission::Delete)),
    );
    report.check(
        "HR may view vehicles",
        false,
        can_access_module(&hr, Module::Vehicles, None),
    );
    report.check(
        "HR may view salaries",
        false,
        can_access_module(&hr, Module::Salaries, None),
    );
    report.check(
        "HR may edit attendance",
        true,
        can_access_module(&hr, Module::Attendance, Some(Permission::Edit)),
    );

    let employees_mask = stack
        .provisioner
        .load_user(UserId(HR_ID))?
        .map(|u| u.grants.mask_for(Module::Employees))
        .unwrap_or_default();

    let english = format_permissions_in(employees_mask, Locale::English);
    report.check(
        "employees grant reads VIEW, CREATE, EDIT, MANAGE",
        true,
        english == ["VIEW", "CREATE", "EDIT", "MANAGE"],
    );
    report.note(format!(
        "{}: {}",
        Module::Employees.display_name(),
        format_permissions(employees_mask).join("، ")
    ));

    if let Some(module) = landing_module(&hr) {
        report.note(format!("Landing module: {}", module.display_name()));
    }

    report.finish(&stack.audit)
}

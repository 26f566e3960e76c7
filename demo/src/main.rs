//! Nuzum access control CLI
//!
//! Prints role matrices, evaluates single access checks, and runs the
//! reference scenarios against the built-in presets or a TOML role policy.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- matrix --role hr
//!   cargo run -p demo -- check --role fleet --module vehicles --permission delete
//!   cargo run -p demo -- --policy roles.toml hr-scenario

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nuzum_contracts::{
    error::NuzumResult,
    module::Module,
    permission::Permission,
    role::Role,
    user::{Principal, UserId},
};
use nuzum_core::{
    access::{authorize, format_permissions, AccessDecision},
    traits::RolePolicy,
};
use nuzum_policy::{StaticRolePolicy, TomlRolePolicy};
use nuzum_ref::{
    mock_data::account,
    scenarios::{admin_access, document_revocation, hr_provisioning, role_drift},
    ReferenceStack, ScenarioReport,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Nuzum role and permission administration.
#[derive(Parser)]
#[command(
    name = "nuzum",
    about = "Nuzum access-control tooling",
    long_about = "Inspects role presets, evaluates access checks and runs the\n\
                  reference provisioning scenarios."
)]
struct Cli {
    /// TOML role policy to use instead of the built-in presets.
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every reference scenario in sequence.
    RunAll,
    /// HR officer provisioned from the HR preset.
    HrScenario,
    /// Administrator with full access; missing and deactivated sessions.
    AdminScenario,
    /// Revoking the documents grant of a plain user.
    RevocationScenario,
    /// Role relabel versus reprovision.
    RoleDrift,
    /// Print the grants each role expands to.
    Matrix {
        /// Only this role (admin, manager, hr, finance, fleet, user).
        #[arg(long)]
        role: Option<Role>,
    },
    /// Provision a user with a role and evaluate one access check.
    Check {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        module: Module,
        /// Defaults to view.
        #[arg(long)]
        permission: Option<Permission>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let policy = cli.policy;

    let result = match cli.command {
        Command::RunAll => run_all(&policy),
        Command::HrScenario => run_scenario(&policy, hr_provisioning::run_scenario),
        Command::AdminScenario => run_scenario(&policy, admin_access::run_scenario),
        Command::RevocationScenario => run_scenario(&policy, document_revocation::run_scenario),
        Command::RoleDrift => run_scenario(&policy, role_drift::run_scenario),
        Command::Matrix { role } => print_matrix(&policy, role),
        Command::Check {
            role,
            module,
            permission,
        } => run_check(&policy, role, module, permission),
    };

    match result {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("One or more checks failed.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("nuzum error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Policy ────────────────────────────────────────────────────────────────────

fn load_policy(path: &Option<PathBuf>) -> NuzumResult<Box<dyn RolePolicy>> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading role policy");
            Ok(Box::new(TomlRolePolicy::from_file(path)?))
        }
        None => Ok(Box::new(StaticRolePolicy)),
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

type Scenario = fn(Box<dyn RolePolicy>) -> NuzumResult<ScenarioReport>;

const ALL_SCENARIOS: [Scenario; 4] = [
    hr_provisioning::run_scenario,
    admin_access::run_scenario,
    document_revocation::run_scenario,
    role_drift::run_scenario,
];

fn run_scenario(path: &Option<PathBuf>, scenario: Scenario) -> NuzumResult<bool> {
    let report = scenario(load_policy(path)?)?;
    report.print();
    Ok(report.passed())
}

fn run_all(path: &Option<PathBuf>) -> NuzumResult<bool> {
    let mut all_passed = true;
    for scenario in ALL_SCENARIOS {
        all_passed &= run_scenario(path, scenario)?;
    }
    Ok(all_passed)
}

// ── Matrix ────────────────────────────────────────────────────────────────────

fn print_matrix(path: &Option<PathBuf>, only: Option<Role>) -> NuzumResult<bool> {
    let policy = load_policy(path)?;
    let roles: Vec<Role> = match only {
        Some(role) => vec![role],
        None => Role::ALL.to_vec(),
    };

    for role in roles {
        let grants = policy.expand(role);
        println!("=== {} ({}) ===", role.display_name(), role);
        for module in Module::ALL {
            let labels = format_permissions(grants.mask_for(module));
            let rendered = if labels.is_empty() {
                "-".to_string()
            } else {
                labels.join("، ")
            };
            println!("  {:<12} {:<18} {}", module.as_str(), module.display_name(), rendered);
        }
        println!();
    }

    Ok(true)
}

// ── Single check ──────────────────────────────────────────────────────────────

/// Id of the throwaway account provisioned by `check`.
const CHECK_USER_ID: i64 = 100;

fn run_check(
    path: &Option<PathBuf>,
    role: Role,
    module: Module,
    permission: Option<Permission>,
) -> NuzumResult<bool> {
    let stack = ReferenceStack::new(load_policy(path)?, "cli-check");
    stack
        .provisioner
        .provision(account(CHECK_USER_ID, role), None)?;
    let principal = stack.principal(UserId(CHECK_USER_ID))?;
    let granted = match &principal {
        Principal::Authenticated(user) => user.grants.mask_for(module),
        Principal::Anonymous => Default::default(),
    };

    let decision = authorize(&principal, module, permission);
    let permission = permission.unwrap_or(Permission::View);

    println!(
        "{} / {} / {}: {}",
        role,
        module,
        permission,
        match decision {
            AccessDecision::Allowed => "ALLOWED",
            AccessDecision::LoginRequired => "LOGIN REQUIRED",
            AccessDecision::Forbidden { .. } => "FORBIDDEN",
        }
    );
    let labels = format_permissions(granted);
    if labels.is_empty() {
        println!("  no grant on {}", module.display_name());
    } else {
        println!("  granted on {}: {}", module.display_name(), labels.join("، "));
    }

    Ok(true)
}

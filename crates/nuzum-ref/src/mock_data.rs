//! Seed accounts for the reference scenarios.
//!
//! All data is fictional.

use nuzum_contracts::{role::Role, user::UserAccount};

/// The administrator who performs every mutation in the scenarios.
pub const ADMIN_ID: i64 = 1;

pub fn admin_account() -> UserAccount {
    UserAccount::new(ADMIN_ID, "admin@nuzum.example", "مدير النظام", Role::Admin)
}

/// One account per role, ids 1 through 6 in `Role::ALL` order.
pub fn seed_accounts() -> Vec<UserAccount> {
    vec![
        admin_account(),
        UserAccount::new(2, "manager@nuzum.example", "خالد العتيبي", Role::Manager),
        UserAccount::new(3, "hr@nuzum.example", "نورة القحطاني", Role::Hr),
        UserAccount::new(4, "finance@nuzum.example", "سعد الغامدي", Role::Finance),
        UserAccount::new(5, "fleet@nuzum.example", "فهد الشمري", Role::Fleet),
        UserAccount::new(6, "clerk@nuzum.example", "ريم الدوسري", Role::User),
    ]
}

/// A fresh account with the given id and role.
pub fn account(id: i64, role: Role) -> UserAccount {
    UserAccount::new(
        id,
        format!("{}{}@nuzum.example", role, id),
        format!("{} {}", role.display_name(), id),
        role,
    )
}

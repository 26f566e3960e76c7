//! Gated functional areas of the application.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::NuzumError;

/// A functional area that can be independently gated.
///
/// The set is closed. Ordering follows declaration order so grant tables
/// keyed by `Module` iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Dashboard,
    Employees,
    Departments,
    Attendance,
    Salaries,
    Documents,
    Vehicles,
    Users,
    Reports,
    Fees,
}

impl Module {
    /// Every module, in declaration order.
    pub const ALL: [Module; 10] = [
        Module::Dashboard,
        Module::Employees,
        Module::Departments,
        Module::Attendance,
        Module::Salaries,
        Module::Documents,
        Module::Vehicles,
        Module::Users,
        Module::Reports,
        Module::Fees,
    ];

    /// Fallback order used when a user cannot see the dashboard and has to
    /// be sent to the first module they can view.
    pub const NAVIGATION_ORDER: [Module; 9] = [
        Module::Employees,
        Module::Departments,
        Module::Attendance,
        Module::Salaries,
        Module::Documents,
        Module::Vehicles,
        Module::Reports,
        Module::Fees,
        Module::Users,
    ];

    /// Stable lowercase identifier, used in configuration and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Employees => "employees",
            Module::Departments => "departments",
            Module::Attendance => "attendance",
            Module::Salaries => "salaries",
            Module::Documents => "documents",
            Module::Vehicles => "vehicles",
            Module::Users => "users",
            Module::Reports => "reports",
            Module::Fees => "fees",
        }
    }

    /// Arabic label shown in the user-management screens.
    pub fn display_name(&self) -> &'static str {
        match self {
            Module::Dashboard => "لوحة التحكم",
            Module::Employees => "الموظفين",
            Module::Departments => "الأقسام",
            Module::Attendance => "الحضور والغياب",
            Module::Salaries => "الرواتب",
            Module::Documents => "المستندات",
            Module::Vehicles => "السيارات",
            Module::Users => "المستخدمين",
            Module::Reports => "التقارير",
            Module::Fees => "الرسوم والتكاليف",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = NuzumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Module::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| NuzumError::UnknownModule { name: s.to_string() })
    }
}

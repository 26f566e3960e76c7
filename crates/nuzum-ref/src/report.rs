//! Scenario results.

use serde::Serialize;
use tracing::{info, warn};

use nuzum_audit::InMemoryAuditWriter;
use nuzum_contracts::error::NuzumResult;

/// One expectation checked by a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub label: String,
    pub expected: bool,
    pub actual: bool,
}

impl Check {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// What a scenario observed.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub checks: Vec<Check>,
    /// Free-form lines printed under the checks.
    pub notes: Vec<String>,
    pub audit_events: usize,
    pub audit_chain_verified: bool,
}

impl ScenarioReport {
    pub fn new(name: &'static str) -> Self {
        info!(scenario = name, "scenario started");
        Self {
            name,
            checks: Vec::new(),
            notes: Vec::new(),
            audit_events: 0,
            audit_chain_verified: true,
        }
    }

    pub fn check(&mut self, label: impl Into<String>, expected: bool, actual: bool) {
        self.checks.push(Check {
            label: label.into(),
            expected,
            actual,
        });
    }

    pub fn note(&mut self, line: impl Into<String>) {
        self.notes.push(line.into());
    }

    /// Attach the audit trail's size and integrity, and log the outcome.
    pub fn finish(mut self, audit: &InMemoryAuditWriter) -> NuzumResult<Self> {
        self.audit_events = audit.len()?;
        self.audit_chain_verified = audit.verify_integrity();

        let failed = self.checks.iter().filter(|c| !c.passed()).count();
        if self.passed() {
            info!(
                scenario = self.name,
                checks = self.checks.len(),
                audit_events = self.audit_events,
                "scenario passed"
            );
        } else {
            warn!(
                scenario = self.name,
                failed,
                audit_chain_verified = self.audit_chain_verified,
                "scenario failed"
            );
        }
        Ok(self)
    }

    pub fn passed(&self) -> bool {
        self.audit_chain_verified && self.checks.iter().all(Check::passed)
    }

    pub fn print(&self) {
        println!("=== {} ===", self.name);
        for check in &self.checks {
            println!(
                "  [{}] {:<58} expected {:<5} got {}",
                if check.passed() { " OK " } else { "FAIL" },
                check.label,
                check.expected,
                check.actual
            );
        }
        for line in &self.notes {
            println!("  {}", line);
        }
        println!(
            "  Audit chain integrity: {} ({} event(s))",
            if self.audit_chain_verified { "VERIFIED" } else { "FAILED" },
            self.audit_events
        );
        println!("  RESULT: {}", if self.passed() { "PASS" } else { "FAIL" });
        println!();
    }
}

//! # Suite — Batches of Kernel Runs
//!
//! A suite is a TOML list of cases, each naming a form, an exponent and
//! optionally the verdict it must produce:
//!
//! ```toml
//! name = "smoke"
//!
//! [[case]]
//! form = "fermat"
//! exponent = 4
//! expect = true
//!
//! [[case]]
//! form = "mersenne"
//! exponent = 521
//! ```
//!
//! Cases are independent, so [`run_suite`] runs them on the rayon pool. Each
//! case owns its buffers; nothing is shared between them.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::reducer::Backend;
use crate::{run_kernel, Form};

// ── TOML Configuration Structs ──────────────────────────────────

/// Top-level suite configuration parsed from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "case", default)]
    pub cases: Vec<CaseConfig>,
}

/// One `[[case]]` entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CaseConfig {
    pub form: Form,
    pub exponent: u64,
    pub expect: Option<bool>,
}

// ── TOML Parsing ────────────────────────────────────────────────

/// Parse a suite from a TOML string.
pub fn parse_toml(content: &str) -> Result<SuiteConfig> {
    let config: SuiteConfig = toml::from_str(content)?;
    validate_suite(&config)?;
    Ok(config)
}

/// Parse a suite from a TOML file path.
pub fn parse_toml_file(path: &Path) -> Result<SuiteConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading suite file {}", path.display()))?;
    parse_toml(&content).with_context(|| format!("parsing suite file {}", path.display()))
}

fn validate_suite(config: &SuiteConfig) -> Result<()> {
    if config.cases.is_empty() {
        anyhow::bail!("suite defines no [[case]] entries");
    }
    let mut seen = HashSet::new();
    for case in &config.cases {
        if !seen.insert((case.form, case.exponent)) {
            anyhow::bail!(
                "duplicate case: {} exponent {}",
                case.form,
                case.exponent
            );
        }
    }
    Ok(())
}

/// Known verdicts for small exponents of every form.
pub fn default_suite() -> SuiteConfig {
    let mut cases = Vec::new();
    let mut push = |form, exponents: &[u64], expect| {
        for &exponent in exponents {
            cases.push(CaseConfig {
                form,
                exponent,
                expect: Some(expect),
            });
        }
    };
    push(Form::Fermat, &[0, 1, 2, 3, 4], true);
    push(Form::Fermat, &[5, 6, 7, 8, 9, 10], false);
    push(Form::Mersenne, &[2, 3, 5, 7, 13, 17, 19, 31, 61, 89, 107, 127], true);
    push(Form::Mersenne, &[4, 6, 8, 9, 10, 11, 23, 29], false);
    push(Form::Wagstaff, &[3, 5, 7, 11, 13, 17, 19, 23, 31, 43, 61, 79], true);
    push(Form::Wagstaff, &[9, 29, 37, 41], false);
    SuiteConfig {
        name: "default".to_string(),
        cases,
    }
}

// ── Execution ───────────────────────────────────────────────────

/// Result of one suite case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub form: Form,
    pub exponent: u64,
    pub prime: Option<bool>,
    pub squarings: u64,
    pub limbs: usize,
    pub elapsed_ms: f64,
    pub expect: Option<bool>,
    pub error: Option<String>,
}

impl CaseResult {
    /// The case ran and, if a verdict was expected, produced it.
    pub fn passed(&self) -> bool {
        match (self.prime, self.expect) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(got), Some(want)) => got == want,
        }
    }
}

/// Run a single case with backend `B`.
pub fn run_case<B: Backend>(case: &CaseConfig) -> CaseResult {
    let start = Instant::now();
    let outcome = run_kernel::<B>(case.form, case.exponent);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let mut result = CaseResult {
        form: case.form,
        exponent: case.exponent,
        prime: None,
        squarings: 0,
        limbs: 0,
        elapsed_ms,
        expect: case.expect,
        error: None,
    };
    match outcome {
        Ok(report) => {
            result.prime = Some(report.prime);
            result.squarings = report.squarings;
            result.limbs = report.limbs;
        }
        Err(e) => {
            warn!(form = %case.form, exponent = case.exponent, error = %e, "case failed");
            result.error = Some(e.to_string());
        }
    }
    result
}

/// Run every case of the suite in parallel, returning results in suite order.
pub fn run_suite<B: Backend>(suite: &SuiteConfig) -> Vec<CaseResult> {
    info!(
        suite = %suite.name,
        cases = suite.cases.len(),
        backend = B::NAME,
        "running suite"
    );
    let results: Vec<CaseResult> = suite
        .cases
        .par_iter()
        .map(|case| run_case::<B>(case))
        .collect();
    let failed = results.iter().filter(|r| !r.passed()).count();
    info!(suite = %suite.name, failed, "suite finished");
    results
}

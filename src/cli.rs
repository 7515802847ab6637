//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Contains the
//! execution logic for each subcommand and rayon configuration.

use anyhow::{Context, Result};
use primebench::suite::{self, CaseResult};
use primebench::{run_kernel, Backend, Form, GmpBackend, LimbBackend, TestReport};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use super::Reducer;

// ── Single Tests ────────────────────────────────────────────────

fn kernel(reducer: Reducer, form: Form, exponent: u64) -> Result<TestReport> {
    let report = match reducer {
        Reducer::Limb => run_kernel::<LimbBackend>(form, exponent),
        Reducer::Gmp => run_kernel::<GmpBackend>(form, exponent),
    };
    report.with_context(|| format!("{} test for exponent {}", form, exponent))
}

/// Verdict line for one test.
pub fn verdict_line(form: Form, exponent: u64, prime: bool) -> String {
    let noun = match form {
        Form::Fermat => "Fermat",
        Form::Mersenne => "Mersenne",
        Form::Wagstaff => "Wagstaff",
    };
    let adjective = match form {
        Form::Wagstaff => "probably prime",
        _ => "prime",
    };
    format!(
        "The {} number {} is {}{}",
        noun,
        form.expression(exponent),
        if prime { "" } else { "not " },
        adjective
    )
}

/// Run one kernel and print its verdict.
pub fn run_single(reducer: Reducer, form: Form, exponent: u64) -> Result<()> {
    let start = Instant::now();
    let report = kernel(reducer, form, exponent)?;
    info!(
        %form,
        exponent,
        prime = report.prime,
        squarings = report.squarings,
        limbs = report.limbs,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "test complete"
    );
    println!("{}", verdict_line(form, exponent, report.prime));
    Ok(())
}

// ── Batch Suites ────────────────────────────────────────────────

fn run_suite_with(reducer: Reducer, suite: &suite::SuiteConfig) -> Vec<CaseResult> {
    match reducer {
        Reducer::Limb => suite::run_suite::<LimbBackend>(suite),
        Reducer::Gmp => suite::run_suite::<GmpBackend>(suite),
    }
}

fn backend_name(reducer: Reducer) -> &'static str {
    match reducer {
        Reducer::Limb => LimbBackend::NAME,
        Reducer::Gmp => GmpBackend::NAME,
    }
}

/// Run a suite file (or the built-in suite) and report mismatches.
pub fn run_batch(reducer: Reducer, file: Option<&Path>, json: bool) -> Result<()> {
    let suite = match file {
        Some(path) => suite::parse_toml_file(path)?,
        None => suite::default_suite(),
    };
    info!(
        suite = %suite.name,
        backend = backend_name(reducer),
        threads = rayon::current_num_threads(),
        "batch starting"
    );

    let results = run_suite_with(reducer, &suite);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!(
            "{:<10} {:>10} {:>8} {:>12} {:>12}  status",
            "form", "exponent", "verdict", "squarings", "ms"
        );
        for r in &results {
            let verdict = match r.prime {
                Some(true) => "prime",
                Some(false) => "composite",
                None => "error",
            };
            let status = match (&r.error, r.passed()) {
                (Some(e), _) => format!("ERROR: {}", e),
                (None, true) => "ok".to_string(),
                (None, false) => "MISMATCH".to_string(),
            };
            println!(
                "{:<10} {:>10} {:>8} {:>12} {:>12.3}  {}",
                r.form.to_string(),
                r.exponent,
                verdict,
                r.squarings,
                r.elapsed_ms,
                status
            );
        }
    }

    let failed = results.iter().filter(|r| !r.passed()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} cases failed", failed, results.len());
    }
    Ok(())
}

// ── Rayon Configuration ─────────────────────────────────────────

pub fn configure_rayon(threads: Option<usize>, qos: bool) {
    let num_threads = threads.unwrap_or(0);

    #[cfg(target_os = "macos")]
    if qos {
        let result = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .spawn_handler(|thread| {
                std::thread::Builder::new().spawn(move || {
                    // SAFETY: pthread_set_qos_class_self_np is a well-defined macOS API
                    // that sets the QoS class for the current thread. No memory safety concerns.
                    unsafe {
                        libc::pthread_set_qos_class_self_np(
                            libc::qos_class_t::QOS_CLASS_USER_INITIATED,
                            0,
                        );
                    }
                    thread.run();
                })?;
                Ok(())
            })
            .build_global();

        match result {
            Ok(()) => {
                info!("Rayon threads configured with macOS QoS: user-initiated (P-core scheduling)");
            }
            Err(e) => {
                warn!(error = %e, "Could not configure rayon thread pool");
            }
        }
        return;
    }

    #[cfg(not(target_os = "macos"))]
    if qos {
        warn!("--qos flag is only effective on macOS, ignoring");
    }

    if num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_lines_match_driver_wording() {
        assert_eq!(
            verdict_line(Form::Fermat, 4, true),
            "The Fermat number F(4)=2^(2^4)+1 is prime"
        );
        assert_eq!(
            verdict_line(Form::Mersenne, 11, false),
            "The Mersenne number M(11)=2^11-1 is not prime"
        );
        assert_eq!(
            verdict_line(Form::Wagstaff, 13, true),
            "The Wagstaff number W(13)=(2^13+1)/3 is probably prime"
        );
    }

    #[test]
    fn kernel_error_carries_context() {
        let err = kernel(Reducer::Limb, Form::Fermat, 64).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("fermat test for exponent 64"));
        assert!(chain.contains("invalid exponent 64"));
    }
}

//! CLI integration tests using assert_cmd.
//!
//! All tests are purely computational and always run.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

#[allow(deprecated)]
fn primebench() -> Command {
    let mut cmd = Command::cargo_bin("primebench").unwrap();
    cmd.env_remove("PRIMEBENCH_REDUCER").env("RUST_LOG", "warn");
    cmd
}

// --- Help and arg validation ---

#[test]
fn help_shows_all_subcommands() {
    primebench().arg("--help").assert().success().stdout(
        predicate::str::contains("fermat")
            .and(predicate::str::contains("mersenne"))
            .and(predicate::str::contains("wagstaff"))
            .and(predicate::str::contains("batch"))
            .and(predicate::str::contains("--reducer")),
    );
}

#[test]
fn help_batch_shows_args() {
    primebench()
        .args(["batch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--file").and(predicate::str::contains("--json")));
}

#[test]
fn fermat_requires_k() {
    primebench()
        .arg("fermat")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--k"));
}

#[test]
fn unknown_reducer_is_rejected() {
    primebench()
        .args(["--reducer", "fft", "mersenne", "--k", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'fft'"));
}

// --- Single tests ---

#[test]
fn fermat_prime_verdict() {
    primebench()
        .args(["fermat", "--k", "4"])
        .assert()
        .success()
        .stdout("The Fermat number F(4)=2^(2^4)+1 is prime\n");
}

#[test]
fn fermat_composite_verdict() {
    primebench()
        .args(["fermat", "--k", "5"])
        .assert()
        .success()
        .stdout("The Fermat number F(5)=2^(2^5)+1 is not prime\n");
}

#[test]
fn mersenne_verdicts_on_both_reducers() {
    for reducer in ["limb", "gmp"] {
        primebench()
            .args(["--reducer", reducer, "mersenne", "--k", "127"])
            .assert()
            .success()
            .stdout("The Mersenne number M(127)=2^127-1 is prime\n");
        primebench()
            .args(["--reducer", reducer, "mersenne", "--k", "11"])
            .assert()
            .success()
            .stdout("The Mersenne number M(11)=2^11-1 is not prime\n");
    }
}

#[test]
fn reducer_from_environment() {
    primebench()
        .env("PRIMEBENCH_REDUCER", "gmp")
        .args(["fermat", "--k", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is prime"));
}

#[test]
fn wagstaff_verdict() {
    primebench()
        .args(["wagstaff", "--q", "31"])
        .assert()
        .success()
        .stdout("The Wagstaff number W(31)=(2^31+1)/3 is probably prime\n");
}

#[test]
fn invalid_exponent_fails_with_message() {
    primebench()
        .args(["fermat", "--k", "64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid exponent 64"));
}

// --- Batch suites ---

#[test]
fn builtin_suite_passes() {
    primebench()
        .arg("batch")
        .assert()
        .success()
        .stdout(predicate::str::contains("MISMATCH").not());
}

#[test]
fn suite_file_json_output() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
name = "cli"

[[case]]
form = "mersenne"
exponent = 13
expect = true

[[case]]
form = "fermat"
exponent = 6
expect = false
"#
    )
    .unwrap();

    let output = primebench()
        .args(["batch", "--json", "--file"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results.as_array().unwrap().len(), 2);
    assert_eq!(results[0]["form"], "mersenne");
    assert_eq!(results[0]["prime"], true);
    assert_eq!(results[1]["squarings"], 63);
}

#[test]
fn suite_mismatch_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[[case]]
form = "fermat"
exponent = 5
expect = true
"#
    )
    .unwrap();

    primebench()
        .args(["batch", "--file"])
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("MISMATCH"))
        .stderr(predicate::str::contains("1 of 1 cases failed"));
}

#[test]
fn missing_suite_file_fails() {
    primebench()
        .args(["batch", "--file", "/nonexistent/suite.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading suite file"));
}

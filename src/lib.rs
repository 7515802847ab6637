//! # primebench — Squaring Kernels over 2^K ± 1
//!
//! Two classic primality tests reduce to long chains of modular squarings
//! where the modulus has the special form 2^K ± 1:
//!
//! - **Pepin** (`pepin`): F_k = 2^(2^k)+1, squarings modulo 2^K+1.
//! - **Lucas–Lehmer** (`lucas_lehmer`): M_k = 2^k−1, squarings modulo 2^K−1.
//! - **Vrba–Reix** (`wagstaff`): (2^q+1)/3, squarings modulo 2^q+1.
//!
//! Reduction never divides: the 2K-bit product is split at bit K and the
//! halves are subtracted (`fermat`) or added (`mersenne`) with carry
//! propagation over `u64` limbs (`limbs`). A GMP-backed reducer (`reducer`)
//! provides the division-based reference path.
//!
//! Each test owns its buffers for the duration of one call, so independent
//! calls can run on separate threads with no synchronisation (`suite` runs
//! them on rayon).

pub mod error;
pub mod fermat;
pub mod limbs;
pub mod lucas_lehmer;
pub mod mersenne;
pub mod pepin;
pub mod reducer;
pub mod suite;
pub mod trial;
pub mod wagstaff;

pub use error::KernelError;
pub use lucas_lehmer::{lucas_lehmer_test, mersenne_prime_p};
pub use pepin::{pepin_prime_p, pepin_test};
pub use reducer::{Backend, DefaultBackend, GmpBackend, LimbBackend};
pub use wagstaff::{wagstaff_prp, wagstaff_test};

use serde::Serialize;

/// Outcome of one primality test invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TestReport {
    pub prime: bool,
    /// Squarings performed; zero when the answer was known without the chain.
    pub squarings: u64,
    /// Limbs per residue buffer; zero when no buffer was allocated.
    pub limbs: usize,
}

impl TestReport {
    /// A verdict reached without entering the squaring loop.
    pub(crate) fn trivial(prime: bool) -> Self {
        TestReport {
            prime,
            squarings: 0,
            limbs: 0,
        }
    }
}

/// Number form tested by a kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    Fermat,
    Mersenne,
    Wagstaff,
}

impl Form {
    /// Human-readable expression for the tested number.
    pub fn expression(&self, exponent: u64) -> String {
        match self {
            Form::Fermat => format!("F({})=2^(2^{})+1", exponent, exponent),
            Form::Mersenne => format!("M({})=2^{}-1", exponent, exponent),
            Form::Wagstaff => format!("W({})=(2^{}+1)/3", exponent, exponent),
        }
    }
}

impl std::fmt::Display for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Form::Fermat => write!(f, "fermat"),
            Form::Mersenne => write!(f, "mersenne"),
            Form::Wagstaff => write!(f, "wagstaff"),
        }
    }
}

/// Run the kernel for `form` on `exponent` with backend `B`.
pub fn run_kernel<B: Backend>(form: Form, exponent: u64) -> Result<TestReport, KernelError> {
    match form {
        Form::Fermat => pepin_test::<B>(exponent),
        Form::Mersenne => lucas_lehmer_test::<B>(exponent),
        Form::Wagstaff => wagstaff_test::<B>(exponent),
    }
}

//! Errors surfaced by the squaring kernels.
//!
//! Both variants are fatal to a single test invocation: there is no partial
//! result, and retrying the same call reproduces the same failure.

/// Errors from kernel setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// The requested exponent does not fit the 64-bit limb arithmetic.
    InvalidExponent { exponent: u64, reason: &'static str },
    /// A scratch buffer of `limbs` words could not be allocated.
    AllocationFailure { limbs: usize },
}

impl std::fmt::Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::InvalidExponent { exponent, reason } => {
                write!(f, "invalid exponent {}: {}", exponent, reason)
            }
            KernelError::AllocationFailure { limbs } => {
                write!(f, "could not allocate scratch buffer of {} limbs", limbs)
            }
        }
    }
}

impl std::error::Error for KernelError {}

//! # Lucas–Lehmer — Primality of Mersenne Numbers
//!
//! For an odd prime k, M_k = 2^k − 1 is prime if and only if S_(k−2) ≡ 0
//! (mod M_k), where S_0 = 4 and S_(i+1) = S_i² − 2. Each step is one squaring
//! by a [`MersenneReducer`] followed by a small subtraction.
//!
//! M_k can only be prime when k is, so composite exponents are rejected by
//! trial division before any buffer is allocated. This is a benchmark of the
//! squaring chain, not a Mersenne search: a real search would sieve factors
//! of M_k first.
//!
//! ## References
//!
//! - D.H. Lehmer, "An Extended Theory of Lucas' Functions", Annals of
//!   Mathematics 31(3), 1930.
//! - GIMPS: <https://www.mersenne.org/various/math.php>
//! - OEIS: [A000043](https://oeis.org/A000043) — Mersenne exponents.

use tracing::debug;

use crate::error::KernelError;
use crate::limbs::{DoubleBuffer, Modulus};
use crate::mersenne::{self, is_zero_residue};
use crate::reducer::{Backend, MersenneReducer};
use crate::trial;
use crate::TestReport;

/// Run the Lucas–Lehmer test on M_k with the given reducer backend.
pub fn lucas_lehmer_test<B: Backend>(k: u64) -> Result<TestReport, KernelError> {
    if k < 2 {
        return Ok(TestReport::trivial(false));
    }
    if k == 2 {
        // M_2 = 3
        return Ok(TestReport::trivial(true));
    }
    let modulus = Modulus::new(k)?;
    if !trial::trial_division(k, trial::isqrt(k)) {
        debug!(k, "composite exponent, skipping Lucas-Lehmer");
        return Ok(TestReport::trivial(false));
    }

    let mut reducer = B::Mersenne::new(modulus)?;
    let mut buf = DoubleBuffer::new(modulus.limbs())?;
    buf.front_mut()[0] = 4;

    debug!(k, limbs = modulus.limbs(), backend = B::NAME, "starting Lucas-Lehmer test");

    let squarings = k - 2;
    for _ in 0..squarings {
        let (x, z) = buf.split();
        reducer.mul_mod(z, x, x);
        mersenne::sub_small_mod(z, 2, &modulus);
        buf.swap();
    }

    // Only the all-zero form has been observed here, but both are accepted.
    let prime = is_zero_residue(buf.front(), &modulus);
    debug!(k, prime, squarings, "Lucas-Lehmer test finished");
    Ok(TestReport {
        prime,
        squarings,
        limbs: modulus.limbs(),
    })
}

/// True iff the Mersenne number 2^k−1 is prime.
pub fn mersenne_prime_p(k: u64) -> Result<bool, KernelError> {
    lucas_lehmer_test::<crate::DefaultBackend>(k).map(|r| r.prime)
}

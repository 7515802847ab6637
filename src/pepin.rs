//! # Pepin — Primality of Fermat Numbers
//!
//! F_k = 2^(2^k) + 1 is prime if and only if 3^((F_k − 1)/2) ≡ −1 (mod F_k).
//! With K = 2^k the exponent (F_k − 1)/2 is 2^(K−1), so the test is K − 1
//! successive squarings of 3 modulo 2^K+1, all done by a [`FermatReducer`].
//!
//! The −1 the criterion looks for is exactly the value that needs K+1 bits,
//! so the verdict is read straight from the reducer's [`FermatTag`].
//!
//! Runtime grows by roughly 4× per step of k. k = 24 is about the largest
//! Pepin test ever completed, so anything much beyond k = 20 is a stress
//! test rather than a benchmark.
//!
//! ## References
//!
//! - T. Pépin, "Sur la formule 2^(2^n) + 1", Comptes Rendus 85, 1877.
//! - R. Crandall, C. Pomerance, *Prime Numbers: A Computational Perspective*,
//!   §4.1.
//! - OEIS: [A019434](https://oeis.org/A019434) — Fermat primes.

use tracing::debug;

use crate::error::KernelError;
use crate::fermat::FermatTag;
use crate::limbs::{DoubleBuffer, Modulus, LIMB_BITS};
use crate::reducer::{Backend, FermatReducer};
use crate::TestReport;

/// Run Pepin's test on F_k with the given reducer backend.
pub fn pepin_test<B: Backend>(k: u64) -> Result<TestReport, KernelError> {
    if k == 0 {
        // F_0 = 3
        return Ok(TestReport::trivial(true));
    }
    if k >= LIMB_BITS {
        return Err(KernelError::InvalidExponent {
            exponent: k,
            reason: "K = 2^k does not fit in a 64-bit word",
        });
    }
    let bits = 1u64 << k;
    let modulus = Modulus::new(bits).map_err(|e| match e {
        KernelError::InvalidExponent { reason, .. } => KernelError::InvalidExponent {
            exponent: k,
            reason,
        },
        other => other,
    })?;

    let mut reducer = B::Fermat::new(modulus)?;
    let mut buf = DoubleBuffer::new(modulus.limbs())?;
    buf.front_mut()[0] = 3;
    let mut tag = FermatTag::Stored;

    debug!(k, bits, limbs = modulus.limbs(), backend = B::NAME, "starting Pepin test");

    let squarings = bits - 1;
    for _ in 0..squarings {
        let (x, z) = buf.split();
        tag = reducer.mul_mod(z, x, tag, x, tag);
        buf.swap();
    }

    let prime = tag == FermatTag::MinusOne;
    debug!(k, prime, squarings, "Pepin test finished");
    Ok(TestReport {
        prime,
        squarings,
        limbs: modulus.limbs(),
    })
}

/// True iff the k-th Fermat number 2^(2^k)+1 is prime.
pub fn pepin_prime_p(k: u64) -> Result<bool, KernelError> {
    pepin_test::<crate::DefaultBackend>(k).map(|r| r.prime)
}

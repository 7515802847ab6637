//! # Wagstaff — Vrba–Reix Test for (2^q + 1)/3
//!
//! For an odd prime q, W_q = (2^q + 1)/3. Anton Vrba's conjecture (Reix's
//! formulation) states W_q is prime if and only if S_q ≡ S_2 (mod W_q), where
//! S_0 = 6 and S_(i+1) = S_i² − 2.
//!
//! The recurrence runs modulo N = 2^q + 1 = 3·W_q, so it reuses the Fermat
//! reducer with an odd, non power-of-two K = q. That makes this the one
//! driver exercising the unaligned 2^K+1 path at scale. The congruence modulo
//! W_q is then checked as 3·(S_q − 1154) ≡ 0 (mod N), with S_2 = 1154.
//!
//! This is a conjecture, so a `true` result is a PRP verdict, not a proof.
//!
//! ## References
//!
//! - OEIS: [A000978](https://oeis.org/A000978) — Wagstaff prime exponents.
//! - <https://www.mersenneforum.org/showthread.php?t=10737>

use rug::Integer;
use tracing::debug;

use crate::error::KernelError;
use crate::fermat::{self, FermatTag};
use crate::limbs::{self, DoubleBuffer, Modulus};
use crate::reducer::{Backend, FermatReducer};
use crate::trial;
use crate::TestReport;

/// S_2 of the Vrba–Reix sequence starting at 6.
const S2: u32 = 1154;

/// Run the Vrba–Reix test on W_q with the given reducer backend.
pub fn wagstaff_test<B: Backend>(q: u64) -> Result<TestReport, KernelError> {
    if q < 3 || !trial::is_prime(q) {
        return Ok(TestReport::trivial(false));
    }
    let modulus = Modulus::new(q)?;
    let mut reducer = B::Fermat::new(modulus)?;
    let mut buf = DoubleBuffer::new(modulus.limbs())?;
    buf.front_mut()[0] = 6;
    let mut tag = FermatTag::Stored;

    debug!(q, limbs = modulus.limbs(), backend = B::NAME, "starting Vrba-Reix test");

    for _ in 0..q {
        let (x, z) = buf.split();
        tag = reducer.mul_mod(z, x, tag, x, tag);
        tag = fermat::sub_small_mod(z, tag, 2, &modulus);
        buf.swap();
    }

    let prime = matches_s2(buf.front(), tag, q)?;
    debug!(q, prime, squarings = q, "Vrba-Reix test finished");
    Ok(TestReport {
        prime,
        squarings: q,
        limbs: modulus.limbs(),
    })
}

/// 3·(S − S_2) ≡ 0 (mod 2^q + 1).
fn matches_s2(s: &[limbs::Limb], tag: FermatTag, q: u64) -> Result<bool, KernelError> {
    let bits = u32::try_from(q).map_err(|_| KernelError::InvalidExponent {
        exponent: q,
        reason: "final congruence supports at most 2^32-1 bits",
    })?;
    let two_q = Integer::from(1) << bits;
    let n = Integer::from(&two_q + 1);
    let s = match tag {
        FermatTag::Stored => limbs::to_integer(s),
        FermatTag::MinusOne => two_q,
    };
    let diff = (s - S2) * 3u32;
    Ok(diff.is_divisible(&n))
}

/// True iff W_q = (2^q+1)/3 passes the Vrba–Reix test.
pub fn wagstaff_prp(q: u64) -> Result<bool, KernelError> {
    wagstaff_test::<crate::DefaultBackend>(q).map(|r| r.prime)
}

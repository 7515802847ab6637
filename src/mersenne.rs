//! # Mersenne — Multiplication Modulo 2^K − 1
//!
//! Since 2^K ≡ 1 (mod 2^K−1), a 2K-bit product P = P_hi·2^K + P_lo reduces to
//! P_hi + P_lo, which is below 2^(K+1) − 1. The single overflow bit at
//! position K is folded back in at bit 0, which cannot overflow again.
//!
//! The modulus has two bit patterns for zero: all zeros and all K bits set.
//! The reducer always returns the all-zero form, but callers testing for zero
//! should accept both (see [`is_zero_residue`]).

use crate::error::KernelError;
use crate::limbs::{self, Limb, Modulus, LIMB_BITS};
use crate::reducer::MersenneReducer;

/// True if `z` represents zero modulo 2^K−1 in either form.
pub fn is_zero_residue(z: &[Limb], modulus: &Modulus) -> bool {
    limbs::is_zero(z) || limbs::is_all_ones(z, modulus.top_mask())
}

/// z ← z − v (mod 2^K−1) for a small v, with z in [0, 2^K−1).
pub fn sub_small_mod(z: &mut [Limb], v: Limb, modulus: &Modulus) {
    if limbs::sub_small(z, v) {
        // z + 2^(64·n) − v wrapped; adding the modulus is −1 then truncation.
        limbs::sub_small(z, 1);
        limbs::mask_top(z, modulus.top_mask());
    }
}

/// Split-and-add reducer modulo 2^K−1.
pub struct LimbMersenne {
    modulus: Modulus,
    product: Vec<Limb>,
    high: Vec<Limb>,
}

impl MersenneReducer for LimbMersenne {
    fn new(modulus: Modulus) -> Result<Self, KernelError> {
        Ok(LimbMersenne {
            modulus,
            product: limbs::try_alloc(2 * modulus.limbs())?,
            high: limbs::try_alloc(modulus.limbs())?,
        })
    }

    fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    fn mul_mod(&mut self, z: &mut [Limb], x: &[Limb], y: &[Limb]) {
        let bits = self.modulus.bits();
        limbs::mul_into(&mut self.product, x, y);
        limbs::split_at_bit(&self.product, bits, z, &mut self.high);

        let carry = limbs::add_assign(z, &self.high);
        let overflow = match bits % LIMB_BITS {
            0 => carry,
            r => z[z.len() - 1] >> r != 0,
        };
        if overflow {
            limbs::mask_top(z, self.modulus.top_mask());
            limbs::add_small(z, 1);
        }

        if limbs::is_all_ones(z, self.modulus.top_mask()) {
            z.fill(0);
        }
    }
}

//! # Fermat — Multiplication Modulo 2^K + 1
//!
//! Residues modulo F = 2^K+1 range over [0, 2^K], one value more than K bits
//! can hold. The extra value 2^K ≡ −1 is carried out of band as
//! [`FermatTag::MinusOne`]; its buffer is kept all zero. Every other residue
//! is [`FermatTag::Stored`] in the K-bit buffer itself.
//!
//! ## Algorithm
//!
//! Because 2^K ≡ −1 (mod F), a 2K-bit product P = P_hi·2^K + P_lo reduces to
//! P_lo − P_hi. Both halves are below 2^K, so the difference lies in
//! (−2^K, 2^K) and at most one correction (+F) is needed. The correction is
//! applied as "+1, then drop everything at or above bit K"; when the +1
//! carries out of the whole buffer the difference was exactly −1 and the
//! result is 2^K, reported as `MinusOne`.
//!
//! A `MinusOne` operand never reaches the multiplier: (−1)·y ≡ 0 − y goes
//! through the same subtract-and-correct path, and (−1)·(−1) = 1.

use crate::error::KernelError;
use crate::limbs::{self, Limb, Modulus};
use crate::reducer::FermatReducer;

/// How to read a residue buffer modulo 2^K+1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FermatTag {
    /// The value is the K-bit number in the buffer.
    Stored,
    /// The value is 2^K, i.e. −1; the buffer is zero.
    MinusOne,
}

/// Resolve a subtraction result in `z` into a canonical residue.
///
/// `borrowed` is the borrow out of the subtraction: when set, `z` holds
/// d + 2^(64·n) for some d in (−2^K, 0), and the residue is d + 2^K + 1.
fn correct_borrow(z: &mut [Limb], borrowed: bool, modulus: &Modulus) -> FermatTag {
    if !borrowed {
        return FermatTag::Stored;
    }
    if limbs::add_small(z, 1) {
        // d = −1: the buffer wrapped to zero and the residue is 2^K.
        return FermatTag::MinusOne;
    }
    limbs::mask_top(z, modulus.top_mask());
    FermatTag::Stored
}

/// z ← z − v (mod 2^K+1) for a small v below 2^K.
pub fn sub_small_mod(z: &mut [Limb], tag: FermatTag, v: Limb, modulus: &Modulus) -> FermatTag {
    if v == 0 {
        return tag;
    }
    match tag {
        FermatTag::MinusOne => {
            // 2^K − v fits in K bits.
            limbs::sub_small(z, v);
            limbs::mask_top(z, modulus.top_mask());
            FermatTag::Stored
        }
        FermatTag::Stored => {
            let borrowed = limbs::sub_small(z, v);
            correct_borrow(z, borrowed, modulus)
        }
    }
}

/// Split-and-subtract reducer modulo 2^K+1.
pub struct LimbFermat {
    modulus: Modulus,
    product: Vec<Limb>,
    high: Vec<Limb>,
}

impl LimbFermat {
    /// z ≡ −y (mod 2^K+1) for a stored y.
    fn negate(&self, z: &mut [Limb], y: &[Limb]) -> FermatTag {
        z.fill(0);
        let borrowed = limbs::sub_assign(z, y);
        correct_borrow(z, borrowed, &self.modulus)
    }
}

impl FermatReducer for LimbFermat {
    fn new(modulus: Modulus) -> Result<Self, KernelError> {
        Ok(LimbFermat {
            modulus,
            product: limbs::try_alloc(2 * modulus.limbs())?,
            high: limbs::try_alloc(modulus.limbs())?,
        })
    }

    fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    fn mul_mod(
        &mut self,
        z: &mut [Limb],
        x: &[Limb],
        x_tag: FermatTag,
        y: &[Limb],
        y_tag: FermatTag,
    ) -> FermatTag {
        match (x_tag, y_tag) {
            (FermatTag::MinusOne, FermatTag::MinusOne) => {
                z.fill(0);
                z[0] = 1;
                FermatTag::Stored
            }
            (FermatTag::MinusOne, FermatTag::Stored) => self.negate(z, y),
            (FermatTag::Stored, FermatTag::MinusOne) => self.negate(z, x),
            (FermatTag::Stored, FermatTag::Stored) => {
                limbs::mul_into(&mut self.product, x, y);
                limbs::split_at_bit(&self.product, self.modulus.bits(), z, &mut self.high);
                let borrowed = limbs::sub_assign(z, &self.high);
                correct_borrow(z, borrowed, &self.modulus)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rug::Integer;

    fn reducer(bits: u64) -> LimbFermat {
        LimbFermat::new(Modulus::new(bits).unwrap()).unwrap()
    }

    fn value(z: &[Limb], tag: FermatTag, bits: u32) -> Integer {
        match tag {
            FermatTag::Stored => limbs::to_integer(z),
            FermatTag::MinusOne => Integer::from(1) << bits,
        }
    }

    #[test]
    fn small_modulus_products() {
        // mod 17
        let mut r = reducer(4);
        let mut z = [0];
        assert_eq!(r.mul_mod(&mut z, &[9], FermatTag::Stored, &[9], FermatTag::Stored), FermatTag::Stored);
        assert_eq!(z, [13]);
        assert_eq!(r.mul_mod(&mut z, &[13], FermatTag::Stored, &[13], FermatTag::Stored), FermatTag::MinusOne);
        assert_eq!(z, [0]);
    }

    #[test]
    fn minus_one_squared_is_one() {
        let mut r = reducer(128);
        let mut z = [7, 7];
        let tag = r.mul_mod(&mut z, &[0, 0], FermatTag::MinusOne, &[0, 0], FermatTag::MinusOne);
        assert_eq!((tag, z), (FermatTag::Stored, [1, 0]));
    }

    #[test]
    fn minus_one_times_one_stays_minus_one() {
        let mut r = reducer(64);
        let mut z = [5];
        let tag = r.mul_mod(&mut z, &[0], FermatTag::MinusOne, &[1], FermatTag::Stored);
        assert_eq!((tag, z), (FermatTag::MinusOne, [0]));
    }

    #[test]
    fn minus_one_times_zero_is_zero() {
        let mut r = reducer(8);
        let mut z = [5];
        let tag = r.mul_mod(&mut z, &[0], FermatTag::Stored, &[0], FermatTag::MinusOne);
        assert_eq!((tag, z), (FermatTag::Stored, [0]));
    }

    #[test]
    fn negation_of_stored_value() {
        // −5 mod 257 = 252
        let mut r = reducer(8);
        let mut z = [0];
        let tag = r.mul_mod(&mut z, &[5], FermatTag::Stored, &[0], FermatTag::MinusOne);
        assert_eq!((tag, z), (FermatTag::Stored, [252]));
    }

    #[test]
    fn matches_gmp_for_unaligned_modulus() {
        let bits = 127u32;
        let mut r = reducer(bits as u64);
        let m = (Integer::from(1) << bits) + 1u32;
        let x = [0xfedc_ba98_7654_3210, 0x7fff_0000_ffff_0000];
        let y = [0x0123_4567_89ab_cdef, 0x1234_5678_9abc_def0];
        let mut z = [0; 2];
        let tag = r.mul_mod(&mut z, &x, FermatTag::Stored, &y, FermatTag::Stored);
        let expected = Integer::from(&limbs::to_integer(&x) * &limbs::to_integer(&y)) % &m;
        assert_eq!(value(&z, tag, bits), expected);
    }

    #[test]
    fn sub_small_wraps_through_zero() {
        let modulus = Modulus::new(8).unwrap();
        // 1 − 2 ≡ −1
        let mut z = [1];
        assert_eq!(sub_small_mod(&mut z, FermatTag::Stored, 2, &modulus), FermatTag::MinusOne);
        assert_eq!(z, [0]);
        // 0 − 2 ≡ 255
        let mut z = [0];
        assert_eq!(sub_small_mod(&mut z, FermatTag::Stored, 2, &modulus), FermatTag::Stored);
        assert_eq!(z, [255]);
        // −1 − 2 ≡ 254
        let mut z = [0];
        assert_eq!(sub_small_mod(&mut z, FermatTag::MinusOne, 2, &modulus), FermatTag::Stored);
        assert_eq!(z, [254]);
        // 10 − 2 = 8
        let mut z = [10];
        assert_eq!(sub_small_mod(&mut z, FermatTag::Stored, 2, &modulus), FermatTag::Stored);
        assert_eq!(z, [8]);
    }
}

//! # Reducer — Multiply-and-Reduce Strategies
//!
//! The squaring drivers are generic over a [`Backend`], which bundles one
//! reducer for 2^K+1 and one for 2^K−1. Two backends exist:
//!
//! - [`LimbBackend`]: the fast path. Reduction is a split of the 2K-bit
//!   product at bit K followed by a single subtract (2^K+1) or add (2^K−1)
//!   with carry propagation. No division anywhere.
//! - [`GmpBackend`]: the slow reference path. Operands are lifted into
//!   `rug::Integer`, multiplied, and reduced with an ordinary `%`.
//!
//! [`DefaultBackend`] is fixed at build time: the limb backend, or the GMP
//! backend when the `gmp-reducer` feature is enabled. Callers that want both
//! (benchmarks, cross-checks) name the backend explicitly.

use rug::Integer;

use crate::error::KernelError;
use crate::fermat::{FermatTag, LimbFermat};
use crate::limbs::{self, Limb, Modulus};
use crate::mersenne::LimbMersenne;

/// Multiply-and-reduce modulo 2^K+1.
pub trait FermatReducer: Sized {
    /// Allocate any scratch space needed for this modulus.
    fn new(modulus: Modulus) -> Result<Self, KernelError>;

    fn modulus(&self) -> &Modulus;

    /// z ≡ x·y (mod 2^K+1). Each operand is a K-bit buffer read through its
    /// tag; the returned tag says how to read `z`. `z` must not alias `x` or `y`.
    fn mul_mod(
        &mut self,
        z: &mut [Limb],
        x: &[Limb],
        x_tag: FermatTag,
        y: &[Limb],
        y_tag: FermatTag,
    ) -> FermatTag;
}

/// Multiply-and-reduce modulo 2^K−1.
pub trait MersenneReducer: Sized {
    fn new(modulus: Modulus) -> Result<Self, KernelError>;

    fn modulus(&self) -> &Modulus;

    /// z ≡ x·y (mod 2^K−1), operands in [0, 2^K−1]. `z` must not alias.
    fn mul_mod(&mut self, z: &mut [Limb], x: &[Limb], y: &[Limb]);
}

/// A pairing of Fermat and Mersenne reducers used by the test drivers.
pub trait Backend {
    const NAME: &'static str;
    type Fermat: FermatReducer;
    type Mersenne: MersenneReducer;
}

/// Limb-level split-and-fold reducers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LimbBackend;

impl Backend for LimbBackend {
    const NAME: &'static str = "limb";
    type Fermat = LimbFermat;
    type Mersenne = LimbMersenne;
}

/// Division-based reducers on `rug::Integer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GmpBackend;

impl Backend for GmpBackend {
    const NAME: &'static str = "gmp";
    type Fermat = GmpFermat;
    type Mersenne = GmpMersenne;
}

#[cfg(not(feature = "gmp-reducer"))]
pub type DefaultBackend = LimbBackend;

#[cfg(feature = "gmp-reducer")]
pub type DefaultBackend = GmpBackend;

/// 2^K as a `rug::Integer`; GMP shift counts are limited to u32.
fn power_of_two(modulus: &Modulus) -> Result<Integer, KernelError> {
    let bits = u32::try_from(modulus.bits()).map_err(|_| KernelError::InvalidExponent {
        exponent: modulus.bits(),
        reason: "GMP reducer supports at most 2^32-1 bits",
    })?;
    Ok(Integer::from(1) << bits)
}

/// Reference reducer modulo 2^K+1 by full product and `%`.
pub struct GmpFermat {
    modulus: Modulus,
    two_k: Integer,
    m: Integer,
}

impl GmpFermat {
    fn lift(&self, x: &[Limb], tag: FermatTag) -> Integer {
        match tag {
            FermatTag::Stored => limbs::to_integer(x),
            FermatTag::MinusOne => self.two_k.clone(),
        }
    }
}

impl FermatReducer for GmpFermat {
    fn new(modulus: Modulus) -> Result<Self, KernelError> {
        let two_k = power_of_two(&modulus)?;
        let m = Integer::from(&two_k + 1);
        Ok(GmpFermat { modulus, two_k, m })
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
        let a = self.lift(x, x_tag);
        let b = self.lift(y, y_tag);
        let r = Integer::from(&a * &b) % &self.m;
        if r == self.two_k {
            z.fill(0);
            FermatTag::MinusOne
        } else {
            limbs::write_integer(z, &r);
            FermatTag::Stored
        }
    }
}

/// Reference reducer modulo 2^K−1 by full product and `%`.
pub struct GmpMersenne {
    modulus: Modulus,
    m: Integer,
}

impl MersenneReducer for GmpMersenne {
    fn new(modulus: Modulus) -> Result<Self, KernelError> {
        let m = power_of_two(&modulus)? - 1u32;
        Ok(GmpMersenne { modulus, m })
    }

    fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    fn mul_mod(&mut self, z: &mut [Limb], x: &[Limb], y: &[Limb]) {
        let a = limbs::to_integer(x);
        let b = limbs::to_integer(y);
        let r = Integer::from(&a * &b) % &self.m;
        limbs::write_integer(z, &r);
    }
}

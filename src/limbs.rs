//! # Limbs — Fixed-Length Word Arrays and Carry Primitives
//!
//! Residues modulo 2^K±1 are stored as `n = ⌈K/64⌉` little-endian `u64` limbs.
//! Every bit at or above position K is kept clear, so a buffer always holds a
//! value in [0, 2^K).
//!
//! The primitives here are the only arithmetic the reducers need: widening
//! schoolbook multiply, splitting a product at bit K, whole-array add/sub with
//! carry out, and add/sub of a single small word with propagation. None of
//! them allocate; scratch space is obtained up front through [`try_alloc`] so
//! an oversized request surfaces as [`KernelError::AllocationFailure`] rather
//! than aborting the process.

use rug::integer::Order;
use rug::Integer;

use crate::error::KernelError;

/// One machine word of a multi-word integer.
pub type Limb = u64;

/// Width of a [`Limb`] in bits.
pub const LIMB_BITS: u64 = Limb::BITS as u64;

/// Descriptor of a modulus family 2^K±1: bit length K and limb count n.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modulus {
    bits: u64,
    limbs: usize,
    top_mask: Limb,
}

impl Modulus {
    /// Describe the 2^bits±1 modulus.
    ///
    /// Fails with `InvalidExponent` when `bits` is zero or when the 2K-bit
    /// product would not be addressable with 64-bit limbs on this target.
    pub fn new(bits: u64) -> Result<Self, KernelError> {
        if bits == 0 {
            return Err(KernelError::InvalidExponent {
                exponent: bits,
                reason: "modulus needs at least one bit",
            });
        }
        let product_bits = bits.checked_mul(2).ok_or(KernelError::InvalidExponent {
            exponent: bits,
            reason: "2K-bit product exceeds the 64-bit word range",
        })?;
        let limbs = limbs_for_bits(bits)?;
        // The product buffer must be indexable too.
        limbs_for_bits(product_bits)?;

        Ok(Modulus {
            bits,
            limbs,
            top_mask: top_mask(bits),
        })
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn limbs(&self) -> usize {
        self.limbs
    }

    /// Mask of the bits of the most significant limb that lie below K.
    pub fn top_mask(&self) -> Limb {
        self.top_mask
    }
}

/// Number of limbs needed to hold `bits` bits.
pub fn limbs_for_bits(bits: u64) -> Result<usize, KernelError> {
    let limbs = bits.div_ceil(LIMB_BITS);
    usize::try_from(limbs).map_err(|_| KernelError::InvalidExponent {
        exponent: bits,
        reason: "limb count exceeds the address space",
    })
}

fn top_mask(bits: u64) -> Limb {
    match bits % LIMB_BITS {
        0 => Limb::MAX,
        r => (1 << r) - 1,
    }
}

/// Allocate a zeroed buffer of `len` limbs, reporting failure instead of aborting.
pub fn try_alloc(len: usize) -> Result<Vec<Limb>, KernelError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| KernelError::AllocationFailure { limbs: len })?;
    buf.resize(len, 0);
    Ok(buf)
}

/// (lo, hi) = a * b + c + carry, never overflows u128.
#[inline(always)]
const fn mac(a: Limb, b: Limb, c: Limb, carry: Limb) -> (Limb, Limb) {
    let t = a as u128 * b as u128 + c as u128 + carry as u128;
    (t as Limb, (t >> LIMB_BITS) as Limb)
}

/// Add `v` to the least significant limb and propagate the carry.
///
/// Returns true if a carry escaped the top limb.
pub fn add_small(buf: &mut [Limb], v: Limb) -> bool {
    let mut carry = v;
    for limb in buf.iter_mut() {
        if carry == 0 {
            return false;
        }
        let (sum, overflow) = limb.overflowing_add(carry);
        *limb = sum;
        carry = overflow as Limb;
    }
    carry != 0
}

/// Subtract `v` from the least significant limb and propagate the borrow.
///
/// Returns true if a borrow escaped the top limb, in which case the buffer
/// holds the value plus 2^(64·n).
pub fn sub_small(buf: &mut [Limb], v: Limb) -> bool {
    let mut borrow = v;
    for limb in buf.iter_mut() {
        if borrow == 0 {
            return false;
        }
        let (diff, underflow) = limb.overflowing_sub(borrow);
        *limb = diff;
        borrow = underflow as Limb;
    }
    borrow != 0
}

/// a += b over equal-length arrays. Returns the carry out.
pub fn add_assign(a: &mut [Limb], b: &[Limb]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    let mut carry = false;
    for (x, &y) in a.iter_mut().zip(b) {
        let (s1, c1) = x.overflowing_add(y);
        let (s2, c2) = s1.overflowing_add(carry as Limb);
        *x = s2;
        carry = c1 | c2;
    }
    carry
}

/// a -= b over equal-length arrays. Returns the borrow out.
pub fn sub_assign(a: &mut [Limb], b: &[Limb]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    let mut borrow = false;
    for (x, &y) in a.iter_mut().zip(b) {
        let (d1, b1) = x.overflowing_sub(y);
        let (d2, b2) = d1.overflowing_sub(borrow as Limb);
        *x = d2;
        borrow = b1 | b2;
    }
    borrow
}

/// Schoolbook product: out = x * y, with `out.len() == x.len() + y.len()`.
pub fn mul_into(out: &mut [Limb], x: &[Limb], y: &[Limb]) {
    debug_assert_eq!(out.len(), x.len() + y.len());
    out.fill(0);
    for (i, &xi) in x.iter().enumerate() {
        if xi == 0 {
            continue;
        }
        let mut carry = 0;
        for (j, &yj) in y.iter().enumerate() {
            let (lo, hi) = mac(xi, yj, out[i + j], carry);
            out[i + j] = lo;
            carry = hi;
        }
        out[i + y.len()] = carry;
    }
}

/// Split `product` at bit `bits`: `lo` receives the low K bits, `hi` the
/// value `product >> K`. Both outputs have the modulus limb count, so the
/// product must be below 2^(2K).
pub fn split_at_bit(product: &[Limb], bits: u64, lo: &mut [Limb], hi: &mut [Limb]) {
    let n = lo.len();
    debug_assert_eq!(hi.len(), n);

    lo.copy_from_slice(&product[..n]);
    mask_top(lo, top_mask(bits));

    let word = (bits / LIMB_BITS) as usize;
    let shift = (bits % LIMB_BITS) as u32;
    let at = |i: usize| product.get(i).copied().unwrap_or(0);
    for (i, limb) in hi.iter_mut().enumerate() {
        *limb = if shift == 0 {
            at(word + i)
        } else {
            (at(word + i) >> shift) | (at(word + i + 1) << (LIMB_BITS as u32 - shift))
        };
    }
}

/// Clear every bit of the top limb at or above K.
pub fn mask_top(buf: &mut [Limb], mask: Limb) {
    if let Some(top) = buf.last_mut() {
        *top &= mask;
    }
}

pub fn is_zero(buf: &[Limb]) -> bool {
    buf.iter().all(|&l| l == 0)
}

/// True if the low K bits are all set, i.e. the buffer equals 2^K − 1.
pub fn is_all_ones(buf: &[Limb], mask: Limb) -> bool {
    match buf.split_last() {
        Some((&top, rest)) => top == mask && rest.iter().all(|&l| l == Limb::MAX),
        None => false,
    }
}

/// Read a limb buffer as an arbitrary-precision integer.
pub fn to_integer(buf: &[Limb]) -> Integer {
    Integer::from_digits(buf, Order::Lsf)
}

/// Store a non-negative integer that fits in `buf`, zero-filling the rest.
pub fn write_integer(buf: &mut [Limb], value: &Integer) {
    let digits = value.to_digits::<Limb>(Order::Lsf);
    debug_assert!(digits.len() <= buf.len(), "value does not fit buffer");
    buf.fill(0);
    let len = digits.len().min(buf.len());
    buf[..len].copy_from_slice(&digits[..len]);
}

/// Two owned limb arrays used alternately as input and output of a squaring
/// chain. `split` lends the current value immutably and the other buffer
/// mutably; `swap` exchanges them without copying or reallocating.
pub struct DoubleBuffer {
    front: Vec<Limb>,
    back: Vec<Limb>,
}

impl DoubleBuffer {
    pub fn new(limbs: usize) -> Result<Self, KernelError> {
        Ok(DoubleBuffer {
            front: try_alloc(limbs)?,
            back: try_alloc(limbs)?,
        })
    }

    /// The current value.
    pub fn front(&self) -> &[Limb] {
        &self.front
    }

    pub fn front_mut(&mut self) -> &mut [Limb] {
        &mut self.front
    }

    /// (current value, output buffer for the next step).
    pub fn split(&mut self) -> (&[Limb], &mut [Limb]) {
        (&self.front, &mut self.back)
    }

    /// Make the last output the current value.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}

//! Trial division of small exponents by 2, 3 and the 6m±1 wheel.
//!
//! Used as the cheap precondition of the Lucas–Lehmer and Wagstaff tests:
//! 2^k−1 and (2^k+1)/3 can only be prime when k is.

/// Floor of the square root of `x`.
pub fn isqrt(x: u64) -> u64 {
    let mut r = (x as f64).sqrt() as u64;
    // The float estimate can be off by one in either direction near 2^64.
    while r.checked_mul(r).map_or(true, |sq| sq > x) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).is_some_and(|sq| sq <= x) {
        r += 1;
    }
    r
}

/// True when `x ≥ 2` has no divisor in [2, min(bound, √x)].
///
/// With `bound ≥ √x` this decides primality.
pub fn trial_division(x: u64, bound: u64) -> bool {
    if x < 2 {
        return false;
    }
    for p in [2, 3] {
        if p > bound {
            return true;
        }
        if x % p == 0 {
            return x == p;
        }
    }
    let limit = bound.min(isqrt(x));
    let (mut d, mut step) = (5u64, 2u64);
    while d <= limit {
        if x % d == 0 {
            return false;
        }
        d += step;
        step = 6 - step;
    }
    true
}

/// Primality of a word-sized integer by exhaustive wheel division.
pub fn is_prime(x: u64) -> bool {
    trial_division(x, isqrt(x))
}

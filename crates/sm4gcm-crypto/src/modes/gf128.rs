//! Arithmetic in GF(2^128) with the GCM bit ordering.
//!
//! Elements are stored as two big-endian 64-bit halves; the most significant
//! bit of `h` is the coefficient of x^0. The field is defined by the
//! polynomial x^128 + x^7 + x^2 + x + 1.

use std::ops::BitXor;

use zeroize::Zeroize;

/// Reduction constant R = 11100001 || 0^120, high half.
pub(crate) const R: u64 = 0xe100_0000_0000_0000;

/// GF(2^128) element as (high, low) u64 pair.
#[derive(Clone, Copy, Default, PartialEq, Eq, Zeroize)]
pub struct Gf128 {
    h: u64,
    l: u64,
}

impl Gf128 {
    /// The additive identity.
    pub const ZERO: Gf128 = Gf128 { h: 0, l: 0 };

    /// The multiplicative identity (the polynomial `1`).
    pub const ONE: Gf128 = Gf128 { h: 1 << 63, l: 0 };

    pub const fn new(h: u64, l: u64) -> Self {
        Self { h, l }
    }

    pub fn from_bytes(b: &[u8; 16]) -> Self {
        let (hi, lo) = b.split_at(8);
        let mut h = [0u8; 8];
        let mut l = [0u8; 8];
        h.copy_from_slice(hi);
        l.copy_from_slice(lo);
        Self {
            h: u64::from_be_bytes(h),
            l: u64::from_be_bytes(l),
        }
    }

    /// Load up to 16 bytes left-aligned, zero-padding the low-order end.
    ///
    /// Longer input is truncated to its first 16 bytes.
    pub fn from_partial(chunk: &[u8]) -> Self {
        let mut block = [0u8; 16];
        let n = chunk.len().min(16);
        block[..n].copy_from_slice(&chunk[..n]);
        let x = Self::from_bytes(&block);
        block.zeroize();
        x
    }

    pub fn to_bytes(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.h.to_be_bytes());
        out[8..].copy_from_slice(&self.l.to_be_bytes());
        out
    }

    pub(crate) fn high(self) -> u64 {
        self.h
    }

    pub(crate) fn low(self) -> u64 {
        self.l
    }

    /// Multiply by x: shift right one bit, folding the carried-out
    /// coefficient back in with R. Constant time.
    #[inline]
    pub(crate) fn mul_x(self) -> Self {
        let carry = (self.l & 1).wrapping_neg();
        Self {
            h: (self.h >> 1) ^ (R & carry),
            l: (self.l >> 1) | (self.h << 63),
        }
    }

    /// Carry-less multiplication with reduction (NIST SP 800-38D, Algorithm 1).
    ///
    /// Walks the bits of `y` from the x^0 coefficient upward. Both the
    /// accumulate and the reduce steps are masked rather than branched, so
    /// the running time does not depend on either operand.
    pub fn mul(self, y: Gf128) -> Gf128 {
        let mut z = Gf128::ZERO;
        let mut v = self;
        for word in [y.h, y.l] {
            for i in (0..64).rev() {
                let mask = ((word >> i) & 1).wrapping_neg();
                z.h ^= v.h & mask;
                z.l ^= v.l & mask;
                v = v.mul_x();
            }
        }
        z
    }
}

impl BitXor for Gf128 {
    type Output = Gf128;

    fn bitxor(self, other: Gf128) -> Gf128 {
        Gf128 {
            h: self.h ^ other.h,
            l: self.l ^ other.l,
        }
    }
}

impl std::fmt::Debug for Gf128 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gf128({:016x}{:016x})", self.h, self.l)
    }
}

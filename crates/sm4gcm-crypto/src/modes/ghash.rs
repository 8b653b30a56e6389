//! GHASH universal hash over GF(2^128).
//!
//! The hash key H is bound once into a `GhashKey`; a `Ghash` accumulator
//! then folds 16-byte blocks in strict order, `Y = (Y ^ X) * H`.

use super::gf128::Gf128;
use zeroize::Zeroize;

/// GHASH block size in bytes.
pub const GHASH_BLOCK_SIZE: usize = 16;

// Reduction table for 4-bit GHASH: TABLE_P4[i] = i * R >> 120, where R = 0xE1 << 120.
const TABLE_P4: [u64; 16] = [
    0x0000000000000000,
    0x1c20000000000000,
    0x3840000000000000,
    0x2460000000000000,
    0x7080000000000000,
    0x6ca0000000000000,
    0x48c0000000000000,
    0x54e0000000000000,
    0xe100000000000000,
    0xfd20000000000000,
    0xd940000000000000,
    0xc560000000000000,
    0x9180000000000000,
    0x8da0000000000000,
    0xa9c0000000000000,
    0xb5e0000000000000,
];

/// How multiplication by H is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GhashBackend {
    /// Bit-serial multiply with masked accumulation; constant time.
    #[default]
    ConstantTime,
    /// Shoup's 4-bit table method.
    ///
    /// Faster, but NOT constant time: table lookups are indexed by nibbles
    /// of the data being hashed, which can leak through the cache.
    Table4Bit,
}

/// Precomputed GHASH table (16 entries for 4-bit multiplication).
#[derive(Clone, Zeroize)]
pub(crate) struct GhashTable {
    table: [Gf128; 16],
}

impl GhashTable {
    pub(crate) fn new(h: Gf128) -> Self {
        let mut table = [Gf128::ZERO; 16];
        // Index bits are read MSB-first: table[8] is H * 1.
        table[8] = h;

        // table[4] = H * x, table[2] = H * x^2, table[1] = H * x^3
        let mut cur = h;
        for idx in [4usize, 2, 1] {
            cur = cur.mul_x();
            table[idx] = cur;
        }

        // Fill remaining entries by XOR
        for i in 2..16usize {
            if i.count_ones() > 1 {
                let msb = 1usize << (usize::BITS - 1 - i.leading_zeros());
                table[i] = table[msb] ^ table[i ^ msb];
            }
        }

        Self { table }
    }

    /// Compute `x * H`, one nibble at a time from the x^127 end.
    pub(crate) fn mul_h(&self, x: Gf128) -> Gf128 {
        let mut z = Gf128::ZERO;
        for &byte in x.to_bytes().iter().rev() {
            // Low nibble first (less significant within byte)
            z = Self::shift4(z) ^ self.table[(byte & 0x0f) as usize];
            // High nibble second (more significant within byte)
            z = Self::shift4(z) ^ self.table[(byte >> 4) as usize];
        }
        z
    }

    /// Multiply by x^4, reducing the four bits shifted out.
    fn shift4(z: Gf128) -> Gf128 {
        let rem = (z.low() & 0x0f) as usize;
        Gf128::new(
            (z.high() >> 4) ^ TABLE_P4[rem],
            (z.low() >> 4) | (z.high() << 60),
        )
    }
}

/// The hash key H bound to a multiplication backend.
#[derive(Clone)]
pub(crate) enum GhashKey {
    ConstantTime(Gf128),
    Table(GhashTable),
}

impl Drop for GhashKey {
    fn drop(&mut self) {
        match self {
            GhashKey::ConstantTime(h) => h.zeroize(),
            GhashKey::Table(table) => table.zeroize(),
        }
    }
}

impl GhashKey {
    pub(crate) fn new(h: Gf128, backend: GhashBackend) -> Self {
        match backend {
            GhashBackend::ConstantTime => GhashKey::ConstantTime(h),
            GhashBackend::Table4Bit => GhashKey::Table(GhashTable::new(h)),
        }
    }

    #[inline]
    pub(crate) fn mul_h(&self, x: Gf128) -> Gf128 {
        match self {
            GhashKey::ConstantTime(h) => x.mul(*h),
            GhashKey::Table(table) => table.mul_h(x),
        }
    }
}

/// Sequential GHASH accumulator.
pub(crate) struct Ghash<'a> {
    key: &'a GhashKey,
    state: Gf128,
}

impl<'a> Ghash<'a> {
    pub(crate) fn new(key: &'a GhashKey) -> Self {
        Self {
            key,
            state: Gf128::ZERO,
        }
    }

    pub(crate) fn update_block(&mut self, block: &[u8; GHASH_BLOCK_SIZE]) {
        self.state = self.key.mul_h(self.state ^ Gf128::from_bytes(block));
    }

    /// Absorb `data`, zero-padding the final partial block on the right.
    pub(crate) fn update_padded(&mut self, data: &[u8]) {
        for chunk in data.chunks(GHASH_BLOCK_SIZE) {
            self.state = self.key.mul_h(self.state ^ Gf128::from_partial(chunk));
        }
    }

    /// Absorb the length block `[len(A) in bits || len(C) in bits]` and
    /// return the hash. Both arguments are byte counts.
    pub(crate) fn finish_with_lengths(mut self, aad_len: usize, ct_len: usize) -> Gf128 {
        let mut len_block = [0u8; GHASH_BLOCK_SIZE];
        len_block[..8].copy_from_slice(&((aad_len as u64) * 8).to_be_bytes());
        len_block[8..].copy_from_slice(&((ct_len as u64) * 8).to_be_bytes());
        self.update_block(&len_block);
        self.finish()
    }

    pub(crate) fn finish(mut self) -> Gf128 {
        let out = self.state;
        self.state.zeroize();
        out
    }
}

/// One-shot GHASH of `data` under `h`, with right zero padding of the last
/// block and no length block appended.
pub fn ghash(h: Gf128, data: &[u8]) -> Gf128 {
    let key = GhashKey::new(h, GhashBackend::ConstantTime);
    let mut acc = Ghash::new(&key);
    acc.update_padded(data);
    acc.finish()
}

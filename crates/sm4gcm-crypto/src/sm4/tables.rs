//! Precomputed T-tables for the SM4 round transform.
//!
//! `T_k[b] = L(S(b) << (24 - 8k))`: the S-box output for byte lane `k` with
//! the linear transform already applied. Because L is linear over XOR,
//! `L(τ(x))` is the XOR of the four lane lookups. The tables are evaluated at
//! compile time, so they are complete before any thread can read them.

use super::{l, SBOX};

const fn build_tables() -> [[u32; 256]; 4] {
    let mut t = [[0u32; 256]; 4];
    let mut i = 0;
    while i < 256 {
        let s = SBOX[i] as u32;
        t[0][i] = l(s << 24);
        t[1][i] = l(s << 16);
        t[2][i] = l(s << 8);
        t[3][i] = l(s);
        i += 1;
    }
    t
}

static T_TABLES: [[u32; 256]; 4] = build_tables();

/// Round transform using one lookup per byte lane.
#[inline]
pub(crate) fn t_table(x: u32) -> u32 {
    let b = x.to_be_bytes();
    T_TABLES[0][b[0] as usize]
        ^ T_TABLES[1][b[1] as usize]
        ^ T_TABLES[2][b[2] as usize]
        ^ T_TABLES[3][b[3] as usize]
}

/// Round transform using only the lane-0 table.
///
/// L commutes with rotation, so `T_k[b] == T_0[b].rotate_right(8 * k)`.
#[inline]
pub(crate) fn t_compact(x: u32) -> u32 {
    let t0 = &T_TABLES[0];
    let b = x.to_be_bytes();
    t0[b[0] as usize]
        ^ t0[b[1] as usize].rotate_right(8)
        ^ t0[b[2] as usize].rotate_right(16)
        ^ t0[b[3] as usize].rotate_right(24)
}

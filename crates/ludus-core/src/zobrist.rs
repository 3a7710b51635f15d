//! Compile-time Zobrist key generation.
//!
//! Games build their key tables as `static` arrays from a per-game seed, so
//! two independently constructed positions always agree on their keys.

/// Xorshift64 PRNG. Returns (value, next_state).
pub const fn xorshift64(mut state: u64) -> (u64, u64) {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    (state, state)
}

/// Generate `N` keys from a non-zero `seed`.
pub const fn keys<const N: usize>(seed: u64) -> [u64; N] {
    let mut table = [0u64; N];
    let mut state = seed;
    let mut i = 0;
    while i < N {
        let (val, next) = xorshift64(state);
        table[i] = val;
        state = next;
        i += 1;
    }
    table
}

//! Benchmark inputs for the Vessel container library.
//!
//! - [`keys`]: deterministic pseudo-random `u32` keys from a seed
//! - [`filled_array`] / [`filled_list`]: containers pre-loaded with [`keys`]
//! - [`periodic_text`]: a repeating sequence with a known last match

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use vessel_containers::{Array, List};

/// Generate `n` deterministic keys in `0..bound`.
///
/// Uses the same 64-bit LCG constants as PCG's state step; quality is
/// irrelevant, repeatability is not.
pub fn keys(n: usize, bound: u32, seed: u64) -> Vec<u32> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % u64::from(bound.max(1))) as u32
        })
        .collect()
}

/// An array holding `keys(n, bound, seed)`.
pub fn filled_array(n: usize, bound: u32, seed: u64) -> Array<u32> {
    keys(n, bound, seed).into_iter().collect()
}

/// A list holding `keys(n, bound, seed)`.
pub fn filled_list(n: usize, bound: u32, seed: u64) -> List<u32> {
    keys(n, bound, seed).into_iter().collect()
}

/// `reps` copies of `0..period`, so `0..period` last occurs at
/// `(reps - 1) * period`.
pub fn periodic_text(period: u32, reps: usize) -> Vec<u32> {
    (0..reps).flat_map(|_| 0..period).collect()
}

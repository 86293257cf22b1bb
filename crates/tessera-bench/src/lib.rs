//! Benchmark profiles and utilities for the Tessera allocator.
//!
//! - [`serial_profile`]: one 1 KiB arena, the single-threaded baseline
//! - [`contention_profile`]: 1 KiB arenas, configurable count
//! - [`request_sizes`]: deterministic request-size stream via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tessera_engine::{AllocatorConfig, RoutingPolicy};

/// Initial arena size used by every profile.
pub const PROFILE_ARENA_SIZE: usize = 1024;

/// Single arena, round-robin routing.
pub fn serial_profile() -> AllocatorConfig {
    AllocatorConfig::new(PROFILE_ARENA_SIZE, 1)
}

/// `num_arenas` arenas under the given routing policy.
pub fn contention_profile(num_arenas: usize, routing: RoutingPolicy) -> AllocatorConfig {
    AllocatorConfig::new(PROFILE_ARENA_SIZE, num_arenas).with_routing(routing)
}

/// `n` request sizes in `1..=max`, reproducible from `seed`.
///
/// Uses a SplitMix64 step per request so runs are comparable across
/// machines without pulling in an RNG.
pub fn request_sizes(n: usize, max: usize, seed: u64) -> Vec<usize> {
    let max = max.max(1) as u64;
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^= z >> 31;
            (z % max) as usize + 1
        })
        .collect()
}

//! Deterministic seed derivation for randomized restarts.

use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Derives the seed of one restart from the master seed.
///
/// Seeds are SipHash-1-3 (zero keys) of `(master_seed, restart)`, stable across
/// platforms, so a master seed reproduces the same sequence of restarts.
pub fn derive_restart_seed(master_seed: u64, restart: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write_u64(master_seed);
    hasher.write_u64(restart);
    hasher.finish()
}

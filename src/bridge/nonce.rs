//! Bridge Nonce Generator
//!
//! Produces the nonce the vault contracts use to pair a lock on the
//! source chain with a release on the target chain. Distinct from any
//! chain-level account nonce: never persisted, regenerated fresh per
//! lock attempt, and NOT monotonic.
//!
//! Layout of the 128-bit value (high to low):
//! wall-clock milliseconds (64) | process-local sequence (32) | random (32).
//! The sequence counter makes in-process collisions impossible; the
//! random tail keeps the collision probability across independent
//! initiators below 2^-20 per operation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

#[derive(Debug, Default)]
pub struct NonceGenerator {
    sequence: AtomicU64,
}

impl NonceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next bridge nonce. Unique within this process, collision-resistant
    /// across processes.
    pub fn next(&self) -> u128 {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) & 0xffff_ffff;
        let random: u32 = rand::thread_rng().gen();

        ((millis as u128) << 64) | ((seq as u128) << 32) | random as u128
    }
}

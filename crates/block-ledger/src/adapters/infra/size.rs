use rand::rngs::OsRng;
use rand::Rng;

use crate::ports::outbound::BlockSizer;

/// Smallest synthetic block size.
pub const MIN_BLOCK_SIZE: u64 = 2;
/// Largest synthetic block size (inclusive).
pub const MAX_BLOCK_SIZE: u64 = 6;

/// Draws `block_size` uniformly from `[2, 6]` using the OS CSPRNG.
///
/// The value does not describe block content.
#[derive(Debug, Default)]
pub struct SecureRandomSizer;

impl BlockSizer for SecureRandomSizer {
    fn assign(&self) -> u64 {
        OsRng.gen_range(MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE)
    }
}

/// Always assigns the same size. For tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedBlockSizer(pub u64);

impl BlockSizer for FixedBlockSizer {
    fn assign(&self) -> u64 {
        self.0
    }
}

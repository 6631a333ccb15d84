//! Infrastructure adapters: clocks and block sizers.

mod size;
mod time;

pub use size::{FixedBlockSizer, SecureRandomSizer};
pub use time::{ManualTimeSource, SystemTimeSource};

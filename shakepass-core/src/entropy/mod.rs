//! Entropy accumulation
//!
//! A single 32-bit accumulator is stirred with every sensor reading. It is
//! an XOR-shift scrambler, not a statistical-quality or cryptographic RNG.

pub mod pool;

pub use pool::{combine, EntropyPool, DEFAULT_SEED, LENGTH_DOWN_SALT, LENGTH_UP_SALT};

//! Seeded deterministic entropy source

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use reboot_core::{EntropyEffects, Result};

/// Deterministic entropy from a fixed seed; same seed, same code sequence
#[derive(Debug)]
pub struct SeededEntropy {
    rng: Mutex<ChaCha20Rng>,
}

impl SeededEntropy {
    /// Create a source from a 64-bit seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }
}

impl Default for SeededEntropy {
    fn default() -> Self {
        Self::from_seed(0)
    }
}

#[async_trait]
impl EntropyEffects for SeededEntropy {
    async fn fill_bytes(&self, buf: &mut [u8]) -> Result<()> {
        self.rng.lock().fill_bytes(buf);
        Ok(())
    }
}

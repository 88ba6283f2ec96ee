//! Invite code generation
//!
//! Codes are raw entropy, never derived from timestamps or counters, so
//! they cannot be guessed by enumeration. 32 bytes gives 256 bits, well
//! past the 128-bit floor the redemption flow assumes.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use reboot_core::{EntropyEffects, Result};

/// Bytes of entropy per code
pub const CODE_BYTES: usize = 32;

/// Generate a fresh URL-safe invite code from the entropy port
pub async fn generate_code(entropy: &dyn EntropyEffects) -> Result<String> {
    let mut buf = [0u8; CODE_BYTES];
    entropy.fill_bytes(&mut buf).await?;
    Ok(URL_SAFE_NO_PAD.encode(buf))
}

//! Stable content hashes for reports.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::SkyError;
use crate::canonical::to_canonical_json_bytes;

/// Computes a stable hexadecimal hash for the provided serialisable payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, SkyError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}

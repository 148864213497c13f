//! Binary-to-text helpers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{CoreError, Result};

/// Standard (padded) base64.
pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base64.
pub fn base64_decode(s: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(s)
        .map_err(|e| CoreError::Base64(e.to_string()))
}

/// Upper-case hex. Diagnostic only; addressing always uses the raw digest.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

use crate::error::{Error, Result};

/// Decode standard (padded) base64, as used for KIKs handed out by the key server admin.
/// Surrounding whitespace, such as a trailing newline from a file or env var, is ignored.
pub fn decode_b64(s: &str) -> Result<Vec<u8>, Error> {
    Ok(base64::decode(s.trim())?)
}

/// Encode bytes as standard (padded) base64
pub fn encode_b64(data: &[u8]) -> String {
    base64::encode(data)
}

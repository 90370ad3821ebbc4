//! Key derivation for the key exchange.
//!
//! KMAC256 (NIST SP 800-185) keyed with the KIK, absorbing the context
//! fields in order. The field order is part of the protocol: client and
//! server must agree on it exactly or they derive different wrapping keys.

use tiny_keccak::{Hasher, Kmac};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Number of bytes in every key handled by the key exchange (256 bits)
pub const KEY_SIZE: usize = 32;

/// KMAC256-based KDF producing a KEY_SIZE key.
/// `label` is the KMAC customization string; `context` fields are absorbed in order.
pub fn kmac_kdf(key: &[u8], label: &[u8], context: &[&[u8]]) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut kmac = Kmac::v256(key, label);
    for field in context {
        kmac.update(field);
    }
    let mut out = Zeroizing::new([0u8; KEY_SIZE]);
    kmac.finalize(&mut out[..]);
    out
}

/// Derives the key that wraps the key set for one exchange.
/// Context order: KIK id bytes, endpoint, client nonce, server nonce.
pub fn derive_wrapping_key(
    kik: &[u8],
    kik_id: &Uuid,
    endpoint: &str,
    client_nonce: &[u8],
    server_nonce: &[u8],
) -> Zeroizing<[u8; KEY_SIZE]> {
    kmac_kdf(
        kik,
        &[],
        &[
            &kik_id.as_bytes()[..],
            endpoint.as_bytes(),
            client_nonce,
            server_nonce,
        ],
    )
}

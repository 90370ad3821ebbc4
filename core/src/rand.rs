//! Client nonces for the key exchange, from the platform CSRNG (`getrandom`).
//!
//! Nonces must come from here, never from a seeded or test generator.

use crate::error::{Error, Result};

/// Fills `buf` from the OS random source.
/// A platform without one yields a `Config` error.
pub fn fill_buf(buf: &mut [u8]) -> Result<(), Error> {
    getrandom::getrandom(buf)?;
    Ok(())
}

/// Returns a fresh random nonce of `N` bytes
pub fn nonce<const N: usize>() -> Result<[u8; N], Error> {
    let mut out = [0u8; N];
    fill_buf(&mut out)?;
    Ok(out)
}

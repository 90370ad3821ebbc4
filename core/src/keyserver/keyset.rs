//! The key set delivered by the key server

use crate::{
    error::{Error, Result},
    keyserver::kdf::KEY_SIZE,
};
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Length of an encoded key set: four keys, no framing
pub const KEYSET_LEN: usize = 4 * KEY_SIZE;

/// Symmetric keys consumed by the encryption layer.
/// Keys are zeroed when the set is dropped.
#[derive(Clone, PartialEq)]
pub struct Keys {
    /// key encryption key
    pub kek: [u8; KEY_SIZE],
    /// access object encryption key
    pub aek: [u8; KEY_SIZE],
    /// token encryption key
    pub tek: [u8; KEY_SIZE],
    /// index encryption key
    pub iek: [u8; KEY_SIZE],
}

impl Keys {
    /// Decodes a key set: KEK, AEK, TEK, IEK, each KEY_SIZE bytes, in that order.
    /// Anything other than exactly KEYSET_LEN bytes is rejected.
    pub fn decode(data: &[u8]) -> Result<Keys, Error> {
        if data.len() != KEYSET_LEN {
            return Err(Error::MalformedPayload(format!(
                "key set must be {} bytes, got {}",
                KEYSET_LEN,
                data.len()
            )));
        }
        let mut keys = Keys {
            kek: [0u8; KEY_SIZE],
            aek: [0u8; KEY_SIZE],
            tek: [0u8; KEY_SIZE],
            iek: [0u8; KEY_SIZE],
        };
        let mut chunks = data.chunks_exact(KEY_SIZE);
        for key in [&mut keys.kek, &mut keys.aek, &mut keys.tek, &mut keys.iek].iter_mut() {
            // length checked above, so there is always a chunk
            if let Some(chunk) = chunks.next() {
                key.copy_from_slice(chunk);
            }
        }
        Ok(keys)
    }

    /// Encodes the key set in the layout read by `decode`
    pub fn encode(&self) -> Zeroizing<Vec<u8>> {
        let mut out = Zeroizing::new(Vec::with_capacity(KEYSET_LEN));
        for key in [&self.kek, &self.aek, &self.tek, &self.iek].iter() {
            out.extend_from_slice(&key[..]);
        }
        out
    }
}

impl Drop for Keys {
    fn drop(&mut self) {
        self.kek.zeroize();
        self.aek.zeroize();
        self.tek.zeroize();
        self.iek.zeroize();
    }
}

/// Debug that doesn't print keys
impl fmt::Debug for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keys(***)")
    }
}

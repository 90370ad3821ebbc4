/// AES-256 key wrap with padding (RFC 5649), used to carry the key set
pub mod kwp {

    use crate::error::{Error, Result};
    use aes_kw::KekAes256;
    use std::convert::TryFrom;
    use std::fmt;
    use zeroize::Zeroizing;

    /// Number of bytes in the key-encryption key (256 bits = 32 bytes)
    pub const KEYBYTES: usize = 32;
    /// Bytes added by wrapping, before padding (the integrity check value)
    pub const OVERHEAD: usize = 8;

    /// Authenticated key wrap. Unwrap verifies integrity before returning anything.
    /// Implementation by [RustCrypto](https://github.com/RustCrypto/key-wraps)
    pub struct KeyWrap {
        kek: KekAes256,
    }

    /// Implementation of Debug that doesn't print key to prevent accidental leaks via logging
    impl fmt::Debug for KeyWrap {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "KeyWrap(AES-256-KWP)")
        }
    }

    impl KeyWrap {
        /// Initialize with the provided key. Key length must be exactly KEYBYTES.
        pub fn init_from(key: &[u8]) -> Result<Self, Error> {
            if key.len() != KEYBYTES {
                return Err(Error::InvalidParameter(format!(
                    "key wrap key must be {} bytes, got {}",
                    KEYBYTES,
                    key.len()
                )));
            }
            let kek = KekAes256::try_from(key)
                .map_err(|e| Error::InvalidParameter(format!("key wrap key: {}", e)))?;
            Ok(Self { kek })
        }

        /// Wraps `data`. Output is the data length rounded up to a multiple of 8, plus OVERHEAD.
        pub fn wrap(&self, data: &[u8]) -> Result<Vec<u8>, Error> {
            self.kek
                .wrap_with_padding_vec(data)
                .map_err(|e| Error::InvalidParameter(format!("key wrap failed: {}", e)))
        }

        /// Unwraps and verifies `blob`.
        /// Any failure, including a blob of impossible length, is an integrity error:
        /// the blob was altered, or was wrapped with a different key.
        pub fn unwrap(&self, blob: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error> {
            self.kek
                .unwrap_with_padding_vec(blob)
                .map(Zeroizing::new)
                .map_err(|e| Error::Integrity(e.to_string()))
        }
    }
}

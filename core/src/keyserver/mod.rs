//! Key exchange with a D1 key server.
//!
//! The client holds a pre-shared Key Initialization Key (KIK). The server
//! wraps the key set with a key derived from the KIK and both parties'
//! nonces, so only a holder of the KIK, talking to the endpoint the server
//! expects, can unwrap it.

mod client;
pub mod kdf;
pub mod keyset;
pub mod keywrap;

pub use client::{decode_kik, KeyExchangeClient, KeyServer, KeySetResponse, CLIENT_NONCE_SIZE};
pub use keyset::{Keys, KEYSET_LEN};

#[cfg(test)]
mod test_keyserver;

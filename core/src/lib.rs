//! # D1 client
//!
//! Client-side core for the D1 encryption service: authenticated sessions
//! with automatic token refresh, and the key exchange with a D1 key server.
//!
//! - __Sessions__ A [`SessionManager`](session/struct.SessionManager.html)
//! wraps any client implementing the service traits in [`api`](api/index.html),
//! logs in with a [`Credential`](session/struct.Credential.html), and
//! attaches a bearer token to every call, refreshing it shortly before it
//! expires. Concurrent callers share a single refresh.
//!
//! - __Key exchange__ A [`KeyExchangeClient`](keyserver/struct.KeyExchangeClient.html)
//! sends a fresh nonce to the key server and unwraps the returned key set
//! (KEK, AEK, TEK, IEK) with a key derived from the pre-shared KIK.
//! Derivation is KMAC256; the key set is wrapped with AES-256 KWP (RFC 5649).
//!
//! This crate does not open connections. The `d1-client-grpc` crate
//! provides the gRPC transport; tests use in-memory ones.
//!
//! ## Implementation notes
//!
//! KMAC is implemented by [`tiny-keccak`](https://crates.io/crates/tiny-keccak),
//! key wrap by [RustCrypto](https://github.com/rustcrypto/).
//!
//! Neither component retries. A failed call or exchange is returned to the
//! caller, who may repeat it.
//!

pub mod api;
pub mod config;
pub mod error;
pub mod keyserver;
pub mod rand;
pub mod session;
pub mod util;

pub use error::{Error, ErrorKind};
pub use keyserver::{KeyExchangeClient, Keys};
pub use session::{Credential, SessionManager};

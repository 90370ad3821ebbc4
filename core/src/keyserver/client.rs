use crate::{
    config::KeyServerOptions,
    error::{Error, Result},
    keyserver::{kdf::derive_wrapping_key, keyset::Keys, keywrap::kwp::KeyWrap},
    rand,
    util::decode_b64,
};
use async_trait::async_trait;
use std::{fmt, sync::Arc};
use tracing::{debug, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Size of the client nonce sent with every key request
pub const CLIENT_NONCE_SIZE: usize = 32;

/// Decodes a base64 KIK. Bad encoding or an empty key is a `Config` error.
pub fn decode_kik(kik: &str) -> Result<Zeroizing<Vec<u8>>, Error> {
    let kik = Zeroizing::new(decode_b64(kik)?);
    if kik.is_empty() {
        return Err(Error::Config(String::from("KIK is empty")));
    }
    Ok(kik)
}

/// Server half of the exchange
#[derive(Clone, PartialEq)]
pub struct KeySetResponse {
    /// nonce chosen by the server, mixed into key derivation
    pub nonce: Vec<u8>,
    /// key set, wrapped with the derived key
    pub wrapped_keys: Vec<u8>,
}

impl fmt::Debug for KeySetResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySetResponse")
            .field("nonce_len", &self.nonce.len())
            .field("wrapped_len", &self.wrapped_keys.len())
            .finish()
    }
}

/// Transport to a key server: one round trip per call
#[async_trait]
pub trait KeyServer: Send + Sync {
    async fn get_key_set(&self, kik_id: &Uuid, nonce: &[u8]) -> Result<KeySetResponse, Error>;
}

#[async_trait]
impl<T: KeyServer + ?Sized> KeyServer for Arc<T> {
    async fn get_key_set(&self, kik_id: &Uuid, nonce: &[u8]) -> Result<KeySetResponse, Error> {
        (**self).get_key_set(kik_id, nonce).await
    }
}

/// Client side of the key exchange.
///
/// Each call to [`get_keys`](#method.get_keys) sends a fresh random nonce,
/// derives the wrapping key from the KIK, the KIK id, the endpoint string and
/// both nonces, then unwraps and decodes the key set.
///
/// There are no retries. A failed exchange can simply be repeated by the
/// caller; every attempt uses a new nonce.
///
/// Errors are distinguishable by [`kind`](../error/enum.Error.html#method.kind):
/// `Config` for a bad KIK (before any network call), `Transport` or
/// `Protocol` from the round trip, `Integrity` when unwrap fails (tampering,
/// wrong KIK, or an endpoint string that differs from the server's), and
/// `MalformedPayload` when the unwrapped key set has the wrong size.
pub struct KeyExchangeClient<T> {
    transport: T,
    endpoint: String,
    kik: Zeroizing<Vec<u8>>,
    kik_id: Uuid,
}

impl<T: KeyServer> KeyExchangeClient<T> {
    /// Creates a client. `kik` is base64-encoded; it is decoded here so that a bad
    /// encoding is reported before the first exchange.
    pub fn new<E: Into<String>>(
        transport: T,
        endpoint: E,
        kik: &str,
        kik_id: Uuid,
    ) -> Result<Self, Error> {
        Self::with_kik(transport, endpoint, decode_kik(kik)?, kik_id)
    }

    /// Creates a client from a KIK already decoded with [`decode_kik`](fn.decode_kik.html)
    pub fn with_kik<E: Into<String>>(
        transport: T,
        endpoint: E,
        kik: Zeroizing<Vec<u8>>,
        kik_id: Uuid,
    ) -> Result<Self, Error> {
        if kik.is_empty() {
            return Err(Error::Config(String::from("KIK is empty")));
        }
        Ok(KeyExchangeClient {
            transport,
            endpoint: endpoint.into(),
            kik,
            kik_id,
        })
    }

    pub fn from_options(transport: T, opts: &KeyServerOptions) -> Result<Self, Error> {
        Self::new(transport, opts.endpoint.as_str(), &opts.kik, opts.kik_id)
    }

    /// Retrieves the key set, with a fresh nonce
    pub async fn get_keys(&self) -> Result<Keys, Error> {
        let nonce: [u8; CLIENT_NONCE_SIZE] = rand::nonce()?;
        self.get_keys_with_nonce(&nonce).await
    }

    pub(crate) async fn get_keys_with_nonce(&self, client_nonce: &[u8]) -> Result<Keys, Error> {
        debug!(kik_id = %self.kik_id, endpoint = %self.endpoint, "requesting key set");
        let resp = self.transport.get_key_set(&self.kik_id, client_nonce).await?;

        let wrapping_key = derive_wrapping_key(
            &self.kik,
            &self.kik_id,
            &self.endpoint,
            client_nonce,
            &resp.nonce,
        );
        let payload = KeyWrap::init_from(&wrapping_key[..])?
            .unwrap(&resp.wrapped_keys)
            .map_err(|e| {
                warn!(kik_id = %self.kik_id, endpoint = %self.endpoint, "key set unwrap failed");
                e
            })?;
        let keys = Keys::decode(&payload)?;
        debug!(kik_id = %self.kik_id, "key set received");
        Ok(keys)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn kik_id(&self) -> &Uuid {
        &self.kik_id
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Debug that doesn't print the kik
impl<T> fmt::Debug for KeyExchangeClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyExchangeClient")
            .field("endpoint", &self.endpoint)
            .field("kik_id", &self.kik_id)
            .finish()
    }
}

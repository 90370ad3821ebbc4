// KeyExchangeClient tests against an in-memory key server that wraps with the real KDF and KWP

use crate::{
    config::KeyServerOptions,
    error::{Error, ErrorKind, Result},
    keyserver::{
        kdf::{derive_wrapping_key, KEY_SIZE},
        keywrap::kwp::KeyWrap,
        decode_kik, KeyExchangeClient, KeyServer, KeySetResponse, Keys, CLIENT_NONCE_SIZE,
    },
    util::encode_b64,
};
use async_trait::async_trait;
use d1_client_test_util::{arrays_eq, flip_bit, random_bytes};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use uuid::Uuid;

const ENDPOINT: &str = "localhost:9000";
const KIK_ID: &str = "11111111-1111-1111-1111-111111111111";
const SERVER_NONCE: [u8; 32] = [b'S'; 32];

/// what the mock server does with the next request
#[derive(Clone, Copy, Debug, PartialEq)]
enum Reply {
    Good,
    /// flip one bit at this offset of the wrapped blob
    Tamper(usize),
    /// wrap only this many bytes of the key set
    Short(usize),
    /// answer with the blob computed for the first nonce ever received
    Replay,
    Unavailable,
    NotFound,
}

struct MockKeyServer {
    kik: Vec<u8>,
    kik_id: Uuid,
    endpoint: String,
    keys: Keys,
    reply: Mutex<Reply>,
    calls: AtomicUsize,
    nonces: Mutex<Vec<Vec<u8>>>,
}

impl MockKeyServer {
    fn new(kik: &[u8]) -> Self {
        MockKeyServer {
            kik: kik.to_vec(),
            kik_id: kik_id(),
            endpoint: ENDPOINT.to_string(),
            keys: known_keys(),
            reply: Mutex::new(Reply::Good),
            calls: AtomicUsize::new(0),
            nonces: Mutex::new(Vec::new()),
        }
    }

    fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn nonces(&self) -> Vec<Vec<u8>> {
        self.nonces.lock().unwrap().clone()
    }

    fn wrap_for(&self, client_nonce: &[u8], payload: &[u8]) -> Result<Vec<u8>, Error> {
        let key = derive_wrapping_key(
            &self.kik,
            &self.kik_id,
            &self.endpoint,
            client_nonce,
            &SERVER_NONCE,
        );
        KeyWrap::init_from(&key[..])?.wrap(payload)
    }
}

#[async_trait]
impl KeyServer for MockKeyServer {
    async fn get_key_set(&self, kik_id: &Uuid, nonce: &[u8]) -> Result<KeySetResponse, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.nonces.lock().unwrap().push(nonce.to_vec());
        if kik_id != &self.kik_id {
            return Err(Error::Protocol {
                code: 5,
                message: format!("unknown kik {}", kik_id),
            });
        }
        let payload = self.keys.encode();
        let reply = *self.reply.lock().unwrap();
        let wrapped_keys = match reply {
            Reply::Good => self.wrap_for(nonce, &payload)?,
            Reply::Tamper(pos) => flip_bit(&self.wrap_for(nonce, &payload)?, pos),
            Reply::Short(len) => self.wrap_for(nonce, &payload[..len])?,
            Reply::Replay => {
                let first = self.nonces.lock().unwrap()[0].clone();
                self.wrap_for(&first, &payload)?
            }
            Reply::Unavailable => {
                return Err(Error::Transport("connection refused".to_string()))
            }
            Reply::NotFound => {
                return Err(Error::Protocol {
                    code: 5,
                    message: "not found".to_string(),
                })
            }
        };
        Ok(KeySetResponse {
            nonce: SERVER_NONCE.to_vec(),
            wrapped_keys,
        })
    }
}

fn kik_id() -> Uuid {
    Uuid::parse_str(KIK_ID).expect("uuid")
}

/// 32-byte KIK, all zero except the last byte
fn fixed_kik() -> Vec<u8> {
    hex::decode("0000000000000000000000000000000000000000000000000000000000000001")
        .expect("hex")
}

fn known_keys() -> Keys {
    Keys {
        kek: [0x11; KEY_SIZE],
        aek: [0x22; KEY_SIZE],
        tek: [0x33; KEY_SIZE],
        iek: [0x44; KEY_SIZE],
    }
}

fn client_for(
    server: Arc<MockKeyServer>,
    kik: &[u8],
    endpoint: &str,
) -> Result<KeyExchangeClient<Arc<MockKeyServer>>, Error> {
    KeyExchangeClient::new(server, endpoint, &encode_b64(kik), kik_id())
}

#[tokio::test]
async fn fixed_round_trip() -> Result<(), Error> {
    let kik = fixed_kik();
    let server = Arc::new(MockKeyServer::new(&kik));
    let client = client_for(server.clone(), &kik, ENDPOINT)?;

    let client_nonce = [b'A'; CLIENT_NONCE_SIZE];
    assert_eq!(kik.len(), KEY_SIZE);
    let keys = client.get_keys_with_nonce(&client_nonce).await?;

    assert_eq!(keys, known_keys());
    assert_eq!(keys.kek, [0x11; KEY_SIZE]);
    assert_eq!(keys.iek, [0x44; KEY_SIZE]);
    assert_eq!(server.calls(), 1, "exactly one round trip");
    assert!(arrays_eq(&server.nonces()[0], &client_nonce));
    Ok(())
}

#[tokio::test]
async fn from_options() -> Result<(), Error> {
    let kik = random_bytes(KEY_SIZE);
    let server = Arc::new(MockKeyServer::new(&kik));
    let opts = KeyServerOptions::new(ENDPOINT, encode_b64(&kik), kik_id());
    let client = KeyExchangeClient::from_options(server, &opts)?;
    assert_eq!(client.endpoint(), ENDPOINT);
    assert_eq!(client.kik_id(), &kik_id());
    assert_eq!(client.get_keys().await?, known_keys());
    assert!(!format!("{:?}", client).contains(&encode_b64(&kik)));
    Ok(())
}

#[tokio::test]
async fn fresh_nonce_every_call() -> Result<(), Error> {
    let kik = random_bytes(KEY_SIZE);
    let server = Arc::new(MockKeyServer::new(&kik));
    let client = client_for(server.clone(), &kik, ENDPOINT)?;

    for _ in 0..3 {
        assert_eq!(client.get_keys().await?, known_keys());
    }
    let nonces = server.nonces();
    assert_eq!(nonces.len(), 3);
    for n in nonces.iter() {
        assert_eq!(n.len(), CLIENT_NONCE_SIZE);
    }
    assert_ne!(nonces[0], nonces[1]);
    assert_ne!(nonces[1], nonces[2]);
    assert_ne!(nonces[0], nonces[2]);
    Ok(())
}

#[tokio::test]
async fn replayed_response_rejected() -> Result<(), Error> {
    let kik = random_bytes(KEY_SIZE);
    let server = Arc::new(MockKeyServer::new(&kik));
    let client = client_for(server.clone(), &kik, ENDPOINT)?;

    client.get_keys().await?;
    server.set_reply(Reply::Replay);
    // blob was wrapped for the previous nonce
    let err = client.get_keys().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
    Ok(())
}

#[tokio::test]
async fn any_tampered_byte_is_integrity_error() -> Result<(), Error> {
    let kik = random_bytes(KEY_SIZE);
    let server = Arc::new(MockKeyServer::new(&kik));
    let client = client_for(server.clone(), &kik, ENDPOINT)?;

    // 128-byte key set + 8 bytes of integrity check
    for pos in 0..136 {
        server.set_reply(Reply::Tamper(pos));
        let err = client.get_keys().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity, "byte {}", pos);
    }
    Ok(())
}

#[tokio::test]
async fn wrong_endpoint_is_integrity_error() -> Result<(), Error> {
    let kik = random_bytes(KEY_SIZE);
    let server = Arc::new(MockKeyServer::new(&kik));
    // same server, addressed by a different string
    let client = client_for(server, &kik, "127.0.0.1:9000")?;
    let err = client.get_keys().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
    Ok(())
}

#[tokio::test]
async fn wrong_kik_is_integrity_error() -> Result<(), Error> {
    let server = Arc::new(MockKeyServer::new(&random_bytes(KEY_SIZE)));
    let client = client_for(server, &random_bytes(KEY_SIZE), ENDPOINT)?;
    let err = client.get_keys().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
    Ok(())
}

#[tokio::test]
async fn short_key_set_is_malformed() -> Result<(), Error> {
    let kik = random_bytes(KEY_SIZE);
    let server = Arc::new(MockKeyServer::new(&kik));
    let client = client_for(server.clone(), &kik, ENDPOINT)?;

    for len in [KEY_SIZE, 3 * KEY_SIZE, 4 * KEY_SIZE - 1].iter() {
        server.set_reply(Reply::Short(*len));
        let err = client.get_keys().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedPayload, "len {}", len);
    }
    Ok(())
}

#[tokio::test]
async fn rpc_errors_pass_through() -> Result<(), Error> {
    let kik = random_bytes(KEY_SIZE);
    let server = Arc::new(MockKeyServer::new(&kik));
    let client = client_for(server.clone(), &kik, ENDPOINT)?;

    server.set_reply(Reply::Unavailable);
    assert_eq!(
        client.get_keys().await.unwrap_err().kind(),
        ErrorKind::Transport
    );

    server.set_reply(Reply::NotFound);
    match client.get_keys().await.unwrap_err() {
        Error::Protocol { code, message } => {
            assert_eq!(code, 5);
            assert_eq!(message, "not found");
        }
        e => panic!("expected protocol error, got {:?}", e),
    }
    // no retries
    assert_eq!(server.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn unknown_kik_id_is_protocol_error() -> Result<(), Error> {
    let kik = random_bytes(KEY_SIZE);
    let server = Arc::new(MockKeyServer::new(&kik));
    let client = KeyExchangeClient::new(server, ENDPOINT, &encode_b64(&kik), Uuid::nil())?;
    assert_eq!(
        client.get_keys().await.unwrap_err().kind(),
        ErrorKind::Protocol
    );
    Ok(())
}

#[test]
fn bad_kik_fails_before_network() {
    let server = Arc::new(MockKeyServer::new(&fixed_kik()));

    let err = KeyExchangeClient::new(server.clone(), ENDPOINT, "%%not base64%%", kik_id())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    let err = KeyExchangeClient::new(server.clone(), ENDPOINT, "", kik_id()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    assert_eq!(server.calls(), 0);
}

#[tokio::test]
async fn predecoded_kik() -> Result<(), Error> {
    let kik = fixed_kik();
    let decoded = decode_kik(&format!(" {}\n", encode_b64(&kik)))?;
    assert!(arrays_eq(&decoded[..], &kik), "surrounding whitespace ignored");

    assert_eq!(decode_kik("%%").unwrap_err().kind(), ErrorKind::Config);
    assert_eq!(decode_kik("").unwrap_err().kind(), ErrorKind::Config);

    let server = Arc::new(MockKeyServer::new(&kik));
    let client = KeyExchangeClient::with_kik(server.clone(), ENDPOINT, decoded, kik_id())?;
    assert_eq!(client.get_keys().await?, known_keys());
    assert_eq!(server.calls(), 1);
    Ok(())
}

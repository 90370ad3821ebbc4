//! Key server transport

use crate::{client::open_channel, proto, rpc::unary};
use async_trait::async_trait;
use d1_client::{
    config::KeyServerOptions,
    error::{Error, Result},
    keyserver::{decode_kik, KeyExchangeClient, KeyServer, KeySetResponse},
};
use std::fmt;
use tonic::transport::Channel;
use uuid::Uuid;

const GET_KEY_SET: &str = "/keyservice.KeyAPI/GetKeySet";

/// gRPC connection to a key server
#[derive(Clone)]
pub struct GrpcKeyServer {
    channel: Channel,
}

impl GrpcKeyServer {
    pub async fn connect(endpoint: &str, cert_path: Option<&str>) -> Result<Self, Error> {
        Ok(GrpcKeyServer {
            channel: open_channel(endpoint, cert_path).await?,
        })
    }

    pub fn with_channel(channel: Channel) -> Self {
        GrpcKeyServer { channel }
    }
}

impl fmt::Debug for GrpcKeyServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GrpcKeyServer")
    }
}

#[async_trait]
impl KeyServer for GrpcKeyServer {
    async fn get_key_set(&self, kik_id: &Uuid, nonce: &[u8]) -> Result<KeySetResponse, Error> {
        let resp: proto::GetKeySetResponse = unary(
            &self.channel,
            GET_KEY_SET,
            proto::GetKeySetRequest {
                kik_id: kik_id.to_string(),
                nonce: nonce.to_vec(),
            },
            None,
        )
        .await?;
        Ok(KeySetResponse {
            nonce: resp.nonce,
            wrapped_keys: resp.wrapped_keys,
        })
    }
}

/// Connects to the key server in `opts` and returns a ready key exchange client.
/// A malformed KIK is reported before connecting.
pub async fn new_key_exchange(
    opts: &KeyServerOptions,
    cert_path: Option<&str>,
) -> Result<KeyExchangeClient<GrpcKeyServer>, Error> {
    let kik = decode_kik(&opts.kik)?;
    let transport = GrpcKeyServer::connect(&opts.endpoint, cert_path).await?;
    KeyExchangeClient::with_kik(transport, opts.endpoint.as_str(), kik, opts.kik_id)
}

//! gRPC transport for d1-client
//!
//! [`GrpcClient`](struct.GrpcClient.html) implements the service traits of
//! `d1_client::api` against a D1 server, and
//! [`GrpcKeyServer`](struct.GrpcKeyServer.html) implements the key server
//! transport. Authenticated calls carry `authorization: bearer <token>`
//! metadata; login and health check are sent without it.
//!
//! Connections use TLS when a CA certificate path is configured
//! (`D1_CERT`), otherwise plaintext.
//!
//! ```no_run
//! # async fn run() -> Result<(), d1_client::Error> {
//! use d1_client::{config::ConnectOptions, session::Credential};
//!
//! let session = d1_client_grpc::new_session(
//!     &ConnectOptions::from_env()?,
//!     Credential::from_env()?,
//! ).await?;
//! let enc = session.encrypt(b"secret", b"context").await?;
//! let dec = session.decrypt(&enc.object_id, &enc.ciphertext, &enc.associated_data).await?;
//! assert_eq!(dec.plaintext, b"secret");
//! # Ok(())
//! # }
//! ```

mod client;
mod keyserver;
pub mod proto;
mod rpc;


pub use client::{connect, open_channel, GrpcClient};
pub use keyserver::{new_key_exchange, GrpcKeyServer};
pub use rpc::{status_error, transport_error};

use d1_client::{
    config::ConnectOptions,
    error::{Error, Result},
    session::{Credential, SessionManager},
};

/// Connects and logs in. The returned session refreshes its token as needed.
pub async fn new_session(
    opts: &ConnectOptions,
    credential: Credential,
) -> Result<SessionManager<GrpcClient>, Error> {
    // missing credential fails before dialing
    credential.validate()?;
    let client = connect(opts).await?;
    SessionManager::new(client, credential).await
}

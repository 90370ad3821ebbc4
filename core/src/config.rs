//! Client options
//!
//! Every option struct has a `defaults()` constructor, and the ones that
//! name a server can also be read from the environment:
//!
//! | variable         | used by            |
//! |------------------|--------------------|
//! | `D1_ENDPOINT`    | `ConnectOptions`   |
//! | `D1_CERT`        | `ConnectOptions`   |
//! | `D1_UID`         | `Credential`       |
//! | `D1_PASSWORD`    | `Credential`       |
//! | `D1_KS_ENDPOINT` | `KeyServerOptions` |
//! | `D1_KIK`         | `KeyServerOptions` |
//! | `D1_KIK_ID`      | `KeyServerOptions` |

use crate::{
    error::{Error, Result},
    util::{getenv, getenv_opt},
};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Tokens are refreshed when they expire within this window, to absorb clock drift
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(60);

pub const D1_ENDPOINT: &str = "D1_ENDPOINT";
pub const D1_CERT: &str = "D1_CERT";
pub const D1_KS_ENDPOINT: &str = "D1_KS_ENDPOINT";
pub const D1_KIK: &str = "D1_KIK";
pub const D1_KIK_ID: &str = "D1_KIK_ID";

/// Options for SessionManager
#[derive(Clone, Debug)]
pub struct SessionOptions {
    /// A token expiring within `refresh_margin` of now is replaced before the next call
    pub refresh_margin: Duration,
}

impl SessionOptions {
    pub fn defaults() -> Self {
        SessionOptions {
            refresh_margin: DEFAULT_REFRESH_MARGIN,
        }
    }
}

/// Where and how to connect to a D1 service
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectOptions {
    /// server address as "host:port"
    pub endpoint: String,
    /// path to a PEM CA certificate. If set, the connection uses TLS.
    pub cert_path: Option<String>,
}

impl ConnectOptions {
    pub fn defaults() -> Self {
        ConnectOptions {
            endpoint: String::from("localhost:9000"),
            cert_path: None,
        }
    }

    /// Reads D1_ENDPOINT (required) and D1_CERT (optional)
    pub fn from_env() -> Result<Self, Error> {
        Ok(ConnectOptions {
            endpoint: getenv(D1_ENDPOINT)?,
            cert_path: getenv_opt(D1_CERT),
        })
    }
}

/// Key server address and the administrator-issued key initialization key
#[derive(Clone, PartialEq)]
pub struct KeyServerOptions {
    /// key server address as "host:port". The exact string is part of key derivation.
    pub endpoint: String,
    /// base64-encoded KIK
    pub kik: String,
    pub kik_id: Uuid,
}

impl KeyServerOptions {
    pub fn new<E: Into<String>, K: Into<String>>(endpoint: E, kik: K, kik_id: Uuid) -> Self {
        KeyServerOptions {
            endpoint: endpoint.into(),
            kik: kik.into(),
            kik_id,
        }
    }

    /// Reads D1_KS_ENDPOINT, D1_KIK and D1_KIK_ID, all required
    pub fn from_env() -> Result<Self, Error> {
        let kik_id = Uuid::parse_str(getenv(D1_KIK_ID)?.trim())?;
        Ok(KeyServerOptions {
            endpoint: getenv(D1_KS_ENDPOINT)?,
            kik: getenv(D1_KIK)?,
            kik_id,
        })
    }
}

/// Debug that doesn't print the kik
impl fmt::Debug for KeyServerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyServerOptions")
            .field("endpoint", &self.endpoint)
            .field("kik_id", &self.kik_id)
            .finish()
    }
}

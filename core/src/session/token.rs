//! Credentials and access tokens

use crate::{
    error::{Error, Result},
    util::getenv,
};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// request metadata key carrying the bearer token
pub const AUTHORIZATION_HEADER: &str = "authorization";
/// prefix of the authorization header value
pub const BEARER_PREFIX: &str = "bearer ";

/// environment variable holding the user id, used by `Credential::from_env`
pub const D1_UID: &str = "D1_UID";
/// environment variable holding the password, used by `Credential::from_env`
pub const D1_PASSWORD: &str = "D1_PASSWORD";

/// User id and password used to (re-)authenticate
#[derive(Clone, PartialEq)]
pub struct Credential {
    user_id: String,
    password: String,
}

impl Credential {
    pub fn new<U: Into<String>, P: Into<String>>(user_id: U, password: P) -> Self {
        Self {
            user_id: user_id.into(),
            password: password.into(),
        }
    }

    /// Reads credential from environment variables D1_UID and D1_PASSWORD
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self::new(getenv(D1_UID)?, getenv(D1_PASSWORD)?))
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    /// Returns a configuration error if either field is empty
    pub fn validate(&self) -> Result<(), Error> {
        if self.user_id.is_empty() {
            return Err(Error::Config("credential is missing user id".to_string()));
        }
        if self.password.is_empty() {
            return Err(Error::Config("credential is missing password".to_string()));
        }
        Ok(())
    }
}

/// Debug that doesn't print the password
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Result of a successful login
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expiry: SystemTime,
}

impl AccessToken {
    /// Builds token from the server's expiry, in seconds since the unix epoch.
    /// Negative values are clamped to the epoch, so the token is treated as already expired.
    pub fn from_epoch_secs<S: Into<String>>(token: S, expiry_secs: i64) -> Self {
        let secs = if expiry_secs > 0 { expiry_secs as u64 } else { 0 };
        Self {
            token: token.into(),
            expiry: UNIX_EPOCH + Duration::from_secs(secs),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Token attached to a single outgoing call.
/// It is a snapshot: replacing the session's token does not affect calls already holding one.
#[derive(Clone, PartialEq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new<S: Into<String>>(token: S) -> Self {
        BearerToken(token.into())
    }

    /// raw token value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `authorization` request header: "bearer <token>"
    pub fn header_value(&self) -> String {
        format!("{}{}", BEARER_PREFIX, self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken(***)")
    }
}

/// Returns true if a token expiring at `expiry` must be refreshed at time `now`.
/// Reaching the margin exactly counts as expired.
pub fn needs_refresh(expiry: SystemTime, now: SystemTime, margin: Duration) -> bool {
    match now.checked_add(margin) {
        Some(deadline) => deadline >= expiry,
        None => true,
    }
}

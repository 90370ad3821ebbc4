//! Authenticated sessions with automatic token refresh.
//!
//! A [`SessionManager`] owns the credential and the current access token,
//! and presents the operations of the client it wraps without the token
//! argument. See [`SessionManager`] for the refresh and concurrency rules.

mod manager;
pub use manager::SessionManager;

mod token;
pub use token::{
    needs_refresh, AccessToken, BearerToken, Credential, AUTHORIZATION_HEADER, BEARER_PREFIX,
    D1_PASSWORD, D1_UID,
};

//! SessionManager - token-refreshing wrapper around any D1 client

use crate::{
    api::{
        Authn, Authz, Core, CreateGroupResponse, CreateUserResponse, DecryptResponse,
        EncryptResponse, GetPermissionsResponse, HealthResponse, Objects, RetrieveResponse, Scope,
        StoreResponse, Utility, VersionResponse,
    },
    config::SessionOptions,
    error::{Error, Result},
    session::token::{needs_refresh, AccessToken, BearerToken, Credential},
};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Mutable session state. Only ever touched while holding the SessionManager's lock.
struct Session {
    credential: Credential,
    token: BearerToken,
    expiry: SystemTime,
    /// outcome of the most recent refresh login, if it failed
    refresh_error: Option<Error>,
}

impl Session {
    fn new(credential: Credential, token: AccessToken) -> Self {
        Session {
            credential,
            token: BearerToken::new(token.token),
            expiry: token.expiry,
            refresh_error: None,
        }
    }
}

/// Wraps a client `C` and keeps its access token fresh.
///
/// Every authenticated operation of the wrapped client is available on the
/// SessionManager without the token argument. Before forwarding, the
/// manager re-authenticates with the stored credential if the token expires
/// within `refresh_margin`; a failed refresh is returned in place of the
/// call's result, and the call is not attempted.
///
/// Refreshes are serialized: when several tasks find the token stale at the
/// same time, one performs the login and the rest use its result, whether
/// that is a new token or the login's error. Switching user is serialized
/// with refreshes in the same way.
///
/// A call that is already in flight keeps the token it started with, even if
/// the session is refreshed or switched to another user meanwhile.
///
/// No operation is retried. Retry policy, if any, belongs to the caller.
///
/// ```no_run
/// # use d1_client::{api::*, error::*, session::*};
/// # async fn run<C: Authn + Core>(client: C) -> Result<(), Error> {
/// let session = SessionManager::new(client, Credential::new("uid", "password")).await?;
/// let enc = session.encrypt(b"secret", b"label").await?;
/// let dec = session.decrypt(&enc.object_id, &enc.ciphertext, &enc.associated_data).await?;
/// assert_eq!(&dec.plaintext, b"secret");
/// # Ok(())
/// # }
/// ```
pub struct SessionManager<C> {
    client: C,
    opts: SessionOptions,
    session: Mutex<Session>,
    // number of refresh logins that have finished, either way
    refreshes: AtomicU64,
}

impl<C> fmt::Debug for SessionManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("opts", &self.opts)
            .finish()
    }
}

impl<C: Authn> SessionManager<C> {
    /// Logs in with `credential` and returns a manager with the default options.
    pub async fn new(client: C, credential: Credential) -> Result<Self, Error> {
        Self::with_options(client, credential, SessionOptions::defaults()).await
    }

    /// Logs in with `credential`. Fails if the credential is incomplete
    /// (before any network call) or if the login is rejected.
    pub async fn with_options(
        client: C,
        credential: Credential,
        opts: SessionOptions,
    ) -> Result<Self, Error> {
        credential.validate()?;
        let token = client
            .login_user(credential.user_id(), credential.password())
            .await?;
        info!(user_id = credential.user_id(), expiry = ?token.expiry, "logged in");
        Ok(SessionManager {
            client,
            opts,
            session: Mutex::new(Session::new(credential, token)),
            refreshes: AtomicU64::new(0),
        })
    }

    /// Returns a token that is valid for at least `refresh_margin`,
    /// logging in again first if the current one is too close to expiry.
    pub async fn bearer(&self) -> Result<BearerToken, Error> {
        let finished = self.refreshes.load(Ordering::SeqCst);
        let mut session = self.session.lock().await;
        if !needs_refresh(session.expiry, SystemTime::now(), self.opts.refresh_margin) {
            return Ok(session.token.clone());
        }
        // a refresh finished while this caller waited for the lock: take its result
        if self.refreshes.load(Ordering::SeqCst) != finished {
            if let Some(e) = &session.refresh_error {
                return Err(e.clone());
            }
        }
        debug!(
            user_id = session.credential.user_id(),
            "access token expiring, refreshing"
        );
        // if this future is dropped mid-login, the guard is released and
        // the session is left as it was
        let result = self
            .client
            .login_user(
                session.credential.user_id(),
                session.credential.password(),
            )
            .await;
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        match result {
            Ok(token) => {
                session.token = BearerToken::new(token.token);
                session.expiry = token.expiry;
                session.refresh_error = None;
                debug!(expiry = ?session.expiry, "access token refreshed");
                Ok(session.token.clone())
            }
            Err(e) => {
                warn!(user_id = session.credential.user_id(), error = %e, "token refresh failed");
                session.refresh_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Authenticates as another user. On success the credential, token, and
    /// expiry are replaced together; on failure the current session is kept.
    pub async fn switch_user(&self, credential: Credential) -> Result<(), Error> {
        credential.validate()?;
        let mut session = self.session.lock().await;
        let token = self
            .client
            .login_user(credential.user_id(), credential.password())
            .await?;
        info!(
            from = session.credential.user_id(),
            to = credential.user_id(),
            "switched user"
        );
        *session = Session::new(credential, token);
        Ok(())
    }

    /// Same as `switch_user`
    pub async fn login_user(&self, user_id: &str, password: &str) -> Result<(), Error> {
        self.switch_user(Credential::new(user_id, password)).await
    }

    /// Expiry of the current token
    pub async fn token_expiry(&self) -> SystemTime {
        self.session.lock().await.expiry
    }

    /// User id of the current session
    pub async fn user_id(&self) -> String {
        self.session.lock().await.credential.user_id().to_string()
    }

    /// The wrapped client, for calls that need no token
    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn options(&self) -> &SessionOptions {
        &self.opts
    }

    pub async fn create_user(&self, scopes: &[Scope]) -> Result<CreateUserResponse, Error> {
        let auth = self.bearer().await?;
        self.client.create_user(&auth, scopes).await
    }

    pub async fn remove_user(&self, user_id: &str) -> Result<(), Error> {
        let auth = self.bearer().await?;
        self.client.remove_user(&auth, user_id).await
    }

    pub async fn create_group(&self, scopes: &[Scope]) -> Result<CreateGroupResponse, Error> {
        let auth = self.bearer().await?;
        self.client.create_group(&auth, scopes).await
    }

    pub async fn add_user_to_group(&self, user_id: &str, group_id: &str) -> Result<(), Error> {
        let auth = self.bearer().await?;
        self.client.add_user_to_group(&auth, user_id, group_id).await
    }

    pub async fn remove_user_from_group(
        &self,
        user_id: &str,
        group_id: &str,
    ) -> Result<(), Error> {
        let auth = self.bearer().await?;
        self.client
            .remove_user_from_group(&auth, user_id, group_id)
            .await
    }
}

impl<C: Authn + Utility> SessionManager<C> {
    /// Server health. Bypasses the refresh check.
    pub async fn health(&self) -> Result<HealthResponse, Error> {
        self.client.health().await
    }

    pub async fn version(&self) -> Result<VersionResponse, Error> {
        let auth = self.bearer().await?;
        self.client.version(&auth).await
    }
}

impl<C: Authn + Authz> SessionManager<C> {
    /// Returns the ids of the groups with access to the object
    pub async fn get_permissions(&self, object_id: &str) -> Result<GetPermissionsResponse, Error> {
        let auth = self.bearer().await?;
        self.client.get_permissions(&auth, object_id).await
    }

    pub async fn add_permission(&self, object_id: &str, group_id: &str) -> Result<(), Error> {
        let auth = self.bearer().await?;
        self.client.add_permission(&auth, object_id, group_id).await
    }

    pub async fn remove_permission(&self, object_id: &str, group_id: &str) -> Result<(), Error> {
        let auth = self.bearer().await?;
        self.client
            .remove_permission(&auth, object_id, group_id)
            .await
    }
}

impl<C: Authn + Core> SessionManager<C> {
    /// Encrypts `plaintext` and binds `associated_data` to the ciphertext
    pub async fn encrypt(
        &self,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<EncryptResponse, Error> {
        let auth = self.bearer().await?;
        self.client
            .encrypt(&auth, plaintext, associated_data)
            .await
    }

    /// Decrypts and verifies a ciphertext previously returned by `encrypt`
    pub async fn decrypt(
        &self,
        object_id: &str,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<DecryptResponse, Error> {
        let auth = self.bearer().await?;
        self.client
            .decrypt(&auth, object_id, ciphertext, associated_data)
            .await
    }
}

impl<C: Authn + Objects> SessionManager<C> {
    pub async fn store(
        &self,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<StoreResponse, Error> {
        let auth = self.bearer().await?;
        self.client.store(&auth, plaintext, associated_data).await
    }

    pub async fn retrieve(&self, object_id: &str) -> Result<RetrieveResponse, Error> {
        let auth = self.bearer().await?;
        self.client.retrieve(&auth, object_id).await
    }

    pub async fn update(
        &self,
        object_id: &str,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<(), Error> {
        let auth = self.bearer().await?;
        self.client
            .update(&auth, object_id, plaintext, associated_data)
            .await
    }

    pub async fn delete(&self, object_id: &str) -> Result<(), Error> {
        let auth = self.bearer().await?;
        self.client.delete(&auth, object_id).await
    }
}

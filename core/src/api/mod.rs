//! Operation surface of the D1 services.
//!
//! Each remote service is one trait. Transports (such as the grpc crate, or
//! an in-memory mock) implement whichever services they reach. Authenticated
//! operations take the bearer token explicitly; the
//! [`SessionManager`](../session/struct.SessionManager.html) supplies a fresh
//! one on every call.
//!
//! Only [`Authn::login_user`] and [`Utility::health`] are callable without a
//! token, along with the key server's `GetKeySet`. Transports check every
//! outgoing call against [`UNAUTHENTICATED_METHODS`].

mod types;
pub use types::{
    CreateGroupResponse, CreateUserResponse, DecryptResponse, EncryptResponse,
    GetPermissionsResponse, HealthResponse, RetrieveResponse, Scope, StoreResponse,
    VersionResponse,
};

use crate::{
    error::{Error, Result},
    session::{AccessToken, BearerToken},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Wire names of the methods that must be called without an authorization header
pub const UNAUTHENTICATED_METHODS: [&str; 3] = [
    "/d1.authn.Authn/LoginUser",
    "/grpc.health.v1.Health/Check",
    "/keyservice.KeyAPI/GetKeySet",
];

/// Returns true if the wire method may be called without a token
pub fn is_unauthenticated(method: &str) -> bool {
    UNAUTHENTICATED_METHODS.contains(&method)
}

/// User and group management, and login
#[async_trait]
pub trait Authn: Send + Sync {
    /// Authenticates with the given credentials. Never requires a token.
    async fn login_user(&self, user_id: &str, password: &str) -> Result<AccessToken, Error>;

    async fn create_user(
        &self,
        auth: &BearerToken,
        scopes: &[Scope],
    ) -> Result<CreateUserResponse, Error>;

    async fn remove_user(&self, auth: &BearerToken, user_id: &str) -> Result<(), Error>;

    async fn create_group(
        &self,
        auth: &BearerToken,
        scopes: &[Scope],
    ) -> Result<CreateGroupResponse, Error>;

    async fn add_user_to_group(
        &self,
        auth: &BearerToken,
        user_id: &str,
        group_id: &str,
    ) -> Result<(), Error>;

    async fn remove_user_from_group(
        &self,
        auth: &BearerToken,
        user_id: &str,
        group_id: &str,
    ) -> Result<(), Error>;
}

/// Health and version
#[async_trait]
pub trait Utility: Send + Sync {
    /// Server health. Never requires a token.
    async fn health(&self) -> Result<HealthResponse, Error>;

    async fn version(&self, auth: &BearerToken) -> Result<VersionResponse, Error>;
}

/// Object permissions
#[async_trait]
pub trait Authz: Send + Sync {
    async fn get_permissions(
        &self,
        auth: &BearerToken,
        object_id: &str,
    ) -> Result<GetPermissionsResponse, Error>;

    async fn add_permission(
        &self,
        auth: &BearerToken,
        object_id: &str,
        group_id: &str,
    ) -> Result<(), Error>;

    async fn remove_permission(
        &self,
        auth: &BearerToken,
        object_id: &str,
        group_id: &str,
    ) -> Result<(), Error>;
}

/// Stateless encryption: ciphertext is returned to the caller
#[async_trait]
pub trait Core: Send + Sync {
    async fn encrypt(
        &self,
        auth: &BearerToken,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<EncryptResponse, Error>;

    async fn decrypt(
        &self,
        auth: &BearerToken,
        object_id: &str,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<DecryptResponse, Error>;
}

/// Encrypted storage: ciphertext is kept by the service
#[async_trait]
pub trait Objects: Send + Sync {
    async fn store(
        &self,
        auth: &BearerToken,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<StoreResponse, Error>;

    async fn retrieve(&self, auth: &BearerToken, object_id: &str)
        -> Result<RetrieveResponse, Error>;

    async fn update(
        &self,
        auth: &BearerToken,
        object_id: &str,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<(), Error>;

    async fn delete(&self, auth: &BearerToken, object_id: &str) -> Result<(), Error>;
}

// A shared client can be wrapped by a SessionManager while other code keeps a handle to it.

#[async_trait]
impl<T: Authn + ?Sized> Authn for Arc<T> {
    async fn login_user(&self, user_id: &str, password: &str) -> Result<AccessToken, Error> {
        (**self).login_user(user_id, password).await
    }

    async fn create_user(
        &self,
        auth: &BearerToken,
        scopes: &[Scope],
    ) -> Result<CreateUserResponse, Error> {
        (**self).create_user(auth, scopes).await
    }

    async fn remove_user(&self, auth: &BearerToken, user_id: &str) -> Result<(), Error> {
        (**self).remove_user(auth, user_id).await
    }

    async fn create_group(
        &self,
        auth: &BearerToken,
        scopes: &[Scope],
    ) -> Result<CreateGroupResponse, Error> {
        (**self).create_group(auth, scopes).await
    }

    async fn add_user_to_group(
        &self,
        auth: &BearerToken,
        user_id: &str,
        group_id: &str,
    ) -> Result<(), Error> {
        (**self).add_user_to_group(auth, user_id, group_id).await
    }

    async fn remove_user_from_group(
        &self,
        auth: &BearerToken,
        user_id: &str,
        group_id: &str,
    ) -> Result<(), Error> {
        (**self)
            .remove_user_from_group(auth, user_id, group_id)
            .await
    }
}

#[async_trait]
impl<T: Utility + ?Sized> Utility for Arc<T> {
    async fn health(&self) -> Result<HealthResponse, Error> {
        (**self).health().await
    }

    async fn version(&self, auth: &BearerToken) -> Result<VersionResponse, Error> {
        (**self).version(auth).await
    }
}

#[async_trait]
impl<T: Authz + ?Sized> Authz for Arc<T> {
    async fn get_permissions(
        &self,
        auth: &BearerToken,
        object_id: &str,
    ) -> Result<GetPermissionsResponse, Error> {
        (**self).get_permissions(auth, object_id).await
    }

    async fn add_permission(
        &self,
        auth: &BearerToken,
        object_id: &str,
        group_id: &str,
    ) -> Result<(), Error> {
        (**self).add_permission(auth, object_id, group_id).await
    }

    async fn remove_permission(
        &self,
        auth: &BearerToken,
        object_id: &str,
        group_id: &str,
    ) -> Result<(), Error> {
        (**self).remove_permission(auth, object_id, group_id).await
    }
}

#[async_trait]
impl<T: Core + ?Sized> Core for Arc<T> {
    async fn encrypt(
        &self,
        auth: &BearerToken,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<EncryptResponse, Error> {
        (**self).encrypt(auth, plaintext, associated_data).await
    }

    async fn decrypt(
        &self,
        auth: &BearerToken,
        object_id: &str,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<DecryptResponse, Error> {
        (**self)
            .decrypt(auth, object_id, ciphertext, associated_data)
            .await
    }
}

#[async_trait]
impl<T: Objects + ?Sized> Objects for Arc<T> {
    async fn store(
        &self,
        auth: &BearerToken,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<StoreResponse, Error> {
        (**self).store(auth, plaintext, associated_data).await
    }

    async fn retrieve(&self, auth: &BearerToken, object_id: &str)
        -> Result<RetrieveResponse, Error> {
        (**self).retrieve(auth, object_id).await
    }

    async fn update(
        &self,
        auth: &BearerToken,
        object_id: &str,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<(), Error> {
        (**self)
            .update(auth, object_id, plaintext, associated_data)
            .await
    }

    async fn delete(&self, auth: &BearerToken, object_id: &str) -> Result<(), Error> {
        (**self).delete(auth, object_id).await
    }
}

//! D1 service client over a tonic channel

use crate::{
    proto,
    rpc::{transport_error, unary},
};
use async_trait::async_trait;
use d1_client::{
    api::{
        Authn, Authz, Core, CreateGroupResponse, CreateUserResponse, DecryptResponse,
        EncryptResponse, GetPermissionsResponse, HealthResponse, Objects, RetrieveResponse, Scope,
        StoreResponse, Utility, VersionResponse,
    },
    config::ConnectOptions,
    error::{Error, Result},
    session::{AccessToken, BearerToken},
};
use std::fmt;
use tonic::transport::{Certificate, Channel, ClientTlsConfig};
use tracing::debug;

const LOGIN_USER: &str = "/d1.authn.Authn/LoginUser";
const CREATE_USER: &str = "/d1.authn.Authn/CreateUser";
const REMOVE_USER: &str = "/d1.authn.Authn/RemoveUser";
const CREATE_GROUP: &str = "/d1.authn.Authn/CreateGroup";
const ADD_USER_TO_GROUP: &str = "/d1.authn.Authn/AddUserToGroup";
const REMOVE_USER_FROM_GROUP: &str = "/d1.authn.Authn/RemoveUserFromGroup";
const GET_PERMISSIONS: &str = "/d1.authz.Authz/GetPermissions";
const ADD_PERMISSION: &str = "/d1.authz.Authz/AddPermission";
const REMOVE_PERMISSION: &str = "/d1.authz.Authz/RemovePermission";
const VERSION: &str = "/d1.version.Version/Version";
const HEALTH_CHECK: &str = "/grpc.health.v1.Health/Check";
const ENCRYPT: &str = "/d1.generic.Generic/Encrypt";
const DECRYPT: &str = "/d1.generic.Generic/Decrypt";
const STORE: &str = "/d1.storage.Objects/Store";
const RETRIEVE: &str = "/d1.storage.Objects/Retrieve";
const UPDATE: &str = "/d1.storage.Objects/Update";
const DELETE: &str = "/d1.storage.Objects/Delete";

/// Opens a channel to `endpoint` ("host:port"). With a CA certificate the
/// connection uses TLS, otherwise plaintext.
pub async fn open_channel(endpoint: &str, cert_path: Option<&str>) -> Result<Channel, Error> {
    let uri = format!(
        "{}://{}",
        if cert_path.is_some() { "https" } else { "http" },
        endpoint
    );
    let mut channel = Channel::from_shared(uri)
        .map_err(|e| Error::Config(format!("invalid endpoint {}: {}", endpoint, e)))?;
    if let Some(path) = cert_path {
        let pem = tokio::fs::read(path)
            .await
            .map_err(|e| Error::Config(format!("reading certificate {}: {}", path, e)))?;
        let tls = ClientTlsConfig::new().ca_certificate(Certificate::from_pem(pem));
        channel = channel
            .tls_config(tls)
            .map_err(|e| Error::Config(format!("tls config for {}: {}", endpoint, e)))?;
    }
    debug!(endpoint, tls = cert_path.is_some(), "connecting");
    channel.connect().await.map_err(transport_error)
}

/// Connects to a D1 service
pub async fn connect(opts: &ConnectOptions) -> Result<GrpcClient, Error> {
    let channel = open_channel(&opts.endpoint, opts.cert_path.as_deref()).await?;
    Ok(GrpcClient { channel })
}

/// Client for every D1 service reachable on one connection:
/// authn, authz, version, health, generic (Core) and storage (Objects).
///
/// Cloning is cheap and shares the connection.
#[derive(Clone)]
pub struct GrpcClient {
    channel: Channel,
}

impl GrpcClient {
    /// Uses an existing channel
    pub fn with_channel(channel: Channel) -> Self {
        GrpcClient { channel }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }
}

impl fmt::Debug for GrpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GrpcClient")
    }
}

pub(crate) fn wire_scope(scope: &Scope) -> i32 {
    let s = match scope {
        Scope::Read => proto::Scope::Read,
        Scope::Create => proto::Scope::Create,
        Scope::Update => proto::Scope::Update,
        Scope::Delete => proto::Scope::Delete,
        Scope::Index => proto::Scope::Index,
        Scope::ObjectPermissions => proto::Scope::Objectpermissions,
        Scope::UserManagement => proto::Scope::Usermanagement,
    };
    s as i32
}

fn wire_scopes(scopes: &[Scope]) -> Vec<i32> {
    scopes.iter().map(wire_scope).collect()
}

pub(crate) fn health_status(status: i32) -> String {
    proto::ServingStatus::from_i32(status)
        .unwrap_or(proto::ServingStatus::Unknown)
        .as_str_name()
        .to_string()
}

#[async_trait]
impl Authn for GrpcClient {
    async fn login_user(&self, user_id: &str, password: &str) -> Result<AccessToken, Error> {
        let resp: proto::LoginUserResponse = unary(
            &self.channel,
            LOGIN_USER,
            proto::LoginUserRequest {
                user_id: user_id.to_string(),
                password: password.to_string(),
            },
            None,
        )
        .await?;
        Ok(AccessToken::from_epoch_secs(
            resp.access_token,
            resp.expiry_time,
        ))
    }

    async fn create_user(
        &self,
        auth: &BearerToken,
        scopes: &[Scope],
    ) -> Result<CreateUserResponse, Error> {
        let resp: proto::CreateUserResponse = unary(
            &self.channel,
            CREATE_USER,
            proto::CreateUserRequest {
                scopes: wire_scopes(scopes),
            },
            Some(auth),
        )
        .await?;
        Ok(CreateUserResponse {
            user_id: resp.user_id,
            password: resp.password,
        })
    }

    async fn remove_user(&self, auth: &BearerToken, user_id: &str) -> Result<(), Error> {
        let _: proto::RemoveUserResponse = unary(
            &self.channel,
            REMOVE_USER,
            proto::RemoveUserRequest {
                user_id: user_id.to_string(),
            },
            Some(auth),
        )
        .await?;
        Ok(())
    }

    async fn create_group(
        &self,
        auth: &BearerToken,
        scopes: &[Scope],
    ) -> Result<CreateGroupResponse, Error> {
        let resp: proto::CreateGroupResponse = unary(
            &self.channel,
            CREATE_GROUP,
            proto::CreateGroupRequest {
                scopes: wire_scopes(scopes),
            },
            Some(auth),
        )
        .await?;
        Ok(CreateGroupResponse {
            group_id: resp.group_id,
        })
    }

    async fn add_user_to_group(
        &self,
        auth: &BearerToken,
        user_id: &str,
        group_id: &str,
    ) -> Result<(), Error> {
        let _: proto::AddUserToGroupResponse = unary(
            &self.channel,
            ADD_USER_TO_GROUP,
            proto::AddUserToGroupRequest {
                user_id: user_id.to_string(),
                group_id: group_id.to_string(),
            },
            Some(auth),
        )
        .await?;
        Ok(())
    }

    async fn remove_user_from_group(
        &self,
        auth: &BearerToken,
        user_id: &str,
        group_id: &str,
    ) -> Result<(), Error> {
        let _: proto::RemoveUserFromGroupResponse = unary(
            &self.channel,
            REMOVE_USER_FROM_GROUP,
            proto::RemoveUserFromGroupRequest {
                user_id: user_id.to_string(),
                group_id: group_id.to_string(),
            },
            Some(auth),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Utility for GrpcClient {
    async fn health(&self) -> Result<HealthResponse, Error> {
        let resp: proto::HealthCheckResponse = unary(
            &self.channel,
            HEALTH_CHECK,
            proto::HealthCheckRequest::default(),
            None,
        )
        .await?;
        Ok(HealthResponse {
            status: health_status(resp.status),
        })
    }

    async fn version(&self, auth: &BearerToken) -> Result<VersionResponse, Error> {
        let resp: proto::VersionResponse =
            unary(&self.channel, VERSION, proto::VersionRequest {}, Some(auth)).await?;
        Ok(VersionResponse {
            commit: resp.commit,
            tag: resp.tag,
        })
    }
}

#[async_trait]
impl Authz for GrpcClient {
    async fn get_permissions(
        &self,
        auth: &BearerToken,
        object_id: &str,
    ) -> Result<GetPermissionsResponse, Error> {
        let resp: proto::GetPermissionsResponse = unary(
            &self.channel,
            GET_PERMISSIONS,
            proto::GetPermissionsRequest {
                object_id: object_id.to_string(),
            },
            Some(auth),
        )
        .await?;
        Ok(GetPermissionsResponse {
            group_ids: resp.group_ids,
        })
    }

    async fn add_permission(
        &self,
        auth: &BearerToken,
        object_id: &str,
        group_id: &str,
    ) -> Result<(), Error> {
        let _: proto::AddPermissionResponse = unary(
            &self.channel,
            ADD_PERMISSION,
            proto::AddPermissionRequest {
                object_id: object_id.to_string(),
                group_id: group_id.to_string(),
            },
            Some(auth),
        )
        .await?;
        Ok(())
    }

    async fn remove_permission(
        &self,
        auth: &BearerToken,
        object_id: &str,
        group_id: &str,
    ) -> Result<(), Error> {
        let _: proto::RemovePermissionResponse = unary(
            &self.channel,
            REMOVE_PERMISSION,
            proto::RemovePermissionRequest {
                object_id: object_id.to_string(),
                group_id: group_id.to_string(),
            },
            Some(auth),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Core for GrpcClient {
    async fn encrypt(
        &self,
        auth: &BearerToken,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<EncryptResponse, Error> {
        let resp: proto::EncryptResponse = unary(
            &self.channel,
            ENCRYPT,
            proto::EncryptRequest {
                plaintext: plaintext.to_vec(),
                associated_data: associated_data.to_vec(),
            },
            Some(auth),
        )
        .await?;
        Ok(EncryptResponse {
            object_id: resp.object_id,
            ciphertext: resp.ciphertext,
            associated_data: resp.associated_data,
        })
    }

    async fn decrypt(
        &self,
        auth: &BearerToken,
        object_id: &str,
        ciphertext: &[u8],
        associated_data: &[u8],
    ) -> Result<DecryptResponse, Error> {
        let resp: proto::DecryptResponse = unary(
            &self.channel,
            DECRYPT,
            proto::DecryptRequest {
                ciphertext: ciphertext.to_vec(),
                associated_data: associated_data.to_vec(),
                object_id: object_id.to_string(),
            },
            Some(auth),
        )
        .await?;
        Ok(DecryptResponse {
            plaintext: resp.plaintext,
            associated_data: resp.associated_data,
        })
    }
}

#[async_trait]
impl Objects for GrpcClient {
    async fn store(
        &self,
        auth: &BearerToken,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<StoreResponse, Error> {
        let resp: proto::StoreResponse = unary(
            &self.channel,
            STORE,
            proto::StoreRequest {
                plaintext: plaintext.to_vec(),
                associated_data: associated_data.to_vec(),
            },
            Some(auth),
        )
        .await?;
        Ok(StoreResponse {
            object_id: resp.object_id,
        })
    }

    async fn retrieve(
        &self,
        auth: &BearerToken,
        object_id: &str,
    ) -> Result<RetrieveResponse, Error> {
        let resp: proto::RetrieveResponse = unary(
            &self.channel,
            RETRIEVE,
            proto::RetrieveRequest {
                object_id: object_id.to_string(),
            },
            Some(auth),
        )
        .await?;
        Ok(RetrieveResponse {
            plaintext: resp.plaintext,
            associated_data: resp.associated_data,
        })
    }

    async fn update(
        &self,
        auth: &BearerToken,
        object_id: &str,
        plaintext: &[u8],
        associated_data: &[u8],
    ) -> Result<(), Error> {
        let _: proto::UpdateResponse = unary(
            &self.channel,
            UPDATE,
            proto::UpdateRequest {
                object_id: object_id.to_string(),
                plaintext: plaintext.to_vec(),
                associated_data: associated_data.to_vec(),
            },
            Some(auth),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, auth: &BearerToken, object_id: &str) -> Result<(), Error> {
        let _: proto::DeleteResponse = unary(
            &self.channel,
            DELETE,
            proto::DeleteRequest {
                object_id: object_id.to_string(),
            },
            Some(auth),
        )
        .await?;
        Ok(())
    }
}

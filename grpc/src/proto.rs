//! Protobuf messages of the D1 services and the key server

// d1.scopes

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Scope {
    Read = 0,
    Create = 1,
    Update = 2,
    Delete = 3,
    Index = 4,
    Objectpermissions = 5,
    Usermanagement = 6,
}

// d1.authn

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LoginUserRequest {
    #[prost(string, tag = "1")]
    pub user_id: String,
    #[prost(string, tag = "2")]
    pub password: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LoginUserResponse {
    #[prost(string, tag = "1")]
    pub access_token: String,
    /// seconds since the unix epoch
    #[prost(int64, tag = "2")]
    pub expiry_time: i64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateUserRequest {
    #[prost(enumeration = "Scope", repeated, tag = "1")]
    pub scopes: Vec<i32>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateUserResponse {
    #[prost(string, tag = "1")]
    pub user_id: String,
    #[prost(string, tag = "2")]
    pub password: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoveUserRequest {
    #[prost(string, tag = "1")]
    pub user_id: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoveUserResponse {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateGroupRequest {
    #[prost(enumeration = "Scope", repeated, tag = "1")]
    pub scopes: Vec<i32>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateGroupResponse {
    #[prost(string, tag = "1")]
    pub group_id: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddUserToGroupRequest {
    #[prost(string, tag = "1")]
    pub user_id: String,
    #[prost(string, tag = "2")]
    pub group_id: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddUserToGroupResponse {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoveUserFromGroupRequest {
    #[prost(string, tag = "1")]
    pub user_id: String,
    #[prost(string, tag = "2")]
    pub group_id: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoveUserFromGroupResponse {}

// d1.authz

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetPermissionsRequest {
    #[prost(string, tag = "1")]
    pub object_id: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetPermissionsResponse {
    #[prost(string, repeated, tag = "1")]
    pub group_ids: Vec<String>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddPermissionRequest {
    #[prost(string, tag = "1")]
    pub object_id: String,
    #[prost(string, tag = "2")]
    pub group_id: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddPermissionResponse {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemovePermissionRequest {
    #[prost(string, tag = "1")]
    pub object_id: String,
    #[prost(string, tag = "2")]
    pub group_id: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemovePermissionResponse {}

// d1.version

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VersionRequest {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VersionResponse {
    #[prost(string, tag = "1")]
    pub commit: String,
    #[prost(string, tag = "2")]
    pub tag: String,
}

// grpc.health.v1

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HealthCheckRequest {
    #[prost(string, tag = "1")]
    pub service: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HealthCheckResponse {
    #[prost(enumeration = "ServingStatus", tag = "1")]
    pub status: i32,
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ServingStatus {
    Unknown = 0,
    Serving = 1,
    NotServing = 2,
    ServiceUnknown = 3,
}

impl ServingStatus {
    /// Name as it appears in the .proto
    pub fn as_str_name(&self) -> &'static str {
        match self {
            ServingStatus::Unknown => "UNKNOWN",
            ServingStatus::Serving => "SERVING",
            ServingStatus::NotServing => "NOT_SERVING",
            ServingStatus::ServiceUnknown => "SERVICE_UNKNOWN",
        }
    }
}

// d1.generic

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EncryptRequest {
    #[prost(bytes, tag = "1")]
    pub plaintext: Vec<u8>,
    #[prost(bytes, tag = "2")]
    pub associated_data: Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EncryptResponse {
    #[prost(bytes, tag = "1")]
    pub ciphertext: Vec<u8>,
    #[prost(bytes, tag = "2")]
    pub associated_data: Vec<u8>,
    #[prost(string, tag = "3")]
    pub object_id: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DecryptRequest {
    #[prost(bytes, tag = "1")]
    pub ciphertext: Vec<u8>,
    #[prost(bytes, tag = "2")]
    pub associated_data: Vec<u8>,
    #[prost(string, tag = "3")]
    pub object_id: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DecryptResponse {
    #[prost(bytes, tag = "1")]
    pub plaintext: Vec<u8>,
    #[prost(bytes, tag = "2")]
    pub associated_data: Vec<u8>,
}

// d1.storage

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StoreRequest {
    #[prost(bytes, tag = "1")]
    pub plaintext: Vec<u8>,
    #[prost(bytes, tag = "2")]
    pub associated_data: Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StoreResponse {
    #[prost(string, tag = "1")]
    pub object_id: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RetrieveRequest {
    #[prost(string, tag = "1")]
    pub object_id: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RetrieveResponse {
    #[prost(bytes, tag = "1")]
    pub plaintext: Vec<u8>,
    #[prost(bytes, tag = "2")]
    pub associated_data: Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateRequest {
    #[prost(string, tag = "1")]
    pub object_id: String,
    #[prost(bytes, tag = "2")]
    pub plaintext: Vec<u8>,
    #[prost(bytes, tag = "3")]
    pub associated_data: Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateResponse {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteRequest {
    #[prost(string, tag = "1")]
    pub object_id: String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteResponse {}

// keyservice

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetKeySetRequest {
    /// KIK id in canonical hyphenated form
    #[prost(string, tag = "1")]
    pub kik_id: String,
    #[prost(bytes, tag = "2")]
    pub nonce: Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetKeySetResponse {
    #[prost(bytes, tag = "1")]
    pub nonce: Vec<u8>,
    #[prost(bytes, tag = "2")]
    pub wrapped_keys: Vec<u8>,
}

//! Request and response values exchanged with the D1 services

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};

/// Permission scope granted to a user or group
#[derive(
    Clone, Copy, Debug, Deserialize, Display, EnumString, Eq, Hash, PartialEq, Serialize,
)]
pub enum Scope {
    #[strum(serialize = "READ")]
    Read,
    #[strum(serialize = "CREATE")]
    Create,
    #[strum(serialize = "UPDATE")]
    Update,
    #[strum(serialize = "DELETE")]
    Delete,
    #[strum(serialize = "INDEX")]
    Index,
    #[strum(serialize = "OBJECTPERMISSIONS")]
    ObjectPermissions,
    #[strum(serialize = "USERMANAGEMENT")]
    UserManagement,
}

impl Scope {
    /// All scopes, in wire enumeration order
    pub const ALL: [Scope; 7] = [
        Scope::Read,
        Scope::Create,
        Scope::Update,
        Scope::Delete,
        Scope::Index,
        Scope::ObjectPermissions,
        Scope::UserManagement,
    ];
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct VersionResponse {
    pub commit: String,
    pub tag: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct HealthResponse {
    /// serving status as reported by the grpc health service, e.g. "SERVING"
    pub status: String,
}

/// Newly created user. The password is only ever returned once, at creation.
#[derive(Clone, Default, Deserialize, PartialEq, Serialize)]
pub struct CreateUserResponse {
    pub user_id: String,
    pub password: String,
}

/// Debug that doesn't print the password
impl fmt::Debug for CreateUserResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserResponse")
            .field("user_id", &self.user_id)
            .finish()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CreateGroupResponse {
    pub group_id: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct EncryptResponse {
    pub object_id: String,
    pub ciphertext: Vec<u8>,
    pub associated_data: Vec<u8>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct DecryptResponse {
    pub plaintext: Vec<u8>,
    pub associated_data: Vec<u8>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct StoreResponse {
    pub object_id: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RetrieveResponse {
    pub plaintext: Vec<u8>,
    pub associated_data: Vec<u8>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GetPermissionsResponse {
    pub group_ids: Vec<String>,
}

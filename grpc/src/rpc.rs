//! Unary call plumbing shared by the service and key server clients

use d1_client::{
    api::is_unauthenticated,
    error::{Error, Result},
    session::{BearerToken, AUTHORIZATION_HEADER},
};
use http::uri::PathAndQuery;
use tonic::{
    client::Grpc, codec::ProstCodec, metadata::MetadataValue, transport::Channel, Code, Request,
    Status,
};

/// Sends one unary request on `path`. If `auth` is given, the bearer token
/// is attached as `authorization` metadata. A token is required exactly when
/// `path` is not in `UNAUTHENTICATED_METHODS`.
pub(crate) async fn unary<Req, Resp>(
    channel: &Channel,
    path: &'static str,
    message: Req,
    auth: Option<&BearerToken>,
) -> Result<Resp, Error>
where
    Req: prost::Message + Send + Sync + 'static,
    Resp: prost::Message + Default + Send + Sync + 'static,
{
    check_auth(path, auth)?;
    let mut grpc = Grpc::new(channel.clone());
    grpc.ready()
        .await
        .map_err(|e| Error::Transport(format!("Service was not ready: {}", e)))?;
    let mut request = Request::new(message);
    if let Some(token) = auth {
        set_bearer(&mut request, token)?;
    }
    let response = grpc
        .unary(request, PathAndQuery::from_static(path), ProstCodec::default())
        .await
        .map_err(status_error)?;
    Ok(response.into_inner())
}

/// Fails, before anything is sent, if a token is given for a method that must
/// be called without one, or missing for a method that needs one
pub(crate) fn check_auth(path: &str, auth: Option<&BearerToken>) -> Result<(), Error> {
    match (is_unauthenticated(path), auth.is_some()) {
        (true, true) => Err(Error::InvalidParameter(format!(
            "{} must be called without a token",
            path
        ))),
        (false, false) => Err(Error::Auth(format!("{} requires a bearer token", path))),
        _ => Ok(()),
    }
}

/// Adds `authorization: bearer <token>` to the request metadata
pub(crate) fn set_bearer<T>(request: &mut Request<T>, token: &BearerToken) -> Result<(), Error> {
    let value = MetadataValue::from_str(&token.header_value())
        .map_err(|_| Error::Auth("access token is not a valid header value".to_string()))?;
    request.metadata_mut().insert(AUTHORIZATION_HEADER, value);
    Ok(())
}

/// Classifies a non-OK status
pub fn status_error(status: Status) -> Error {
    let message = status.message().to_string();
    match status.code() {
        Code::Unauthenticated | Code::PermissionDenied => Error::Auth(message),
        Code::Cancelled | Code::DeadlineExceeded => Error::Cancelled(message),
        Code::Unavailable => Error::Transport(message),
        code => Error::Protocol {
            code: code as i32,
            message,
        },
    }
}

/// Connection setup failure
pub fn transport_error(e: tonic::transport::Error) -> Error {
    Error::Transport(format!("Service error: {}", e))
}

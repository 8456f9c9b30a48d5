use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Failures of the chain node query channel.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("query {path} failed: {message}")]
    Query { path: String, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed rpc response: {0}")]
    Malformed(String),
}

/// Conditions a resolver can end in. None of them is shown to the caller.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unable to connect to rpc client")]
    RpcClientConnection(#[source] UpstreamError),

    #[error("abci query failed")]
    AbciQuery(#[source] UpstreamError),

    #[error("unable to unmarshal response")]
    UnmarshalResponse(#[source] anyhow::Error),

    #[error("unable to marshal response")]
    MarshalResponse(#[source] anyhow::Error),

    #[error("unable to get APR")]
    UnableToGetApr(#[source] anyhow::Error),

    #[error("unable to get total supply")]
    UnableToGetTotalSupply(#[source] anyhow::Error),

    #[error("unable to get locked tokens")]
    UnableToGetLockedTokens(#[source] anyhow::Error),

    #[error("unable to get community pool")]
    UnableToGetCommunityPool(#[source] anyhow::Error),

    #[error("circulating supply underflow")]
    SupplyUnderflow,

    #[error("invalid parameter {name}")]
    InvalidParameter { name: &'static str, value: String },
}

impl ResolveError {
    /// Underlying cause for logs; empty when the condition has none.
    pub fn cause(&self) -> String {
        match self {
            Self::RpcClientConnection(err) | Self::AbciQuery(err) => err.to_string(),
            Self::UnmarshalResponse(err)
            | Self::MarshalResponse(err)
            | Self::UnableToGetApr(err)
            | Self::UnableToGetTotalSupply(err)
            | Self::UnableToGetLockedTokens(err)
            | Self::UnableToGetCommunityPool(err) => format!("{:#}", err),
            Self::SupplyUnderflow => String::new(),
            Self::InvalidParameter { value, .. } => value.clone(),
        }
    }
}

impl ResponseError for ResolveError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = status.canonical_reason().unwrap_or("Error");
        HttpResponse::build(status).json(json!({ "message": message }))
    }
}

use crate::error::UpstreamError;
use async_trait::async_trait;

mod tendermint;

pub use tendermint::{HttpConnector, TendermintChannel};

/// Opens query channels to chain nodes.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, host: &str) -> Result<Box<dyn QueryChannel>, UpstreamError>;
}

/// Request/response query interface of a chain node, addressed by method path.
#[async_trait]
pub trait QueryChannel: Send + Sync {
    async fn query(&self, path: &str, data: Vec<u8>) -> Result<Vec<u8>, UpstreamError>;
}

use crate::error::ResolveError;
use crate::resolver::ResolveContext;
use crate::upstream::QueryChannel;
use actix_web::web::Bytes;
use anyhow::anyhow;
use primitive_types::U256;
use prost::Message;
use serde::Serialize;

const DISPLAY_SCALE: u64 = 1_000_000;

/// Balance of an account outside circulation that no query exposes.
// TODO: replace with an on-chain lookup once the holding address is confirmed.
pub const UNKNOWN_ACCOUNT_OFFSET: u64 = 500_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTarget<'a> {
    /// Node of the chain with this id, through the host template.
    Chain(&'a str),
    /// The node serving interchain-staking queries.
    QueryHost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    None,
    CursorAccumulate,
}

/// How a resource is fetched from a chain node.
#[derive(Debug, Clone, Copy)]
pub struct ResourceQuery<'a> {
    pub method: &'static str,
    pub target: QueryTarget<'a>,
    pub pagination: Pagination,
}

impl<'a> ResourceQuery<'a> {
    pub fn host(&self, ctx: &ResolveContext) -> String {
        match self.target {
            QueryTarget::Chain(chain_id) => ctx.config.chain_host.host_for(chain_id),
            QueryTarget::QueryHost => ctx.config.quick_host.clone(),
        }
    }

    pub async fn connect(&self, ctx: &ResolveContext) -> Result<Box<dyn QueryChannel>, ResolveError> {
        ctx.connector
            .connect(&self.host(ctx))
            .await
            .map_err(ResolveError::RpcClientConnection)
    }

    /// Single request/response call.
    pub async fn fetch<Req, Resp>(&self, ctx: &ResolveContext, request: &Req) -> Result<Resp, ResolveError>
    where
        Req: Message,
        Resp: Message + Default,
    {
        debug_assert_eq!(self.pagination, Pagination::None);
        let channel = self.connect(ctx).await?;
        execute(channel.as_ref(), self.method, request).await
    }
}

pub(crate) async fn execute<Req, Resp>(
    channel: &dyn QueryChannel,
    method: &str,
    request: &Req,
) -> Result<Resp, ResolveError>
where
    Req: Message,
    Resp: Message + Default,
{
    let bytes = channel
        .query(method, request.encode_to_vec())
        .await
        .map_err(ResolveError::AbciQuery)?;

    Resp::decode(bytes.as_slice()).map_err(|err| ResolveError::UnmarshalResponse(err.into()))
}

pub(crate) fn encode_json<T: Serialize>(value: &T) -> Result<Bytes, ResolveError> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(|err| ResolveError::MarshalResponse(err.into()))
}

/// Converts base units to display units, rounding to the nearest `f64`.
pub fn to_display(amount: U256) -> Result<f64, ResolveError> {
    let scale = U256::from(DISPLAY_SCALE);
    let decimal = format!("{}.{:06}", amount / scale, (amount % scale).as_u64());

    decimal
        .parse::<f64>()
        .map_err(|err| ResolveError::MarshalResponse(anyhow!("{}: {}", decimal, err)))
}

pub(crate) fn validate_chain_id(chain_id: &str) -> Result<(), ResolveError> {
    let valid = !chain_id.is_empty()
        && chain_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(ResolveError::InvalidParameter {
            name: "chainId",
            value: chain_id.to_string(),
        })
    }
}

/// Bech32 account addresses are plain ASCII alphanumerics, so the `.` that
/// separates cache key segments can never appear in one.
pub(crate) fn validate_address(address: &str) -> Result<(), ResolveError> {
    if !address.is_empty() && address.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ResolveError::InvalidParameter {
            name: "address",
            value: address.to_string(),
        })
    }
}

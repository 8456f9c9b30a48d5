use crate::cache::CacheKey;
use crate::config::CacheTtls;
use crate::error::ResolveError;
use crate::fetcher::AprResponse;
use crate::resolver::common::encode_json;
use crate::resolver::{ResolveContext, Resolver};
use actix_web::web::Bytes;
use async_trait::async_trait;
use futures::future::try_join_all;
use std::time::Duration;

/// APR of every configured chain, in configuration order.
pub struct Apr;

#[async_trait]
impl Resolver for Apr {
    fn name(&self) -> &'static str {
        "getAPR"
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::Apr
    }

    fn ttl(&self, ttls: &CacheTtls) -> Duration {
        ttls.apr
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Result<Bytes, ResolveError> {
        let fetches = ctx
            .config
            .chains
            .iter()
            .map(|chain| ctx.data.chain_apr(chain));

        // try_join_all yields results in input order whatever order they complete in
        let chains = try_join_all(fetches)
            .await
            .map_err(ResolveError::UnableToGetApr)?;

        encode_json(&AprResponse { chains })
    }
}

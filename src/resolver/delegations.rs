use crate::cache::CacheKey;
use crate::config::CacheTtls;
use crate::error::ResolveError;
use crate::proto::{
    QueryDelegatorDelegationsRequest, QueryDelegatorDelegationsResponse, DELEGATOR_DELEGATIONS_PATH,
};
use crate::resolver::common::{
    encode_json, validate_address, validate_chain_id, Pagination, QueryTarget, ResourceQuery,
};
use crate::resolver::{ResolveContext, Resolver};
use actix_web::web::Bytes;
use async_trait::async_trait;
use std::time::Duration;

/// Current delegations of one delegator on one chain.
pub struct ExistingDelegations {
    chain_id: String,
    address: String,
}

impl ExistingDelegations {
    pub fn new(chain_id: String, address: String) -> Result<Self, ResolveError> {
        validate_chain_id(&chain_id)?;
        validate_address(&address)?;
        Ok(Self { chain_id, address })
    }
}

#[async_trait]
impl Resolver for ExistingDelegations {
    fn name(&self) -> &'static str {
        "getExistingDelegations"
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::ExistingDelegations {
            chain_id: self.chain_id.clone(),
            address: self.address.clone(),
        }
    }

    fn ttl(&self, ttls: &CacheTtls) -> Duration {
        ttls.existing_delegations
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Result<Bytes, ResolveError> {
        let query = ResourceQuery {
            method: DELEGATOR_DELEGATIONS_PATH,
            target: QueryTarget::Chain(&self.chain_id),
            pagination: Pagination::None,
        };
        let request = QueryDelegatorDelegationsRequest {
            delegator_addr: self.address.clone(),
            pagination: None,
        };

        let response: QueryDelegatorDelegationsResponse = query.fetch(ctx, &request).await?;

        encode_json(&response)
    }
}

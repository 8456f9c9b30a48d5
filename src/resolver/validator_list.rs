use crate::cache::CacheKey;
use crate::config::CacheTtls;
use crate::error::ResolveError;
use crate::proto::{PageRequest, QueryValidatorsRequest, QueryValidatorsResponse, VALIDATORS_PATH};
use crate::resolver::common::{encode_json, validate_chain_id, Pagination, QueryTarget, ResourceQuery};
use crate::resolver::pagination::{accumulate, pages};
use crate::resolver::{ResolveContext, Resolver};
use actix_web::web::Bytes;
use async_trait::async_trait;
use std::time::Duration;

/// Every validator of a chain, regardless of bond status.
pub struct ValidatorList {
    chain_id: String,
}

impl ValidatorList {
    pub fn new(chain_id: String) -> Result<Self, ResolveError> {
        validate_chain_id(&chain_id)?;
        Ok(Self { chain_id })
    }

    fn query(&self) -> ResourceQuery<'_> {
        ResourceQuery {
            method: VALIDATORS_PATH,
            target: QueryTarget::Chain(&self.chain_id),
            pagination: Pagination::CursorAccumulate,
        }
    }
}

fn validators_request(pagination: PageRequest) -> QueryValidatorsRequest {
    QueryValidatorsRequest {
        status: String::new(),
        pagination: Some(pagination),
    }
}

#[async_trait]
impl Resolver for ValidatorList {
    fn name(&self) -> &'static str {
        "getValidatorList"
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::ValidatorList {
            chain_id: self.chain_id.clone(),
        }
    }

    fn ttl(&self, ttls: &CacheTtls) -> Duration {
        ttls.validator_list
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Result<Bytes, ResolveError> {
        let query = self.query();
        let channel = query.connect(ctx).await?;

        let response: QueryValidatorsResponse =
            accumulate(pages(channel.as_ref(), query.method, validators_request)).await?;
        tracing::info!(
            "{}: {} validators on {}",
            self.name(),
            response.validators.len(),
            self.chain_id
        );

        encode_json(&response)
    }
}

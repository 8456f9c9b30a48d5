use crate::cache::CacheKey;
use crate::config::CacheTtls;
use crate::error::ResolveError;
use crate::proto::{QueryZonesInfoRequest, QueryZonesInfoResponse, ZONE_INFOS_PATH};
use crate::resolver::common::{encode_json, Pagination, QueryTarget, ResourceQuery};
use crate::resolver::{ResolveContext, Resolver};
use actix_web::web::Bytes;
use async_trait::async_trait;
use std::time::Duration;

const ZONES_QUERY: ResourceQuery<'static> = ResourceQuery {
    method: ZONE_INFOS_PATH,
    target: QueryTarget::QueryHost,
    pagination: Pagination::None,
};

/// Registered interchain-staking zones.
pub struct Zones;

#[async_trait]
impl Resolver for Zones {
    fn name(&self) -> &'static str {
        "getZones"
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::Zones
    }

    fn ttl(&self, ttls: &CacheTtls) -> Duration {
        ttls.zones
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Result<Bytes, ResolveError> {
        let response: QueryZonesInfoResponse = ZONES_QUERY
            .fetch(ctx, &QueryZonesInfoRequest::default())
            .await?;

        encode_json(&response)
    }
}

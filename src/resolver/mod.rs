use crate::cache::CacheKey;
use crate::config::{CacheTtls, Config};
use crate::error::ResolveError;
use crate::fetcher::DataSource;
use crate::upstream::Connector;
use actix_web::web::Bytes;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

mod apr;
mod common;
mod delegations;
mod pagination;
mod supply;
mod validator_list;
mod zones;

pub use apr::Apr;
pub use common::{to_display, Pagination, QueryTarget, ResourceQuery, UNKNOWN_ACCOUNT_OFFSET};
pub use delegations::ExistingDelegations;
pub use pagination::{accumulate, pages, Paged};
pub use supply::{circulating, CirculatingSupply, TotalSupply};
pub use validator_list::ValidatorList;
pub use zones::Zones;

/// Produces a fresh payload for one resource on a cache miss.
///
/// A resolver either returns the complete serialized payload or an error; it
/// never writes to the cache itself.
#[async_trait]
pub trait Resolver: Send + Sync {
    fn name(&self) -> &'static str;

    fn cache_key(&self) -> CacheKey;

    fn ttl(&self, ttls: &CacheTtls) -> Duration;

    async fn resolve(&self, ctx: &ResolveContext) -> Result<Bytes, ResolveError>;
}

/// Upstream collaborators shared by every resolver.
pub struct ResolveContext {
    pub config: Config,
    pub connector: Arc<dyn Connector>,
    pub data: Arc<dyn DataSource>,
}

impl ResolveContext {
    pub fn new(config: Config, connector: Arc<dyn Connector>, data: Arc<dyn DataSource>) -> Self {
        Self {
            config,
            connector,
            data,
        }
    }
}

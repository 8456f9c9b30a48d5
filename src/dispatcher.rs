use crate::cache::TtlCache;
use crate::error::ResolveError;
use crate::resolver::{ResolveContext, Resolver};
use actix_web::web::Bytes;
use std::sync::Arc;

/// Serves resources from the cache, resolving and storing them on a miss.
///
/// Two concurrent misses on the same key both resolve; the last one to finish
/// overwrites the other. Resolution is idempotent so this only costs an extra
/// upstream round trip.
pub struct Dispatcher {
    cache: Arc<TtlCache>,
    ctx: ResolveContext,
}

impl Dispatcher {
    pub fn new(cache: Arc<TtlCache>, ctx: ResolveContext) -> Self {
        Self { cache, ctx }
    }

    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    pub async fn serve(&self, resolver: &dyn Resolver) -> Result<Bytes, ResolveError> {
        let cache_key = resolver.cache_key().to_string();

        if let Some(data) = self.cache.get(&cache_key) {
            tracing::info!("cache hit for {} with key {}", resolver.name(), cache_key);
            return Ok(data);
        }

        tracing::info!("cache missed for {} with key {}", resolver.name(), cache_key);

        let data = resolver.resolve(&self.ctx).await.map_err(|err| {
            tracing::error!("{}: {} - {}", resolver.name(), err, err.cause());
            err
        })?;

        self.cache.set_with_ttl(
            cache_key,
            data.clone(),
            1,
            resolver.ttl(&self.ctx.config.ttls),
        );

        Ok(data)
    }
}

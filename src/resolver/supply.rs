use crate::cache::CacheKey;
use crate::config::CacheTtls;
use crate::error::ResolveError;
use crate::resolver::common::{encode_json, to_display, UNKNOWN_ACCOUNT_OFFSET};
use crate::resolver::{ResolveContext, Resolver};
use actix_web::web::Bytes;
use anyhow::Context;
use async_trait::async_trait;
use futures::future::try_join_all;
use primitive_types::U256;
use std::time::Duration;

pub struct TotalSupply;

pub struct CirculatingSupply;

/// `total - locked - pool - UNKNOWN_ACCOUNT_OFFSET`, failing instead of wrapping.
pub fn circulating(total: U256, locked: U256, community_pool: U256) -> Result<U256, ResolveError> {
    total
        .checked_sub(locked)
        .and_then(|rest| rest.checked_sub(community_pool))
        .and_then(|rest| rest.checked_sub(U256::from(UNKNOWN_ACCOUNT_OFFSET)))
        .ok_or(ResolveError::SupplyUnderflow)
}

#[async_trait]
impl Resolver for TotalSupply {
    fn name(&self) -> &'static str {
        "getTotalSupply"
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::TotalSupply
    }

    fn ttl(&self, ttls: &CacheTtls) -> Duration {
        ttls.supply
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Result<Bytes, ResolveError> {
        let total_supply = ctx
            .data
            .total_supply()
            .await
            .map_err(ResolveError::UnableToGetTotalSupply)?;
        tracing::info!("totalSupply -> {}", total_supply);

        encode_json(&to_display(total_supply)?)
    }
}

impl CirculatingSupply {
    async fn locked_tokens(&self, ctx: &ResolveContext) -> Result<U256, ResolveError> {
        let fetches = ctx.config.vesting_accounts.iter().map(|address| async move {
            let locked = ctx
                .data
                .locked_tokens(address)
                .await
                .with_context(|| format!("account {}", address))?;
            tracing::info!("lockedTokensFor {} -> {}", address, locked);
            Ok::<_, anyhow::Error>(locked)
        });

        let locked = try_join_all(fetches)
            .await
            .map_err(ResolveError::UnableToGetLockedTokens)?;

        locked.into_iter().try_fold(U256::zero(), |sum, amount| {
            sum.checked_add(amount).ok_or_else(|| {
                ResolveError::UnableToGetLockedTokens(anyhow::anyhow!("locked token sum overflow"))
            })
        })
    }
}

#[async_trait]
impl Resolver for CirculatingSupply {
    fn name(&self) -> &'static str {
        "getCirculatingSupply"
    }

    fn cache_key(&self) -> CacheKey {
        CacheKey::CirculatingSupply
    }

    fn ttl(&self, ttls: &CacheTtls) -> Duration {
        ttls.supply
    }

    async fn resolve(&self, ctx: &ResolveContext) -> Result<Bytes, ResolveError> {
        let total_supply = async {
            ctx.data
                .total_supply()
                .await
                .map_err(ResolveError::UnableToGetTotalSupply)
        };
        let community_pool = async {
            ctx.data
                .community_pool()
                .await
                .map_err(ResolveError::UnableToGetCommunityPool)
        };

        // all three stages must succeed, partial figures are dropped
        let (locked, total_supply, community_pool) =
            futures::try_join!(self.locked_tokens(ctx), total_supply, community_pool)?;
        tracing::info!("totalSupply -> {}", total_supply);
        tracing::info!("communityPoolBalance -> {}", community_pool);

        let circulating_supply = circulating(total_supply, locked, community_pool)?;

        encode_json(&to_display(circulating_supply)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circulating_subtracts_every_excluded_balance() {
        let total = U256::from(1_000_000_000_000_000u64);
        let locked = U256::from(100_000_000_000_000u64);
        let pool = U256::from(50_000_000_000_000u64);

        assert_eq!(
            circulating(total, locked, pool).unwrap(),
            U256::from(849_500_000_000_000u64)
        );
    }

    #[test]
    fn circulating_underflow_is_an_error() {
        let result = circulating(U256::from(10u64), U256::from(5u64), U256::zero());
        assert!(matches!(result, Err(ResolveError::SupplyUnderflow)));
    }
}

use anyhow::Result;
use async_trait::async_trait;
use primitive_types::U256;
use serde::Serialize;

mod rest;
pub mod vesting;

pub use rest::RestDataSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainApr {
    pub chain_id: String,
    pub apr: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AprResponse {
    pub chains: Vec<ChainApr>,
}

/// Auxiliary JSON data sources: the APR oracle and the ledger REST endpoints.
///
/// Amounts are base units of the configured denom.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn chain_apr(&self, chain: &str) -> Result<ChainApr>;

    async fn total_supply(&self) -> Result<U256>;

    /// Still-vesting amount held by `address` right now.
    async fn locked_tokens(&self, address: &str) -> Result<U256>;

    async fn community_pool(&self) -> Result<U256>;
}

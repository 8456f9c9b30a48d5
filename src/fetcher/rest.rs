use crate::fetcher::vesting::{parse_amount, parse_dec_amount, AccountResponse, AmountCoin};
use crate::fetcher::{ChainApr, DataSource};
use anyhow::{ensure, Context, Result};
use async_trait::async_trait;
use primitive_types::U256;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Fetches from the ledger REST (LCD) endpoint and the APR directory.
pub struct RestDataSource {
    client: Client,
    lcd_endpoint: Url,
    apr_url: Url,
    denom: String,
}

#[derive(Deserialize)]
struct DirectoryChain {
    chain: DirectoryChainInfo,
}

#[derive(Deserialize)]
struct DirectoryChainInfo {
    chain_id: String,
    params: DirectoryChainParams,
}

#[derive(Deserialize)]
struct DirectoryChainParams {
    calculated_apr: f64,
}

#[derive(Deserialize)]
struct SupplyOfResponse {
    amount: AmountCoin,
}

#[derive(Deserialize)]
struct CommunityPoolResponse {
    pool: Vec<AmountCoin>,
}

impl RestDataSource {
    pub fn new(lcd_endpoint: Url, apr_url: Url, denom: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            client,
            lcd_endpoint,
            apr_url,
            denom,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let result = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?
            .error_for_status()?
            .json::<T>()
            .await
            .with_context(|| format!("unexpected response from {}", url))?;

        Ok(result)
    }

    fn lcd_url(&self, path: &str) -> Result<Url> {
        join_path(&self.lcd_endpoint, path)
    }

    /// The full supply listing is paginated, so the denom is asked for directly.
    fn supply_url(&self) -> Result<Url> {
        let mut url = self.lcd_url("cosmos/bank/v1beta1/supply/by_denom")?;
        url.query_pairs_mut().append_pair("denom", &self.denom);
        Ok(url)
    }
}

fn supply_amount(coin: &AmountCoin, denom: &str) -> Result<U256> {
    ensure!(
        coin.denom == denom,
        "denom {} not found in supply, got {:?}",
        denom,
        coin.denom
    );
    parse_amount(&coin.amount)
}

/// Appends `path` to `base`, keeping any path prefix `base` already has.
fn join_path(base: &Url, path: &str) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).with_context(|| format!("invalid url {}", joined))
}

#[async_trait]
impl DataSource for RestDataSource {
    async fn chain_apr(&self, chain: &str) -> Result<ChainApr> {
        let url = join_path(&self.apr_url, chain)?;
        let response = self.get_json::<DirectoryChain>(url).await?;

        Ok(ChainApr {
            chain_id: response.chain.chain_id,
            apr: response.chain.params.calculated_apr,
        })
    }

    async fn total_supply(&self) -> Result<U256> {
        let url = self.supply_url()?;
        let response = self.get_json::<SupplyOfResponse>(url).await?;

        supply_amount(&response.amount, &self.denom)
    }

    async fn locked_tokens(&self, address: &str) -> Result<U256> {
        let url = self.lcd_url(&format!("cosmos/auth/v1beta1/accounts/{}", address))?;
        let response = self.get_json::<AccountResponse>(url).await?;

        response
            .account
            .locked_at(&self.denom, chrono::Utc::now().timestamp())
    }

    async fn community_pool(&self) -> Result<U256> {
        let url = self.lcd_url("cosmos/distribution/v1beta1/community_pool")?;
        let response = self.get_json::<CommunityPoolResponse>(url).await?;

        match response.pool.iter().find(|coin| coin.denom == self.denom) {
            Some(coin) => parse_dec_amount(&coin.amount),
            None => Ok(U256::zero()),
        }
    }
}

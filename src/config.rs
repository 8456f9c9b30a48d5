use crate::cli::Cli;
use anyhow::{ensure, Context, Result};
use reqwest::Url;
use std::time::Duration;

const CHAIN_ID_PLACEHOLDER: &str = "{chain_id}";

/// RPC host pattern with a `{chain_id}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTemplate(String);

impl HostTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        ensure!(
            template.contains(CHAIN_ID_PLACEHOLDER),
            "host template {} does not contain {}",
            template,
            CHAIN_ID_PLACEHOLDER
        );
        Ok(Self(template))
    }

    pub fn host_for(&self, chain_id: &str) -> String {
        self.0.replace(CHAIN_ID_PLACEHOLDER, chain_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheTtls {
    pub validator_list: Duration,
    pub existing_delegations: Duration,
    pub zones: Duration,
    pub apr: Duration,
    pub supply: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            validator_list: Duration::from_secs(60 * 60),
            existing_delegations: Duration::from_secs(2 * 60),
            zones: Duration::from_secs(60),
            apr: Duration::from_secs(60 * 60),
            supply: Duration::from_secs(60 * 60),
        }
    }
}

/// Immutable runtime configuration, built once from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub chain_host: HostTemplate,
    pub quick_host: String,
    pub lcd_endpoint: Url,
    pub apr_url: Url,
    pub chains: Vec<String>,
    pub denom: String,
    pub vesting_accounts: Vec<String>,
    pub ttls: CacheTtls,
    pub cache_capacity: i64,
    pub rpc_timeout: Duration,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let lcd_endpoint = Url::parse(&cli.lcd_endpoint)
            .with_context(|| format!("invalid lcd endpoint {}", cli.lcd_endpoint))?;
        let apr_url = Url::parse(&cli.apr_url)
            .with_context(|| format!("invalid apr url {}", cli.apr_url))?;

        let apr = cli
            .apr_cache_minutes
            .checked_mul(60)
            .context("apr cache duration is too large")?;
        let supply = cli
            .supply_cache_hours
            .checked_mul(60 * 60)
            .context("supply cache duration is too large")?;

        Ok(Self {
            chain_host: HostTemplate::new(cli.chain_host.clone())?,
            quick_host: cli.quick_host.clone(),
            lcd_endpoint,
            apr_url,
            chains: non_empty(&cli.chains),
            denom: cli.denom.clone(),
            vesting_accounts: non_empty(&cli.vesting_accounts),
            ttls: CacheTtls {
                validator_list: Duration::from_secs(cli.validator_list_ttl_secs),
                existing_delegations: Duration::from_secs(cli.delegations_ttl_secs),
                zones: Duration::from_secs(cli.zones_ttl_secs),
                apr: Duration::from_secs(apr),
                supply: Duration::from_secs(supply),
            },
            cache_capacity: cli.cache_capacity,
            rpc_timeout: Duration::from_secs(cli.rpc_timeout_secs),
            http_timeout: Duration::from_secs(cli.http_timeout_secs),
        })
    }
}

fn non_empty(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

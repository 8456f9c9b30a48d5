#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use cached_cosmos_rpc::config::{CacheTtls, Config, HostTemplate};
use cached_cosmos_rpc::dispatcher::Dispatcher;
use cached_cosmos_rpc::error::UpstreamError;
use cached_cosmos_rpc::fetcher::{ChainApr, DataSource};
use cached_cosmos_rpc::proto::{
    Coin, Delegation, DelegationResponse, PageResponse, QueryDelegatorDelegationsRequest,
    QueryDelegatorDelegationsResponse, QueryValidatorsRequest, QueryValidatorsResponse,
    QueryZonesInfoResponse, Validator, Zone, DELEGATOR_DELEGATIONS_PATH, VALIDATORS_PATH,
    ZONE_INFOS_PATH,
};
use cached_cosmos_rpc::resolver::ResolveContext;
use cached_cosmos_rpc::upstream::{Connector, QueryChannel};
use cached_cosmos_rpc::TtlCache;
use primitive_types::U256;
use prost::Message;
use reqwest::Url;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Handler = Box<dyn Fn(&[u8]) -> Result<Vec<u8>, UpstreamError> + Send + Sync>;

/// Chain node double answering queries by method path.
#[derive(Default)]
pub struct MockNode {
    handlers: HashMap<&'static str, Handler>,
    refuse_connections: bool,
    connections: Mutex<Vec<String>>,
    queries: Mutex<Vec<(String, String)>>,
}

impl MockNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing() -> Self {
        Self {
            refuse_connections: true,
            ..Default::default()
        }
    }

    pub fn with_handler(
        mut self,
        method: &'static str,
        handler: impl Fn(&[u8]) -> Result<Vec<u8>, UpstreamError> + Send + Sync + 'static,
    ) -> Self {
        self.handlers.insert(method, Box::new(handler));
        self
    }

    /// Serves `validators` split into pages of `page_size`, keyed `page-<n>`.
    pub fn with_validator_pages(self, validators: Vec<Validator>, page_size: usize) -> Self {
        let total = validators.len() as u64;
        let pages = validators
            .chunks(page_size)
            .map(|chunk| chunk.to_vec())
            .collect::<Vec<_>>();

        self.with_handler(VALIDATORS_PATH, move |request| {
            let request = QueryValidatorsRequest::decode(request)
                .map_err(|err| UpstreamError::Malformed(err.to_string()))?;
            let pagination = request.pagination.unwrap_or_default();
            let index = if pagination.key.is_empty() {
                0
            } else {
                String::from_utf8_lossy(&pagination.key)
                    .trim_start_matches("page-")
                    .parse::<usize>()
                    .map_err(|err| UpstreamError::Malformed(err.to_string()))?
            };

            let next_key = if index + 1 < pages.len() {
                format!("page-{}", index + 1).into_bytes()
            } else {
                Vec::new()
            };

            Ok(QueryValidatorsResponse {
                validators: pages[index].clone(),
                pagination: Some(PageResponse {
                    next_key,
                    // key-based pages are not counted, like the real node
                    total: if pagination.count_total { total } else { 0 },
                }),
            }
            .encode_to_vec())
        })
    }

    /// Answers with one delegation whose delegator is the requested address.
    pub fn with_delegations(self) -> Self {
        self.with_handler(DELEGATOR_DELEGATIONS_PATH, |request| {
            let request = QueryDelegatorDelegationsRequest::decode(request)
                .map_err(|err| UpstreamError::Malformed(err.to_string()))?;

            Ok(QueryDelegatorDelegationsResponse {
                delegation_responses: vec![DelegationResponse {
                    delegation: Some(Delegation {
                        delegator_address: request.delegator_addr.clone(),
                        validator_address: "cosmosvaloper1abc".to_string(),
                        shares: "1000.000000000000000000".to_string(),
                    }),
                    balance: Some(Coin {
                        denom: "uatom".to_string(),
                        amount: "1000".to_string(),
                    }),
                }],
                pagination: None,
            }
            .encode_to_vec())
        })
    }

    pub fn with_zones(self, chain_ids: &[&str]) -> Self {
        let response = QueryZonesInfoResponse {
            zones: chain_ids
                .iter()
                .map(|chain_id| Zone {
                    chain_id: chain_id.to_string(),
                    redemption_rate: "1.000000000000000000".to_string(),
                    ..Default::default()
                })
                .collect(),
            pagination: None,
        };
        self.with_handler(ZONE_INFOS_PATH, move |_| Ok(response.encode_to_vec()))
    }

    pub fn query_count(&self, method: &str) -> usize {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, path)| path == method)
            .count()
    }

    pub fn queried_hosts(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|(host, _)| host.clone())
            .collect()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().unwrap().len()
    }
}

pub struct MockConnector(pub Arc<MockNode>);

struct MockChannel {
    host: String,
    node: Arc<MockNode>,
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, host: &str) -> Result<Box<dyn QueryChannel>, UpstreamError> {
        self.0.connections.lock().unwrap().push(host.to_string());
        if self.0.refuse_connections {
            return Err(UpstreamError::Connection(format!("{} refused", host)));
        }

        Ok(Box::new(MockChannel {
            host: host.to_string(),
            node: self.0.clone(),
        }))
    }
}

#[async_trait]
impl QueryChannel for MockChannel {
    async fn query(&self, path: &str, data: Vec<u8>) -> Result<Vec<u8>, UpstreamError> {
        self.node
            .queries
            .lock()
            .unwrap()
            .push((self.host.clone(), path.to_string()));

        match self.node.handlers.get(path) {
            Some(handler) => handler(&data),
            None => Err(UpstreamError::Query {
                path: path.to_string(),
                message: "unknown query path".to_string(),
            }),
        }
    }
}

/// Data source double with per-call counters and switchable failures.
#[derive(Default)]
pub struct MockData {
    pub aprs: HashMap<String, (f64, Duration)>,
    pub total_supply: U256,
    pub locked: HashMap<String, U256>,
    pub community_pool: U256,
    pub fail_community_pool: AtomicBool,
    pub apr_calls: AtomicUsize,
    pub total_supply_calls: AtomicUsize,
    pub locked_calls: AtomicUsize,
    pub community_pool_calls: AtomicUsize,
}

impl MockData {
    pub fn with_apr(mut self, chain: &str, apr: f64, delay: Duration) -> Self {
        self.aprs.insert(chain.to_string(), (apr, delay));
        self
    }

    pub fn with_supply(mut self, total_supply: u64, community_pool: u64) -> Self {
        self.total_supply = U256::from(total_supply);
        self.community_pool = U256::from(community_pool);
        self
    }

    pub fn with_locked(mut self, address: &str, amount: u64) -> Self {
        self.locked.insert(address.to_string(), U256::from(amount));
        self
    }
}

#[async_trait]
impl DataSource for MockData {
    async fn chain_apr(&self, chain: &str) -> Result<ChainApr> {
        self.apr_calls.fetch_add(1, Ordering::SeqCst);
        let Some((apr, delay)) = self.aprs.get(chain) else {
            bail!("no apr for {}", chain);
        };
        actix_web::rt::time::sleep(*delay).await;

        Ok(ChainApr {
            chain_id: format!("{}-1", chain),
            apr: *apr,
        })
    }

    async fn total_supply(&self) -> Result<U256> {
        self.total_supply_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.total_supply)
    }

    async fn locked_tokens(&self, address: &str) -> Result<U256> {
        self.locked_calls.fetch_add(1, Ordering::SeqCst);
        match self.locked.get(address) {
            Some(amount) => Ok(*amount),
            None => bail!("unknown account {}", address),
        }
    }

    async fn community_pool(&self) -> Result<U256> {
        self.community_pool_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_community_pool.load(Ordering::SeqCst) {
            bail!("community pool unavailable");
        }
        Ok(self.community_pool)
    }
}

pub fn test_config() -> Config {
    Config {
        chain_host: HostTemplate::new("http://{chain_id}.node.test:26657").unwrap(),
        quick_host: "http://quicksilver.node.test:26657".to_string(),
        lcd_endpoint: Url::parse("http://lcd.test").unwrap(),
        apr_url: Url::parse("http://apr.test").unwrap(),
        chains: Vec::new(),
        denom: "uqck".to_string(),
        vesting_accounts: Vec::new(),
        ttls: CacheTtls::default(),
        cache_capacity: 1_000,
        rpc_timeout: Duration::from_secs(30),
        http_timeout: Duration::from_secs(30),
    }
}

pub fn dispatcher(config: Config, node: Arc<MockNode>, data: Arc<MockData>) -> Dispatcher {
    let cache = Arc::new(TtlCache::new(config.cache_capacity));
    let ctx = ResolveContext::new(config, Arc::new(MockConnector(node)), data);
    Dispatcher::new(cache, ctx)
}

pub fn validators(count: usize) -> Vec<Validator> {
    (0..count)
        .map(|i| Validator {
            operator_address: format!("cosmosvaloper1{:04}", i),
            tokens: (1_000 * (i + 1)).to_string(),
            ..Default::default()
        })
        .collect()
}

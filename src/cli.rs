use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Caching gateway for Cosmos chain metrics")]
pub struct Cli {
    #[arg(long, env = "BIND", default_value = "0.0.0.0")]
    pub bind: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// RPC host template, `{chain_id}` is replaced by the requested chain
    #[arg(
        long,
        env = "CHAIN_HOST",
        default_value = "https://rpc.{chain_id}.quicksilver.zone:443"
    )]
    pub chain_host: String,

    /// RPC host of the chain serving interchain-staking queries
    #[arg(long, env = "QUICK_HOST", default_value = "https://rpc.quicksilver.zone:443")]
    pub quick_host: String,

    #[arg(long, env = "LCD_ENDPOINT", default_value = "https://lcd.quicksilver.zone")]
    pub lcd_endpoint: String,

    #[arg(long, env = "APR_URL", default_value = "https://chains.cosmos.directory")]
    pub apr_url: String,

    #[arg(
        long,
        env = "CHAINS",
        value_delimiter = ',',
        default_value = "cosmoshub,osmosis,stargaze,juno,regen,sommelier"
    )]
    pub chains: Vec<String>,

    #[arg(long, env = "DENOM", default_value = "uqck")]
    pub denom: String,

    /// Accounts whose still-vesting balance is excluded from circulating supply
    #[arg(long, env = "VESTING_ACCOUNTS", value_delimiter = ',')]
    pub vesting_accounts: Vec<String>,

    #[arg(long, env = "APR_CACHE_MINUTES", default_value_t = 60)]
    pub apr_cache_minutes: u64,

    #[arg(long, env = "SUPPLY_CACHE_HOURS", default_value_t = 1)]
    pub supply_cache_hours: u64,

    #[arg(long, default_value_t = 3600)]
    pub validator_list_ttl_secs: u64,

    #[arg(long, default_value_t = 120)]
    pub delegations_ttl_secs: u64,

    #[arg(long, default_value_t = 60)]
    pub zones_ttl_secs: u64,

    #[arg(long, env = "CACHE_CAPACITY", default_value_t = 10_000)]
    pub cache_capacity: i64,

    #[arg(long, default_value_t = 30)]
    pub rpc_timeout_secs: u64,

    #[arg(long, default_value_t = 30)]
    pub http_timeout_secs: u64,
}

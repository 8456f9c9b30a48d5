use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use cached_cosmos_rpc::cli::Cli;
use cached_cosmos_rpc::config::Config;
use cached_cosmos_rpc::dispatcher::Dispatcher;
use cached_cosmos_rpc::fetcher::RestDataSource;
use cached_cosmos_rpc::resolver::ResolveContext;
use cached_cosmos_rpc::server;
use cached_cosmos_rpc::upstream::HttpConnector;
use cached_cosmos_rpc::TtlCache;
use clap::Parser;
use env_logger::Env;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> Result<()> {
    let arg = Cli::parse();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_cli(&arg)?;

    let data_source = RestDataSource::new(
        config.lcd_endpoint.clone(),
        config.apr_url.clone(),
        config.denom.clone(),
        config.http_timeout,
    )?;
    let connector = HttpConnector::new(config.rpc_timeout);

    tracing::info!("Provisioning cache with capacity {}", config.cache_capacity);
    let cache = Arc::new(TtlCache::new(config.cache_capacity));

    tracing::info!("Chains: {}", config.chains.join(","));
    tracing::info!("Vesting accounts: {}", config.vesting_accounts.len());

    let ctx = ResolveContext::new(config, Arc::new(connector), Arc::new(data_source));
    let app_state = web::Data::new(Dispatcher::new(cache, ctx));

    tracing::info!("Server listening on {}:{}", arg.bind, arg.port);

    {
        let app_state = app_state.clone();
        HttpServer::new(move || App::new().configure(server::configure).app_data(app_state.clone()))
            .bind((arg.bind.as_str(), arg.port))
            .with_context(|| format!("failed to bind {}:{}", arg.bind, arg.port))?
            .run()
            .await?;
    }

    tracing::info!("Server stopped");

    Ok(())
}

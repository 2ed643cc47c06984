mod api;
mod cache;
mod cli;
mod config;
mod core;
mod error;
mod prelude;
mod quantity;
mod store;
mod tables;

use chrono::Utc;
use clap::{Parser, crate_version};

use crate::{
    api::{client, elering, wallbox},
    cache::PriceCache,
    cli::Args,
    config::Config,
    core::engine::Engine,
    prelude::*,
    store::FileStore,
    tables::build_window_table,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let config = Config::read_from(&args.config_path)?;
    let http_client = client::try_new(args.accepts_invalid_certs)?;
    let store = FileStore::try_new(&args.cache_dir).await?;

    let price_source =
        elering::Api::new(http_client.clone(), args.elering_url.clone(), config.prices.region);
    let prices = PriceCache::new(&store, &price_source, &config.prices);
    let charger = wallbox::Api::authenticate(
        http_client.clone(),
        args.wallbox.base_url.clone(),
        &store,
        &args.wallbox.credentials(),
        args.wallbox.device_id.clone(),
    )
    .await?;

    let cycle = Engine::builder()
        .config(&config.prices)
        .prices(&prices)
        .charger(&charger)
        .scout(args.scout)
        .build()
        .run(Utc::now())
        .await?;
    println!("{}", build_window_table(&cycle, config.prices.market_timezone));

    args.heartbeat.send(&http_client).await;
    info!(
        current_price = %cycle.current_price,
        min_price = %cycle.min_price,
        desired_price = %cycle.desired_price,
        state = %cycle.state,
        action = ?cycle.action,
        "done!",
    );
    Ok(())
}

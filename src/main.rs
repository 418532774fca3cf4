//! Demo mint driver.
//!
//! Replays the production deploy-and-mint flow entirely in-process:
//!
//! 1. Create and fund a subscription on the oracle simulator.
//! 2. Register the mint engine as a consumer.
//! 3. Request `NUM_MINTS` paid mints and fulfill each one synchronously.
//! 4. Log every completed mint and dump a metrics summary.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use random_mint::config::AppConfig;
use random_mint::metrics::Metrics;
use random_mint::{AccountId, BreedTable, MintEngine, OracleSimulator, StaticUriPublisher};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_ansi(true)
        .init();

    let config = AppConfig::from_env()?;

    info!(
        mint_fee = config.mint_fee,
        base_fee = config.base_fee,
        num_mints = config.num_mints,
        "Starting mint demo"
    );

    let simulator = Arc::new(OracleSimulator::new(
        config.hmac_secret.clone(),
        config.base_fee,
    ));

    let subscription_id = simulator.create_subscription();
    simulator.fund_subscription(subscription_id, config.fund_amount)?;

    let publisher = if config.token_uris.is_empty() {
        StaticUriPublisher::default()
    } else {
        StaticUriPublisher::new(config.token_uris.clone())
    };

    let engine = MintEngine::new(
        AccountId::from("random-mint-engine"),
        subscription_id,
        config.mint_fee,
        BreedTable::default(),
        simulator.clone(),
        publisher,
    );
    simulator.add_consumer(subscription_id, AccountId::from("random-mint-engine"))?;

    let metrics = Arc::new(Metrics::new());

    for i in 0..config.num_mints {
        let minter = AccountId::new(format!("minter-{i}"));
        let request_id = engine.request_mint(config.mint_fee, minter.clone())?;
        metrics.record_request();

        match simulator.fulfill_random_words(request_id, &engine) {
            Ok(()) => metrics.record_mint(),
            Err(e) => {
                metrics.record_failure();
                error!(request_id, minter = %minter, error = %e, "Mint failed");
            }
        }
    }

    for mint in engine.mints() {
        info!(
            token_index = mint.token_index,
            owner = %mint.owner,
            breed = %mint.breed,
            uri = %mint.uri,
            "Minted"
        );
    }

    if let Some(subscription) = simulator.subscription(subscription_id) {
        info!(
            subscription_id,
            balance = subscription.balance,
            req_count = subscription.req_count,
            "Subscription after run"
        );
    }

    info!(summary = %metrics.to_json(), "Mint demo finished");
    Ok(())
}

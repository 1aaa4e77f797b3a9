//! Replay a CSV bar feed through the dispatch core.

use crate::cli::RunArgs;
use crate::feed::BarFeed;
use crate::setup_logging;
use anyhow::Result;
use marketflow_broker::PaperBroker;
use marketflow_config::load_config;
use marketflow_core::traits::{Broker, Trader};
use marketflow_core::types::Security;
use marketflow_dispatch::{AssetDispatcher, WorkerPool};
use marketflow_traders::{LiveTrader, LogTrader};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub async fn run(
    args: RunArgs,
    config_path: &Path,
    log_level: Option<&str>,
    json_logs: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    config.validate()?;

    let level = log_level.unwrap_or(&config.logging.level);
    setup_logging(level, json_logs || config.logging.json);

    let securities: Vec<Security> = config.market.securities.iter().map(Security::from).collect();
    let feed = BarFeed::load(&args.data, &securities)?;

    let broker: Arc<dyn Broker> = Arc::new(PaperBroker::default());
    let pool = WorkerPool::new(config.dispatch.max_workers);

    let trader_config = config.trader.clone();
    let dry_run = args.dry_run;
    let dispatcher = AssetDispatcher::new(
        Arc::clone(&broker),
        pool,
        config.dispatch.queue_depth,
        move |broker, security| -> Box<dyn Trader> {
            if dry_run {
                Box::new(
                    LogTrader::new(
                        broker,
                        security,
                        trader_config.slow_length,
                        trader_config.stochastic_length,
                    )
                    .expect("trader config validated at startup"),
                )
            } else {
                Box::new(
                    LiveTrader::new(broker, security, trader_config.clone())
                        .expect("trader config validated at startup"),
                )
            }
        },
    );

    for security in &securities {
        dispatcher.register_asset(security.clone())?;
    }

    let (history, live) = feed.split_lookback(config.market.history_lookback_bars);
    info!(bars = history.len(), "replaying historical batch");
    for (_, prices) in history {
        dispatcher.broadcast_history(prices.clone()).await?;
    }

    info!(bars = live.len(), period = %config.market.bar_period, "streaming live bars");
    for (_, prices) in live {
        dispatcher.broadcast_bar(prices.clone()).await?;
    }

    dispatcher.stop_all().await?;
    broker.stop_brokers();
    info!("session complete");
    Ok(())
}

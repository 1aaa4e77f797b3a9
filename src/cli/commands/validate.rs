//! Validate configuration command.

use anyhow::Result;
use marketflow_config::load_config;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path).map_err(anyhow::Error::from).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Bar period: {}", config.market.bar_period);
            println!("History lookback: {} bars", config.market.history_lookback_bars);
            println!(
                "Securities: {}",
                config
                    .market
                    .securities
                    .iter()
                    .map(|s| s.symbol.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!("Max workers: {}", config.dispatch.max_workers);
            println!("Queue depth: {}", config.dispatch.queue_depth);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e);
        }
    }

    Ok(())
}

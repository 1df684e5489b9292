//! # FlexOrder demo
//!
//! Runs the showcase checkouts through the facade and prints each result.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: point at a config file (defaults to config/checkout.toml)
//! export FLEXORDER_CONFIG=config/checkout.toml
//!
//! # Optional: JSON logs
//! export LOG_FORMAT=json
//!
//! flexorder-demo
//! ```

use flex_core::{CheckoutFacade, CheckoutStatus};
use flex_demo::{scenarios, settings::DemoSettings};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    let settings = DemoSettings::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(settings.log_json.then(|| fmt::layer().json()))
        .with((!settings.log_json).then(|| fmt::layer()))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let config = settings.load_checkout_config()?;
    info!("Currency: {}", config.currency);

    let facade = CheckoutFacade::new();
    let results = scenarios::run_all(&config, &facade)?;

    let mut approved = 0;
    for (title, result) in &results {
        println!("\n=== {} ===", title);
        println!("{}", serde_json::to_string_pretty(result)?);
        match result.status {
            CheckoutStatus::Success => approved += 1,
            CheckoutStatus::Failed => warn!("{} failed: {:?}", title, result.failure),
        }
    }

    info!("{}/{} checkouts approved", approved, results.len());
    Ok(())
}

fn print_banner() {
    println!(
        r#"
  FlexOrder checkout
  ━━━━━━━━━━━━━━━━━━
  Strategy + Decorator + Facade
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}

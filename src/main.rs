mod browser;
mod config;
mod error;
mod export;
mod normalize;
mod pipeline;
mod scrape;
mod state;
mod types;
mod worker;

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() {
    let cfg = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = pipeline::run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

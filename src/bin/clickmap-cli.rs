use anyhow::{Context, Result};
use clap::Parser;
use clickmap::config::Config;
use clickmap::metrics::MetricsPipeline;
use clickmap::upstream::HttpGateway;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clickmap-cli")]
#[command(about = "Print average daily clicks per country for a group's bitlinks", long_about = None)]
struct Cli {
    /// Upstream API access token
    #[arg(long, env = "BITLY_ACCESS_TOKEN", hide_env_values = true)]
    token: String,

    /// Only report this country (case-insensitive)
    #[arg(long)]
    country: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clickmap=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let gateway = Arc::new(HttpGateway::from_config(&config.upstream)?);
    let pipeline = MetricsPipeline::from_config(gateway, &config);

    let metrics = pipeline
        .get_metrics(&cli.token, cli.country.as_deref())
        .await
        .context("failed to aggregate click metrics")?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&metrics)?
    } else {
        serde_json::to_string(&metrics)?
    };
    println!("{}", output);

    Ok(())
}

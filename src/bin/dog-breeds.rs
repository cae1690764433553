//! Dog Breeds - command line lookup tool

use anyhow::Result;
use clap::Parser;
use dog_breeds::{
    BreedProvider, CacheStats, CachingBreedProvider, ClientConfig, DogApiBreedProvider,
};
use serde::Serialize;
use std::io::Write;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dog-breeds")]
#[command(about = "Look up dog sub-breeds through a caching dog.ceo client")]
#[command(version)]
struct Cli {
    /// Breed names to look up, in order
    #[arg(required = true)]
    breeds: Vec<String>,

    /// Look the whole list up this many times
    #[arg(long, default_value = "1")]
    repeat: usize,

    /// Base URL of the breeds API
    #[arg(long, default_value = dog_breeds::config::DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print results as JSON lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.api_base_url.clone(),
            request_timeout_secs: self.timeout_secs,
            log_level: self.log_level.clone(),
            ..ClientConfig::default()
        }
    }
}

#[derive(Serialize)]
struct LookupReport<'a> {
    breed: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_breeds: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.client_config();

    // Logs go to stderr so results on stdout stay machine readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .init();

    info!("Starting dog-breeds v{}", dog_breeds::VERSION);

    let provider = CachingBreedProvider::new(DogApiBreedProvider::with_config(&config)?);

    let shutdown_signal = async {
        match signal::ctrl_c().await {
            Ok(_) => info!("Received Ctrl+C, stopping lookups..."),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }
    };

    let mut stdout = std::io::stdout();
    tokio::select! {
        result = run_lookups(&provider, &cli, &mut stdout) => result?,
        _ = shutdown_signal => {}
    }

    let stats = provider.stats().await;
    write_summary(&mut stdout, provider.calls_made(), &stats, cli.json)?;

    Ok(())
}

/// Look every breed up `--repeat` times. Lookup failures are reported, not fatal.
async fn run_lookups(
    provider: &impl BreedProvider,
    cli: &Cli,
    out: &mut impl Write,
) -> Result<()> {
    for _ in 0..cli.repeat {
        for breed in &cli.breeds {
            let report = match provider.lookup(breed).await {
                Ok(subs) => LookupReport {
                    breed,
                    sub_breeds: Some(subs),
                    error: None,
                },
                Err(e) => LookupReport {
                    breed,
                    sub_breeds: None,
                    error: Some(e.to_string()),
                },
            };
            write_report(out, &report, cli.json)?;
        }
    }
    Ok(())
}

fn write_report(out: &mut impl Write, report: &LookupReport<'_>, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(report)?)?;
        return Ok(());
    }

    match (&report.sub_breeds, &report.error) {
        (Some(subs), _) if subs.is_empty() => writeln!(out, "{}: (no sub-breeds)", report.breed)?,
        (Some(subs), _) => writeln!(out, "{}: {}", report.breed, subs.join(", "))?,
        (None, Some(err)) => writeln!(out, "{}: {}", report.breed, err)?,
        (None, None) => {}
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, calls_made: u64, stats: &CacheStats, json: bool) -> Result<()> {
    if json {
        writeln!(
            out,
            "{}",
            serde_json::json!({
                "calls_made": calls_made,
                "stats": stats,
                "hit_rate_percent": stats.hit_rate(),
            })
        )?;
    } else {
        writeln!(
            out,
            "Delegate calls made: {} (hits: {}, misses: {}, cached breeds: {}, hit rate: {:.1}%)",
            calls_made,
            stats.hits,
            stats.misses,
            stats.entries,
            stats.hit_rate()
        )?;
    }
    Ok(())
}

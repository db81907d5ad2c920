//! CityLens CLI - a thin command-line front end for the client core.
//!
//! Fetches city data from the CityLens backend and prints it. Mostly
//! useful for poking at endpoints and watching cache behavior with
//! RUST_LOG=citylens=debug.

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use citylens::models::{ReportFilter, ReportStatus};
use citylens::utils::format::{format_optional, format_timestamp, truncate_string};
use citylens::{CityLensClient, Config};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn usage() -> ! {
    eprintln!("Usage: citylens <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  weather [city]      Current conditions");
    eprintln!("  air [city]          Air quality reading");
    eprintln!("  reports [status]    List civic reports (pending|in_progress|resolved|rejected)");
    eprintln!("  summary             Report counts by status");
    eprintln!("  cache-stats         Live request-cache entries");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = Config::load()?;
    let client = CityLensClient::new(config.api_base_url())?;

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or_else(|| usage());

    match command {
        "weather" => {
            let city = resolve_city(&args, &config)?;
            let weather = client.fetch_current_weather(&city).await?;
            println!("{}", weather.summary_line());
            if let Some(humidity) = weather.humidity {
                println!("  humidity: {:.0}%", humidity);
            }
            if let Some(wind) = weather.wind_kph {
                println!("  wind: {:.1} km/h", wind);
            }
        }
        "air" => {
            let city = resolve_city(&args, &config)?;
            let air = client.fetch_air_quality(&city).await?;
            println!("{}: AQI {} ({})", air.city, air.aqi, air.category());
        }
        "reports" => {
            let mut filter = ReportFilter::default();
            if let Some(raw) = args.get(2) {
                filter.status = Some(parse_status(raw)?);
            }
            let reports = client.fetch_reports(&filter).await?;
            for report in &reports {
                println!(
                    "#{:<5} [{}] {} ({}, {})",
                    report.id,
                    report.status,
                    truncate_string(&report.title, 48),
                    format_optional(&report.category, "uncategorized"),
                    report
                        .created_at
                        .as_deref()
                        .map(format_timestamp)
                        .unwrap_or_else(|| "no date".to_string()),
                );
            }
            println!("{} report(s)", reports.len());
        }
        "summary" => {
            let summary = client.fetch_report_summary().await?;
            println!("total:       {}", summary.total);
            println!("pending:     {}", summary.pending);
            println!("in progress: {}", summary.in_progress);
            println!("resolved:    {}", summary.resolved);
            println!("rejected:    {}", summary.rejected);
        }
        "cache-stats" => {
            let stats = client.cache_stats();
            println!("{} cached entr{}", stats.size, if stats.size == 1 { "y" } else { "ies" });
            for key in &stats.keys {
                println!("  {}", key);
            }
        }
        _ => usage(),
    }

    let stats = client.cache_stats();
    info!(cached_entries = stats.size, "done");
    Ok(())
}

fn resolve_city(args: &[String], config: &Config) -> Result<String> {
    args.get(2)
        .cloned()
        .or_else(|| config.default_city.clone())
        .ok_or_else(|| anyhow::anyhow!("No city given and no default_city configured"))
}

fn parse_status(raw: &str) -> Result<ReportStatus> {
    match raw {
        "pending" => Ok(ReportStatus::Pending),
        "in_progress" => Ok(ReportStatus::InProgress),
        "resolved" => Ok(ReportStatus::Resolved),
        "rejected" => Ok(ReportStatus::Rejected),
        other => Err(anyhow::anyhow!("Unknown report status: {}", other)),
    }
}

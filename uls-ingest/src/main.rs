//! uls-ingest - license registry mirror CLI
//!
//! Thin command-line front end over the ingest pipeline and its readers.
//! All real work happens in the library; this file parses flags, sets up
//! logging and the database, and prints results.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use uls_common::Config;
use uls_ingest::db;
use uls_ingest::services::{CallsignLookup, Pipeline, SearchReader, TextIndex};

#[derive(Parser)]
#[command(name = "uls-ingest", about = "License registry mirror pipeline", version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data folder holding the database and download area
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download both datasets and ingest them
    Run,
    /// Re-process already extracted working directories without downloading
    ProcessExisting,
    /// Show row counts per table and the last run
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Probe remote dataset sizes and freshness
    DatasetInfo,
    /// Everything known about one call sign
    Lookup {
        call_sign: String,
        #[arg(long)]
        json: bool,
    },
    /// Search licensees by name substring
    SearchName {
        name: String,
        #[arg(long)]
        state: Option<String>,
        #[arg(long, default_value_t = 150)]
        limit: i64,
    },
    /// Search assignments near a frequency (MHz)
    SearchFreq {
        mhz: f64,
        #[arg(long, default_value_t = 0.001)]
        tolerance: f64,
        #[arg(long)]
        state: Option<String>,
        #[arg(long, default_value_t = 150)]
        limit: i64,
    },
    /// Rebuild the accelerated text index from the entities table
    RebuildIndex,
    /// Drop the accelerated text index
    DropIndex,
    /// Remove downloads older than the retention window
    Cleanup,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref(), cli.data_dir.as_deref())?;
    config.ensure_directories()?;

    let db_path = config.database_path();
    tracing::info!("Database: {}", db_path.display());
    let pool = uls_common::db::init_database(&db_path).await?;

    match cli.command {
        Command::Run => {
            let mut pipeline = Pipeline::new(pool.clone(), config)?;
            let summary = pipeline.run().await;
            println!(
                "Run {}: {} bytes fetched, {} records processed, success: {}",
                summary.run_id, summary.bytes_fetched, summary.records_processed, summary.success
            );
            if summary.obtained_no_data() {
                println!("Warning: no data was obtained from any dataset.");
            }
        }
        Command::ProcessExisting => {
            let pipeline = Pipeline::new(pool.clone(), config)?;
            let records = pipeline.process_existing().await?;
            println!("Processing completed: {} records.", records);
        }
        Command::Stats { json } => {
            let stats = db::stats::gather(&pool).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Licenses:             {}", stats.licenses);
                println!("Entities:             {}", stats.entities);
                println!("Frequencies:          {}", stats.frequencies);
                println!("Locations:            {}", stats.locations);
                println!("Antennas:             {}", stats.antennas);
                println!("Application purposes: {}", stats.purposes);
                println!("Active call signs:    {}", stats.active_call_signs);
                match stats.last_run {
                    Some(run) => println!(
                        "Last run:             {} ({} records, success: {})",
                        run.run_date, run.records_processed, run.success
                    ),
                    None => println!("Last run:             never"),
                }
            }
        }
        Command::DatasetInfo => {
            let pipeline = Pipeline::new(pool.clone(), config)?;
            for (source, info) in pipeline.dataset_info().await {
                match info {
                    Ok(info) => {
                        let size_mb = info
                            .size_bytes
                            .map(|b| format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)))
                            .unwrap_or_else(|| "unknown size".to_string());
                        println!(
                            "{}: {} (modified: {})",
                            source,
                            size_mb,
                            info.last_modified.as_deref().unwrap_or("unknown")
                        );
                    }
                    Err(e) => println!("{}: error - {}", source, e),
                }
            }
        }
        Command::Lookup { call_sign, json } => {
            let reader = CallsignLookup::new(pool.clone());
            match reader.lookup(&call_sign).await? {
                Some(detail) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&detail)?);
                    } else {
                        print_detail(&detail);
                    }
                }
                None => {
                    println!("No license found for call sign: {}", call_sign);
                    let similar = reader.similar(&call_sign, 5).await?;
                    if !similar.is_empty() {
                        println!("Similar call signs:");
                        for cs in similar {
                            println!("  {}", cs);
                        }
                    }
                }
            }
        }
        Command::SearchName { name, state, limit } => {
            let reader = SearchReader::new(pool.clone());
            let matches = reader.by_licensee(&name, state.as_deref(), limit).await?;
            if matches.is_empty() {
                println!("No licensees matching '{}'", name);
            }
            for m in matches {
                println!(
                    "{:10} {:40} {:2} {}",
                    m.call_sign.as_deref().unwrap_or("-"),
                    m.entity_name.as_deref().unwrap_or("-"),
                    m.state.as_deref().unwrap_or(""),
                    m.license_status.as_deref().unwrap_or("")
                );
            }
        }
        Command::SearchFreq {
            mhz,
            tolerance,
            state,
            limit,
        } => {
            let reader = SearchReader::new(pool.clone());
            let matches = reader.by_frequency(mhz, tolerance, state.as_deref(), limit).await?;
            if matches.is_empty() {
                println!("No frequencies found near {:.4} MHz", mhz);
            }
            for m in matches {
                println!(
                    "{:10} {:>10} {:12} {}",
                    m.call_sign.as_deref().unwrap_or("-"),
                    m.frequency_assigned
                        .map(|f| format!("{:.4}", f))
                        .unwrap_or_else(|| "-".to_string()),
                    m.emission_designator.as_deref().unwrap_or(""),
                    m.entity_name.as_deref().unwrap_or("")
                );
            }
        }
        Command::RebuildIndex => {
            let index = TextIndex::new(pool.clone());
            let indexed = index.rebuild().await?;
            println!("Text index rebuilt with {} rows.", indexed);
        }
        Command::DropIndex => {
            TextIndex::new(pool.clone()).drop_index().await?;
            println!("Text index dropped.");
        }
        Command::Cleanup => {
            let pipeline = Pipeline::new(pool.clone(), config)?;
            pipeline.cleanup_downloads()?;
        }
    }

    Ok(())
}

fn print_detail(detail: &uls_ingest::services::CallsignDetail) {
    let license = &detail.license;
    println!("Call sign:   {}", license.call_sign.as_deref().unwrap_or("-"));
    println!("Status:      {}", license.status_text());
    println!(
        "Service:     {}",
        license.radio_service_type.as_deref().unwrap_or("Not specified")
    );
    println!(
        "Granted:     {}",
        license.grant_date.as_deref().unwrap_or("Not available")
    );
    println!(
        "Expires:     {}",
        license.expired_date.as_deref().unwrap_or("Not available")
    );

    if let Some(licensee) = &detail.licensee {
        if let Some(name) = licensee.display_name() {
            println!("Licensee:    {}", name);
        }
        if let Some(address) = &licensee.street_address {
            println!("Address:     {}", address);
        }
        let place: Vec<&str> = [
            licensee.city.as_deref(),
            licensee.state.as_deref(),
            licensee.zip_code.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !place.is_empty() {
            println!("             {}", place.join(", "));
        }
    }

    if !detail.frequencies.is_empty() {
        println!("Frequencies:");
        for freq in &detail.frequencies {
            println!(
                "  {:>10} MHz  {:12} {}",
                freq.frequency_assigned
                    .map(|f| format!("{:.4}", f))
                    .unwrap_or_else(|| "-".to_string()),
                freq.emission_designator.as_deref().unwrap_or(""),
                freq.power_erp
                    .or(freq.power_output)
                    .map(|p| format!("{:.1} W", p))
                    .unwrap_or_default()
            );
        }
    }

    for location in &detail.locations {
        let mut line = String::new();
        if let Some(city) = &location.location_city {
            line.push_str(city);
        }
        if let Some(state) = &location.location_state {
            if !line.is_empty() {
                line.push_str(", ");
            }
            line.push_str(state);
        }
        if let Some((lat, long)) = location.decimal_coordinates() {
            line.push_str(&format!("  ({:.6}, {:.6})", lat, long));
        }
        if !line.is_empty() {
            println!("Location:    {}", line);
        }
    }
}

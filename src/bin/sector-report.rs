//! Command-line sector report and diary statistics writer.
//!
//! ```text
//! sector-report sector 42 --from 1234 --sort time
//! sector-report stat "Weight=71.5" "Rest HR=48"
//! ```

use clap::{Args, Parser, Subcommand};
use log::{error, info, warn};
use std::process::ExitCode;

use sector_compare::format::{format_day_time, value_units};
use sector_compare::{
    hms, readout_label, sort_journals, ClientConfig, Result, SectorClient, SectorError, Selection,
    SortKey, Statistics, StatisticsWriter, WriterConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Sector comparison report", long_about = None)]
struct Cli {
    /// Diary server root (defaults to SECTOR_API_URL or http://localhost:8000)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the journals matched to a sector and a comparison readout
    Sector(SectorArgs),
    /// Queue diary statistics and write them in one batch
    Stat(StatArgs),
}

#[derive(Args, Debug)]
struct SectorArgs {
    /// Sector id
    id: String,

    /// Activity journal id to compare against the fastest
    #[arg(long)]
    from: Option<String>,

    /// Column to sort journals by
    #[arg(long, default_value = "date")]
    sort: SortKey,

    /// Flip the column's default sort direction
    #[arg(long)]
    reverse: bool,

    /// Number of slider stops to print
    #[arg(long, default_value_t = 4)]
    steps: usize,
}

#[derive(Args, Debug)]
struct StatArgs {
    /// KEY=VALUE pairs; values are parsed as JSON where possible
    #[arg(required = true)]
    pairs: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match client_config(cli.url.as_deref()) {
        Ok(config) => match cli.command {
            Command::Sector(args) => sector(config, args).await,
            Command::Stat(args) => stat(config, args).await,
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn client_config(url: Option<&str>) -> Result<ClientConfig> {
    match url {
        Some(url) => Ok(ClientConfig::new(url)),
        None => ClientConfig::from_env(),
    }
}

async fn sector(config: ClientConfig, args: SectorArgs) -> Result<()> {
    let client = SectorClient::new(config)?;
    let (data, route) = client.fetch_sector_page(&args.id).await?;
    if data.sector_journals.is_empty() {
        return Err(SectorError::NoJournals {
            sector: Some(args.id),
        });
    }

    let selection = Selection::initial(&data, args.from.as_deref())?;
    let mut journals = data.sector_journals.clone();
    sort_journals(&mut journals, args.sort, args.sort.default_reverse() != args.reverse);

    for j in &journals {
        let marker = match (j.index == selection.i, j.index == selection.j) {
            (true, true) => "*",
            (true, false) => "f",
            (false, true) => "c",
            _ => " ",
        };
        println!(
            "{} {:<24} {:<10} {} {:>10} {:>9} {:>6}",
            marker,
            j.name,
            j.activity_group,
            format_day_time(&j.date),
            value_units(j.distance, "km"),
            value_units(j.time, "s"),
            value_units(j.elevation, "m"),
        );
    }

    let comparison = selection.comparison(&data)?;
    for r in comparison.readouts(args.steps)? {
        println!(
            "{:>5.0}%  {:>8}  {}",
            100.0 * r.slider,
            hms(r.fast.time),
            readout_label(&r)
        );
    }

    let route = match route {
        Ok(route) => route,
        Err(e) => {
            warn!("Route unavailable, skipping map summary: {}", e);
            return Ok(());
        }
    };
    if let Some(bounds) = route.bounds() {
        info!(
            "Route: {} points, {:.0} m, lat {:.4}..{:.4} lon {:.4}..{:.4}",
            route.latlon.len(),
            route.length_m(),
            bounds.min_lat,
            bounds.max_lat,
            bounds.min_lng,
            bounds.max_lng
        );
    }
    Ok(())
}

async fn stat(config: ClientConfig, args: StatArgs) -> Result<()> {
    let mut updates = Statistics::new();
    for pair in &args.pairs {
        let (key, raw) = pair.split_once('=').ok_or_else(|| SectorError::ConfigError {
            message: format!("expected KEY=VALUE, got '{}'", pair),
        })?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| raw.into());
        updates.insert(key.to_string(), value);
    }

    let writer = StatisticsWriter::spawn(SectorClient::new(config)?, WriterConfig::from_env()?);
    writer.send(updates);
    writer.close().await;
    Ok(())
}

//! Command-line report generator.
//!
//! Walks the configured year range, most recent first; for each year it
//! gathers events from the HAL archive and from local YAML files, merges
//! them, and appends one section to the HTML report.

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{Level, debug};

use confrep::hal::HalClient;
use confrep::{
    CheckConfig, Event, EventParser, TeiParser, YamlParser, check_events, merge_events,
    render_year, sort_events_desc, supplement, yaml,
};

/// HAL has no conference metadata for the group before this year.
const HAL_MIN_YEAR: i32 = 2015;

#[derive(Parser, Debug)]
#[command(
    name = "confrep",
    version,
    about = "Generate the conference participation report of a research group"
)]
struct Args {
    /// First year to include
    #[arg(long, default_value_t = 2008)]
    min_year: i32,

    /// Last year to include (defaults to the current year)
    #[arg(long)]
    max_year: Option<i32>,

    /// HAL collection name of the group
    #[arg(long, default_value = "SUBATECH-PLASMA")]
    group: String,

    /// Directory holding locally authored events (conferences_<year>.yaml)
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory holding supplemental records (extra_<year>.yaml)
    #[arg(long, default_value = "extra")]
    extra_dir: PathBuf,

    /// Directory for cached HAL downloads
    #[arg(long, default_value = "data_from_hal")]
    cache_dir: PathBuf,

    /// Output HTML fragment
    #[arg(long, default_value = "conferences.html")]
    output: PathBuf,

    /// Re-download HAL bibliographies even when a cached copy exists
    #[arg(long)]
    force_refresh: bool,

    /// Surname substrings whose contributions are excluded
    #[arg(
        long = "exclude-author",
        value_name = "NAME",
        default_values_t = ["Bugaev".to_string(), "Bryslawskyj".to_string()]
    )]
    exclude_authors: Vec<String>,

    /// Also warn about same-lastname contributions left after merging
    #[arg(long)]
    warn_duplicate_authors: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    let max_year = args.max_year.unwrap_or_else(|| Local::now().year());
    let tei_parser = TeiParser::new().with_blocklist(args.exclude_authors.clone());
    let yaml_parser = YamlParser::new();
    let hal = HalClient::new();
    let check_config = CheckConfig {
        warn_duplicate_authors: args.warn_duplicate_authors,
    };

    let mut output = fs::File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    for year in (args.min_year..=max_year).rev() {
        let mut events: Vec<Event> = Vec::new();

        if year >= HAL_MIN_YEAR {
            let xml = hal
                .fetch_cached(&args.group, year, &args.cache_dir, args.force_refresh)
                .with_context(|| format!("fetching HAL bibliography for {}", year))?;
            let mut parsed = tei_parser
                .parse(&xml)
                .with_context(|| format!("parsing HAL bibliography for {}", year))?;

            let extra_path = args.extra_dir.join(format!("extra_{}.yaml", year));
            if extra_path.exists() {
                let raw = fs::read_to_string(&extra_path)?;
                let infos = yaml::load_extra_infos(&raw)
                    .with_context(|| format!("loading {}", extra_path.display()))?;
                supplement::apply_extra_infos(&mut parsed, &infos);
            }

            events.extend(parsed);
        }

        let data_path = args.data_dir.join(format!("conferences_{}.yaml", year));
        if data_path.exists() {
            let raw = fs::read_to_string(&data_path)?;
            let local = yaml_parser
                .parse(&raw)
                .with_context(|| format!("loading {}", data_path.display()))?;
            events.extend(local);
        }

        debug!(year, count = events.len(), "collected events");

        let merged = merge_events(sort_events_desc(events));
        check_events(&merged, &check_config);

        output.write_all(render_year(year, &merged).as_bytes())?;
    }

    Ok(())
}

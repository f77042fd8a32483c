mod echo;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use simrecipe_core::{
    DEFAULT_SENSORS, DEFAULT_TEMPLATE, Document, FetchConfig, HttpFetcher, ProfileParser, RecipeLink, ScrapeConfig,
    Scraper, Sensor, fetch_file, fetch_stdin, fetch_url, render_profile,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::echo::{
    format_size, print_banner, print_batch_report, print_error, print_info, print_step, print_success,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Turn film simulation recipe pages into FP1 camera profiles
#[derive(Parser, Debug)]
#[command(name = "simrecipe")]
#[command(author = "simrecipe Contributors")]
#[command(version)]
#[command(about = "Turn film simulation recipe pages into FP1 camera profiles", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape every recipe of the selected sensors into FP1 files
    Scrape(ScrapeArgs),

    /// Parse a single recipe page
    Parse(ParseArgs),

    /// List sensor families, their index pages and cameras
    Sensors {
        /// Only sensors used by this camera model (e.g. X-T4)
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct ScrapeArgs {
    /// Sensor families to scrape (default: X-Trans-IV, X-Trans-V)
    #[arg(short, long = "sensor", value_name = "SENSOR")]
    sensors: Vec<Sensor>,

    /// Output directory for rendered profiles
    #[arg(short, long, default_value = "fuji_profiles", value_name = "DIR")]
    output: PathBuf,

    /// Directory of the processed URL cache
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Custom FP1 template file
    #[arg(long, value_name = "FILE")]
    template: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "10", value_name = "SECS")]
    timeout: u64,

    /// Recipes processed at the same time
    #[arg(long, default_value = "4", value_name = "NUM")]
    concurrency: usize,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Print the batch report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct ParseArgs {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Render an FP1 document instead of JSON
    #[arg(long)]
    fp1: bool,

    /// Recipe name written into the FP1 header
    #[arg(long, value_name = "NAME")]
    name: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "10", value_name = "SECS")]
    timeout: u64,
}

fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "simrecipe_core=debug,simrecipe=debug" } else { "simrecipe_core=info" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.verbose {
        print_banner();
    }

    match args.command {
        Command::Scrape(scrape) => run_scrape(scrape, args.verbose).await,
        Command::Parse(parse) => run_parse(parse, args.verbose).await,
        Command::Sensors { model, json } => list_sensors(model.as_deref(), json),
    }
}

async fn run_scrape(args: ScrapeArgs, verbose: bool) -> anyhow::Result<()> {
    let sensors = if args.sensors.is_empty() { DEFAULT_SENSORS.to_vec() } else { args.sensors };

    let mut builder = ScrapeConfig::builder()
        .output_dir(&args.output)
        .timeout(args.timeout)
        .concurrency(args.concurrency);
    if let Some(dir) = &args.cache_dir {
        builder = builder.cache_dir(dir);
    }
    if let Some(ua) = args.user_agent {
        builder = builder.user_agent(ua);
    }
    if let Some(path) = &args.template {
        builder = builder.template_file(path).with_context(|| format!("Failed to read template: {}", path))?;
    }
    let config = builder.build();
    debug!(?sensors, concurrency = config.concurrency, "Starting scrape");

    if verbose {
        let names: Vec<&str> = sensors.iter().map(|sensor| sensor.as_str()).collect();
        print_info(&format!("Sensors: {}", names.join(", ")));
        print_info(&format!("Output: {}", config.output_dir.display()));
        print_info(&format!("Cache: {}", config.cache_dir.display()));
        eprintln!();
    }

    let fetcher = HttpFetcher::new(config.fetch.clone()).context("Failed to build HTTP client")?;
    let report = Scraper::new(config, fetcher).run(&sensors).await;

    if args.json {
        let json = report.to_json().context("Failed to serialize report")?;
        println!("{}", serde_json::to_string_pretty(&json).context("Failed to serialize report")?);
    } else {
        print_batch_report(&report);
    }

    if report.sensors.iter().all(|sensor| sensor.error.is_some()) {
        anyhow::bail!("No sensor could be processed");
    }

    Ok(())
}

async fn run_parse(args: ParseArgs, verbose: bool) -> anyhow::Result<()> {
    let is_url = args.input.starts_with("http://") || args.input.starts_with("https://");

    if verbose {
        print_step(1, 3, &format!("Reading {}", args.input.bright_white()));
    }
    let html = if args.input == "-" {
        fetch_stdin().context("Failed to read from stdin")?
    } else if is_url {
        let config = FetchConfig { timeout: args.timeout, ..Default::default() };
        fetch_url(&args.input, &config).await.context("Failed to fetch URL")?
    } else {
        fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };

    if verbose {
        eprintln!("  {} {}", "Size:".dimmed(), format_size(html.len()).bright_white());
        print_step(2, 3, "Parsing recipe settings");
    }

    let doc = Document::parse(&html).context("Failed to parse HTML")?;
    let tags = doc.strong_tags().context("Failed to collect bold text")?;
    if tags.is_empty() {
        print_error("No bold text found on the page");
        anyhow::bail!("No recipe settings found in {}", args.input);
    }
    let profile = ProfileParser::default().parse_tags(&tags).context("Failed to build profile")?;

    if verbose {
        eprintln!("  {} {}", "Film simulation:".dimmed(), profile.film_simulation.bright_white());
        print_step(3, 3, "Writing output");
    }

    let output = if args.fp1 {
        let name = args.name.or_else(|| doc.title()).unwrap_or_else(|| "Recipe".to_string());
        let url = if is_url { args.input.clone() } else { String::new() };
        render_profile(&profile, &RecipeLink::new(&name, url), DEFAULT_TEMPLATE)
            .context("Failed to render profile")?
    } else {
        let value = profile.to_json().context("Failed to serialize profile")?;
        let mut json = serde_json::to_string_pretty(&value).context("Failed to serialize profile")?;
        json.push('\n');
        json
    };

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => print!("{}", output),
    }

    Ok(())
}

fn list_sensors(model: Option<&str>, json: bool) -> anyhow::Result<()> {
    let sensors: Vec<Sensor> =
        Sensor::ALL.iter().copied().filter(|sensor| model.is_none_or(|m| sensor.is_compatible(m))).collect();

    if sensors.is_empty() {
        anyhow::bail!("No sensor lists camera model {}", model.unwrap_or_default());
    }

    if json {
        let sensors: Vec<serde_json::Value> = sensors
            .iter()
            .map(|sensor| {
                serde_json::json!({
                    "sensor": sensor,
                    "index_url": sensor.index_url(),
                    "models": sensor.compatible_models(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&sensors).context("Failed to serialize sensors")?);
        return Ok(());
    }

    for sensor in &sensors {
        let marker = if DEFAULT_SENSORS.contains(sensor) { "*" } else { " " };
        println!("{} {:<12} {}", marker, sensor.as_str(), sensor.index_url());
        println!("  {:<12} {}", "", sensor.compatible_models().join(", "));
    }

    Ok(())
}

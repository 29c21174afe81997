//! Motion Vectorizer CLI
//!
//! Aggregates raw VR tracking recordings and turns them into per-second
//! feature vectors.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use motion_vectorizer::{
    aggregate::Aggregator,
    config::{AggregationConfig, ChannelGroups, Config},
    core::{vectorize_with, Statistic, VectorizeOptions},
    report::RunReport,
    tsv, VERSION,
};

#[derive(Parser)]
#[command(name = "motion-vectorizer")]
#[command(version = VERSION)]
#[command(about = "Per-second feature vectors from VR tracking recordings", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine per-subject motion recordings into one table
    Aggregate {
        /// Root directory holding <subject>/<session>/motion/ folders
        #[arg(long)]
        root: PathBuf,

        /// Output table (defaults to combined_motion_data.tsv in the output dir)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Session folders to scan, comma-separated
        #[arg(long)]
        sessions: Option<String>,

        /// Write the run report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Turn a recording into one feature vector per window
    Vectorize {
        /// Input table of raw samples
        #[arg(long, short)]
        input: PathBuf,

        /// Output table (defaults to processed_dataset.tsv in the output dir)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Samples per window
        #[arg(long)]
        sampling_rate: Option<usize>,

        /// Channel group definitions as JSON
        #[arg(long)]
        channels: Option<PathBuf>,

        /// Expected number of statistic dimensions
        #[arg(long)]
        expected_dimensions: Option<usize>,

        /// Write the run report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show the channel group configuration
    Channels,

    /// Show configuration
    Config {
        /// Write the active configuration to the user config location
        #[arg(long)]
        init: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Aggregate {
            root,
            output,
            sessions,
            report,
        } => cmd_aggregate(&config, &root, output, sessions.as_deref(), report),
        Commands::Vectorize {
            input,
            output,
            sampling_rate,
            channels,
            expected_dimensions,
            report,
        } => cmd_vectorize(
            &config,
            &input,
            output,
            sampling_rate,
            channels,
            expected_dimensions,
            report,
        ),
        Commands::Channels => cmd_channels(&config),
        Commands::Config { init } => cmd_config(&config, init),
    });

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            Config::load_from(path).with_context(|| format!("loading config {path:?}"))
        }
        None => Config::load().context("loading config"),
    }
}

fn cmd_aggregate(
    config: &Config,
    root: &Path,
    output: Option<PathBuf>,
    sessions: Option<&str>,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let aggregation_config = match sessions {
        Some(list) => AggregationConfig {
            sessions: AggregationConfig::sessions_from_csv(list),
            ..config.aggregation.clone()
        },
        None => config.aggregation.clone(),
    };

    println!("Motion Vectorizer v{VERSION}");
    println!();
    println!("Scanning {root:?}");
    println!("  Sessions: {}", aggregation_config.sessions.join(", "));
    println!("  File suffix: {}", aggregation_config.file_suffix);
    println!();

    let aggregation = Aggregator::new(&aggregation_config)
        .run(root)
        .with_context(|| format!("scanning {root:?}"))?;

    match &aggregation.table {
        Some(table) => {
            let output = output_path(config, output, "combined_motion_data.tsv")?;
            tsv::write_recording(&output, table)
                .with_context(|| format!("writing {output:?}"))?;
            println!(
                "Merged {} recordings ({} rows) into {:?}",
                aggregation.report.files_read,
                table.len(),
                output
            );
        }
        None => {
            println!("No motion recordings found; nothing written.");
        }
    }

    finish_report(&aggregation.report, report_path);
    Ok(())
}

fn cmd_vectorize(
    config: &Config,
    input: &Path,
    output: Option<PathBuf>,
    sampling_rate: Option<usize>,
    channels: Option<PathBuf>,
    expected_dimensions: Option<usize>,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let channel_groups = match channels {
        Some(path) => {
            ChannelGroups::load(&path).with_context(|| format!("loading channels {path:?}"))?
        }
        None => config.channel_groups.clone(),
    };
    let sampling_rate = sampling_rate.unwrap_or(config.sampling_rate);
    let expected = expected_dimensions
        .or(config.expected_dimensions)
        .unwrap_or_else(|| channel_groups.expected_dimensions());

    let mut report = RunReport::new();
    let recording =
        tsv::read_recording(input).with_context(|| format!("reading {input:?}"))?;
    report.record_file_found();
    report.record_file_read(recording.len());

    let options = VectorizeOptions::new(&channel_groups, sampling_rate)
        .with_metadata_fields(config.metadata_fields.clone())
        .with_expected_dimensions(expected);
    let table =
        vectorize_with(&recording, &options).with_context(|| format!("vectorizing {input:?}"))?;
    report.record_features(&table);

    let output = output_path(config, output, "processed_dataset.tsv")?;
    tsv::write_feature_table(&output, &table).with_context(|| format!("writing {output:?}"))?;

    tracing::info!(
        windows = table.len(),
        dimensions = table.dimension_count(),
        "vectorization complete"
    );

    println!("Total feature dimensions: {}", table.dimension_count());
    println!();
    println!("Feature breakdown:");
    let group_names: Vec<&str> = channel_groups
        .groups()
        .iter()
        .map(|g| g.name.as_str())
        .collect();
    println!("  Groups: {}", group_names.join(", "));
    println!(
        "  Channels present: {} of {}",
        table.channels.len(),
        channel_groups.channel_count()
    );
    println!(
        "  Per channel: {} statistics ({})",
        Statistic::ALL.len(),
        Statistic::ALL.map(|s| s.name()).join(", ")
    );
    println!(
        "  Total: {} channels × {} statistics = {} dimensions",
        table.channels.len(),
        Statistic::ALL.len(),
        table.dimension_count()
    );
    println!();
    println!("Wrote {} feature vectors to {:?}", table.len(), output);

    finish_report(&report, report_path);
    Ok(())
}

fn cmd_channels(config: &Config) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&config.channel_groups)
            .context("serializing channel groups")?
    );
    Ok(())
}

fn cmd_config(config: &Config, init: bool) -> Result<()> {
    if init {
        config.save().context("saving config")?;
        println!("Saved configuration to {:?}", Config::config_path());
        println!();
    }

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(config).context("serializing config")?
    );
    Ok(())
}

/// Resolve an output path, falling back to a file in the configured output dir.
fn output_path(config: &Config, explicit: Option<PathBuf>, default_name: &str) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => {
            config
                .ensure_directories()
                .context("creating output directory")?;
            Ok(config.output_dir.join(default_name))
        }
    }
}

fn finish_report(report: &RunReport, path: Option<PathBuf>) {
    println!();
    println!("{}", report.summary());

    if let Some(path) = path {
        if let Err(e) = report.save(&path) {
            eprintln!("Warning: Could not save run report: {e}");
        }
    }
}

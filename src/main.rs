//! Command-line interface for pod_colors

use clap::{Parser, Subcommand};
use pod_colors::{report, scan, ColorScanner, PipelineConfig, ScanReport, StrategyKind};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "pod-colors")]
#[command(
    version,
    about = "Dominant color extraction and same-name color checks for product images",
    long_about = None
)]
struct Cli {
    /// JSON configuration file (missing fields use defaults)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Extraction strategy: whole-image-euclidean-filter, center-crop-hsv-filter or most-common-pixel
    #[arg(long, global = true, value_name = "NAME")]
    strategy: Option<StrategyKind>,

    /// Match tolerance (Euclidean RGB distance)
    #[arg(long, global = true, value_name = "N")]
    tolerance: Option<f32>,

    /// k-means RNG seed
    #[arg(long, global = true, value_name = "N")]
    seed: Option<u64>,

    /// Group file names case-insensitively
    #[arg(long, global = true)]
    ignore_case: bool,

    /// Process images one at a time
    #[arg(long, global = true)]
    sequential: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dominant color of one image
    Extract {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },

    /// Report same-named images whose colors diverge
    Compare {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output CSV (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Report every image of each name group that has a divergence
    Collect {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output CSV (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Report images whose names appear in a CSV name list
    Lookup {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// CSV with a color_name column (or names in the first column)
        #[arg(long, value_name = "FILE")]
        names: PathBuf,

        /// Output CSV (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the dominant color of every image in a directory
    Catalog {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output CSV (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include subdirectories
        #[arg(short, long)]
        recursive: bool,
    },

    /// Write the effective configuration as JSON
    InitConfig {
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Configuration file plus command-line overrides
fn load_config(cli: &Cli) -> pod_colors::Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(tolerance) = cli.tolerance {
        config.matching.match_tolerance = tolerance;
    }
    if let Some(seed) = cli.seed {
        config.extraction.seed = seed;
    }
    if cli.ignore_case {
        config.scan.case_sensitive = false;
    }
    if cli.sequential {
        config.scan.parallel = false;
    }
    if let Commands::Catalog { recursive, .. } = cli.command {
        config.scan.recursive = recursive;
    }

    config.validate()?;
    Ok(config)
}

fn print_summary<T>(report: &ScanReport<T>, found: &str, output: Option<&Path>) {
    eprintln!(
        "{} images analyzed, {} skipped, {} {}",
        report.succeeded(),
        report.skipped.len(),
        report.entries.len(),
        found
    );
    for skipped in &report.skipped {
        eprintln!("  skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    if let Some(path) = output {
        eprintln!("Results written to {}", path.display());
    }
}

fn run(cli: &Cli) -> pod_colors::Result<()> {
    let config = load_config(cli)?;
    let scanner = ColorScanner::from_config(&config);

    match &cli.command {
        Commands::Extract { image } => {
            let sample = pod_colors::extract_color(image, &config)?;
            println!(
                "{}\t#{}\trgb({}, {}, {})",
                sample.file_name(),
                sample.hex(),
                sample.rgb.red,
                sample.rgb.green,
                sample.rgb.blue
            );
        }
        Commands::Compare { dir, output } => {
            let result = scanner.group_and_compare(dir)?;
            match output {
                Some(path) => report::write_divergences_to_path(path, &result.entries)?,
                None => report::write_divergences(io::stdout().lock(), &result.entries)?,
            }
            print_summary(&result, "divergent pairs", output.as_deref());
        }
        Commands::Collect { dir, output } => {
            let result = scanner.collect_divergent_groups(dir)?;
            match output {
                Some(path) => report::write_members_to_path(path, &result.entries)?,
                None => report::write_members(io::stdout().lock(), &result.entries)?,
            }
            print_summary(&result, "images in divergent groups", output.as_deref());
        }
        Commands::Lookup { dir, names, output } => {
            let names = scan::read_name_list(names)?;
            let result = scanner.lookup_named_colors(dir, &names)?;
            match output {
                Some(path) => report::write_members_to_path(path, &result.entries)?,
                None => report::write_members(io::stdout().lock(), &result.entries)?,
            }
            print_summary(&result, "matching images", output.as_deref());
        }
        Commands::Catalog { dir, output, .. } => {
            let result = scanner.catalog_directory(dir)?;
            match output {
                Some(path) => report::write_catalog_to_path(path, &result.entries)?,
                None => report::write_catalog(io::stdout().lock(), &result.entries)?,
            }
            print_summary(&result, "colors cataloged", output.as_deref());
        }
        Commands::InitConfig { output } => {
            config.to_json_file(output)?;
            eprintln!("Configuration saved to {}", output.display());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

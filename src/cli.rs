//! Command-line interface implementation for recipegen.
//! Provides argument parsing and drives a generation run from the terminal.

use crate::{
    config::Config,
    constants::DEFAULT_CONFIG_FILE,
    error::{Error, Result},
    processor::{Event, Processor, RunOptions, Stats},
    service::GenerationService,
    template::scan_template_names,
};
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;

/// Command-line arguments structure for recipegen.
#[derive(Parser, Debug)]
#[command(author, version, about = "recipegen: batch generator for Minecraft recipe and data files", long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Compute every output file without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print every replacement applied to each combination
    #[arg(short, long)]
    pub explain: bool,

    /// Print how many files were generated per placeholder value
    #[arg(long)]
    pub stats: bool,

    /// Replace the configured template list with the templates found in the
    /// template directory and save the configuration before generating.
    #[arg(long)]
    pub scan: bool,

    /// Print the first N output file names and exit without generating
    #[arg(long, value_name = "N")]
    pub preview: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn run_options(&self) -> RunOptions {
        RunOptions { dry_run: self.dry_run, explain: self.explain, per_type_stats: self.stats }
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for invalid arguments
pub fn get_args() -> Args {
    Args::parse()
}

/// Loads the configuration and runs generation on a worker thread, printing
/// its progress.
///
/// # Returns
/// * `Result<Stats>` - Final stats; under `--preview` only `total` is set,
///   to the number of previewed files
///
/// # Errors
/// * Configuration loading, scanning and validation errors
/// * `Error::PartialFailure` if any output file could not be written; the
///   remaining files are still generated
pub fn run(args: Args) -> Result<Stats> {
    let mut config = Config::load(&args.config)?;

    if args.scan {
        let templates = scan_template_names(config.template_dir_path())?;
        info!("Found {} templates in {}", templates.len(), config.template_dir);
        config.set_template_files(templates);
        config.save(&args.config)?;
    }

    if let Some(limit) = args.preview {
        let pairs = Processor::new(&config).preview(limit);
        for (template, output) in &pairs {
            println!("{template} -> {output}");
        }
        return Ok(Stats { total: pairs.len(), ..Stats::default() });
    }

    let options = args.run_options();
    let handle = GenerationService::new().start(config, options)?;
    for event in handle.events() {
        print_event(event);
    }
    let stats = handle.join()?;
    print_summary(&stats, options);
    if !stats.failures.is_empty() {
        return Err(Error::PartialFailure {
            failed: stats.failures.len(),
            total: stats.total + stats.failures.len(),
        });
    }
    Ok(stats)
}

fn print_event(event: Event) {
    match event {
        Event::Progress(message) => println!("{message}"),
        Event::Warning(message) => warn!("{message}"),
        Event::Explain { combination, lines } => {
            let values: Vec<String> =
                combination.iter().map(|(k, v)| format!("{k}={v}")).collect();
            println!("  combination: {}", values.join(", "));
            for line in lines {
                println!("    {line}");
            }
        }
        Event::Completed(_) => {}
        Event::Cancelled(stats) => warn!("Cancelled after {} files.", stats.total),
        Event::Failed(message) => error!("{message}"),
    }
}

fn print_summary(stats: &Stats, options: RunOptions) {
    if options.dry_run {
        println!("Dry run: {} files would be generated.", stats.total);
    } else {
        println!("Generated {} files.", stats.total);
    }

    for (r#type, values) in &stats.by_type {
        println!("{}:", r#type);
        for (value, count) in values {
            println!("  {value}: {count}");
        }
    }
    for (template, reason) in &stats.skipped_templates {
        println!("Skipped template {template}: {reason}");
    }
    if !stats.failures.is_empty() {
        println!("{} files failed:", stats.failures.len());
        for (file, reason) in &stats.failures {
            println!("  {file}: {reason}");
        }
    }
}

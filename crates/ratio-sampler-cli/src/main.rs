mod commands;
mod logging;
mod progress;

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use ratio_sampler_core::{report, AppConfig, SamplingEngine, SevenZip};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let mut config = ratio_sampler_core::config::load_configuration()
        .context("Error loading configuration")?;

    match args.command {
        Some(Commands::Run(run_args)) => {
            run_args.apply(&mut config);
            run_sampling(config, run_args.csv.as_deref())
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
        None => {
            Cli::command().print_long_help()?;
            Ok(())
        }
    }
}

fn run_sampling(config: AppConfig, csv_path: Option<&Path>) -> anyhow::Result<()> {
    config.validate()?;
    let compressor =
        SevenZip::from_config(&config.compressor).context("Error locating compressor")?;

    let reporter = CliReporter::new();
    let mut engine = SamplingEngine::new(config, compressor);
    let summary = engine.run(&reporter).context("Sampling aborted")?;
    drop(reporter);

    println!();
    report::write_report(&mut io::stdout().lock(), &summary.results)?;

    if let Some(path) = csv_path {
        let file = File::create(path)
            .with_context(|| format!("Error creating {}", path.display()))?;
        report::write_csv(file, &summary.results)?;
        info!("Results written to {}", path.display());
    }

    info!(
        "Scan: {}, Probe: {}",
        format!("{:.2}s", summary.scan_duration.as_secs_f64()).green(),
        format!("{:.2}s", summary.probe_duration.as_secs_f64()).green(),
    );
    info!(
        "{} files scanned, {} probed, {} extensions reported",
        format!("{}", summary.total_files).cyan(),
        format!("{}", summary.files_probed).cyan(),
        format!("{}", summary.results.len()).cyan(),
    );
    if summary.probes_failed > 0 {
        warn!(
            "{} probes failed; no result for {:?}",
            format!("{}", summary.probes_failed).red(),
            summary.failed_groups,
        );
    }

    Ok(())
}

use anyhow::Result;
use cli::{Cli, Commands};
use config::Configuration;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

mod binder;
mod cli;
mod config;
mod sinks;
mod source;
mod tools;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    let progress = match &cli.command {
        Commands::Novel { .. } => {
            let progress = ProgressBar::new(0);
            progress.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .expect("can parse progress style")
                    .progress_chars("#>-"),
            );
            progress
        }
        _ => ProgressBar::hidden(),
    };
    init_logging(cli.verbose, &progress);

    match &cli.command {
        Commands::Config => {
            config::write_default(Path::new(config::CONFIG_FILE))?;
            println!("Wrote {}", config::CONFIG_FILE);
            Ok(())
        }
        Commands::Novel { input, no_convert } => {
            let config = Configuration::load(cli.config.as_deref())?;
            let report = binder::novel::bind(input, &config, !no_convert, &progress)?;
            progress.finish_and_clear();

            println!("Bound {} volume(s) of {}:", report.books.len(), report.work_id);
            for book in &report.books {
                println!("  {}  {}", book.display(), file_size(book));
            }
            if let Some(conversion) = &report.conversion {
                print_conversion(conversion);
            }
            Ok(())
        }
        Commands::Manga { input } => {
            let config = Configuration::load(cli.config.as_deref())?;
            let report = binder::manga::bind(input, &config)?;
            if report.outcome.success() {
                println!("Bound {} into {}", report.title, report.output_dir.display());
            } else {
                println!(
                    "{}: kcc failed for {}: {}",
                    console::style("Warning").yellow(),
                    report.title,
                    report.outcome.diagnostic()
                );
            }
            Ok(())
        }
        Commands::Convert { dir } => {
            let config = Configuration::load(cli.config.as_deref())?;
            let report = tools::Kindlegen::from_config(&config.kindlegen).convert_directory(dir)?;
            print_conversion(&report);
            Ok(())
        }
    }
}

fn print_conversion(report: &tools::ConversionReport) {
    println!(
        "Converted {}/{} book(s) with kindlegen",
        report.succeeded(),
        report.conversions.len()
    );
    for (path, outcome) in report.failures() {
        println!(
            "  {}: {}: {}",
            console::style("Failed").yellow(),
            path.display(),
            outcome.diagnostic()
        );
    }
}

fn file_size(path: &Path) -> String {
    match std::fs::metadata(path) {
        Ok(metadata) => format!(
            "{:.1}",
            byte_unit::Byte::from_u64(metadata.len())
                .get_appropriate_unit(byte_unit::UnitType::Binary)
        ),
        Err(_) => String::new(),
    }
}

/// Send `log` records through tracing-subscriber to stderr.
fn init_logging(verbose: bool, progress: &ProgressBar) {
    let filter = if verbose {
        "novel_binder=debug"
    } else {
        "novel_binder=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(ProgressWriter(progress.clone()))
        .init();
}

/// Writes log lines above the progress bar instead of through it.
#[derive(Clone)]
struct ProgressWriter(ProgressBar);

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.suspend(|| std::io::stderr().write(buf))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for ProgressWriter {
    type Writer = ProgressWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

//! CLI tool for CAR archive operations.

mod commands;
mod exit_codes;
mod output;
mod progress;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use std::path::PathBuf;

/// Bundle files into a compressed CAR archive
#[derive(Parser)]
#[command(name = "car")]
#[command(author, version, about = "Bundle files into a compressed CAR archive", long_about = None)]
pub struct Cli {
    /// Archive file to write
    #[arg(short = 'o', long = "output", default_value = "output.car")]
    output: PathBuf,

    /// Files to add, each stored under its base name
    files: Vec<PathBuf>,

    /// List the contents of an existing archive instead of writing one
    #[arg(short = 'l', long, value_name = "ARCHIVE", conflicts_with_all = ["files", "extract"])]
    list: Option<PathBuf>,

    /// Extract every entry of an existing archive instead of writing one
    #[arg(short = 'x', long, value_name = "ARCHIVE", conflicts_with = "files")]
    extract: Option<PathBuf>,

    /// Directory to extract into
    #[arg(short = 'd', long, default_value = ".", requires = "extract")]
    dir: PathBuf,

    /// Refuse to add a name that is already in the archive
    #[arg(long)]
    reject_duplicates: bool,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    format: OutputFormat,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() {
    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    if std::env::args_os().len() <= 1 {
        eprintln!("{}", Cli::command().render_usage());
        std::process::exit(exit_codes::SUCCESS);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_codes::SUCCESS,
                _ => exit_codes::BAD_ARGS,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let exit_code = if let Some(archive) = &cli.list {
        commands::list(archive, cli.format)
    } else if let Some(archive) = &cli.extract {
        commands::extract(&commands::ExtractConfig {
            archive_path: archive,
            output_dir: &cli.dir,
            format: cli.format,
            quiet: cli.quiet,
        })
    } else {
        commands::create(&commands::CreateConfig {
            archive_path: &cli.output,
            files: &cli.files,
            reject_duplicates: cli.reject_duplicates,
            format: cli.format,
            quiet: cli.quiet,
        })
    };

    std::process::exit(exit_code.code());
}

//! Command implementations for the CLI tool.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use car_archive::{Archive, Entry, Error, WriteOptions, Writer};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::{ExtractSummary, create_formatter};
use crate::progress::SimpleProgress;

/// Configuration for the create command.
pub struct CreateConfig<'a> {
    pub archive_path: &'a Path,
    pub files: &'a [PathBuf],
    pub reject_duplicates: bool,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Configuration for the extract command.
pub struct ExtractConfig<'a> {
    pub archive_path: &'a Path,
    pub output_dir: &'a Path,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Create command implementation
pub fn create(config: &CreateConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let options = if config.reject_duplicates {
        WriteOptions::new().reject_duplicates()
    } else {
        WriteOptions::new()
    };

    let writer = match Writer::create_path(config.archive_path) {
        Ok(w) => w,
        Err(e) => {
            eprintln!(
                "Error: Cannot create '{}': {}",
                config.archive_path.display(),
                e
            );
            return error_to_exit_code(&e);
        }
    };
    let mut writer = writer.options(options);

    if !config.quiet {
        eprintln!(
            "Writing to archive '{}'.\n",
            config.archive_path.display()
        );
    }

    let progress = SimpleProgress::new(config.files.len() as u64, config.quiet);

    for path in config.files {
        if !path.is_file() {
            progress.println(format!("Skipping non-file '{}'.", path.display()));
            progress.inc(1);
            continue;
        }

        if !config.quiet {
            progress.println(format!("Archiving '{}'.", path.display()));
        }

        let name = entry_name(path);
        progress.set_message(name.clone());

        let result = File::open(path)
            .map_err(Error::Io)
            .and_then(|file| writer.add_file(&name, BufReader::new(file)));

        match result {
            Ok(()) => {}
            Err(Error::DuplicateEntry { name }) => {
                progress.println(format!("Warning: Skipping duplicate entry '{}'.", name));
            }
            Err(e) => {
                progress.finish_with_message("Failed");
                eprintln!("Error: Failed to add '{}': {}", path.display(), e);
                return error_to_exit_code(&e);
            }
        }
        progress.inc(1);
    }

    let result = match writer.finish() {
        Ok(r) => r,
        Err(e) => {
            progress.finish_with_message("Failed");
            eprintln!("Error finalizing archive: {}", e);
            return error_to_exit_code(&e);
        }
    };

    progress.finish();

    if !config.quiet || config.format == OutputFormat::Json {
        print!("{}", formatter.format_create_result(&result));
    }

    ExitCode::Success
}

/// List command implementation
pub fn list(archive_path: &Path, format: OutputFormat) -> ExitCode {
    let formatter = create_formatter(format);

    let mut archive = match open_archive(archive_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let entries = match archive.entries() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    print!("{}", formatter.format_list(&entries));

    ExitCode::Success
}

/// Extract command implementation
pub fn extract(config: &ExtractConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let mut archive = match open_archive(config.archive_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let entries = match archive.entries() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    if let Err(e) = std::fs::create_dir_all(config.output_dir) {
        eprintln!("Error creating output directory: {}", e);
        return ExitCode::IoError;
    }

    let progress = SimpleProgress::new(entries.len() as u64, config.quiet);
    progress.set_message("Extracting...");

    let mut summary = ExtractSummary::default();
    let mut seen = HashSet::new();

    for entry in &entries {
        progress.inc(1);

        if !seen.insert(entry.raw_name().to_vec()) {
            summary.skip(entry, "shadowed by an earlier entry");
            continue;
        }
        if let Err(reason) = check_extract_name(entry) {
            progress.println(format!("Warning: Skipping '{}': {}", entry.name, reason));
            summary.skip(entry, reason);
            continue;
        }

        let data = match archive.read_entry(entry) {
            Ok(d) => d,
            Err(e) => {
                progress.finish_with_message("Failed");
                eprintln!("Error: Failed to read '{}': {}", entry.name, e);
                return error_to_exit_code(&e);
            }
        };

        let target = config.output_dir.join(&entry.name);
        if let Err(e) = std::fs::write(&target, &data) {
            progress.finish_with_message("Failed");
            eprintln!("Error: Failed to write '{}': {}", target.display(), e);
            return ExitCode::IoError;
        }

        summary.entries_extracted += 1;
        summary.bytes_extracted += data.len() as u64;
    }

    progress.finish();

    if !config.quiet || config.format == OutputFormat::Json {
        print!("{}", formatter.format_extract_result(&summary));
    }

    ExitCode::Success
}

/// Returns the name a file is stored under: its base name.
fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Refuses names that would not land directly inside the output directory.
fn check_extract_name(entry: &Entry) -> Result<(), &'static str> {
    if entry.raw_name() != entry.name.as_bytes() {
        return Err("name is not valid UTF-8");
    }
    let mut components = Path::new(&entry.name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err("name has path components"),
    }
}

/// Opens an archive file, printing an error and returning the exit code on failure.
fn open_archive(path: &Path) -> Result<Archive<BufReader<File>>, ExitCode> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: Cannot open '{}': {}", path.display(), e);
            return Err(ExitCode::IoError);
        }
    };

    Archive::open(BufReader::new(file)).map_err(|e| {
        eprintln!("Error: '{}': {}", path.display(), e);
        error_to_exit_code(&e)
    })
}

//! Output formatting for CLI operations.

use std::collections::HashSet;

use car_archive::{Entry, WriteResult};
use serde_json::json;

/// Outcome of an extract run.
#[derive(Debug, Default)]
pub struct ExtractSummary {
    pub entries_extracted: usize,
    pub bytes_extracted: u64,
    pub skipped: Vec<(String, String)>,
}

impl ExtractSummary {
    /// Records an entry that was not written.
    pub fn skip(&mut self, entry: &Entry, reason: impl Into<String>) {
        self.skipped.push((entry.name.clone(), reason.into()));
    }
}

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats a list of entries
    fn format_list(&self, entries: &[Entry]) -> String;

    /// Formats the statistics of a newly written archive
    fn format_create_result(&self, result: &WriteResult) -> String;

    /// Formats extraction results
    fn format_extract_result(&self, summary: &ExtractSummary) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_list(&self, entries: &[Entry]) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:>12} {:>12} {:>7} {}\n",
            "Size", "Packed", "Ratio", "Name"
        ));
        output.push_str(&"-".repeat(50));
        output.push('\n');

        let mut total_size: u64 = 0;
        let mut total_packed: u64 = 0;
        let mut seen = HashSet::new();

        for entry in entries {
            total_size += entry.size;
            total_packed += entry.compressed_size;

            let marker = if seen.insert(entry.raw_name()) {
                ""
            } else {
                " (shadowed)"
            };

            output.push_str(&format!(
                "{:>12} {:>12} {:>6.1}% {}{}\n",
                humanize_bytes(entry.size),
                humanize_bytes(entry.compressed_size),
                entry.compression_ratio() * 100.0,
                entry.name,
                marker
            ));
        }

        output.push_str(&"-".repeat(50));
        output.push('\n');
        output.push_str(&format!(
            "{:>12} {:>12}         {} files\n",
            humanize_bytes(total_size),
            humanize_bytes(total_packed),
            entries.len()
        ));

        output
    }

    fn format_create_result(&self, result: &WriteResult) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Created archive with {} files ({} -> {})\n",
            result.entries_written,
            humanize_bytes(result.total_size),
            humanize_bytes(result.compressed_size)
        ));
        output.push_str(&format!(
            "Compression ratio: {:.1}% (saved {:.1}%)\n",
            result.compression_ratio() * 100.0,
            result.space_savings() * 100.0
        ));
        output
    }

    fn format_extract_result(&self, summary: &ExtractSummary) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Extracted {} files ({})\n",
            summary.entries_extracted,
            humanize_bytes(summary.bytes_extracted)
        ));

        if !summary.skipped.is_empty() {
            output.push_str(&format!("Skipped: {}\n", summary.skipped.len()));
            for (name, reason) in &summary.skipped {
                output.push_str(&format!("  {}: {}\n", name, reason));
            }
        }

        output
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_list(&self, entries: &[Entry]) -> String {
        let items: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "name": e.name,
                    "index": e.index,
                    "offset": e.offset,
                    "size": e.size,
                    "compressed_size": e.compressed_size,
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string()) + "\n"
    }

    fn format_create_result(&self, result: &WriteResult) -> String {
        let obj = json!({
            "entries_written": result.entries_written,
            "total_size": result.total_size,
            "compressed_size": result.compressed_size,
            "bytes_written": result.bytes_written,
            "compression_ratio": result.compression_ratio(),
            "space_savings": result.space_savings(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string()) + "\n"
    }

    fn format_extract_result(&self, summary: &ExtractSummary) -> String {
        let obj = json!({
            "entries_extracted": summary.entries_extracted,
            "entries_skipped": summary.skipped.len(),
            "bytes_extracted": summary.bytes_extracted,
            "skipped": summary
                .skipped
                .iter()
                .map(|(name, reason)| json!({"name": name, "reason": reason}))
                .collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string()) + "\n"
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Converts bytes to a human-readable string
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

//! Report writing functionality

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::core::config::ScanConfig;
use crate::scanner::duplicate_detector::DuplicateReport;
use crate::scanner::file_scanner::ScanResult;

/// Length of the digest prefix shown in text reports
const DIGEST_PREFIX_LEN: usize = 16;

#[derive(Serialize)]
struct JsonReport<'a> {
    config: &'a ScanConfig,
    scan: &'a ScanResult,
    duplicates: Option<&'a DuplicateReport>,
}

/// Format a byte count using binary units
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Write a human-readable scan and duplicate report
///
/// # Arguments
/// * `out` - Destination for the report
/// * `scan` - Result of the directory scan
/// * `duplicates` - Optional duplicate detection results
pub fn write_report<W: Write>(
    out: &mut W,
    scan: &ScanResult,
    duplicates: Option<&DuplicateReport>,
) -> Result<()> {
    writeln!(out, "Duplicate File Report")?;
    writeln!(out, "=====================")?;
    writeln!(out)?;

    writeln!(out, "Summary Statistics:")?;
    writeln!(out, "-------------------")?;
    writeln!(out, "  Files scanned: {}", scan.files().len())?;
    writeln!(out, "  Bytes scanned: {}", format_bytes(scan.total_bytes()))?;
    writeln!(out, "  Scan errors: {}", scan.errors().len())?;

    if let Some(dups) = duplicates {
        writeln!(out, "  Files hashed: {}", dups.files_hashed)?;
        writeln!(out, "  Duplicate groups: {}", dups.groups.len())?;
        writeln!(out, "  Redundant files: {}", dups.duplicate_file_count())?;
        writeln!(out, "  Reclaimable space: {}", format_bytes(dups.wasted_bytes()))?;
        if dups.interrupted {
            writeln!(out, "  (interrupted: results are incomplete)")?;
        }
    }
    writeln!(out)?;

    if let Some(dups) = duplicates {
        if !dups.groups.is_empty() {
            writeln!(out, "Duplicate Files:")?;
            writeln!(out, "----------------")?;
            for (idx, group) in dups.groups.iter().enumerate() {
                let prefix = &group.digest[..DIGEST_PREFIX_LEN.min(group.digest.len())];
                writeln!(
                    out,
                    "  Group {} (SHA-256: {}..., {} each, {} copies):",
                    idx + 1,
                    prefix,
                    format_bytes(group.size),
                    group.paths.len()
                )?;
                for path in &group.paths {
                    writeln!(out, "    {}", path.display())?;
                }
                writeln!(out)?;
            }
        }

        if !dups.hash_errors.is_empty() {
            writeln!(out, "Unreadable Files:")?;
            writeln!(out, "-----------------")?;
            for error in &dups.hash_errors {
                writeln!(out, "  {}: {}", error.path.display(), error.message)?;
            }
            writeln!(out)?;
        }
    }

    if scan.has_errors() {
        writeln!(out, "Scan Errors:")?;
        writeln!(out, "------------")?;
        for error in scan.errors() {
            writeln!(out, "  {}: {}", error.path.display(), error.message)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Write the full report as pretty-printed JSON
pub fn write_json_report<W: Write>(
    out: &mut W,
    config: &ScanConfig,
    scan: &ScanResult,
    duplicates: Option<&DuplicateReport>,
) -> Result<()> {
    let report = JsonReport {
        config,
        scan,
        duplicates,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

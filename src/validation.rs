//! Database validation for untrusted SxGeo files
//!
//! Lookups already bounds-check every read, so a corrupt file can only
//! produce errors, never a crash. Validation goes further and checks that
//! the indexes are consistent with each other, so that lookups on the file
//! return meaningful answers:
//!
//! - Header and section boundaries
//! - First-level index is monotonic and inside the range table
//! - Main index covers every window that needs a bucket search
//! - (strict) Main index and range suffixes are sorted
//! - (strict) Every country id is present in the country table
//!
//! # Usage
//!
//! ```rust,no_run
//! use sxgeo::validation::{validate_database, ValidationLevel};
//! use std::path::Path;
//!
//! let report = validate_database(Path::new("SxGeo.dat"), ValidationLevel::Strict)?;
//!
//! if report.is_valid() {
//!     println!("✓ Database is consistent");
//! } else {
//!     for error in &report.errors {
//!         println!("  - {}", error);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::country::COUNTRY_COUNT;
use crate::error::{Result, SxGeoError};
use crate::sxgeo::{SearchEngine, SxGeoHeader};
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

/// Validation strictness level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    /// Header, boundaries and first-level index checks
    Standard,
    /// Standard checks plus a full scan of the main index and range table (default)
    Strict,
}

impl FromStr for ValidationLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(ValidationLevel::Standard),
            "strict" => Ok(ValidationLevel::Strict),
            _ => Err(format!(
                "Invalid validation level: '{}'. Must be: standard or strict",
                s
            )),
        }
    }
}

/// Validation report with detailed findings
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Problems that make lookups unreliable
    pub errors: Vec<String>,
    /// Suspicious but usable properties
    pub warnings: Vec<String>,
    /// Informational messages
    pub info: Vec<String>,
    /// Database statistics
    pub stats: DatabaseStats,
}

/// Database statistics gathered during validation
#[derive(Debug, Clone, Default)]
pub struct DatabaseStats {
    /// File size in bytes
    pub file_size: usize,
    /// Format version
    pub version: u8,
    /// Build time (unix seconds)
    pub timestamp: u32,
    /// First-level index entries
    pub first_index_count: u32,
    /// Main index entries
    pub main_index_count: u32,
    /// Range table rows
    pub ranges_count: u32,
    /// Distinct country ids referenced by the range table (strict only)
    pub distinct_countries: usize,
    /// Rows mapped to the reserved "unknown" id (strict only)
    pub unknown_rows: usize,
}

impl ValidationReport {
    /// Check if database passed all validations (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn info(&mut self, msg: impl Into<String>) {
        self.info.push(msg.into());
    }
}

impl DatabaseStats {
    /// Human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Version: v{}, First-level: {}, Main index: {}, Ranges: {}, Countries: {}, Size: {} KB",
            self.version,
            self.first_index_count,
            self.main_index_count,
            self.ranges_count,
            self.distinct_countries,
            self.file_size / 1024
        )
    }
}

/// Validate a database file
///
/// Only I/O failures are returned as `Err`; everything wrong with the file
/// contents is reported in the returned [`ValidationReport`].
pub fn validate_database(path: &Path, level: ValidationLevel) -> Result<ValidationReport> {
    let data = std::fs::read(path)
        .map_err(|e| SxGeoError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(validate_bytes(&data, level))
}

/// Validate a database held in memory
pub fn validate_bytes(data: &[u8], level: ValidationLevel) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.stats.file_size = data.len();

    let header = match SxGeoHeader::parse(data) {
        Ok(h) => h,
        Err(e) => {
            report.error(e.to_string());
            return report;
        }
    };
    report.stats.version = header.version;
    report.stats.timestamp = header.timestamp;
    report.stats.first_index_count = header.first_index_count as u32;
    report.stats.main_index_count = header.main_index_count as u32;
    report.stats.ranges_count = header.ranges_count;

    let layout = match header.layout(data.len()) {
        Ok(l) => l,
        Err(e) => {
            report.error(e.to_string());
            return report;
        }
    };
    let engine = match SearchEngine::from_buffer(data, &header, &layout) {
        Ok(e) => e,
        Err(e) => {
            report.error(e.to_string());
            return report;
        }
    };

    let trailing = data.len() - layout.end();
    if trailing > 0 {
        if header.regions_library_size > 0 || header.cities_library_size > 0 {
            report.info(format!(
                "{} bytes of region/city data follow the range table",
                trailing
            ));
        } else {
            report.warning(format!(
                "{} unexpected bytes after the range table",
                trailing
            ));
        }
    }
    if header.id_block_size > 1 {
        report.info(format!(
            "id blocks are {} bytes; only the first byte is used as the country id",
            header.id_block_size
        ));
    }

    validate_first_level(&engine, &header, &mut report);

    if level == ValidationLevel::Strict {
        validate_main_index(&engine, &mut report);
        validate_ranges(&engine, &mut report);
    }

    report
}

fn validate_first_level(
    engine: &SearchEngine<'_>,
    header: &SxGeoHeader,
    report: &mut ValidationReport,
) {
    let first_level = engine.first_level();
    let ranges = header.ranges_count as usize;
    let bucket_rows = header.one_index_blocks_count as usize;

    if first_level.len() < 2 {
        report.warning("first-level index has fewer than 2 entries; no address can be resolved");
    }

    let mut previous = 0usize;
    for i in 0..first_level.len() {
        let Some(value) = first_level.get(i) else {
            break;
        };
        let value = value as usize;
        if value < previous {
            report.error(format!(
                "first-level entry {} ({}) is below entry {} ({})",
                i,
                value,
                i - 1,
                previous
            ));
        }
        if value > ranges {
            report.error(format!(
                "first-level entry {} ({}) points past {} ranges",
                i, value, ranges
            ));
        }
        previous = value;
    }

    if bucket_rows == 0 {
        if header.main_index_count > 0 {
            report.warning("main index present but bucket size is 0; it will never be used");
        }
        return;
    }

    // Every window wide enough for a bucket search must be covered by the main index
    for octet in 1..first_level.len() {
        let Some((lo, hi)) = first_level.window(octet as u8) else {
            continue;
        };
        let (lo, hi) = (lo as usize, hi as usize);
        if hi > lo && hi - lo > bucket_rows && hi / bucket_rows > engine.main_index().len() {
            report.error(format!(
                "window for first octet {} needs main index entry {} but index has {}",
                octet,
                hi / bucket_rows - 1,
                engine.main_index().len()
            ));
        }
    }
}

fn validate_main_index(engine: &SearchEngine<'_>, report: &mut ValidationReport) {
    let main_index = engine.main_index();
    for i in 1..main_index.len() {
        if let (Some(prev), Some(cur)) = (main_index.get(i - 1), main_index.get(i)) {
            if cur < prev {
                report.error(format!(
                    "main index entry {} ({:#010x}) is below entry {} ({:#010x})",
                    i,
                    cur,
                    i - 1,
                    prev
                ));
            }
        }
    }
}

fn validate_ranges(engine: &SearchEngine<'_>, report: &mut ValidationReport) {
    let ranges = engine.ranges();
    let first_level = engine.first_level();

    // Suffixes only need to ascend inside one first-octet window
    for octet in 1..first_level.len() {
        let Some((lo, hi)) = first_level.window(octet as u8) else {
            continue;
        };
        let hi = (hi as usize).min(ranges.len());
        for row in (lo as usize + 1)..hi {
            if let (Some(prev), Some(cur)) = (ranges.suffix_u32(row - 1), ranges.suffix_u32(row)) {
                if cur < prev {
                    report.error(format!(
                        "range row {} (octet {}) starts below row {}",
                        row,
                        octet,
                        row - 1
                    ));
                } else if cur == prev {
                    report.warning(format!(
                        "range row {} (octet {}) duplicates row {}",
                        row,
                        octet,
                        row - 1
                    ));
                }
            }
        }
    }

    let mut countries = BTreeSet::new();
    let mut unknown_rows = 0usize;
    for row in 0..ranges.len() {
        let Some(id) = ranges.id_block(row).and_then(|b| b.first().copied()) else {
            continue;
        };
        if id as usize >= COUNTRY_COUNT {
            report.error(format!(
                "range row {} has country id {} outside the {}-entry table",
                row, id, COUNTRY_COUNT
            ));
        } else if id == 0 {
            unknown_rows += 1;
        } else {
            countries.insert(id);
        }
    }
    report.stats.distinct_countries = countries.len();
    report.stats.unknown_rows = unknown_rows;
    if unknown_rows > 0 {
        report.info(format!("{} ranges map to no country", unknown_rows));
    }
}

use anyhow::{Context, Result};
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;
use sxgeo::validation::{validate_database, ValidationLevel};

pub fn cmd_validate(database: PathBuf, level_str: String, json_output: bool) -> Result<()> {
    let level: ValidationLevel = level_str.parse().map_err(anyhow::Error::msg)?;

    let start = Instant::now();
    let report = validate_database(&database, level)
        .with_context(|| format!("Validation failed: {}", database.display()))?;
    let duration = start.elapsed();

    if json_output {
        let output = json!({
            "database": database.display().to_string(),
            "validation_level": level_str,
            "is_valid": report.is_valid(),
            "duration_ms": duration.as_millis(),
            "errors": report.errors,
            "warnings": report.warnings,
            "info": report.info,
            "stats": {
                "file_size": report.stats.file_size,
                "version": report.stats.version,
                "timestamp": report.stats.timestamp,
                "first_index_count": report.stats.first_index_count,
                "main_index_count": report.stats.main_index_count,
                "ranges_count": report.stats.ranges_count,
                "distinct_countries": report.stats.distinct_countries,
                "unknown_rows": report.stats.unknown_rows,
            }
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Validating: {}", database.display());
        println!("Level:      {}", level_str);
        println!();
        println!("Statistics:");
        println!("  {}", report.stats.summary());
        println!("  Validation time: {}ms", duration.as_millis());
        println!();

        if !report.errors.is_empty() {
            println!("ERRORS ({}):", report.errors.len());
            for error in &report.errors {
                println!("  • {}", error);
            }
            println!();
        }
        if !report.warnings.is_empty() {
            println!("WARNINGS ({}):", report.warnings.len());
            for warning in &report.warnings {
                println!("  • {}", warning);
            }
            println!();
        }
        for info in &report.info {
            println!("  {}", info);
        }

        if report.is_valid() {
            println!("✓ VALID: database is consistent");
        } else {
            println!("✗ INVALID: database has {} error(s)", report.errors.len());
        }
    }

    if !report.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::json;
use std::path::PathBuf;
use sxgeo::Database;

use crate::cli_utils::load_fixtures;

pub fn cmd_check(database: PathBuf, fixtures: PathBuf, json_output: bool) -> Result<()> {
    let db = Database::open(&database)
        .with_context(|| format!("Failed to load database: {}", database.display()))?;
    let fixtures = load_fixtures(&fixtures)?;

    // One shared read-only database serves every worker
    let mismatches: Vec<(String, String, String)> = fixtures
        .par_iter()
        .filter_map(|f| {
            let got = match db.lookup(&f.ip) {
                Ok(code) => code.to_string(),
                Err(e) => format!("<{}>", e),
            };
            if got.eq_ignore_ascii_case(&f.country) {
                None
            } else {
                Some((f.ip.clone(), f.country.clone(), got))
            }
        })
        .collect();
    log::info!(
        "checked {} fixtures, {} mismatches",
        fixtures.len(),
        mismatches.len()
    );

    if json_output {
        let output = json!({
            "database": database.display().to_string(),
            "total": fixtures.len(),
            "passed": fixtures.len() - mismatches.len(),
            "mismatches": mismatches
                .iter()
                .map(|(ip, expected, got)| json!({ "ip": ip, "expected": expected, "got": got }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (ip, expected, got) in &mismatches {
            println!("✗ {}: expected {}, got {}", ip, expected, got);
        }
        println!(
            "{}/{} fixtures passed",
            fixtures.len() - mismatches.len(),
            fixtures.len()
        );
    }

    if !mismatches.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

use anyhow::{Context, Result};
use serde_json::json;
use std::path::PathBuf;
use sxgeo::sxgeo::parse_ipv4;
use sxgeo::Database;

pub fn cmd_query(database: PathBuf, ips: Vec<String>, quiet: bool) -> Result<()> {
    let db = Database::open(&database)
        .with_context(|| format!("Failed to load database: {}", database.display()))?;

    let mut all_found = true;
    let mut results = Vec::with_capacity(ips.len());
    for ip in &ips {
        match parse_ipv4(ip).and_then(|addr| db.resolve(addr)) {
            Ok((id, code)) => {
                if code.is_empty() {
                    all_found = false;
                }
                results.push(json!({ "ip": ip, "country": code, "id": id }));
            }
            Err(e) => {
                log::info!("{}: {}", ip, e);
                all_found = false;
                results.push(json!({ "ip": ip, "error": e.to_string() }));
            }
        }
    }

    if !quiet {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    std::process::exit(if all_found { 0 } else { 1 });
}

use anyhow::{Context, Result};
use serde_json::json;
use std::path::PathBuf;
use sxgeo::Database;

use crate::cli_utils::format_unix_timestamp;

pub fn cmd_inspect(database: PathBuf, json_output: bool) -> Result<()> {
    let db = Database::open(&database)
        .with_context(|| format!("Failed to load database: {}", database.display()))?;
    let h = db.header();
    let layout = db.layout();

    if json_output {
        let output = json!({
            "file": database.display().to_string(),
            "size": db.size(),
            "header": {
                "version": h.version,
                "timestamp": h.timestamp,
                "parser_type": h.parser_type,
                "charset": h.charset,
                "first_index_count": h.first_index_count,
                "main_index_count": h.main_index_count,
                "one_index_blocks_count": h.one_index_blocks_count,
                "ranges_count": h.ranges_count,
                "id_block_size": h.id_block_size,
                "max_region_record_size": h.max_region_record_size,
                "max_city_record_size": h.max_city_record_size,
                "regions_library_size": h.regions_library_size,
                "cities_library_size": h.cities_library_size,
                "max_country_record_size": h.max_country_record_size,
                "countries_library_size": h.countries_library_size,
                "pack_size": h.pack_size,
            },
            "layout": {
                "first_level": { "offset": layout.first_level.offset, "len": layout.first_level.len },
                "main_index": { "offset": layout.main_index.offset, "len": layout.main_index.len },
                "range_table": { "offset": layout.range_table.offset, "len": layout.range_table.len },
                "block_size": layout.block_size,
                "trailing_bytes": db.size() - layout.end(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Database: {}", database.display());
    println!("Size:     {} bytes", db.size());
    println!();
    println!("Header:");
    println!("  Version:         {}", h.version);
    println!(
        "  Build time:      {} ({})",
        format_unix_timestamp(h.timestamp as u64),
        h.timestamp
    );
    println!("  Parser type:     {}", h.parser_type);
    println!("  Charset:         {}", h.charset);
    println!("  First-level:     {} entries", h.first_index_count);
    println!(
        "  Main index:      {} entries, {} ranges per bucket",
        h.main_index_count, h.one_index_blocks_count
    );
    println!(
        "  Ranges:          {} rows of {} bytes (id block {})",
        h.ranges_count, layout.block_size, h.id_block_size
    );
    if h.regions_library_size > 0 || h.cities_library_size > 0 {
        println!(
            "  Regions/cities:  {} / {} bytes (not used for country lookups)",
            h.regions_library_size, h.cities_library_size
        );
    }
    println!();
    println!("Layout:");
    for (name, section) in [
        ("first-level", layout.first_level),
        ("main index", layout.main_index),
        ("range table", layout.range_table),
    ] {
        println!(
            "  {:<12} [{:>10}, {:>10})  {} bytes",
            name,
            section.offset,
            section.end(),
            section.len
        );
    }

    Ok(())
}

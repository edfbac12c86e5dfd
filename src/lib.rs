//! sxgeo - IPv4 to Country Lookups over Sypex Geo Databases
//!
//! sxgeo reads the compact, append-only SxGeo binary format and resolves
//! IPv4 addresses to two-letter country codes. The whole file is held in
//! memory (owned or memory-mapped) and never modified; lookups are pure
//! functions of the loaded bytes.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sxgeo::Database;
//!
//! let db = Database::open("SxGeo.dat")?;
//!
//! match db.lookup("188.163.89.66") {
//!     Ok(code) => println!("country: {}", code),
//!     Err(e) => eprintln!("lookup failed: {}", e),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │  SxGeo File Format                   │
//! ├──────────────────────────────────────┤
//! │  1. Header (40 bytes, big-endian)    │
//! │  2. First-level index (by octet 1)   │
//! │  3. Main index (bucket addresses)    │
//! │  4. Range table (suffix + id)        │
//! └──────────────────────────────────────┘
//!          ↓ lookup("a.b.c.d")
//! ┌──────────────────────────────────────┐
//! │  octet a → row window                │
//! │  main index → bucket (wide windows)  │
//! │  range table → row → country id      │
//! │  country table → "XX"                │
//! └──────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Country id to alpha-2 code table
pub mod country;
/// Unified database API
pub mod database;
/// Error types for sxgeo operations
pub mod error;
/// SxGeo binary format implementation
pub mod sxgeo;
/// Structural validation of database files
pub mod validation;

/// Database loaded from an SxGeo file
pub use crate::database::{Database, DatabaseOpener};

pub use crate::country::{country_code, country_id};
pub use crate::error::{Result, SxGeoError};
pub use crate::sxgeo::SxGeoHeader;
pub use crate::validation::{ValidationLevel, ValidationReport};

/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

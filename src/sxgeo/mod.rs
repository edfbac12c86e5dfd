//! Sypex Geo (SxGeo) Binary Format Reader
//!
//! This module decodes the compact big-endian SxGeo country database and
//! searches it for IPv4 addresses.
//!
//! ## Architecture
//!
//! - **types**: format constants and section descriptors
//! - **format**: header decoding and section layout
//! - **index**: bounds-checked views over the first-level index, main index
//!   and range table
//! - **search**: the two-stage binary search that turns an address into a
//!   country id
//!
//! Views borrow the database buffer; nothing is copied out of it.

pub mod format;
pub mod index;
pub mod search;
pub mod types;

pub use format::SxGeoHeader;
pub use index::{FirstLevelIndex, MainIndex, RangeTable};
pub use search::{parse_ipv4, SearchEngine};
pub use types::{Layout, Section, HEADER_SIZE, MAGIC};

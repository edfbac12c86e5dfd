//! Two-stage range search
//!
//! Resolves an IPv4 address to a range table row in three steps:
//!
//! 1. The first octet selects a window of rows from the first-level index.
//! 2. If the window spans more than one main index bucket, a binary search
//!    over the main index narrows it to a single bucket.
//! 3. A binary search over the remaining rows, on the low 24 bits of the
//!    address, finds the first row that starts after the address.
//!
//! The country id for that row is stored in the id block of the row
//! before it, so the result is the range `[start, next_start)` that
//! contains the address.
//!
//! Both binary searches use the midpoint `(min + max) >> 1`, so the window
//! shrinks strictly on every iteration and the loops always terminate.

use super::format::SxGeoHeader;
use super::index::{FirstLevelIndex, MainIndex, RangeTable};
use super::types::{Layout, IP_SUFFIX_SIZE, LINEAR_SCAN_THRESHOLD};
use crate::country::country_code;
use crate::error::{Result, SxGeoError};
use std::net::Ipv4Addr;

/// Parse a dotted-quad IPv4 address
///
/// Accepts exactly four dot-separated decimal octets in `[0, 255]`.
pub fn parse_ipv4(input: &str) -> Result<Ipv4Addr> {
    input.parse::<Ipv4Addr>().map_err(|_| {
        SxGeoError::invalid_address(format!("'{}' is not a dotted-quad IPv4 address", input))
    })
}

/// Search engine over the three index views of one database
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'a> {
    first_level: FirstLevelIndex<'a>,
    main_index: MainIndex<'a>,
    ranges: RangeTable<'a>,
    /// Rows per main index bucket
    bucket_rows: usize,
}

impl<'a> SearchEngine<'a> {
    /// Assemble an engine from already-built views
    pub fn new(
        first_level: FirstLevelIndex<'a>,
        main_index: MainIndex<'a>,
        ranges: RangeTable<'a>,
        one_index_blocks_count: u16,
    ) -> Self {
        Self {
            first_level,
            main_index,
            ranges,
            bucket_rows: one_index_blocks_count as usize,
        }
    }

    /// Build the views for `buffer` from a decoded header and its layout
    pub fn from_buffer(buffer: &'a [u8], header: &SxGeoHeader, layout: &Layout) -> Result<Self> {
        let first_level = FirstLevelIndex::from_section(
            buffer,
            layout.first_level,
            header.first_index_count as usize,
        )?;
        let main_index =
            MainIndex::from_section(buffer, layout.main_index, header.main_index_count as usize)?;
        let ranges = RangeTable::from_section(
            buffer,
            layout.range_table,
            header.ranges_count as usize,
            header.id_block_size as usize,
        )?;
        Ok(Self::new(
            first_level,
            main_index,
            ranges,
            header.one_index_blocks_count,
        ))
    }

    /// The first-level index view
    pub fn first_level(&self) -> &FirstLevelIndex<'a> {
        &self.first_level
    }

    /// The main index view
    pub fn main_index(&self) -> &MainIndex<'a> {
        &self.main_index
    }

    /// The range table view
    pub fn ranges(&self) -> &RangeTable<'a> {
        &self.ranges
    }

    /// Resolve an address to its alpha-2 country code
    pub fn lookup(&self, ip: Ipv4Addr) -> Result<&'static str> {
        self.resolve(ip).map(|(_, code)| code)
    }

    /// Resolve an address to its raw country id and alpha-2 code
    pub fn resolve(&self, ip: Ipv4Addr) -> Result<(u8, &'static str)> {
        let id = self.country_id(ip)?;
        let code = country_code(id as usize).ok_or_else(|| {
            SxGeoError::unknown_country(format!("{} resolved to id {} outside the table", ip, id))
        })?;
        Ok((id, code))
    }

    /// Resolve an address to its raw country id
    pub fn country_id(&self, ip: Ipv4Addr) -> Result<u8> {
        let row = self.find_row(ip)?;
        if row == 0 {
            return Err(SxGeoError::unknown_country(format!(
                "{} lies before the first range",
                ip
            )));
        }
        self.ranges.id_before(row).ok_or_else(|| {
            SxGeoError::unknown_country(format!("{} resolved to row {} with no id block", ip, row))
        })
    }

    /// Find the first row whose range starts after `ip`
    ///
    /// The result is in `[lo, hi]` of the first-level window; the country
    /// for `ip` belongs to the row before it.
    pub fn find_row(&self, ip: Ipv4Addr) -> Result<usize> {
        let octets = ip.octets();
        let first_octet = octets[0];
        if first_octet == 0 {
            return Err(SxGeoError::invalid_address(format!(
                "{}: first octet 0 is not indexed",
                ip
            )));
        }

        let (lo, hi) = self.first_level.window(first_octet).ok_or_else(|| {
            SxGeoError::unknown_country(format!(
                "{}: first octet {} is past the {}-entry first-level index",
                ip,
                first_octet,
                self.first_level.len()
            ))
        })?;
        let (lo, hi) = (lo as usize, hi as usize);
        if lo > hi || hi > self.ranges.len() {
            return Err(SxGeoError::malformed(format!(
                "first-level window [{}, {}) for octet {} does not fit {} ranges",
                lo,
                hi,
                first_octet,
                self.ranges.len()
            )));
        }

        let (min, max) = if self.bucket_rows > 0 && hi - lo > self.bucket_rows {
            let rows = self.bucket_rows;
            let part = self.search_main_index(u32::from(ip), lo / rows, hi / rows - 1)?;
            let min = if part > 0 { part * rows } else { 0 };
            let max = ((part + 1) * rows).min(self.ranges.len());
            (min.max(lo), max.min(hi))
        } else {
            (lo, hi)
        };
        log::trace!(
            "{}: window [{}, {}) narrowed to [{}, {})",
            ip,
            lo,
            hi,
            min,
            max
        );

        let suffix = [octets[1], octets[2], octets[3]];
        self.search_ranges(&suffix, min, max)
    }

    /// Find the first main index bucket in `[min, max]` whose address is
    /// `>= ip`, or `max + 1` when every bucket is below it
    fn search_main_index(&self, ip: u32, mut min: usize, mut max: usize) -> Result<usize> {
        while max - min > LINEAR_SCAN_THRESHOLD {
            let mid = (min + max) >> 1;
            if ip > self.main_entry(mid)? {
                min = mid;
            } else {
                max = mid;
            }
        }

        while ip > self.main_entry(min)? {
            let last = min >= max;
            min += 1;
            if last {
                break;
            }
        }
        Ok(min)
    }

    fn main_entry(&self, index: usize) -> Result<u32> {
        self.main_index.get(index).ok_or_else(|| {
            SxGeoError::malformed(format!(
                "main index entry {} requested, index has {}",
                index,
                self.main_index.len()
            ))
        })
    }

    /// Find the first row in `[min, max)` whose suffix is greater than
    /// `suffix`, or `max` when there is none
    fn search_ranges(
        &self,
        suffix: &[u8; IP_SUFFIX_SIZE],
        mut min: usize,
        mut max: usize,
    ) -> Result<usize> {
        if min >= max {
            return Ok(min);
        }

        while max - min > LINEAR_SCAN_THRESHOLD {
            let mid = (min + max) >> 1;
            if &suffix[..] >= self.row_suffix(mid)? {
                min = mid;
            } else {
                max = mid;
            }
        }

        while &suffix[..] >= self.row_suffix(min)? {
            min += 1;
            if min >= max {
                break;
            }
        }
        Ok(min)
    }

    fn row_suffix(&self, row: usize) -> Result<&'a [u8]> {
        self.ranges.suffix(row).ok_or_else(|| {
            SxGeoError::malformed(format!(
                "range row {} requested, table has {}",
                row,
                self.ranges.len()
            ))
        })
    }
}

//! Header decoding
//!
//! The header is a fixed 40-byte big-endian record. It is decoded once when
//! the database is opened; everything after it stays in the buffer and is
//! read through the index views.
//!
//! Only the fields needed for country lookups drive the layout. The region,
//! city and pack sizes are decoded for inspection but no lookup reads the
//! tables they describe.

use super::types::{
    Layout, Section, FIRST_LEVEL_ENTRY_SIZE, HEADER_SIZE, IP_SUFFIX_SIZE, MAGIC,
    MAIN_INDEX_ENTRY_SIZE,
};
use crate::error::{Result, SxGeoError};
use zerocopy::byteorder::big_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

/// On-disk header, byte for byte
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout, Unaligned)]
struct RawHeader {
    magic: [u8; 3],
    version: u8,
    timestamp: U32,
    parser_type: u8,
    charset: u8,
    first_index_count: u8,
    main_index_count: U16,
    one_index_blocks_count: U16,
    ranges_count: U32,
    id_block_size: u8,
    max_region_record_size: U16,
    max_city_record_size: U16,
    regions_library_size: U32,
    cities_library_size: U32,
    max_country_record_size: U16,
    countries_library_size: U32,
    pack_size: U16,
}

const _: () = assert!(std::mem::size_of::<RawHeader>() == HEADER_SIZE);

/// Decoded database header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SxGeoHeader {
    /// Format version
    pub version: u8,
    /// Build time (unix seconds)
    pub timestamp: u32,
    /// Parser type of the source data
    pub parser_type: u8,
    /// String charset id
    pub charset: u8,
    /// Entries in the first-level index
    pub first_index_count: u8,
    /// Entries in the main index
    pub main_index_count: u16,
    /// Range table rows covered by one main index entry
    pub one_index_blocks_count: u16,
    /// Rows in the range table
    pub ranges_count: u32,
    /// Bytes of id per range table row
    pub id_block_size: u8,
    /// Largest region record
    pub max_region_record_size: u16,
    /// Largest city record
    pub max_city_record_size: u16,
    /// Size of the region table
    pub regions_library_size: u32,
    /// Size of the city table
    pub cities_library_size: u32,
    /// Largest country record
    pub max_country_record_size: u16,
    /// Size of the country table
    pub countries_library_size: u32,
    /// Size of the pack format description
    pub pack_size: u16,
}

impl SxGeoHeader {
    /// Decode the header at the start of `data`
    ///
    /// Fails if the buffer cannot hold a header or does not start with the
    /// `SxG` magic.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (raw, _) = RawHeader::read_from_prefix(data).map_err(|_| {
            SxGeoError::malformed(format!(
                "buffer is {} bytes, header needs {}",
                data.len(),
                HEADER_SIZE
            ))
        })?;

        if &raw.magic != MAGIC {
            return Err(SxGeoError::malformed(format!(
                "bad magic {:02x?}, expected {:?}",
                raw.magic, "SxG"
            )));
        }

        Ok(Self {
            version: raw.version,
            timestamp: raw.timestamp.get(),
            parser_type: raw.parser_type,
            charset: raw.charset,
            first_index_count: raw.first_index_count,
            main_index_count: raw.main_index_count.get(),
            one_index_blocks_count: raw.one_index_blocks_count.get(),
            ranges_count: raw.ranges_count.get(),
            id_block_size: raw.id_block_size,
            max_region_record_size: raw.max_region_record_size.get(),
            max_city_record_size: raw.max_city_record_size.get(),
            regions_library_size: raw.regions_library_size.get(),
            cities_library_size: raw.cities_library_size.get(),
            max_country_record_size: raw.max_country_record_size.get(),
            countries_library_size: raw.countries_library_size.get(),
            pack_size: raw.pack_size.get(),
        })
    }

    /// Size of one range table row
    pub fn block_size(&self) -> usize {
        IP_SUFFIX_SIZE + self.id_block_size as usize
    }

    /// Compute section boundaries and check them against the buffer length
    pub fn layout(&self, buffer_len: usize) -> Result<Layout> {
        if self.id_block_size == 0 {
            return Err(SxGeoError::malformed("id block size is 0"));
        }

        let block_size = self.block_size();
        let first_level = Section::new(
            HEADER_SIZE,
            self.first_index_count as usize * FIRST_LEVEL_ENTRY_SIZE,
        );
        let main_index = Section::new(
            first_level.end(),
            self.main_index_count as usize * MAIN_INDEX_ENTRY_SIZE,
        );
        let range_len = (self.ranges_count as usize)
            .checked_mul(block_size)
            .ok_or_else(|| SxGeoError::malformed("range table size overflows"))?;
        let range_table = Section::new(main_index.end(), range_len);

        let range_end = range_table
            .offset
            .checked_add(range_table.len)
            .ok_or_else(|| SxGeoError::malformed("range table end overflows"))?;

        for (name, end) in [
            ("first-level index", first_level.end()),
            ("main index", main_index.end()),
            ("range table", range_end),
        ] {
            if end > buffer_len {
                return Err(SxGeoError::malformed(format!(
                    "{} ends at byte {} but buffer is {} bytes",
                    name, end, buffer_len
                )));
            }
        }

        Ok(Layout {
            first_level,
            main_index,
            range_table,
            block_size,
        })
    }
}

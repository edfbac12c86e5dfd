//! Borrowed views over the index sections
//!
//! Each view wraps a slice of the database buffer and checks, on
//! construction, that the slice holds exactly the number of elements the
//! header declares. All accessors are bounds-checked and return `None`
//! instead of panicking.

use super::types::{Section, IP_SUFFIX_SIZE};
use crate::error::{Result, SxGeoError};
use zerocopy::byteorder::big_endian::U32;
use zerocopy::FromBytes;

fn section_bytes<'a>(buffer: &'a [u8], section: Section, name: &str) -> Result<&'a [u8]> {
    section.slice(buffer).ok_or_else(|| {
        SxGeoError::malformed(format!(
            "{} [{}..{}) lies outside the {}-byte buffer",
            name,
            section.offset,
            section.offset.saturating_add(section.len),
            buffer.len()
        ))
    })
}

fn u32_table<'a>(data: &'a [u8], count: usize, name: &str) -> Result<&'a [U32]> {
    let entries = <[U32]>::ref_from_bytes(data).map_err(|_| {
        SxGeoError::malformed(format!(
            "{} is {} bytes, not a whole number of entries",
            name,
            data.len()
        ))
    })?;
    if entries.len() != count {
        return Err(SxGeoError::malformed(format!(
            "{} holds {} entries, header declares {}",
            name,
            entries.len(),
            count
        )));
    }
    Ok(entries)
}

/// Coarse index addressed by the first octet of the address
///
/// Stores one row offset per octet. The window for first octet `o` is the
/// overlapping pair `(idx[o - 1], idx[o])`: the range table rows whose
/// addresses start with `o`.
#[derive(Debug, Clone, Copy)]
pub struct FirstLevelIndex<'a> {
    entries: &'a [U32],
}

impl<'a> FirstLevelIndex<'a> {
    /// Wrap `data`, which must hold exactly `count` entries
    pub fn new(data: &'a [u8], count: usize) -> Result<Self> {
        Ok(Self {
            entries: u32_table(data, count, "first-level index")?,
        })
    }

    /// Borrow the first-level section out of the whole buffer
    pub fn from_section(buffer: &'a [u8], section: Section, count: usize) -> Result<Self> {
        Self::new(section_bytes(buffer, section, "first-level index")?, count)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the index has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw entry at `index`
    pub fn get(&self, index: usize) -> Option<u32> {
        self.entries.get(index).map(|v| v.get())
    }

    /// Row window `(lo, hi)` for a first octet
    ///
    /// Returns `None` for octet 0 and for octets past the end of the index.
    pub fn window(&self, first_octet: u8) -> Option<(u32, u32)> {
        let octet = first_octet as usize;
        if octet == 0 {
            return None;
        }
        Some((self.get(octet - 1)?, self.get(octet)?))
    }
}

/// Secondary index: one address per bucket of range table rows
#[derive(Debug, Clone, Copy)]
pub struct MainIndex<'a> {
    entries: &'a [U32],
}

impl<'a> MainIndex<'a> {
    /// Wrap `data`, which must hold exactly `count` entries
    pub fn new(data: &'a [u8], count: usize) -> Result<Self> {
        Ok(Self {
            entries: u32_table(data, count, "main index")?,
        })
    }

    /// Borrow the main index section out of the whole buffer
    pub fn from_section(buffer: &'a [u8], section: Section, count: usize) -> Result<Self> {
        Self::new(section_bytes(buffer, section, "main index")?, count)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the index has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Address stored for bucket `index`
    pub fn get(&self, index: usize) -> Option<u32> {
        self.entries.get(index).map(|v| v.get())
    }
}

/// Sorted table of range start markers
///
/// Each row is a 3-byte address suffix (octets 2-4) followed by an id
/// block. The id that applies to a search result `r` is the block ending
/// at `r * block_size`, i.e. the trailing id of row `r - 1`.
#[derive(Debug, Clone, Copy)]
pub struct RangeTable<'a> {
    data: &'a [u8],
    rows: usize,
    block_size: usize,
    id_block_size: usize,
}

impl<'a> RangeTable<'a> {
    /// Wrap `data`, which must hold exactly `rows` records of
    /// `3 + id_block_size` bytes
    pub fn new(data: &'a [u8], rows: usize, id_block_size: usize) -> Result<Self> {
        if id_block_size == 0 {
            return Err(SxGeoError::malformed("id block size is 0"));
        }
        let block_size = IP_SUFFIX_SIZE + id_block_size;
        if rows.checked_mul(block_size) != Some(data.len()) {
            return Err(SxGeoError::malformed(format!(
                "range table is {} bytes, header declares {} rows of {} bytes",
                data.len(),
                rows,
                block_size
            )));
        }
        Ok(Self {
            data,
            rows,
            block_size,
            id_block_size,
        })
    }

    /// Borrow the range table section out of the whole buffer
    pub fn from_section(
        buffer: &'a [u8],
        section: Section,
        rows: usize,
        id_block_size: usize,
    ) -> Result<Self> {
        Self::new(
            section_bytes(buffer, section, "range table")?,
            rows,
            id_block_size,
        )
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows
    }

    /// True if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Bytes per row
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Address suffix of `row`
    pub fn suffix(&self, row: usize) -> Option<&'a [u8]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.block_size;
        self.data.get(start..start + IP_SUFFIX_SIZE)
    }

    /// Address suffix of `row` as a 24-bit integer
    pub fn suffix_u32(&self, row: usize) -> Option<u32> {
        let s = self.suffix(row)?;
        Some(u32::from_be_bytes([0, s[0], s[1], s[2]]))
    }

    /// The id block stored with `row`
    pub fn id_block(&self, row: usize) -> Option<&'a [u8]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.block_size + IP_SUFFIX_SIZE;
        self.data.get(start..start + self.id_block_size)
    }

    /// Country id that applies to search result `row`
    ///
    /// This is the first byte of the id block immediately preceding the
    /// row, so row 0 has none. `row == len()` is valid and reads the last
    /// row's id.
    pub fn id_before(&self, row: usize) -> Option<u8> {
        let end = row.checked_mul(self.block_size)?;
        let start = end.checked_sub(self.id_block_size)?;
        if row == 0 || end > self.data.len() {
            return None;
        }
        self.data.get(start).copied()
    }
}

//! Format constants and section descriptors
//!
//! Layout of a database file (all integers big-endian):
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Header (40 bytes)                            │
//! ├──────────────────────────────────────────────┤
//! │ First-level index  (count × u32)             │
//! ├──────────────────────────────────────────────┤
//! │ Main index         (count × u32)             │
//! ├──────────────────────────────────────────────┤
//! │ Range table        (count × (3 + id_len))    │
//! └──────────────────────────────────────────────┘
//! ```

/// Magic bytes at the start of every database: "SxG"
pub const MAGIC: &[u8; 3] = b"SxG";

/// Size of the fixed header in bytes
pub const HEADER_SIZE: usize = 40;

/// Width of one first-level index value
pub const FIRST_LEVEL_ENTRY_SIZE: usize = 4;

/// Width of one main index value
pub const MAIN_INDEX_ENTRY_SIZE: usize = 4;

/// Bytes of IP address stored per range record (octets 2-4)
pub const IP_SUFFIX_SIZE: usize = 3;

/// Binary search stops narrowing once the window is this small
pub const LINEAR_SCAN_THRESHOLD: usize = 8;

/// A byte range inside the database buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Section {
    /// Offset from the start of the buffer
    pub offset: usize,
    /// Length in bytes
    pub len: usize,
}

impl Section {
    /// Create a section descriptor
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// One past the last byte of the section
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Borrow the section from a buffer, `None` if it does not fit
    pub fn slice<'a>(&self, buffer: &'a [u8]) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(self.len)?;
        buffer.get(self.offset..end)
    }
}

/// Section boundaries derived from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// First-level index, direct-indexed by the first octet
    pub first_level: Section,
    /// Main index, one value per range table bucket
    pub main_index: Section,
    /// Range table records
    pub range_table: Section,
    /// Size of one range table record (3 + id block size)
    pub block_size: usize,
}

impl Layout {
    /// Offset one past the range table
    pub fn end(&self) -> usize {
        self.range_table.end()
    }
}

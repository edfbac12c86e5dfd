//! Synthetic SxGeo database builder shared by integration tests and benches

#![allow(dead_code)]

use std::net::Ipv4Addr;

/// One range: full start address and its id block
#[derive(Debug, Clone)]
pub struct Range {
    pub start: u32,
    pub id: Vec<u8>,
}

impl Range {
    pub fn new(start: Ipv4Addr, country: u8) -> Self {
        Self {
            start: u32::from(start),
            id: vec![country],
        }
    }
}

/// Builds a database image from a sorted list of ranges
///
/// The first-level entry for octet `k` is the number of ranges whose first
/// octet is `<= k`, so the window for octet `o` is exactly the ranges that
/// start inside `o.0.0.0/8`. Main index entry `k` holds the full start
/// address of the last range in bucket `k`.
#[derive(Debug, Clone)]
pub struct DbBuilder {
    ranges: Vec<Range>,
    first_index_count: u8,
    bucket_rows: u16,
    id_block_size: u8,
    timestamp: u32,
    trailing: Vec<u8>,
    regions_library_size: u32,
}

impl DbBuilder {
    pub fn new() -> Self {
        Self {
            ranges: Vec::new(),
            first_index_count: 224,
            bucket_rows: 0,
            id_block_size: 1,
            timestamp: 1_700_000_000,
            trailing: Vec::new(),
            regions_library_size: 0,
        }
    }

    pub fn range(mut self, start: &str, country: u8) -> Self {
        let ip: Ipv4Addr = start.parse().expect("test address");
        self.ranges.push(Range::new(ip, country));
        self
    }

    pub fn ranges(mut self, ranges: impl IntoIterator<Item = (u32, u8)>) -> Self {
        for (start, country) in ranges {
            self.ranges.push(Range {
                start,
                id: vec![country],
            });
        }
        self
    }

    pub fn first_index_count(mut self, count: u8) -> Self {
        self.first_index_count = count;
        self
    }

    pub fn bucket_rows(mut self, rows: u16) -> Self {
        self.bucket_rows = rows;
        self
    }

    /// Widen every id block, padding with `0xee` after the country byte
    pub fn id_block_size(mut self, size: u8) -> Self {
        self.id_block_size = size;
        self
    }

    pub fn trailing(mut self, bytes: &[u8], as_region_data: bool) -> Self {
        self.trailing = bytes.to_vec();
        if as_region_data {
            self.regions_library_size = bytes.len() as u32;
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut ranges = self.ranges.clone();
        ranges.sort_by_key(|r| r.start);
        let rows = ranges.len();
        let bucket = self.bucket_rows as usize;
        let main_len = if bucket > 0 { rows / bucket } else { 0 };

        let mut data = vec![0u8; 40];
        data[0..3].copy_from_slice(b"SxG");
        data[3] = 22;
        data[4..8].copy_from_slice(&self.timestamp.to_be_bytes());
        data[9] = 1;
        data[10] = self.first_index_count;
        data[11..13].copy_from_slice(&(main_len as u16).to_be_bytes());
        data[13..15].copy_from_slice(&self.bucket_rows.to_be_bytes());
        data[15..19].copy_from_slice(&(rows as u32).to_be_bytes());
        data[19] = self.id_block_size;
        data[24..28].copy_from_slice(&self.regions_library_size.to_be_bytes());

        for k in 0..self.first_index_count as u32 {
            let count = ranges.partition_point(|r| r.start >> 24 <= k) as u32;
            data.extend_from_slice(&count.to_be_bytes());
        }
        for k in 0..main_len {
            let last = &ranges[(k + 1) * bucket - 1];
            data.extend_from_slice(&last.start.to_be_bytes());
        }
        for r in &ranges {
            data.extend_from_slice(&r.start.to_be_bytes()[1..]);
            let mut id = r.id.clone();
            id.resize(self.id_block_size as usize, 0xee);
            data.extend_from_slice(&id);
        }
        data.extend_from_slice(&self.trailing);
        data
    }

    /// Country id by linear scan: the last range starting at or before `ip`
    ///
    /// `None` when `ip` is before every range or its first octet has no
    /// first-level entry.
    pub fn reference_id(&self, ip: Ipv4Addr) -> Option<u8> {
        let ip = u32::from(ip);
        if (ip >> 24) >= self.first_index_count as u32 {
            return None;
        }
        self.ranges
            .iter()
            .filter(|r| r.start <= ip)
            .max_by_key(|r| r.start)
            .map(|r| r.id[0])
    }
}

impl Default for DbBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `count` ranges spread evenly over `1.0.0.0..224.0.0.0` with ids 1..=254
pub fn spread_ranges(count: u32) -> Vec<(u32, u8)> {
    let low = 1u32 << 24;
    let span = (224u32 << 24) - low;
    let step = (span / count).max(1);
    (0..count)
        .map(|i| (low + i * step, (i % 254) as u8 + 1))
        .collect()
}

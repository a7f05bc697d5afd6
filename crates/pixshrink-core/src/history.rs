//! A short, in-memory log of recent compressions for the current session.

use std::collections::VecDeque;

use serde::Serialize;

use crate::format::compression_ratio;

/// Entries kept when no capacity is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// One completed compression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionRecord {
    pub file_name: String,
    pub original_size: u64,
    pub compressed_size: u64,
    pub quality_percent: u8,
}

impl CompressionRecord {
    /// Percentage of the original saved. Negative if the output grew.
    pub fn ratio(&self) -> f64 {
        compression_ratio(self.original_size, self.compressed_size)
    }
}

/// Bounded FIFO of records; the oldest entry is evicted when full.
#[derive(Debug, Clone, Serialize)]
pub struct SessionLog {
    records: VecDeque<CompressionRecord>,
    #[serde(skip)]
    capacity: usize,
}

impl SessionLog {
    /// A capacity of zero disables the log.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, record: CompressionRecord) {
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Oldest first.
    pub fn records(&self) -> impl Iterator<Item = &CompressionRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&CompressionRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

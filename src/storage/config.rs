// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Configuration for MVCC storage initialization.

use std::ops::Range;

use super::Value;

/// Number of integer keys seeded by the benchmark workload.
pub const WORKLOAD_KEY_COUNT: u64 = 1_000_000;

/// Configuration for [`MvccStorage`](super::MvccStorage) construction.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Integer keys that receive a seed version at timestamp zero.
    pub seed_keys: Range<u64>,
    /// Value written into every seed version.
    pub seed_value: Value,
    /// Capacity hint for the key map (defaults to the seed range length).
    pub capacity: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            seed_keys: 0..0,
            seed_value: Value::from(0u64),
            capacity: None,
        }
    }
}

impl StorageConfig {
    /// Seeds the full workload key space `0..1_000_000` with value zero.
    pub fn workload_default() -> Self {
        Self::default().with_seed_keys(0..WORKLOAD_KEY_COUNT)
    }

    /// Sets the integer key range to seed.
    pub fn with_seed_keys(mut self, keys: Range<u64>) -> Self {
        self.seed_keys = keys;
        self
    }

    /// Sets the seed value.
    pub fn with_seed_value(mut self, value: impl Into<Value>) -> Self {
        self.seed_value = value.into();
        self
    }

    /// Sets the key map capacity hint.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Capacity to preallocate for the key map. Saturates at `usize::MAX`.
    pub(crate) fn effective_capacity(&self) -> usize {
        self.capacity.unwrap_or_else(|| {
            let span = self.seed_keys.end.saturating_sub(self.seed_keys.start);
            usize::try_from(span).unwrap_or(usize::MAX)
        })
    }
}

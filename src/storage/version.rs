// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Per-key version chains.
//!
//! A chain is append-only and kept in insertion order. Concurrent writers may
//! append out of timestamp order, so every lookup scans and compares write
//! timestamps instead of assuming the chain is sorted.

use crate::timestamp::Timestamp;

use super::Value;

/// A single committed version of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    value: Value,
    write_ts: Timestamp,
    max_read_ts: Timestamp,
}

impl Version {
    /// Creates a version written at `write_ts` that nobody has read yet.
    pub fn new(value: Value, write_ts: Timestamp) -> Self {
        Self {
            value,
            write_ts,
            max_read_ts: Timestamp::ZERO,
        }
    }

    /// Returns the stored value.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the timestamp of the writer that created this version.
    #[inline]
    pub fn write_ts(&self) -> Timestamp {
        self.write_ts
    }

    /// Returns the largest snapshot timestamp at which this version was read.
    #[inline]
    pub fn max_read_ts(&self) -> Timestamp {
        self.max_read_ts
    }

    /// Raises the read high-water mark. Never lowers it.
    #[inline]
    fn observe(&mut self, ts: Timestamp) {
        self.max_read_ts = self.max_read_ts.max(ts);
    }
}

/// The version store for one key.
#[derive(Debug, Default)]
pub struct VersionChain {
    versions: Vec<Version>,
}

impl VersionChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of versions in the chain.
    #[inline]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Returns true if no version was ever appended.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Index of the version with the greatest write timestamp satisfying `pred`.
    fn latest_where(&self, pred: impl Fn(Timestamp) -> bool) -> Option<usize> {
        self.versions
            .iter()
            .enumerate()
            .filter(|(_, v)| pred(v.write_ts))
            .max_by_key(|(_, v)| v.write_ts)
            .map(|(idx, _)| idx)
    }

    /// Returns the version visible at `ts` without touching its high-water mark.
    pub fn visible_at(&self, ts: Timestamp) -> Option<&Version> {
        self.latest_where(|w| w <= ts).map(|idx| &self.versions[idx])
    }

    /// Returns the version visible at `ts` and records that it was read at `ts`.
    pub fn read_at(&mut self, ts: Timestamp) -> Option<&Version> {
        let idx = self.latest_where(|w| w <= ts)?;
        let version = &mut self.versions[idx];
        version.observe(ts);
        Some(&*version)
    }

    /// Returns true if a new version at `writer_ts` is safe to append.
    ///
    /// A write is rejected if a version already exists at `writer_ts`, or if the
    /// version it would supersede (greatest write timestamp below `writer_ts`) has
    /// been read at a snapshot later than `writer_ts`.
    pub fn can_write(&self, writer_ts: Timestamp) -> bool {
        if self.versions.iter().any(|v| v.write_ts == writer_ts) {
            return false;
        }
        match self.latest_where(|w| w < writer_ts) {
            Some(idx) => self.versions[idx].max_read_ts <= writer_ts,
            None => true,
        }
    }

    /// Appends a new version. Existing versions are never reordered or removed.
    pub fn push(&mut self, value: Value, writer_ts: Timestamp) {
        self.versions.push(Version::new(value, writer_ts));
    }
}

// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Logical transaction timestamps.

use std::fmt;

/// A logical timestamp assigned to a transaction before dispatch.
///
/// Timestamps are totally ordered and double as the transaction's unique id for
/// MVCC visibility. The seed version of every key is written at [`Timestamp::ZERO`];
/// negative values are legal query points that predate all data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Timestamp of the seed version written by storage initialization.
    pub const ZERO: Timestamp = Timestamp(0);

    /// Creates a timestamp from a raw logical value.
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw logical value.
    #[inline]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

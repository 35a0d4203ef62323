// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Storage error types.

use crate::timestamp::Timestamp;

use super::Key;

/// Errors that can occur in storage operations.
///
/// Both variants are recoverable by the execution layer: a read miss means the key
/// was never seeded or the snapshot predates its data, and a write conflict means
/// the transaction must be retried under a fresh timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("no version of key {key:?} visible at {ts}")]
    NotFound { key: Key, ts: Timestamp },

    #[error("write conflict at key {key:?} for writer {ts}")]
    WriteConflict { key: Key, ts: Timestamp },
}

impl StorageError {
    /// Returns true if the caller should abort and retry with a new timestamp.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::WriteConflict { .. })
    }
}

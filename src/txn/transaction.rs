// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Transaction handles as seen by the lock layer.

use std::fmt::Debug;
use std::hash::Hash;

use crate::timestamp::Timestamp;

/// Anything the lock manager can queue and hand back through the ready queue.
///
/// The lock layer never owns transactions; it stores cheap handles and compares
/// them by equality. `Arc<T>` wrappers and plain ids both qualify.
pub trait TxnHandle: Clone + Eq + Hash + Debug + Send + 'static {}

impl<T> TxnHandle for T where T: Clone + Eq + Hash + Debug + Send + 'static {}

/// Transaction identifier assigned by the scheduler before dispatch.
///
/// The id is the transaction's logical timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxnId(pub u64);

impl TxnId {
    /// Returns the MVCC timestamp carried by this id.
    ///
    /// Ids above `i64::MAX` saturate to the greatest timestamp.
    #[inline]
    pub fn timestamp(self) -> Timestamp {
        Timestamp::new(i64::try_from(self.0).unwrap_or(i64::MAX))
    }
}

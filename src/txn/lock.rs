// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Lock modes, policies, and status types.

/// Lock modes for read/write access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    /// Shared lock for reads.
    Read,
    /// Exclusive lock for writes.
    Write,
}

/// Observable state of a key's lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// No request on the key is granted.
    Unlocked,
    /// Held by one or more readers.
    Shared,
    /// Held for writing, or by anyone under the exclusive policy.
    Exclusive,
}

/// Result of a lock acquisition attempt.
///
/// `Queued` is not a failure: the caller suspends the transaction until it
/// reappears on the ready queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum LockOutcome {
    /// The lock is held on return.
    Granted,
    /// The request waits in the key's queue and counts toward the
    /// transaction's pending total.
    Queued,
}

impl LockOutcome {
    /// Returns true if the lock was granted immediately.
    #[inline]
    pub fn is_granted(self) -> bool {
        self == LockOutcome::Granted
    }
}

/// Current holders of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockStatus<T> {
    pub state: LockState,
    /// Current holders in queue order. Empty when unlocked.
    pub owners: Vec<T>,
}

impl<T> LockStatus<T> {
    pub(crate) fn unlocked() -> Self {
        Self {
            state: LockState::Unlocked,
            owners: Vec::new(),
        }
    }
}

/// Compatibility policy of a [`LockManager`](super::LockManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockPolicy {
    /// Every request is exclusive; one holder per key in strict FIFO order.
    ExclusiveOnly,
    /// Multiple readers or a single writer, with read-to-write upgrades.
    #[default]
    SharedExclusive,
}

impl LockPolicy {
    /// Returns true if a request by `txn` in `mode` may be held together with an
    /// earlier request by `holder` in `held`.
    #[inline]
    pub fn compatible<T: PartialEq>(self, holder: &T, held: LockMode, txn: &T, mode: LockMode) -> bool {
        match self {
            LockPolicy::ExclusiveOnly => false,
            LockPolicy::SharedExclusive => {
                holder == txn || (held == LockMode::Read && mode == LockMode::Read)
            }
        }
    }

    /// Returns true if this policy distinguishes shared from exclusive holders.
    #[inline]
    pub fn is_shared(self) -> bool {
        self == LockPolicy::SharedExclusive
    }
}

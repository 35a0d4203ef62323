// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Deterministic two-phase lock manager.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::storage::Key;

use super::lock::{LockMode, LockOutcome, LockPolicy, LockStatus};
use super::ready::{ReadyQueue, ReadySink};
use super::table::LockTable;
use super::TxnHandle;

/// Lock manager over keyed FIFO request queues.
///
/// Acquisition never blocks: a request that cannot be granted is queued and
/// counted against its transaction. When releases grant a transaction's last
/// outstanding request, the transaction is pushed onto the ready queue exactly
/// once. The [`LockPolicy`] decides whether requests can share a key.
pub struct LockManager<T: TxnHandle, Q: ReadySink<T> = ReadyQueue<T>> {
    policy: LockPolicy,
    table: Mutex<LockTable<T>>,
    ready: Arc<Q>,
}

impl<T: TxnHandle, Q: ReadySink<T>> LockManager<T, Q> {
    /// Creates a lock manager that pushes runnable transactions onto `ready`.
    pub fn new(policy: LockPolicy, ready: Arc<Q>) -> Self {
        Self {
            policy,
            table: Mutex::new(LockTable::new()),
            ready,
        }
    }

    /// Creates a lock manager that treats every request as exclusive.
    pub fn exclusive(ready: Arc<Q>) -> Self {
        Self::new(LockPolicy::ExclusiveOnly, ready)
    }

    /// Creates a multiple-readers/single-writer lock manager.
    pub fn shared(ready: Arc<Q>) -> Self {
        Self::new(LockPolicy::SharedExclusive, ready)
    }

    /// Returns the compatibility policy.
    #[inline]
    pub fn policy(&self) -> LockPolicy {
        self.policy
    }

    /// Requests `key` in `mode` for `txn`.
    ///
    /// The request is always enqueued. `Queued` means the transaction must wait
    /// until it reappears on the ready queue. Acquiring the same key twice for
    /// the same transaction enqueues it twice.
    pub fn acquire(&self, txn: T, key: &Key, mode: LockMode) -> LockOutcome {
        let mut table = self.table.lock();
        let outcome = table.acquire(self.policy, txn.clone(), key, mode);
        match outcome {
            LockOutcome::Granted => trace!(?txn, ?key, ?mode, "lock granted"),
            LockOutcome::Queued => debug!(
                ?txn,
                ?key,
                ?mode,
                pending = table.pending(&txn),
                "lock queued"
            ),
        }
        outcome
    }

    /// Requests a shared lock on `key`.
    #[inline]
    pub fn read_lock(&self, txn: T, key: &Key) -> LockOutcome {
        self.acquire(txn, key, LockMode::Read)
    }

    /// Requests an exclusive lock on `key`.
    #[inline]
    pub fn write_lock(&self, txn: T, key: &Key) -> LockOutcome {
        self.acquire(txn, key, LockMode::Write)
    }

    /// Releases `txn`'s first request on `key`, held or still waiting.
    ///
    /// Transactions whose last outstanding request is granted as a result are
    /// pushed onto the ready queue in grant order.
    pub fn release(&self, txn: &T, key: &Key) {
        let mut table = self.table.lock();
        let woken = table.release(self.policy, txn, key);
        // Pushing under the table lock keeps ready order consistent with grant order.
        for next in woken {
            debug!(released_by = ?txn, ?key, txn = ?next, "transaction ready");
            self.ready.push_ready(next);
        }
    }

    /// Releases `txn`'s requests on each of `keys`, in order.
    pub fn release_all<'a, I>(&self, txn: &T, keys: I)
    where
        I: IntoIterator<Item = &'a Key>,
    {
        for key in keys {
            self.release(txn, key);
        }
    }

    /// Reports who holds `key` and in which mode.
    ///
    /// Under the exclusive policy the owner is the front of the queue; under the
    /// shared policy every co-holder is listed.
    pub fn status(&self, key: &Key) -> LockStatus<T> {
        self.table.lock().status(self.policy, key)
    }

    /// Number of requests `txn` is still waiting on. Zero once runnable.
    pub fn pending(&self, txn: &T) -> usize {
        self.table.lock().pending(txn)
    }

    /// Number of transactions currently blocked on at least one lock.
    pub fn waiting_txns(&self) -> usize {
        self.table.lock().waiting_txns()
    }
}

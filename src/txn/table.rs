// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Per-key FIFO request queues and per-transaction wait counters.
//!
//! The table is a plain data structure; [`LockManager`](super::LockManager)
//! guards it with a single mutex so that queue updates and wait-counter updates
//! across keys happen atomically.
//!
//! Within a queue, granted requests always form a prefix. Everything after the
//! first waiting request is waiting too.

use std::collections::{HashMap, VecDeque};

use crate::storage::Key;

use super::lock::{LockMode, LockOutcome, LockPolicy, LockState, LockStatus};
use super::TxnHandle;

/// One transaction's request for a key.
#[derive(Debug, Clone)]
struct LockRequest<T> {
    mode: LockMode,
    txn: T,
    granted: bool,
}

/// Lock queues for every key ever requested, plus wait counters.
pub(crate) struct LockTable<T> {
    queues: HashMap<Key, VecDeque<LockRequest<T>>>,
    waits: HashMap<T, usize>,
}

impl<T: TxnHandle> LockTable<T> {
    pub(crate) fn new() -> Self {
        Self {
            queues: HashMap::new(),
            waits: HashMap::new(),
        }
    }

    /// Appends a request, granting it if it is compatible with everything queued.
    ///
    /// Under a shared policy, a read-to-write upgrade goes directly behind the
    /// current holders instead of at the tail. It is granted there when `txn` is
    /// the only holder, regardless of who is waiting.
    pub(crate) fn acquire(&mut self, policy: LockPolicy, txn: T, key: &Key, mode: LockMode) -> LockOutcome {
        let queue = self.queues.entry(key.clone()).or_default();

        let grantable = queue
            .iter()
            .all(|r| r.granted && policy.compatible(&r.txn, r.mode, &txn, mode));
        if grantable {
            queue.push_back(LockRequest {
                mode,
                txn,
                granted: true,
            });
            return LockOutcome::Granted;
        }

        let upgrade = policy.is_shared()
            && mode == LockMode::Write
            && queue
                .iter()
                .any(|r| r.granted && r.txn == txn && r.mode == LockMode::Read);
        let pos = if upgrade {
            queue.iter().take_while(|r| r.granted).count()
        } else {
            queue.len()
        };

        if upgrade && queue.iter().take(pos).all(|r| r.txn == txn) {
            queue.insert(
                pos,
                LockRequest {
                    mode,
                    txn,
                    granted: true,
                },
            );
            return LockOutcome::Granted;
        }

        *self.waits.entry(txn.clone()).or_insert(0) += 1;
        queue.insert(
            pos,
            LockRequest {
                mode,
                txn,
                granted: false,
            },
        );
        LockOutcome::Queued
    }

    /// Removes `txn`'s first request for `key` and grants whatever that unblocks.
    ///
    /// Removing a request that was still waiting does not touch `txn`'s wait
    /// counter: a transaction that gives up a queued lock is aborting, and the
    /// caller owns its retry. Under a shared policy the queue is still rescanned,
    /// since readers may have been held back only by the withdrawn writer.
    ///
    /// Returns the transactions whose wait counters reached zero, in grant order.
    pub(crate) fn release(&mut self, policy: LockPolicy, txn: &T, key: &Key) -> Vec<T> {
        let mut woken = Vec::new();
        let Some(queue) = self.queues.get_mut(key) else {
            return woken;
        };
        let Some(pos) = queue.iter().position(|r| r.txn == *txn) else {
            return woken;
        };
        let Some(removed) = queue.remove(pos) else {
            return woken;
        };

        // A withdrawn waiter frees nothing and leaves its owner's wait counter
        // as it was, so the owner is never pushed as ready on its account.
        if !removed.granted && !policy.is_shared() {
            return woken;
        }

        for i in 0..queue.len() {
            if queue[i].granted {
                continue;
            }
            let compatible = (0..i).all(|j| {
                policy.compatible(&queue[j].txn, queue[j].mode, &queue[i].txn, queue[i].mode)
            });
            if !compatible {
                break;
            }
            queue[i].granted = true;
            if count_grant(&mut self.waits, &queue[i].txn) {
                woken.push(queue[i].txn.clone());
            }
        }
        woken
    }

    /// Reports the current holders of `key`.
    pub(crate) fn status(&self, policy: LockPolicy, key: &Key) -> LockStatus<T> {
        let Some(front) = self.queues.get(key).and_then(|q| q.front()) else {
            return LockStatus::unlocked();
        };
        if !policy.is_shared() {
            return LockStatus {
                state: LockState::Exclusive,
                owners: vec![front.txn.clone()],
            };
        }

        let mut owners: Vec<T> = Vec::new();
        let mut state = LockState::Shared;
        for request in self.queues[key].iter().take_while(|r| r.granted) {
            if request.mode == LockMode::Write {
                state = LockState::Exclusive;
            }
            if !owners.contains(&request.txn) {
                owners.push(request.txn.clone());
            }
        }
        LockStatus { state, owners }
    }

    /// Locks `txn` is still waiting for.
    pub(crate) fn pending(&self, txn: &T) -> usize {
        self.waits.get(txn).copied().unwrap_or(0)
    }

    /// Number of transactions with outstanding waits.
    pub(crate) fn waiting_txns(&self) -> usize {
        self.waits.len()
    }
}

/// Decrements `txn`'s wait counter. Returns true if it just reached zero.
fn count_grant<T: TxnHandle>(waits: &mut HashMap<T, usize>, txn: &T) -> bool {
    let Some(count) = waits.get_mut(txn) else {
        debug_assert!(false, "no wait counter for {txn:?}");
        return false;
    };
    *count -= 1;
    if *count == 0 {
        waits.remove(txn);
        true
    } else {
        false
    }
}

// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Ready queue of transactions whose locks are all granted.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::warn;

/// Destination for transactions that just became runnable.
///
/// Owned by the scheduler and injected into the lock manager. Any thread's
/// release path may push.
pub trait ReadySink<T>: Send + Sync {
    /// Hands a runnable transaction to the scheduler.
    fn push_ready(&self, txn: T);
}

/// Multi-producer, multi-consumer FIFO of runnable transactions.
pub struct ReadyQueue<T> {
    queue: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> ReadyQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Appends a transaction and wakes one waiting consumer.
    pub fn push(&self, txn: T) {
        self.queue.lock().push_back(txn);
        self.available.notify_one();
    }

    /// Pops the oldest transaction without blocking.
    pub fn try_pop(&self) -> Option<T> {
        self.queue.lock().pop_front()
    }

    /// Pops the oldest transaction, blocking until one is available.
    pub fn pop(&self) -> T {
        let mut queue = self.queue.lock();
        loop {
            if let Some(txn) = queue.pop_front() {
                return txn;
            }
            self.available.wait(&mut queue);
        }
    }

    /// Pops the oldest transaction, waiting at most `timeout`.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        let mut queue = self.queue.lock();
        if queue.is_empty() {
            // Spurious wakeups fall through to a second empty check.
            let _ = self.available.wait_for(&mut queue, timeout);
        }
        queue.pop_front()
    }

    /// Removes and returns every queued transaction in FIFO order.
    pub fn drain(&self) -> Vec<T> {
        self.queue.lock().drain(..).collect()
    }

    /// Number of queued transactions.
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl<T> Default for ReadyQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> ReadySink<T> for ReadyQueue<T> {
    fn push_ready(&self, txn: T) {
        self.push(txn);
    }
}

impl<T: Send> ReadySink<T> for mpsc::Sender<T> {
    fn push_ready(&self, txn: T) {
        if self.send(txn).is_err() {
            warn!("ready channel closed; dropping runnable transaction");
        }
    }
}

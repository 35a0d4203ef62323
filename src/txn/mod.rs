// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Deterministic two-phase locking.
//!
//! This module provides the lock layer of a deterministic execution engine:
//! - Per-key FIFO request queues with a deterministic wake-up order
//! - Non-blocking acquisition: a request is either granted or queued
//! - A ready queue that receives each transaction exactly once, when its last
//!   outstanding lock is granted
//!
//! # Key Concepts
//!
//! ## Policies
//!
//! One [`LockManager`] type serves both policies:
//! - [`LockPolicy::ExclusiveOnly`]: every request, read or write, is exclusive.
//! - [`LockPolicy::SharedExclusive`]: readers share a key, writers hold it alone.
//!   A reader that requests a write lock is upgraded ahead of other waiters.
//!
//! ## Deadlock Freedom
//!
//! There is no deadlock detection. The sequencer must issue every transaction's
//! lock requests in one global order, which makes every wait point at an older
//! transaction.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use detcc::storage::Key;
//! use detcc::txn::{LockManager, LockOutcome, ReadyQueue, TxnId};
//!
//! let ready = Arc::new(ReadyQueue::new());
//! let locks = LockManager::shared(Arc::clone(&ready));
//! let key = Key::from("balance");
//!
//! assert_eq!(locks.write_lock(TxnId(1), &key), LockOutcome::Granted);
//! assert_eq!(locks.read_lock(TxnId(2), &key), LockOutcome::Queued);
//!
//! locks.release(&TxnId(1), &key);
//! assert_eq!(ready.try_pop(), Some(TxnId(2)));
//! ```

mod lock;
mod manager;
mod ready;
mod table;
mod transaction;

pub use lock::{LockMode, LockOutcome, LockPolicy, LockState, LockStatus};
pub use manager::LockManager;
pub use ready::{ReadyQueue, ReadySink};
pub use transaction::{TxnHandle, TxnId};

// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! detcc: concurrency control for deterministic transaction execution.
//!
//! This crate provides the two subsystems that decide whether and when a
//! transaction may touch shared keyed state:
//!
//! - [`txn`]: a two-phase lock manager with deterministic FIFO wake-ups that
//!   feeds a scheduler-owned ready queue.
//! - [`storage`]: a multi-version store that serves timestamp snapshots and
//!   rejects writes that would invalidate reads already served.
//!
//! Both are plain injected values; create as many independent instances as needed.

pub mod storage;
pub mod timestamp;
pub mod txn;

pub use storage::{Key, KeyGuard, MvccStorage, StorageConfig, StorageError, Value};
pub use timestamp::Timestamp;
pub use txn::{
    LockManager, LockMode, LockOutcome, LockPolicy, LockState, LockStatus, ReadyQueue, ReadySink,
    TxnHandle, TxnId,
};

// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Multi-version storage with timestamp-ordering write validation.
//!
//! Every key holds an append-only chain of versions. A version records the
//! timestamp of the transaction that wrote it and the highest snapshot timestamp
//! at which it has been read.
//!
//! # Key Concepts
//!
//! - **Snapshot read**: a read at `ts` returns the version with the greatest
//!   write timestamp `<= ts` and raises that version's read high-water mark.
//! - **Write validation**: a write at `ts` is rejected if the version it would
//!   supersede was already read at a snapshot later than `ts`, or if a version
//!   at `ts` already exists. The caller aborts and retries with a new timestamp.
//!
//! # Example
//!
//! ```
//! use detcc::storage::{Key, MvccStorage, StorageConfig, Value};
//! use detcc::Timestamp;
//!
//! let store = MvccStorage::with_config(
//!     &StorageConfig::default().with_seed_keys(0..1).with_seed_value(100u64),
//! );
//! let key = Key::from(0u64);
//!
//! let mut guard = store.lock(&key);
//! assert!(guard.check_write(Timestamp::new(50)));
//! guard.write(Value::from(200u64), Timestamp::new(50));
//! guard.unlock();
//!
//! assert_eq!(store.read(&key, Timestamp::new(30)).unwrap(), Value::from(100u64));
//! assert_eq!(store.read(&key, Timestamp::new(80)).unwrap(), Value::from(200u64));
//!
//! // The version at 50 has now been read at 80, so a writer at 70 must retry.
//! assert!(!store.lock(&key).check_write(Timestamp::new(70)));
//! ```

mod config;
mod engine;
mod error;
mod mvcc;
mod version;

pub use config::{StorageConfig, WORKLOAD_KEY_COUNT};
pub use engine::{KeyGuard, MvccStorage};
pub use error::StorageError;
pub use mvcc::{Key, Value};
pub use version::{Version, VersionChain};

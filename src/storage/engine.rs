// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Timestamp-ordered MVCC storage engine.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use tracing::{debug, info, instrument, trace};

use crate::timestamp::Timestamp;

use super::version::VersionChain;
use super::{Key, StorageConfig, StorageError, Value};

type SharedChain = Arc<Mutex<VersionChain>>;

/// Multi-version storage with per-key mutexes.
///
/// Each key owns a [`VersionChain`] behind its own mutex, so operations on
/// different keys run in parallel and operations on the same key serialize.
/// The engine never holds more than one key's mutex at a time; atomicity across
/// keys comes from the lock manager.
pub struct MvccStorage {
    chains: DashMap<Key, SharedChain>,
}

impl MvccStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            chains: DashMap::new(),
        }
    }

    /// Creates a store seeded according to `config`.
    pub fn with_config(config: &StorageConfig) -> Self {
        let store = Self {
            chains: DashMap::with_capacity(config.effective_capacity()),
        };
        store.init(config.seed_keys.clone().map(Key::from), &config.seed_value);
        store
    }

    /// Appends a seed version at [`Timestamp::ZERO`] for every key.
    ///
    /// This is the baseline snapshot visible to every non-negative timestamp.
    #[instrument(skip_all)]
    pub fn init<I>(&self, keys: I, seed: &Value)
    where
        I: IntoIterator<Item = Key>,
    {
        let mut seeded = 0usize;
        for key in keys {
            let chain = Arc::clone(self.chains.entry(key).or_default().value());
            chain.lock().push(seed.clone(), Timestamp::ZERO);
            seeded += 1;
        }
        info!(keys = seeded, "seeded storage");
    }

    /// Locks the version chain of `key`, allocating it on first use.
    ///
    /// The returned guard must be held across any read/check/write sequence that
    /// has to appear atomic. Dropping it unlocks the key on every exit path.
    pub fn lock(&self, key: &Key) -> KeyGuard {
        let chain = match self.chains.get(key) {
            Some(chain) => Arc::clone(chain.value()),
            None => Arc::clone(self.chains.entry(key.clone()).or_default().value()),
        };
        KeyGuard {
            key: key.clone(),
            chain: chain.lock_arc(),
            validated: None,
        }
    }

    /// Reads `key` as of `ts`, taking and releasing the key's mutex.
    pub fn read(&self, key: &Key, ts: Timestamp) -> Result<Value, StorageError> {
        let chain = match self.chains.get(key) {
            Some(chain) => Arc::clone(chain.value()),
            None => {
                return Err(StorageError::NotFound {
                    key: key.clone(),
                    ts,
                })
            }
        };
        let mut chain = chain.lock();
        read_chain(&mut chain, key, ts)
    }

    /// Validates and appends a write as one atomic step on `key`.
    ///
    /// Returns `WriteConflict` if the write would invalidate an earlier read.
    pub fn apply_write(&self, key: &Key, value: Value, ts: Timestamp) -> Result<(), StorageError> {
        let mut guard = self.lock(key);
        guard.validate_write(ts)?;
        guard.write(value, ts);
        Ok(())
    }

    /// Number of versions stored for `key` (zero if unknown).
    pub fn version_count(&self, key: &Key) -> usize {
        let Some(chain) = self.chains.get(key).map(|c| Arc::clone(c.value())) else {
            return 0;
        };
        let count = chain.lock().len();
        count
    }

    /// Returns true if the key has ever been seeded, locked, or written.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.chains.contains_key(key)
    }

    /// Number of keys with an allocated version chain.
    pub fn key_count(&self) -> usize {
        self.chains.len()
    }
}

impl Default for MvccStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn read_chain(chain: &mut VersionChain, key: &Key, ts: Timestamp) -> Result<Value, StorageError> {
    match chain.read_at(ts) {
        Some(version) => {
            trace!(?key, %ts, write_ts = %version.write_ts(), "mvcc read");
            Ok(version.value().clone())
        }
        None => Err(StorageError::NotFound {
            key: key.clone(),
            ts,
        }),
    }
}

/// Exclusive access to one key's version chain.
///
/// Obtained from [`MvccStorage::lock`]; the key unlocks when the guard drops.
pub struct KeyGuard {
    key: Key,
    chain: ArcMutexGuard<RawMutex, VersionChain>,
    validated: Option<Timestamp>,
}

impl KeyGuard {
    /// The locked key.
    #[inline]
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Number of versions currently stored for the key.
    #[inline]
    pub fn version_count(&self) -> usize {
        self.chain.len()
    }

    /// Reads the version visible at `ts` and raises its read high-water mark.
    pub fn read(&mut self, ts: Timestamp) -> Result<Value, StorageError> {
        read_chain(&mut self.chain, &self.key, ts)
    }

    /// Returns true if a write at `ts` keeps every served read valid.
    ///
    /// A passing check arms [`KeyGuard::write`] for the same timestamp.
    pub fn check_write(&mut self, ts: Timestamp) -> bool {
        if self.chain.can_write(ts) {
            self.validated = Some(ts);
            true
        } else {
            debug!(key = ?self.key, %ts, "write rejected by timestamp ordering");
            false
        }
    }

    /// Like [`KeyGuard::check_write`] but reports a rejection as an error.
    pub fn validate_write(&mut self, ts: Timestamp) -> Result<(), StorageError> {
        if self.check_write(ts) {
            Ok(())
        } else {
            Err(StorageError::WriteConflict {
                key: self.key.clone(),
                ts,
            })
        }
    }

    /// Appends a version written at `ts`.
    ///
    /// # Panics
    ///
    /// Panics if `check_write(ts)` did not pass on this guard since the last write.
    pub fn write(&mut self, value: Value, ts: Timestamp) {
        assert_eq!(
            self.validated.take(),
            Some(ts),
            "write at {ts} on {:?} without a passing check_write",
            self.key
        );
        trace!(key = ?self.key, %ts, "mvcc write");
        self.chain.push(value, ts);
    }

    /// Releases the key's mutex.
    #[inline]
    pub fn unlock(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn seeded(keys: u64, value: u64) -> MvccStorage {
        MvccStorage::with_config(
            &StorageConfig::default()
                .with_seed_keys(0..keys)
                .with_seed_value(value),
        )
    }

    fn ts(t: i64) -> Timestamp {
        Timestamp::new(t)
    }

    #[test]
    fn test_init_seeds_every_key() {
        let store = seeded(100, 7);
        assert_eq!(store.key_count(), 100);
        for k in 0..100u64 {
            assert_eq!(store.version_count(&Key::from(k)), 1);
            assert_eq!(store.read(&Key::from(k), ts(0)).unwrap(), Value::from(7u64));
        }
    }

    #[test]
    fn test_read_unknown_key() {
        let store = MvccStorage::new();
        let err = store.read(&Key::from("missing"), ts(10)).unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
        assert!(!store.contains_key(&Key::from("missing")));
    }

    #[test]
    fn test_snapshot_reads() {
        let store = MvccStorage::new();
        let key = Key::from("k");
        store.init([key.clone()], &Value::from("v0"));
        store.apply_write(&key, Value::from("v5"), ts(5)).unwrap();
        store.apply_write(&key, Value::from("v10"), ts(10)).unwrap();

        assert_eq!(store.read(&key, ts(7)).unwrap(), Value::from("v5"));
        assert_eq!(store.read(&key, ts(10)).unwrap(), Value::from("v10"));
        assert!(matches!(
            store.read(&key, ts(-1)),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let store = seeded(1, 0);
        let key = Key::from(0u64);

        let mut guard = store.lock(&key);
        assert!(guard.check_write(ts(40)));
        guard.write(Value::from("new"), ts(40));
        assert_eq!(guard.read(ts(40)).unwrap(), Value::from("new"));
        assert_eq!(guard.read(ts(39)).unwrap(), Value::from(0u64));
        guard.unlock();

        assert_eq!(store.version_count(&key), 2);
    }

    #[test]
    fn test_write_after_read_rejected() {
        let store = seeded(1, 0);
        let key = Key::from(0u64);

        store.read(&key, ts(80)).unwrap();

        let mut guard = store.lock(&key);
        assert!(!guard.check_write(ts(50)));
        assert!(guard.check_write(ts(90)));
    }

    #[test]
    fn test_duplicate_writer_rejected() {
        let store = seeded(1, 0);
        let key = Key::from(0u64);
        store.apply_write(&key, Value::from("a"), ts(3)).unwrap();

        let err = store.apply_write(&key, Value::from("b"), ts(3)).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(store.read(&key, ts(3)).unwrap(), Value::from("a"));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let store = seeded(1, 100);
        let key = Key::from(0u64);

        {
            let mut guard = store.lock(&key);
            assert!(guard.check_write(ts(50)));
            guard.write(Value::from(200u64), ts(50));
        }

        assert_eq!(store.read(&key, ts(30)).unwrap(), Value::from(100u64));
        assert_eq!(store.read(&key, ts(60)).unwrap(), Value::from(200u64));
        assert_eq!(store.read(&key, ts(80)).unwrap(), Value::from(200u64));

        let mut guard = store.lock(&key);
        assert!(!guard.check_write(ts(70)));
    }

    #[test]
    fn test_lock_allocates_new_key() {
        let store = MvccStorage::new();
        let key = Key::from("fresh");

        let mut guard = store.lock(&key);
        assert_eq!(guard.version_count(), 0);
        assert!(guard.check_write(ts(1)));
        guard.write(Value::from("x"), ts(1));
        drop(guard);

        assert!(store.contains_key(&key));
        assert_eq!(store.read(&key, ts(1)).unwrap(), Value::from("x"));
        assert!(store.read(&key, ts(0)).is_err());
    }

    #[test]
    #[should_panic(expected = "without a passing check_write")]
    fn test_write_without_check_panics() {
        let store = seeded(1, 0);
        let mut guard = store.lock(&Key::from(0u64));
        guard.write(Value::from("x"), ts(5));
    }

    #[test]
    #[should_panic(expected = "without a passing check_write")]
    fn test_write_with_other_timestamp_panics() {
        let store = seeded(1, 0);
        let mut guard = store.lock(&Key::from(0u64));
        assert!(guard.check_write(ts(5)));
        guard.write(Value::from("x"), ts(6));
    }

    #[test]
    fn test_concurrent_disjoint_writers() {
        let store = Arc::new(seeded(8, 0));
        let handles: Vec<_> = (0..8u64)
            .map(|k| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let key = Key::from(k);
                    for t in 1..=200i64 {
                        store.apply_write(&key, Value::from(t as u64), ts(t)).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("thread panicked");
        }

        for k in 0..8u64 {
            let key = Key::from(k);
            assert_eq!(store.version_count(&key), 201);
            assert_eq!(store.read(&key, ts(1_000)).unwrap(), Value::from(200u64));
        }
    }

    #[test]
    fn test_concurrent_same_key_unique_timestamps() {
        let store = Arc::new(seeded(1, 0));
        let handles: Vec<_> = (0..4i64)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let key = Key::from(0u64);
                    for i in 0..100i64 {
                        let t = 1 + i * 4 + worker;
                        store.apply_write(&key, Value::from(t as u64), ts(t)).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("thread panicked");
        }

        let key = Key::from(0u64);
        assert_eq!(store.version_count(&key), 401);
        for t in [1i64, 57, 200, 400] {
            assert_eq!(store.read(&key, ts(t)).unwrap(), Value::from(t as u64));
        }
    }
}

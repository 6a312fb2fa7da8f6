use std::{collections::HashMap, fmt::Debug, sync::Arc};

use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use super::{counter_value, Cache, CacheStorage};
use crate::error::BlinkError;

/// In-memory memo store. Clones are handles onto the same entries.
#[derive(Debug)]
pub struct Blink<V = Value> {
    cc: CacheStorage<V>,
}

impl<V> Clone for Blink<V> {
    fn clone(&self) -> Self {
        Self {
            cc: self.cc.clone(),
        }
    }
}

impl<V> Default for Blink<V> {
    fn default() -> Self {
        let cc = Arc::new(Mutex::new(HashMap::<String, V>::new()));
        Self { cc }
    }
}

impl Blink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V: Clone> Blink<V> {
    /// Stores `value` under `key`, returning whatever was there before.
    pub fn put(&self, key: impl Into<String>, value: impl Into<V>) -> Option<V> {
        let key = key.into();
        trace!(key = %key, "put");
        self.cc.lock().insert(key, value.into())
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let res = self.cc.lock().get(key).cloned();
        trace!(key, hit = res.is_some(), "get");
        res
    }

    /// Like [`Blink::get`], falling back to `default` on a miss.
    pub fn get_or(&self, key: &str, default: impl Into<V>) -> V {
        self.get(key).unwrap_or_else(|| default.into())
    }

    pub fn has(&self, key: &str) -> bool {
        self.cc.lock().contains_key(key)
    }

    pub fn all(&self) -> HashMap<String, V> {
        self.cc.lock().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.cc.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.cc.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cc.lock().is_empty()
    }

    pub fn forget(&self, key: &str) -> Option<V> {
        trace!(key, "forget");
        self.cc.lock().remove(key)
    }

    /// Returns the value under `key` and removes it from the store.
    pub fn pull(&self, key: &str) -> Option<V> {
        self.forget(key)
    }

    pub fn flush(&self) {
        let mut cc = self.cc.lock();
        debug!(entries = cc.len(), "flushing store");
        cc.clear();
    }

    pub fn extend<I, K>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        self.cc
            .lock()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
    }

    /// Returns the value stored under `key`, computing and storing it with
    /// `f` on a miss.
    ///
    /// The lock is released while `f` runs, so `f` may use this store. If
    /// `f` itself fills `key`, that value wins and the computed one is
    /// dropped.
    pub fn once<F>(&self, key: &str, f: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(hit) = self.get(key) {
            return hit;
        }

        let value = f();
        self.cc
            .lock()
            .entry(key.to_owned())
            .or_insert(value)
            .clone()
    }
}

impl Blink<Value> {
    /// Adds `by` to the integer under `key` and returns the result. Missing
    /// or non-integer entries start from zero.
    pub fn increment(&self, key: &str, by: i64) -> i64 {
        let mut cc = self.cc.lock();
        let next = counter_value(cc.get(key)).saturating_add(by);
        cc.insert(key.to_owned(), Value::from(next));
        next
    }

    pub fn decrement(&self, key: &str, by: i64) -> i64 {
        self.increment(key, by.saturating_neg())
    }

    pub fn put_as<T>(&self, key: &str, value: &T) -> Result<Option<Value>, BlinkError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value).map_err(|source| BlinkError::Encode {
            key: key.to_owned(),
            source,
        })?;
        Ok(self.put(key, value))
    }

    /// Reads `key` back as a `T`. A miss is `Ok(None)`; a value of the
    /// wrong shape is an error.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, BlinkError> {
        self.get(key)
            .map(|value| {
                serde_json::from_value(value).map_err(|source| BlinkError::Decode {
                    key: key.to_owned(),
                    source,
                })
            })
            .transpose()
    }
}

impl<V: Clone + Debug> Cache<V> for Blink<V> {
    fn write(&self, key: String, data: V) -> Option<V> {
        self.put(key, data)
    }

    fn read(&self, key: &str) -> Option<V> {
        self.get(key)
    }

    fn keys(&self) -> Vec<String> {
        Blink::keys(self)
    }

    fn delete(&self, key: &str) -> Option<V> {
        self.forget(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.has(key)
    }

    fn clear(&self) {
        self.flush()
    }
}

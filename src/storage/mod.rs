use std::{collections::HashMap, fmt::Debug, sync::Arc};

use parking_lot::Mutex;
use serde_json::Value;

type CacheStorage<V> = Arc<Mutex<HashMap<String, V>>>;

pub mod blink;

/// Minimal surface a memo store offers. Code that only needs to read and
/// write entries takes `impl Cache<V>` so a store can be handed in rather
/// than reached for globally.
pub trait Cache<V>: Clone + Debug {
    fn write(&self, key: String, data: V) -> Option<V>;
    fn read(&self, key: &str) -> Option<V>;
    fn keys(&self) -> Vec<String>;
    fn delete(&self, key: &str) -> Option<V>;

    fn contains(&self, key: &str) -> bool {
        self.read(key).is_some()
    }

    fn read_or(&self, key: &str, default: V) -> V {
        self.read(key).unwrap_or(default)
    }

    fn clear(&self) {
        for key in self.keys() {
            self.delete(&key);
        }
    }
}

/// Integer view of a stored value used by counters. Anything that is not an
/// integer counts as zero.
pub fn counter_value(value: Option<&Value>) -> i64 {
    value.and_then(Value::as_i64).unwrap_or(0)
}

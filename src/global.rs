//! Process-wide store and its convenience accessors.
//!
//! Prefer passing a [`Blink`] around explicitly. These helpers exist for call
//! sites that just want "the" store for the current process run.

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::debug;

use crate::storage::blink::Blink;

static BLINK: Lazy<Blink> = Lazy::new(|| {
    debug!("creating global store");
    Blink::new()
});

/// Handle to the global store.
pub fn blink() -> Blink {
    BLINK.clone()
}

pub fn get(key: &str) -> Option<Value> {
    BLINK.get(key)
}

/// Stores `value` under `key` in the global store and returns it.
pub fn put(key: impl Into<String>, value: impl Into<Value>) -> Value {
    let value = value.into();
    BLINK.put(key, value.clone());
    value
}

/// Drops every entry in the global store.
pub fn reset() {
    debug!("resetting global store");
    BLINK.flush();
}

/// Arity-dispatching accessor for the global store.
///
/// - `blink!()` returns the store handle, see [`blink()`](crate::global::blink)
/// - `blink!(key)` reads `key`, see [`get`](crate::global::get)
/// - `blink!(key, value)` stores `value` and returns it, see [`put`](crate::global::put)
///
/// ```
/// use blink::blink;
///
/// blink!("greeting", "hello");
/// assert_eq!(blink!("greeting"), Some(serde_json::json!("hello")));
/// assert!(blink!().has("greeting"));
/// ```
#[macro_export]
macro_rules! blink {
    () => {
        $crate::global::blink()
    };
    ($key:expr $(,)?) => {
        $crate::global::get($key)
    };
    ($key:expr, $value:expr $(,)?) => {
        $crate::global::put($key, $value)
    };
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn zero_args_is_the_shared_store() {
        blink!().put("global::zero", "myValue");

        assert_eq!(blink().get("global::zero"), Some(json!("myValue")));
    }

    #[test]
    fn one_arg_reads() {
        blink().put("global::one", "myValue");

        assert_eq!(blink!("global::one"), Some(json!("myValue")));
        assert_eq!(blink!("global::one-missing"), None);
    }

    #[test]
    fn two_args_writes_and_returns_value() {
        let stored = blink!("global::two", "myValue");

        assert_eq!(stored, json!("myValue"));
        assert_eq!(blink().get("global::two"), Some(json!("myValue")));
    }
}

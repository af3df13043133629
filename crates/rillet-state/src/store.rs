#![forbid(unsafe_code)]

//! Session-lifetime key-value store.
//!
//! One [`StateStore`] exists per session and is owned by that session, so
//! every page rendered within the session reads and writes the same mapping
//! while independent sessions stay fully isolated. The store is explicit
//! plumbing: operations take it as a parameter, nothing in this crate
//! reaches for a hidden global.
//!
//! Keys are partitioned by convention, not enforcement:
//!
//! - **global keys** carry state shared across independently rendered pages
//!   (`"global_threshold"`).
//! - **local keys** are owned by a single page's widget instance and start
//!   with an underscore (`"_local_threshold"`, see [`is_local_key`]).
//!
//! # Invariants
//!
//! 1. [`StateStore::set_default`] never changes an already-set key, no
//!    matter how often it runs — it is what makes initializers idempotent.
//! 2. Reading an absent key fails with [`StateError::KeyNotFound`]. That is
//!    a programming error (the page skipped its initializer), not a
//!    transient condition to retry.
//! 3. [`StateStore::keys`] returns a sorted listing so dumps and tests are
//!    deterministic regardless of hash order.
//!
//! # Example
//!
//! ```
//! use rillet_state::StateStore;
//!
//! let mut store = StateStore::new();
//! store.set("global_group", "A");
//!
//! // Defaults never clobber an existing value.
//! store.set_default("global_group", "Z");
//! assert_eq!(store.get("global_group").unwrap().as_str(), Some("A"));
//!
//! assert!(store.get("missing").is_err());
//! ```

use std::fmt;

use ahash::AHashMap;

use crate::value::Value;

/// Reserved prefix marking page-local keys.
pub const LOCAL_KEY_PREFIX: char = '_';

/// Whether a key belongs to the page-local namespace by convention.
///
/// Local keys are owned by exactly one page's widget instance; other pages
/// must not read or write them. The store itself does not police this — the
/// predicate exists so hosts and harnesses can.
#[must_use]
pub fn is_local_key(key: &str) -> bool {
    key.starts_with(LOCAL_KEY_PREFIX)
}

/// Errors from state store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A key was read before anything initialized it.
    KeyNotFound {
        /// The key that was requested.
        key: String,
    },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound { key } => {
                write!(f, "state key not found: {key:?} (was it initialized?)")
            }
        }
    }
}

impl std::error::Error for StateError {}

/// Session-lifetime key-value storage shared by all pages of one session.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    entries: AHashMap<String, Value>,
}

impl StateStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a key, failing if it has never been set.
    pub fn get(&self, key: &str) -> Result<&Value, StateError> {
        self.entries.get(key).ok_or_else(|| StateError::KeyNotFound {
            key: key.to_owned(),
        })
    }

    /// Read a key, `None` if absent. For callers that genuinely branch on
    /// existence; everything else should use [`StateStore::get`] so missing
    /// initializers surface as errors.
    #[must_use]
    pub fn get_opt(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Set a key unconditionally, creating or overwriting it.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Set a key only if it is absent; returns the value stored under the
    /// key afterwards. Running this any number of times with any defaults
    /// leaves the first-written value in place.
    pub fn set_default(&mut self, key: impl Into<String>, default: impl Into<Value>) -> &Value {
        self.entries.entry(key.into()).or_insert_with(|| default.into())
    }

    /// Mutate an existing value in place.
    pub fn update(
        &mut self,
        key: &str,
        mutate: impl FnOnce(&mut Value),
    ) -> Result<(), StateError> {
        match self.entries.get_mut(key) {
            Some(value) => {
                mutate(value);
                Ok(())
            }
            None => Err(StateError::KeyNotFound {
                key: key.to_owned(),
            }),
        }
    }

    /// Whether the key currently exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a key, returning its value if it existed.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys, sorted. Hash order never leaks out of the store.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Drop every key. Ends the session's memory without ending the session.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_on_missing_key_names_the_key() {
        let store = StateStore::new();
        let err = store.get("global_counter").unwrap_err();
        assert_eq!(
            err,
            StateError::KeyNotFound {
                key: "global_counter".to_owned()
            }
        );
        assert!(err.to_string().contains("global_counter"));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let mut store = StateStore::new();
        store.set("k", 1);
        store.set("k", 2);
        assert_eq!(store.get("k").unwrap().as_int(), Some(2));
    }

    #[test]
    fn set_default_is_first_write_wins() {
        let mut store = StateStore::new();
        assert_eq!(store.set_default("k", 10).as_int(), Some(10));
        assert_eq!(store.set_default("k", 99).as_int(), Some(10));
        store.set("k", 3);
        assert_eq!(store.set_default("k", 99).as_int(), Some(3));
    }

    #[test]
    fn update_mutates_in_place() {
        let mut store = StateStore::new();
        store.set("global_counter", 41);
        store
            .update("global_counter", |value| {
                if let Value::Int(n) = value {
                    *n += 1;
                }
            })
            .unwrap();
        assert_eq!(store.get("global_counter").unwrap().as_int(), Some(42));
    }

    #[test]
    fn update_on_missing_key_fails() {
        let mut store = StateStore::new();
        let err = store.update("nope", |_| {}).unwrap_err();
        assert!(matches!(err, StateError::KeyNotFound { .. }));
    }

    #[test]
    fn keys_are_sorted() {
        let mut store = StateStore::new();
        for key in ["zeta", "alpha", "_local_mid", "beta"] {
            store.set(key, Value::Null);
        }
        assert_eq!(store.keys(), vec!["_local_mid", "alpha", "beta", "zeta"]);
    }

    #[test]
    fn remove_and_clear() {
        let mut store = StateStore::new();
        store.set("a", 1);
        store.set("b", 2);
        assert_eq!(store.remove("a"), Some(Value::Int(1)));
        assert_eq!(store.remove("a"), None);
        assert!(!store.is_empty());
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn cloned_stores_do_not_alias() {
        let mut original = StateStore::new();
        original.set("k", 1);
        let mut fork = original.clone();
        fork.set("k", 2);
        assert_eq!(original.get("k").unwrap().as_int(), Some(1));
        assert_eq!(fork.get("k").unwrap().as_int(), Some(2));
    }

    #[test]
    fn local_key_convention() {
        assert!(is_local_key("_local_threshold"));
        assert!(is_local_key("_anything"));
        assert!(!is_local_key("global_threshold"));
        assert!(!is_local_key(""));
    }
}

#![forbid(unsafe_code)]

//! Change handlers as data.
//!
//! Widgets never mutate global state directly. At render time they register
//! a [`Callback`] under their key; the driver invokes it when the matching
//! user event arrives — after the widget's own value has been written,
//! strictly before the next render pass begins. Holding or cloning a
//! callback does nothing; only the driver runs them.

use std::fmt;
use std::sync::Arc;

use rillet_state::{Binding, StateError, StateStore};

type CallbackFn = Arc<dyn Fn(&mut StateStore) -> Result<(), StateError> + Send + Sync>;

/// A deferred handler attached to a widget for one pass.
#[derive(Clone)]
pub enum Callback {
    /// Copy the widget's local key to its global key.
    ///
    /// This is the common case: a synced widget's entire reaction to an
    /// edit is the binder from the sync protocol.
    Bind(Binding),
    /// Run an arbitrary store mutation, for handlers that do more than
    /// mirror one key (counters, staged form writes, derived values).
    Func(CallbackFn),
}

impl Callback {
    /// Wrap a sync-protocol binding.
    #[must_use]
    pub fn bind(binding: Binding) -> Self {
        Self::Bind(binding)
    }

    /// Wrap an arbitrary store mutation.
    #[must_use]
    pub fn func(
        f: impl Fn(&mut StateStore) -> Result<(), StateError> + Send + Sync + 'static,
    ) -> Self {
        Self::Func(Arc::new(f))
    }

    /// Execute the handler against a session's store.
    pub fn run(&self, store: &mut StateStore) -> Result<(), StateError> {
        match self {
            Self::Bind(binding) => binding.apply(store),
            Self::Func(f) => f(store),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(binding) => f.debug_tuple("Bind").field(binding).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rillet_state::{Value, bind_local_to_global};

    use super::*;

    #[test]
    fn bind_callback_runs_the_binder() {
        let mut store = StateStore::new();
        store.set("global_t", 1);
        store.set("_local_t", 9);
        let cb = Callback::bind(bind_local_to_global("_local_t", "global_t"));
        cb.run(&mut store).unwrap();
        assert_eq!(store.get("global_t").unwrap().as_int(), Some(9));
    }

    #[test]
    fn func_callback_mutates_the_store() {
        let mut store = StateStore::new();
        store.set("global_counter", 41);
        let cb = Callback::func(|store| {
            store.update("global_counter", |value| {
                if let Value::Int(n) = value {
                    *n += 1;
                }
            })
        });
        cb.run(&mut store).unwrap();
        assert_eq!(store.get("global_counter").unwrap().as_int(), Some(42));
    }

    #[test]
    fn callbacks_are_inert_until_run() {
        let mut store = StateStore::new();
        store.set("global_t", 1);
        store.set("_local_t", 9);
        let cb = Callback::bind(bind_local_to_global("_local_t", "global_t"));
        let _held = cb.clone();
        assert_eq!(store.get("global_t").unwrap().as_int(), Some(1));
        drop(cb);
        assert_eq!(store.get("global_t").unwrap().as_int(), Some(1));
    }

    #[test]
    fn callback_errors_propagate() {
        let mut store = StateStore::new();
        let cb = Callback::bind(bind_local_to_global("_missing", "global_t"));
        assert!(cb.run(&mut store).is_err());
    }

    #[test]
    fn debug_formats_both_shapes() {
        let bind = Callback::bind(bind_local_to_global("_a", "b"));
        assert!(format!("{bind:?}").contains("Bind"));
        let func = Callback::func(|_| Ok(()));
        assert_eq!(format!("{func:?}"), "Func(..)");
    }
}

#![forbid(unsafe_code)]

//! Global/local state mirroring: the initializer, mirror, and binder.
//!
//! Pages are re-executed top to bottom on every interaction, and each page's
//! widgets persist their values under page-local keys. The trio in this
//! module keeps those local keys consistent with shared global keys without
//! coupling pages to each other:
//!
//! - [`init_global`] ensures a global key exists. Idempotent, so every page
//!   that consumes the key calls it — any page may be the first one visited
//!   in a session.
//! - [`mirror_global_to_local`] copies global → local unconditionally at the
//!   top of a render pass, before the widget bound to the local key is
//!   constructed. It returns a [`Mirrored`] token that synced widget
//!   constructors consume, so mirror-then-construct ordering is enforced by
//!   the API instead of by code review.
//! - [`bind_local_to_global`] builds a [`Binding`]: a change handler as
//!   plain data, registered with the widget at render time and applied by
//!   the host after the user edits the local value, strictly before the
//!   next render pass.
//!
//! Per key pair and session the protocol cycles:
//!
//! ```text
//! Synced ──user edits local──▶ Dirty ──binder copies local→global──▶
//!   ▲                                                              │
//!   └────────── next pass mirrors global back into local ──────────┘
//! ```
//!
//! # Invariants
//!
//! 1. After a mirror and before any user interaction, the local key holds
//!    exactly the global key's value.
//! 2. A binder application is always followed by a mirror on the very next
//!    render pass; the pair is eventually consistent in one direction, not
//!    a two-way binding.
//! 3. Neither the mirror nor the binder renders anything or triggers a
//!    render pass. Rerunning is the host's reaction to the edit, not the
//!    protocol's.
//!
//! # Example
//!
//! ```
//! use rillet_state::{StateStore, bind_local_to_global, init_global, mirror_global_to_local};
//!
//! let mut store = StateStore::new();
//! init_global(&mut store, "global_threshold", 50);
//!
//! // Top of a render pass: mirror before the slider exists.
//! let mirrored = mirror_global_to_local(&mut store, "_local_threshold", "global_threshold")?;
//! assert_eq!(mirrored.value().as_int(), Some(50));
//!
//! // The user drags the slider to 80: the host writes the local key and
//! // invokes the binding registered with the widget.
//! store.set("_local_threshold", 80);
//! let binding = bind_local_to_global("_local_threshold", "global_threshold");
//! binding.apply(&mut store)?;
//!
//! assert_eq!(store.get("global_threshold")?.as_int(), Some(80));
//! # Ok::<(), rillet_state::StateError>(())
//! ```

use std::fmt;

use crate::store::{StateError, StateStore};
use crate::value::Value;

/// Ensure a global key exists, leaving any existing value untouched.
///
/// Every page that consumes a shared key runs this before reading it, so
/// whichever page the session happens to visit first creates the key and
/// all later calls are no-ops. Returns the value stored under the key
/// afterwards — the existing one, or `default` if the key was absent.
pub fn init_global<'s>(
    store: &'s mut StateStore,
    key: impl Into<String>,
    default: impl Into<Value>,
) -> &'s Value {
    store.set_default(key, default)
}

/// Copy a global key's value into a page-local key.
///
/// Called at the top of every render pass, before the widget that displays
/// the local key is constructed. The copy is unconditional: whatever the
/// local key held from the previous pass is overwritten, which is how an
/// edit made on *another* page reaches this page's widget.
///
/// Fails with [`StateError::KeyNotFound`] if the global key was never
/// initialized — run [`init_global`] first.
pub fn mirror_global_to_local(
    store: &mut StateStore,
    local_key: impl Into<String>,
    global_key: &str,
) -> Result<Mirrored, StateError> {
    let value = store.get(global_key)?.clone();
    let local_key = local_key.into();
    store.set(local_key.clone(), value.clone());
    Ok(Mirrored {
        key: local_key,
        value,
    })
}

/// Build the change handler that copies a local edit back to its global key.
///
/// The returned [`Binding`] captures only the two key names. It is created
/// at render time, registered with the widget, and applied by the host after
/// the user edits the local value — before the next render pass begins.
#[must_use]
pub fn bind_local_to_global(
    local_key: impl Into<String>,
    global_key: impl Into<String>,
) -> Binding {
    Binding {
        local: local_key.into(),
        global: global_key.into(),
    }
}

/// Proof that a local key was mirrored from its global key this pass.
///
/// Synced widget constructors take a `Mirrored` instead of a raw key, and
/// the only way to produce one is [`mirror_global_to_local`]. Mirroring
/// *after* widget construction would leave the widget displaying the
/// previous pass's stale local value; the token makes that ordering
/// unrepresentable rather than merely discouraged.
#[derive(Debug, Clone, PartialEq)]
pub struct Mirrored {
    key: String,
    value: Value,
}

impl Mirrored {
    /// The local key that was written.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value that was copied, exactly as the widget should display it.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// A local → global change handler, stored as data.
///
/// Captures the two key names and nothing else; the store is passed in
/// explicitly when the handler runs. This keeps the handler inert — holding
/// or cloning one has no effect until a host calls [`Binding::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    local: String,
    global: String,
}

impl Binding {
    /// The page-local key the user edits.
    #[must_use]
    pub fn local_key(&self) -> &str {
        &self.local
    }

    /// The shared key the edit propagates to.
    #[must_use]
    pub fn global_key(&self) -> &str {
        &self.global
    }

    /// Copy the current local value onto the global key.
    ///
    /// Fails with [`StateError::KeyNotFound`] if the local key does not
    /// exist, which means the handler ran before the pass that mirrors and
    /// mounts the widget — a call-ordering bug in the host, not user error.
    pub fn apply(&self, store: &mut StateStore) -> Result<(), StateError> {
        let value = store.get(&self.local)?.clone();
        store.set(self.global.clone(), value);
        Ok(())
    }

    /// Where the key pair currently sits in the sync cycle.
    ///
    /// This is a store-level observation: immediately after [`Binding::apply`]
    /// the two keys are equal again, so `phase` reports [`SyncPhase::Synced`]
    /// even though the on-screen widget still shows the pre-edit value until
    /// the next pass re-renders it. Fails if either key is absent.
    pub fn phase(&self, store: &StateStore) -> Result<SyncPhase, StateError> {
        let local = store.get(&self.local)?;
        let global = store.get(&self.global)?;
        Ok(if local == global {
            SyncPhase::Synced
        } else {
            SyncPhase::Dirty
        })
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.local, self.global)
    }
}

/// Position of a local/global key pair within the sync cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// The keys hold equal values, as right after a mirror or a binder run.
    Synced,
    /// The local value has diverged from the global one; a binder
    /// application will reconverge them.
    Dirty,
}

#![forbid(unsafe_code)]

//! Sessions: one per connected user, each with its own state store.
//!
//! A [`Session`] is the unit of isolation. It owns the [`StateStore`] that
//! all pages rendered for this user share, plus the bookkeeping the driver
//! needs between passes: which page is active, how many passes have
//! completed, which widget keys the last pass registered, and which change
//! handlers those widgets installed.
//!
//! The store is a plain owned field — handed to page code by reference for
//! the duration of a pass and never reachable through a process-wide
//! global. Two sessions can only interact through the app-wide caches,
//! which hold shared resources, never session state.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::{AHashMap, AHashSet};
use rillet_state::StateStore;

use crate::callback::Callback;

/// Global counter for unique session IDs.
static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Allocate a fresh, process-unique ID.
    pub(crate) fn next() -> Self {
        Self(SESSION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// One user's connection: an owned state store plus driver bookkeeping.
///
/// Created by [`App::open_session`](crate::App::open_session) and passed
/// back to [`App::handle`](crate::App::handle) for every user event. The
/// caller owns it; dropping the session drops all of its state.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    pub(crate) store: StateStore,
    /// Slug of the page the next pass will render.
    pub(crate) page: String,
    /// Number of completed render passes.
    pub(crate) pass: u64,
    /// Local keys registered by widgets during the last completed pass.
    pub(crate) widget_keys: AHashSet<String>,
    /// Change/click handlers registered during the last completed pass,
    /// keyed by the widget key they belong to.
    pub(crate) callbacks: AHashMap<String, Callback>,
}

impl Session {
    pub(crate) fn new(page: impl Into<String>) -> Self {
        Self {
            id: SessionId::next(),
            store: StateStore::new(),
            page: page.into(),
            pass: 0,
            widget_keys: AHashSet::new(),
            callbacks: AHashMap::new(),
        }
    }

    /// This session's unique ID.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// The session's state store.
    #[must_use]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Mutable access to the state store, for host code between passes.
    /// Page code gets the store through its render context instead.
    pub fn store_mut(&mut self) -> &mut StateStore {
        &mut self.store
    }

    /// Slug of the currently active page.
    #[must_use]
    pub fn page(&self) -> &str {
        &self.page
    }

    /// Number of render passes completed so far.
    #[must_use]
    pub const fn pass(&self) -> u64 {
        self.pass
    }

    /// Whether the last completed pass registered a widget under this key.
    #[must_use]
    pub fn remembers_widget(&self, key: &str) -> bool {
        self.widget_keys.contains(key)
    }
}

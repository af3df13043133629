#![forbid(unsafe_code)]

//! Session host and render-pass driver for rerun-driven apps.
//!
//! The runtime turns the state/sync primitives of `rillet-state` into a
//! working execution model:
//!
//! - [`App`]: navigation tree plus app-wide caches, shareable across
//!   threads.
//! - [`Session`]: one user's connection, owning its
//!   [`StateStore`](rillet_state::StateStore).
//! - [`App::handle`]: one [`UserEvent`] in, one full render pass out —
//!   deferred handlers first, then the page top to bottom, then widget
//!   lifecycle cleanup.
//! - [`DataCache`] / [`ResourceCache`]: memoized copies and live
//!   singletons shared by every session.
//! - [`BackgroundTask`]: slow work that render passes poll instead of
//!   awaiting.
//!
//! With the `state-persistence` feature, [`StateSnapshot`] saves and
//! restores a session's global keys as JSON.

pub mod app;
pub mod background;
pub mod cache;
pub mod callback;
pub mod page;
pub mod session;
#[cfg(feature = "state-persistence")]
pub mod snapshot;

pub use app::{App, PageCtx, PassReport, UserEvent};
pub use background::BackgroundTask;
pub use cache::{CacheKey, DataCache, ResourceCache};
pub use callback::Callback;
pub use page::{NavGroup, Navigation, Page, PageError};
pub use session::{Session, SessionId};
#[cfg(feature = "state-persistence")]
pub use snapshot::{SnapshotError, StateSnapshot};

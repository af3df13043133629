#![forbid(unsafe_code)]

//! Session-scoped state store and the global/local mirroring protocol.
//!
//! In a rerun-driven app every interaction re-executes the active page from
//! top to bottom, so plain variables die at the end of each pass. This crate
//! provides the two pieces that give such an app memory:
//!
//! - [`StateStore`]: an explicit, session-lifetime key-value store mapping
//!   `String` keys to [`Value`]s. One store per session, owned by the
//!   session — never a process-wide singleton.
//! - [`sync`]: the initializer / mirror / binder trio
//!   ([`init_global`], [`mirror_global_to_local`], [`bind_local_to_global`])
//!   that keeps page-local widget keys consistent with shared global keys
//!   across independently rendered pages.
//!
//! The host loop that calls these at the right times lives in
//! `rillet-runtime`; this crate is pure data and deliberately knows nothing
//! about pages, widgets, or rendering.

pub mod store;
pub mod sync;
pub mod value;

pub use store::{LOCAL_KEY_PREFIX, StateError, StateStore, is_local_key};
pub use sync::{
    Binding, Mirrored, SyncPhase, bind_local_to_global, init_global, mirror_global_to_local,
};
pub use value::Value;

#![forbid(unsafe_code)]

//! Session-scripting harness for driving whole apps in tests.
//!
//! A [`Harness`] owns an [`App`] and any number of open sessions, and
//! exposes one method per user interaction: [`Harness::set`] edits a
//! widget, [`Harness::click`] presses a button, [`Harness::navigate`]
//! switches pages. Each call drives exactly one render pass and records
//! its [`PassReport`], so a test reads as the user journey it checks:
//!
//! ```
//! use rillet_harness::Harness;
//! use rillet_runtime::{App, Navigation, Page};
//!
//! let app = App::new(Navigation::new().group(
//!     "main",
//!     vec![Page::new("home", "Home", |ctx| {
//!         ctx.store_mut().set_default("global_visits", 0);
//!         ctx.store_mut().update("global_visits", |v| {
//!             if let rillet_state::Value::Int(n) = v {
//!                 *n += 1;
//!             }
//!         })?;
//!         Ok(())
//!     })],
//! ));
//!
//! let mut harness = Harness::new(app);
//! let sid = harness.open();
//! harness.first_load(sid).unwrap();
//! harness.rerun(sid).unwrap();
//! assert_eq!(harness.dump(sid), "global_visits = 2\n");
//! ```
//!
//! The harness also carries [`arb_value`], a `proptest` strategy over
//! arbitrary store values, for property tests against whole apps.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use proptest::prelude::*;
use rillet_runtime::{App, PageError, PassReport, Session, SessionId, UserEvent};
use rillet_state::{StateStore, Value};

/// Test driver owning an app and its scripted sessions.
#[derive(Debug)]
pub struct Harness {
    app: App,
    sessions: BTreeMap<SessionId, Session>,
    reports: Vec<PassReport>,
}

impl Harness {
    /// Wrap an app for scripting.
    #[must_use]
    pub fn new(app: App) -> Self {
        Self {
            app,
            sessions: BTreeMap::new(),
            reports: Vec::new(),
        }
    }

    /// The app under test.
    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Open a session on the app's default page. No pass has run yet;
    /// follow with [`Harness::first_load`].
    pub fn open(&mut self) -> SessionId {
        let session = self.app.open_session();
        let sid = session.id();
        tracing::debug!(%sid, "harness opened session");
        self.sessions.insert(sid, session);
        sid
    }

    /// Drive the initial render pass, as a browser hitting the app would.
    pub fn first_load(&mut self, sid: SessionId) -> Result<PassReport, PageError> {
        self.drive(sid, UserEvent::Rerun)
    }

    /// Re-render without a state change.
    pub fn rerun(&mut self, sid: SessionId) -> Result<PassReport, PageError> {
        self.drive(sid, UserEvent::Rerun)
    }

    /// Edit a widget: write its local key, run its handler, render once.
    pub fn set(
        &mut self,
        sid: SessionId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<PassReport, PageError> {
        self.drive(
            sid,
            UserEvent::WidgetChanged {
                key: key.into(),
                value: value.into(),
            },
        )
    }

    /// Press a button.
    pub fn click(
        &mut self,
        sid: SessionId,
        key: impl Into<String>,
    ) -> Result<PassReport, PageError> {
        self.drive(sid, UserEvent::Clicked { key: key.into() })
    }

    /// Submit a form with its staged edits.
    pub fn submit(
        &mut self,
        sid: SessionId,
        key: impl Into<String>,
        staged: Vec<(String, Value)>,
    ) -> Result<PassReport, PageError> {
        self.drive(
            sid,
            UserEvent::SubmitForm {
                key: key.into(),
                staged,
            },
        )
    }

    /// Switch the session to another page.
    pub fn navigate(
        &mut self,
        sid: SessionId,
        slug: impl Into<String>,
    ) -> Result<PassReport, PageError> {
        self.drive(sid, UserEvent::Navigate { slug: slug.into() })
    }

    fn drive(&mut self, sid: SessionId, event: UserEvent) -> Result<PassReport, PageError> {
        let session = self
            .sessions
            .get_mut(&sid)
            .unwrap_or_else(|| panic!("harness: unknown session {sid}"));
        let report = self.app.handle(session, event)?;
        self.reports.push(report.clone());
        Ok(report)
    }

    /// A scripted session, for direct inspection.
    ///
    /// # Panics
    ///
    /// Panics if `sid` was not opened through this harness.
    #[must_use]
    pub fn session(&self, sid: SessionId) -> &Session {
        self.sessions
            .get(&sid)
            .unwrap_or_else(|| panic!("harness: unknown session {sid}"))
    }

    /// Mutable access to a scripted session, for test arrangement that
    /// bypasses the event path.
    ///
    /// # Panics
    ///
    /// Panics if `sid` was not opened through this harness.
    pub fn session_mut(&mut self, sid: SessionId) -> &mut Session {
        self.sessions
            .get_mut(&sid)
            .unwrap_or_else(|| panic!("harness: unknown session {sid}"))
    }

    /// A scripted session's store.
    #[must_use]
    pub fn store(&self, sid: SessionId) -> &StateStore {
        self.session(sid).store()
    }

    /// Every successful pass driven so far, in order, across all sessions.
    #[must_use]
    pub fn reports(&self) -> &[PassReport] {
        &self.reports
    }

    /// The most recent successful pass.
    #[must_use]
    pub fn last_report(&self) -> Option<&PassReport> {
        self.reports.last()
    }

    /// Render a session's store as sorted `key = value` lines, one per
    /// key. Stable across runs; meant for golden assertions.
    #[must_use]
    pub fn dump(&self, sid: SessionId) -> String {
        let store = self.store(sid);
        let mut out = String::new();
        for key in store.keys() {
            if let Some(value) = store.get_opt(key) {
                let _ = writeln!(out, "{key} = {value}");
            }
        }
        out
    }

    /// Assert that a local/global key pair currently holds equal values.
    ///
    /// # Panics
    ///
    /// Panics with both values if they differ, and if either key is
    /// missing.
    #[track_caller]
    pub fn assert_synced(&self, sid: SessionId, local: &str, global: &str) {
        let store = self.store(sid);
        let local_value = store
            .get(local)
            .unwrap_or_else(|err| panic!("assert_synced: {err}"));
        let global_value = store
            .get(global)
            .unwrap_or_else(|err| panic!("assert_synced: {err}"));
        assert_eq!(
            local_value, global_value,
            "sync broken: {local} = {local_value} but {global} = {global_value}"
        );
    }
}

/// Strategy over arbitrary store values, a few nesting levels deep.
///
/// Floats are kept finite: the sync protocol's invariants are stated in
/// terms of value equality, which NaN would vacuously break.
pub fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e9..1.0e9_f64).prop_map(Value::Float),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::Str),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4).prop_map(Value::Map),
        ]
    })
}

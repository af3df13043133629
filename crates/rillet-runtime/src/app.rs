#![forbid(unsafe_code)]

//! The render-pass driver.
//!
//! An [`App`] owns the navigation tree and the app-wide caches. Sessions
//! are opened by the caller and passed back in for every [`UserEvent`];
//! each event produces exactly one render pass:
//!
//! 1. **Apply the event.** The edited widget value (or staged form values)
//!    is written to the session store, and the deferred handler the widget
//!    registered on the *previous* pass runs. Handlers always complete
//!    before any page code runs again.
//! 2. **Render.** The active page's function re-executes from top to
//!    bottom against the session store. Widgets register their keys and
//!    next-pass handlers as they mount.
//! 3. **Settle.** Widget keys that were registered last pass but not this
//!    one are forgotten — their local state is removed from the store —
//!    and the pass counter advances.
//!
//! Passes are serial per session: the driver takes `&mut Session`, so two
//! events for one session cannot interleave. Different sessions share
//! nothing but the caches.
//!
//! # Invariants
//!
//! 1. Deferred handlers run after the widget's value is stored and before
//!    the next pass renders.
//! 2. A failed pass leaves already-applied mutations in place and keeps
//!    the previous pass's widget registrations; the pass counter does not
//!    advance.
//! 3. Button/submit activation is visible for exactly the one pass that
//!    handles the click.

use ahash::{AHashMap, AHashSet};
use rillet_state::{StateStore, Value};

use crate::cache::{DataCache, ResourceCache};
use crate::callback::Callback;
use crate::page::{Navigation, PageError};
use crate::session::Session;

/// A user interaction, as delivered by whatever front end hosts the app.
#[derive(Debug, Clone)]
pub enum UserEvent {
    /// Re-render with no state change (page refresh).
    Rerun,
    /// The user edited a widget: its local key takes `value`, then the
    /// widget's registered change handler runs.
    WidgetChanged {
        /// The widget's local key.
        key: String,
        /// The new value the user chose.
        value: Value,
    },
    /// The user pressed a button. The button reports as activated for the
    /// resulting pass only.
    Clicked {
        /// The button's key.
        key: String,
    },
    /// The user submitted a form: every staged edit is written, then the
    /// form's submit handler runs, then one pass renders.
    SubmitForm {
        /// The form's key; reports as activated like a button.
        key: String,
        /// Local-key edits the form held back, in edit order.
        staged: Vec<(String, Value)>,
    },
    /// Switch the session to another page.
    Navigate {
        /// Slug of the target page.
        slug: String,
    },
}

/// What one completed render pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// Slug of the page that rendered.
    pub page: String,
    /// The pass number, counting from 1 per session.
    pub pass: u64,
    /// Widget keys forgotten because their widgets did not re-register,
    /// sorted.
    pub evicted: Vec<String>,
}

/// Everything a page render function can reach, for the duration of one
/// pass.
///
/// The context hands the page its session's store, the app-wide caches,
/// and the registration surface widgets use. It is created by the driver
/// and lives exactly as long as the render call.
pub struct PageCtx<'s> {
    store: &'s mut StateStore,
    data_cache: &'s DataCache,
    resource_cache: &'s ResourceCache,
    page: &'s str,
    pass: u64,
    activated: Option<String>,
    registered: AHashSet<String>,
    callbacks: AHashMap<String, Callback>,
}

impl<'s> PageCtx<'s> {
    fn new(
        store: &'s mut StateStore,
        data_cache: &'s DataCache,
        resource_cache: &'s ResourceCache,
        page: &'s str,
        pass: u64,
        activated: Option<String>,
    ) -> Self {
        Self {
            store,
            data_cache,
            resource_cache,
            page,
            pass,
            activated,
            registered: AHashSet::new(),
            callbacks: AHashMap::new(),
        }
    }

    /// The session's state store.
    #[must_use]
    pub fn store(&self) -> &StateStore {
        self.store
    }

    /// Mutable access to the session's state store.
    pub fn store_mut(&mut self) -> &mut StateStore {
        self.store
    }

    /// The app-wide memoization cache.
    #[must_use]
    pub fn data_cache(&self) -> &DataCache {
        self.data_cache
    }

    /// The app-wide singleton cache.
    #[must_use]
    pub fn resource_cache(&self) -> &ResourceCache {
        self.resource_cache
    }

    /// Slug of the page being rendered.
    #[must_use]
    pub fn page(&self) -> &str {
        self.page
    }

    /// The pass number this render belongs to, counting from 1.
    #[must_use]
    pub const fn pass(&self) -> u64 {
        self.pass
    }

    /// Whether the click/submit that triggered this pass targeted `key`.
    ///
    /// True for exactly one pass; the next pass sees `false` again.
    #[must_use]
    pub fn is_activated(&self, key: &str) -> bool {
        self.activated.as_deref() == Some(key)
    }

    /// Claim a widget key for this pass.
    ///
    /// Every mounted widget claims its key exactly once; a second claim is
    /// a page bug and fails the pass with [`PageError::DuplicateWidget`].
    /// Claims are also the liveness signal: keys not claimed this pass are
    /// forgotten when the pass settles.
    pub fn register_widget(&mut self, key: &str) -> Result<(), PageError> {
        if !self.registered.insert(key.to_owned()) {
            return Err(PageError::DuplicateWidget {
                key: key.to_owned(),
            });
        }
        tracing::trace!(key, page = self.page, "widget registered");
        Ok(())
    }

    /// Install the handler to run when this key's widget is next edited
    /// or clicked. Replaces any handler registered earlier in the pass.
    pub fn register_change(&mut self, key: impl Into<String>, callback: Callback) {
        self.callbacks.insert(key.into(), callback);
    }
}

#[cfg(feature = "test-helpers")]
impl<'s> PageCtx<'s> {
    /// Build a context over a bare store, for widget tests that exercise
    /// mounting without a full app.
    pub fn detached(
        store: &'s mut StateStore,
        data_cache: &'s DataCache,
        resource_cache: &'s ResourceCache,
    ) -> Self {
        Self::new(store, data_cache, resource_cache, "detached", 1, None)
    }

    /// Mark `key` as the activation target, as a click event would.
    pub fn activate(&mut self, key: impl Into<String>) {
        self.activated = Some(key.into());
    }

    /// Keys claimed so far this pass, sorted.
    #[must_use]
    pub fn registered_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.registered.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// The handler currently installed for `key`, if any.
    #[must_use]
    pub fn callback_for(&self, key: &str) -> Option<&Callback> {
        self.callbacks.get(key)
    }
}

/// The application: a navigation tree plus app-wide caches.
///
/// `App` is immutable during operation and can be shared behind an `Arc`;
/// all per-user mutability lives in the [`Session`]s the caller owns.
#[derive(Debug)]
pub struct App {
    nav: Navigation,
    data_cache: DataCache,
    resource_cache: ResourceCache,
}

impl App {
    /// Build an app over a navigation tree.
    #[must_use]
    pub fn new(nav: Navigation) -> Self {
        Self {
            nav,
            data_cache: DataCache::new(),
            resource_cache: ResourceCache::new(),
        }
    }

    /// The page tree.
    #[must_use]
    pub fn navigation(&self) -> &Navigation {
        &self.nav
    }

    /// The app-wide memoization cache.
    #[must_use]
    pub fn data_cache(&self) -> &DataCache {
        &self.data_cache
    }

    /// The app-wide singleton cache.
    #[must_use]
    pub fn resource_cache(&self) -> &ResourceCache {
        &self.resource_cache
    }

    /// Open a fresh session on the navigation default page.
    ///
    /// The caller owns the session and passes it to [`App::handle`] for
    /// every event. No pass has run yet; drive one with
    /// [`UserEvent::Rerun`] to populate initial state.
    #[must_use]
    pub fn open_session(&self) -> Session {
        let session = Session::new(self.nav.default_slug());
        tracing::debug!(session = session.id().get(), page = session.page(), "session opened");
        session
    }

    /// Drive one render pass for one user event.
    ///
    /// On success the session has advanced one pass and the report says
    /// what happened. On failure the session keeps its previous pass's
    /// registrations; mutations applied before the failure remain.
    pub fn handle(
        &self,
        session: &mut Session,
        event: UserEvent,
    ) -> Result<PassReport, PageError> {
        let pass = session.pass + 1;
        let _span = tracing::debug_span!(
            "render_pass",
            session = session.id().get(),
            page = %session.page,
            pass
        )
        .entered();

        // Phase 1: apply the event and run the deferred handler it targets.
        let mut activated = None;
        match event {
            UserEvent::Rerun => {}
            UserEvent::WidgetChanged { key, value } => {
                session.store.set(key.clone(), value);
                Self::run_callback(session, &key)?;
            }
            UserEvent::Clicked { key } => {
                Self::run_callback(session, &key)?;
                activated = Some(key);
            }
            UserEvent::SubmitForm { key, staged } => {
                for (local, value) in staged {
                    session.store.set(local, value);
                }
                Self::run_callback(session, &key)?;
                activated = Some(key);
            }
            UserEvent::Navigate { slug } => {
                if self.nav.resolve(&slug).is_none() {
                    return Err(PageError::UnknownPage { slug });
                }
                tracing::debug!(from = %session.page, to = %slug, "navigating");
                session.page = slug;
            }
        }

        // Phase 2: run the page top to bottom.
        let page = self.nav.resolve(&session.page).ok_or_else(|| {
            PageError::UnknownPage {
                slug: session.page.clone(),
            }
        })?;
        let mut ctx = PageCtx::new(
            &mut session.store,
            &self.data_cache,
            &self.resource_cache,
            &session.page,
            pass,
            activated,
        );
        page.render(&mut ctx)?;

        // Phase 3: settle. Forget widget state that was not re-registered.
        let PageCtx {
            registered,
            callbacks,
            ..
        } = ctx;
        let mut evicted: Vec<String> = session
            .widget_keys
            .difference(&registered)
            .cloned()
            .collect();
        evicted.sort_unstable();
        for key in &evicted {
            session.store.remove(key);
        }
        if !evicted.is_empty() {
            tracing::debug!(?evicted, "forgot widget state not re-registered");
        }
        session.widget_keys = registered;
        session.callbacks = callbacks;
        session.pass = pass;

        Ok(PassReport {
            page: session.page.clone(),
            pass,
            evicted,
        })
    }

    fn run_callback(session: &mut Session, key: &str) -> Result<(), PageError> {
        if let Some(callback) = session.callbacks.get(key) {
            tracing::debug!(key, "running deferred handler");
            callback.run(&mut session.store)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rillet_state::{bind_local_to_global, init_global, mirror_global_to_local};

    use crate::page::Page;

    use super::*;

    /// A page with one synced "slider" and one counter button, wired the
    /// way the widget crate wires real widgets.
    fn threshold_page(slug: &'static str) -> Page {
        Page::new(slug, slug, move |ctx| {
            init_global(ctx.store_mut(), "global_threshold", 50);
            init_global(ctx.store_mut(), "global_clicks", 0);

            let local = format!("_{slug}_threshold");
            mirror_global_to_local(ctx.store_mut(), local.clone(), "global_threshold")?;
            ctx.register_widget(&local)?;
            ctx.register_change(
                &local,
                Callback::bind(bind_local_to_global(&local, "global_threshold")),
            );

            let button = format!("_{slug}_count");
            ctx.register_widget(&button)?;
            ctx.register_change(
                &button,
                Callback::func(|store| {
                    store.update("global_clicks", |value| {
                        if let Value::Int(n) = value {
                            *n += 1;
                        }
                    })
                }),
            );
            if ctx.is_activated(&button) {
                let pass = ctx.pass() as i64;
                ctx.store_mut().set("global_last_click_pass", pass);
            }
            Ok(())
        })
    }

    fn two_page_app() -> App {
        App::new(
            Navigation::new()
                .group("main", vec![threshold_page("alpha"), threshold_page("beta")]),
        )
    }

    #[test]
    fn first_pass_initializes_and_registers() {
        let app = two_page_app();
        let mut session = app.open_session();
        let report = app.handle(&mut session, UserEvent::Rerun).unwrap();

        assert_eq!(report.pass, 1);
        assert_eq!(report.page, "alpha");
        assert!(report.evicted.is_empty());
        assert_eq!(session.store().get("global_threshold").unwrap().as_int(), Some(50));
        assert!(session.remembers_widget("_alpha_threshold"));
    }

    #[test]
    fn change_event_writes_value_then_runs_handler_then_renders() {
        let app = two_page_app();
        let mut session = app.open_session();
        app.handle(&mut session, UserEvent::Rerun).unwrap();

        app.handle(
            &mut session,
            UserEvent::WidgetChanged {
                key: "_alpha_threshold".to_owned(),
                value: Value::Int(80),
            },
        )
        .unwrap();

        // Handler pushed the edit to the global key, and the pass's
        // mirror copied it back down.
        assert_eq!(session.store().get("global_threshold").unwrap().as_int(), Some(80));
        assert_eq!(session.store().get("_alpha_threshold").unwrap().as_int(), Some(80));
    }

    #[test]
    fn edits_cross_pages_through_the_global_key() {
        let app = two_page_app();
        let mut session = app.open_session();
        app.handle(&mut session, UserEvent::Rerun).unwrap();
        app.handle(
            &mut session,
            UserEvent::WidgetChanged {
                key: "_alpha_threshold".to_owned(),
                value: Value::Int(80),
            },
        )
        .unwrap();

        app.handle(&mut session, UserEvent::Navigate { slug: "beta".to_owned() }).unwrap();
        assert_eq!(session.store().get("_beta_threshold").unwrap().as_int(), Some(80));
    }

    #[test]
    fn page_switch_evicts_stale_widget_keys() {
        let app = two_page_app();
        let mut session = app.open_session();
        app.handle(&mut session, UserEvent::Rerun).unwrap();

        let report = app
            .handle(&mut session, UserEvent::Navigate { slug: "beta".to_owned() })
            .unwrap();
        assert_eq!(
            report.evicted,
            vec!["_alpha_count".to_owned(), "_alpha_threshold".to_owned()]
        );
        assert!(!session.store().contains_key("_alpha_threshold"));
        assert!(session.remembers_widget("_beta_threshold"));
    }

    #[test]
    fn click_handler_runs_before_render_and_activation_lasts_one_pass() {
        let app = two_page_app();
        let mut session = app.open_session();
        app.handle(&mut session, UserEvent::Rerun).unwrap();

        app.handle(&mut session, UserEvent::Clicked { key: "_alpha_count".to_owned() })
            .unwrap();
        assert_eq!(session.store().get("global_clicks").unwrap().as_int(), Some(1));
        assert_eq!(
            session.store().get("global_last_click_pass").unwrap().as_int(),
            Some(2)
        );

        // Next pass: not activated anymore, counter untouched.
        app.handle(&mut session, UserEvent::Rerun).unwrap();
        assert_eq!(session.store().get("global_clicks").unwrap().as_int(), Some(1));
        assert_eq!(
            session.store().get("global_last_click_pass").unwrap().as_int(),
            Some(2)
        );
    }

    #[test]
    fn unknown_navigation_fails_and_leaves_the_session_put() {
        let app = two_page_app();
        let mut session = app.open_session();
        app.handle(&mut session, UserEvent::Rerun).unwrap();

        let err = app
            .handle(&mut session, UserEvent::Navigate { slug: "gamma".to_owned() })
            .unwrap_err();
        assert_eq!(err, PageError::UnknownPage { slug: "gamma".to_owned() });
        assert_eq!(session.page(), "alpha");
        assert_eq!(session.pass(), 1);
    }

    #[test]
    fn duplicate_widget_key_fails_the_pass() {
        let app = App::new(Navigation::new().group(
            "main",
            vec![Page::new("dup", "dup", |ctx| {
                ctx.register_widget("_twice")?;
                ctx.register_widget("_twice")?;
                Ok(())
            })],
        ));
        let mut session = app.open_session();
        let err = app.handle(&mut session, UserEvent::Rerun).unwrap_err();
        assert_eq!(err, PageError::DuplicateWidget { key: "_twice".to_owned() });
        assert_eq!(session.pass(), 0);
    }

    #[test]
    fn failed_pass_keeps_previous_registrations() {
        // Renders fine on pass 1, fails on pass 2, fine again afterwards.
        let page = Page::new("flaky", "flaky", |ctx| {
            ctx.register_widget("_w")?;
            ctx.store_mut().set("_w", 1);
            if ctx.pass() == 2 {
                return Err(PageError::WidgetContract {
                    key: "_w".to_owned(),
                    detail: "induced failure".to_owned(),
                });
            }
            Ok(())
        });
        let app = App::new(Navigation::new().group("main", vec![page]));
        let mut session = app.open_session();

        app.handle(&mut session, UserEvent::Rerun).unwrap();
        assert!(session.remembers_widget("_w"));

        let err = app.handle(&mut session, UserEvent::Rerun).unwrap_err();
        assert!(matches!(err, PageError::WidgetContract { .. }));
        // Pass did not advance, registration from pass 1 still stands.
        assert_eq!(session.pass(), 1);
        assert!(session.remembers_widget("_w"));

        let report = app.handle(&mut session, UserEvent::Rerun).unwrap();
        assert_eq!(report.pass, 2);
    }

    #[test]
    fn handler_for_unregistered_key_is_a_silent_no_op() {
        let app = two_page_app();
        let mut session = app.open_session();
        app.handle(&mut session, UserEvent::Rerun).unwrap();

        // No widget ever registered this key; the write still lands, no
        // handler runs, the pass completes.
        app.handle(
            &mut session,
            UserEvent::WidgetChanged {
                key: "_unknown".to_owned(),
                value: Value::Int(1),
            },
        )
        .unwrap();
        assert_eq!(session.store().get("global_threshold").unwrap().as_int(), Some(50));
    }

    #[test]
    fn form_submit_stages_all_writes_before_the_handler() {
        let page = Page::new("form", "form", |ctx| {
            init_global(ctx.store_mut(), "global_sum", 0);
            for key in ["_a", "_b"] {
                ctx.store_mut().set_default(key, 0);
                ctx.register_widget(key)?;
            }
            ctx.register_widget("_sum_form")?;
            ctx.register_change(
                "_sum_form",
                Callback::func(|store| {
                    let a = store.get("_a")?.as_int().unwrap_or(0);
                    let b = store.get("_b")?.as_int().unwrap_or(0);
                    store.set("global_sum", a + b);
                    Ok(())
                }),
            );
            Ok(())
        });
        let app = App::new(Navigation::new().group("main", vec![page]));
        let mut session = app.open_session();
        app.handle(&mut session, UserEvent::Rerun).unwrap();

        app.handle(
            &mut session,
            UserEvent::SubmitForm {
                key: "_sum_form".to_owned(),
                staged: vec![
                    ("_a".to_owned(), Value::Int(19)),
                    ("_b".to_owned(), Value::Int(23)),
                ],
            },
        )
        .unwrap();
        assert_eq!(session.store().get("global_sum").unwrap().as_int(), Some(42));
    }

    #[test]
    fn sessions_are_isolated_but_caches_are_shared() {
        let app = two_page_app();
        let mut one = app.open_session();
        let mut two = app.open_session();
        app.handle(&mut one, UserEvent::Rerun).unwrap();
        app.handle(&mut two, UserEvent::Rerun).unwrap();

        app.handle(
            &mut one,
            UserEvent::WidgetChanged {
                key: "_alpha_threshold".to_owned(),
                value: Value::Int(99),
            },
        )
        .unwrap();

        assert_eq!(one.store().get("global_threshold").unwrap().as_int(), Some(99));
        assert_eq!(two.store().get("global_threshold").unwrap().as_int(), Some(50));
    }
}

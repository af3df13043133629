#![forbid(unsafe_code)]

//! Form: a batch boundary around other widgets.
//!
//! A form changes *when* edits arrive, not where they live. Fields
//! inside a form are ordinary widgets mounting on their own keys; the
//! hosting front end holds their edits back and delivers them together
//! as one [`UserEvent::SubmitForm`](rillet_runtime::UserEvent), which
//! writes every staged value, runs the form's submit handler, and
//! renders one pass. The driver does not track which keys belong to
//! which form — that grouping is the front end's contract.
//!
//! Like a button, a form reports activation for exactly the pass that
//! handles its submit.

use rillet_runtime::{Callback, PageCtx, PageError};

use crate::Mountable;

/// Declares a form and its submit handler.
#[derive(Debug, Clone)]
pub struct Form {
    key: String,
    on_submit: Option<Callback>,
}

impl Form {
    /// A form identified by `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            on_submit: None,
        }
    }

    /// Handler to run on submit, after the staged field values are
    /// written and before the pass renders.
    #[must_use]
    pub fn on_submit(mut self, callback: Callback) -> Self {
        self.on_submit = Some(callback);
        self
    }

    /// The form's key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Mount the form, claiming its key for this pass.
    ///
    /// Field widgets still mount individually after this call; the
    /// returned handle says whether this pass is the submit pass.
    pub fn mount(self, ctx: &mut PageCtx<'_>) -> Result<FormHandle, PageError> {
        let Self { key, on_submit } = self;
        ctx.register_widget(&key)?;
        if let Some(callback) = on_submit {
            ctx.register_change(&key, callback);
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(key = key.as_str(), "form mounted");
        let submitted = ctx.is_activated(&key);
        Ok(FormHandle { key, submitted })
    }
}

impl Mountable for Form {
    type Output = FormHandle;

    fn mount(self, ctx: &mut PageCtx<'_>) -> Result<FormHandle, PageError> {
        Form::mount(self, ctx)
    }
}

/// What mounting a [`Form`] hands back to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormHandle {
    key: String,
    submitted: bool,
}

impl FormHandle {
    /// The form's key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether this pass is handling the form's submit.
    ///
    /// `true` for exactly one pass, like a button click.
    #[must_use]
    pub const fn submitted(&self) -> bool {
        self.submitted
    }
}

#[cfg(test)]
mod tests {
    use rillet_runtime::{DataCache, ResourceCache};
    use rillet_state::StateStore;

    use super::*;

    #[test]
    fn handle_reports_submit_for_the_activated_pass_only() {
        let mut store = StateStore::new();
        let (data, resources) = (DataCache::new(), ResourceCache::new());
        {
            let mut ctx = PageCtx::detached(&mut store, &data, &resources);
            let handle = Form::new("_order_form").mount(&mut ctx).unwrap();
            assert!(!handle.submitted());
        }
        let mut ctx = PageCtx::detached(&mut store, &data, &resources);
        ctx.activate("_order_form");
        let handle = Form::new("_order_form").mount(&mut ctx).unwrap();
        assert!(handle.submitted());
        assert_eq!(handle.key(), "_order_form");
    }

    #[test]
    fn submit_handler_is_registered_under_the_form_key() {
        let mut store = StateStore::new();
        store.set("_qty", 3);
        let (data, resources) = (DataCache::new(), ResourceCache::new());
        let mut ctx = PageCtx::detached(&mut store, &data, &resources);
        Form::new("_order_form")
            .on_submit(Callback::func(|store| {
                let qty = store.get("_qty")?.as_int().unwrap_or(0);
                store.set("global_ordered", qty);
                Ok(())
            }))
            .mount(&mut ctx)
            .unwrap();
        let callback = ctx.callback_for("_order_form").unwrap().clone();
        drop(ctx);
        callback.run(&mut store).unwrap();
        assert_eq!(store.get("global_ordered").unwrap().as_int(), Some(3));
    }

    #[test]
    fn two_forms_on_one_page_must_use_distinct_keys() {
        let mut store = StateStore::new();
        let (data, resources) = (DataCache::new(), ResourceCache::new());
        let mut ctx = PageCtx::detached(&mut store, &data, &resources);
        Form::new("_order_form").mount(&mut ctx).unwrap();
        let err = Form::new("_order_form").mount(&mut ctx).unwrap_err();
        assert!(matches!(err, PageError::DuplicateWidget { .. }));
    }
}

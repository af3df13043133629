#![forbid(unsafe_code)]

//! Momentary push button.
//!
//! A button holds no value between passes: mounting returns whether the
//! click that triggered *this* pass targeted it, and that answer is
//! `true` for exactly one pass. Anything that must outlive the pass
//! belongs in the state store, written either inside the `if clicked`
//! branch or by the click handler.

use rillet_runtime::{Callback, PageCtx, PageError};

use crate::Mountable;

/// Push button reporting one-pass activation.
///
/// # Example
///
/// ```
/// use rillet_runtime::Callback;
/// use rillet_widgets::Button;
///
/// # use rillet_runtime::{DataCache, PageCtx, ResourceCache};
/// # use rillet_state::StateStore;
/// # let mut store = StateStore::new();
/// # store.set_default("global_count", 0);
/// # let (data, resources) = (DataCache::new(), ResourceCache::new());
/// # let mut ctx = PageCtx::detached(&mut store, &data, &resources);
/// let clicked = Button::new("_increment", "Count up")
///     .on_click(Callback::func(|store| {
///         store.update("global_count", |value| {
///             if let rillet_state::Value::Int(n) = value {
///                 *n += 1;
///             }
///         })
///     }))
///     .mount(&mut ctx)?;
/// assert!(!clicked);
/// # Ok::<(), rillet_runtime::PageError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Button {
    key: String,
    label: String,
    on_click: Option<Callback>,
}

impl Button {
    /// A button identified by `key`.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            on_click: None,
        }
    }

    /// Handler to run when the button is next clicked, before the pass
    /// renders.
    #[must_use]
    pub fn on_click(mut self, callback: Callback) -> Self {
        self.on_click = Some(callback);
        self
    }

    /// The widget's key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Mount the button; `true` exactly when this pass is handling its
    /// click.
    pub fn mount(self, ctx: &mut PageCtx<'_>) -> Result<bool, PageError> {
        let Self { key, on_click, .. } = self;
        ctx.register_widget(&key)?;
        if let Some(callback) = on_click {
            ctx.register_change(&key, callback);
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(key = key.as_str(), "button mounted");
        Ok(ctx.is_activated(&key))
    }
}

impl Mountable for Button {
    type Output = bool;

    fn mount(self, ctx: &mut PageCtx<'_>) -> Result<bool, PageError> {
        Button::mount(self, ctx)
    }
}

#![forbid(unsafe_code)]

//! Boolean checkbox.

use rillet_runtime::{Callback, PageCtx, PageError};
use rillet_state::{Binding, Mirrored, Value};

use crate::{Mountable, contract_err, mount_plain, mount_synced_pair};

/// Checkbox holding a `bool`.
#[derive(Debug, Clone)]
pub struct Checkbox {
    key: String,
    label: String,
    default: bool,
    on_change: Option<Callback>,
}

impl Checkbox {
    /// A checkbox bound to `key`, starting unchecked.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            default: false,
            on_change: None,
        }
    }

    /// Whether a fresh key starts checked.
    #[must_use]
    pub fn default(mut self, checked: bool) -> Self {
        self.default = checked;
        self
    }

    /// Handler to run after the user toggles the box.
    #[must_use]
    pub fn on_change(mut self, callback: Callback) -> Self {
        self.on_change = Some(callback);
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

    /// Mount on the widget's own local key.
    pub fn mount(self, ctx: &mut PageCtx<'_>) -> Result<bool, PageError> {
        let Self {
            key,
            default,
            on_change,
            ..
        } = self;
        let value = mount_plain(ctx, &key, Value::Bool(default), on_change)?;
        bool_value(&key, &value)
    }

    /// Mount on a mirrored global value; edits flow back through the
    /// binding.
    pub fn mount_synced(
        self,
        ctx: &mut PageCtx<'_>,
        mirrored: &Mirrored,
        binding: Binding,
    ) -> Result<bool, PageError> {
        let Self { key, on_change, .. } = self;
        let value = mount_synced_pair(ctx, &key, mirrored, binding, on_change)?;
        bool_value(&key, &value)
    }
}

impl Mountable for Checkbox {
    type Output = bool;

    fn mount(self, ctx: &mut PageCtx<'_>) -> Result<bool, PageError> {
        Checkbox::mount(self, ctx)
    }
}

fn bool_value(key: &str, value: &Value) -> Result<bool, PageError> {
    value
        .as_bool()
        .ok_or_else(|| contract_err(key, format!("expected bool, found {}", value.type_name())))
}

#![forbid(unsafe_code)]

//! Single-line text input.

use rillet_runtime::{Callback, PageCtx, PageError};
use rillet_state::{Binding, Mirrored, Value};

use crate::{Mountable, contract_err, mount_plain, mount_synced_pair};

/// Text input holding a `String`.
#[derive(Debug, Clone)]
pub struct TextInput {
    key: String,
    label: String,
    default: String,
    on_change: Option<Callback>,
}

impl TextInput {
    /// A text input bound to `key`, starting empty.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            default: String::new(),
            on_change: None,
        }
    }

    /// Value a fresh key starts at.
    #[must_use]
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.default = value.into();
        self
    }

    /// Handler to run after the user edits the text.
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
    pub fn mount(self, ctx: &mut PageCtx<'_>) -> Result<String, PageError> {
        let Self {
            key,
            default,
            on_change,
            ..
        } = self;
        let value = mount_plain(ctx, &key, Value::Str(default), on_change)?;
        str_value(&key, &value)
    }

    /// Mount on a mirrored global value; edits flow back through the
    /// binding.
    pub fn mount_synced(
        self,
        ctx: &mut PageCtx<'_>,
        mirrored: &Mirrored,
        binding: Binding,
    ) -> Result<String, PageError> {
        let Self { key, on_change, .. } = self;
        let value = mount_synced_pair(ctx, &key, mirrored, binding, on_change)?;
        str_value(&key, &value)
    }
}

impl Mountable for TextInput {
    type Output = String;

    fn mount(self, ctx: &mut PageCtx<'_>) -> Result<String, PageError> {
        TextInput::mount(self, ctx)
    }
}

fn str_value(key: &str, value: &Value) -> Result<String, PageError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| contract_err(key, format!("expected str, found {}", value.type_name())))
}

#![forbid(unsafe_code)]

//! Floating-point number input.

use rillet_runtime::{Callback, PageCtx, PageError};
use rillet_state::{Binding, Mirrored, Value};

use crate::{Mountable, contract_err, mount_plain, mount_synced_pair};

/// Number input holding an `f64`, with advisory bounds.
#[derive(Debug, Clone)]
pub struct NumberInput {
    key: String,
    label: String,
    min: Option<f64>,
    max: Option<f64>,
    default: f64,
    on_change: Option<Callback>,
}

impl NumberInput {
    /// A number input bound to `key`.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            min: None,
            max: None,
            default: 0.0,
            on_change: None,
        }
    }

    /// Advisory lower bound, inclusive.
    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Advisory upper bound, inclusive.
    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Value a fresh key starts at.
    #[must_use]
    pub fn default(mut self, value: f64) -> Self {
        self.default = value;
        self
    }

    /// Handler to run after the user edits the value.
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
    pub fn mount(self, ctx: &mut PageCtx<'_>) -> Result<f64, PageError> {
        let Self {
            key,
            min,
            max,
            default,
            on_change,
            ..
        } = self;
        let value = mount_plain(ctx, &key, Value::Float(default), on_change)?;
        float_value(&key, min, max, &value)
    }

    /// Mount on a mirrored global value; edits flow back through the
    /// binding.
    pub fn mount_synced(
        self,
        ctx: &mut PageCtx<'_>,
        mirrored: &Mirrored,
        binding: Binding,
    ) -> Result<f64, PageError> {
        let Self {
            key,
            min,
            max,
            on_change,
            ..
        } = self;
        let value = mount_synced_pair(ctx, &key, mirrored, binding, on_change)?;
        float_value(&key, min, max, &value)
    }
}

impl Mountable for NumberInput {
    type Output = f64;

    fn mount(self, ctx: &mut PageCtx<'_>) -> Result<f64, PageError> {
        NumberInput::mount(self, ctx)
    }
}

fn float_value(
    key: &str,
    min: Option<f64>,
    max: Option<f64>,
    value: &Value,
) -> Result<f64, PageError> {
    let x = value
        .as_float()
        .ok_or_else(|| contract_err(key, format!("expected float, found {}", value.type_name())))?;
    let below = min.is_some_and(|min| x < min);
    let above = max.is_some_and(|max| x > max);
    if below || above {
        #[cfg(feature = "tracing")]
        tracing::warn!(key, value = x, "number input outside advisory bounds");
    }
    Ok(x)
}

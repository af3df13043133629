#![forbid(unsafe_code)]

//! Integer slider.
//!
//! The canonical synced widget: most of the sync protocol's examples are
//! a slider shared across pages. Range bounds are advisory — see the
//! crate docs for the clamping stance.
//!
//! # Example
//!
//! A page sharing a temperature with other pages:
//!
//! ```
//! use rillet_runtime::{PageCtx, PageError};
//! use rillet_state::{bind_local_to_global, init_global, mirror_global_to_local};
//! use rillet_widgets::Slider;
//!
//! fn render(ctx: &mut PageCtx<'_>) -> Result<(), PageError> {
//!     init_global(ctx.store_mut(), "global_celsius", 20);
//!     let mirrored = mirror_global_to_local(ctx.store_mut(), "_celsius", "global_celsius")?;
//!     let binding = bind_local_to_global("_celsius", "global_celsius");
//!
//!     let celsius = Slider::new("_celsius", "Temperature (°C)")
//!         .range(-30, 45)
//!         .mount_synced(ctx, &mirrored, binding)?;
//!
//!     let fahrenheit = celsius * 9 / 5 + 32;
//!     ctx.store_mut().set("global_fahrenheit", fahrenheit);
//!     Ok(())
//! }
//! ```

use rillet_runtime::{Callback, PageCtx, PageError};
use rillet_state::{Binding, Mirrored, Value};

use crate::{Mountable, contract_err, mount_plain, mount_synced_pair};

/// Integer slider with an advisory range.
#[derive(Debug, Clone)]
pub struct Slider {
    key: String,
    label: String,
    range: Option<(i64, i64)>,
    default: i64,
    on_change: Option<Callback>,
}

impl Slider {
    /// A slider bound to `key`.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            range: None,
            default: 0,
            on_change: None,
        }
    }

    /// Advisory bounds, inclusive on both ends.
    #[must_use]
    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Value a fresh key starts at. Ignored when the key already holds a
    /// value, and by the synced flavor, which always displays the mirror.
    #[must_use]
    pub fn default(mut self, value: i64) -> Self {
        self.default = value;
        self
    }

    /// Handler to run after the user moves the slider.
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
    pub fn mount(self, ctx: &mut PageCtx<'_>) -> Result<i64, PageError> {
        let Self {
            key,
            range,
            default,
            on_change,
            ..
        } = self;
        let value = mount_plain(ctx, &key, Value::Int(default), on_change)?;
        int_value(&key, range, &value)
    }

    /// Mount on a mirrored global value; edits flow back through the
    /// binding. Any `on_change` handler runs after the binder.
    pub fn mount_synced(
        self,
        ctx: &mut PageCtx<'_>,
        mirrored: &Mirrored,
        binding: Binding,
    ) -> Result<i64, PageError> {
        let Self {
            key,
            range,
            on_change,
            ..
        } = self;
        let value = mount_synced_pair(ctx, &key, mirrored, binding, on_change)?;
        int_value(&key, range, &value)
    }
}

impl Mountable for Slider {
    type Output = i64;

    fn mount(self, ctx: &mut PageCtx<'_>) -> Result<i64, PageError> {
        Slider::mount(self, ctx)
    }
}

fn int_value(key: &str, range: Option<(i64, i64)>, value: &Value) -> Result<i64, PageError> {
    let n = value
        .as_int()
        .ok_or_else(|| contract_err(key, format!("expected int, found {}", value.type_name())))?;
    if let Some((min, max)) = range {
        if n < min || n > max {
            #[cfg(feature = "tracing")]
            tracing::warn!(key, value = n, min, max, "slider value outside advisory range");
        }
    }
    Ok(n)
}

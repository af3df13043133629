#![forbid(unsafe_code)]

//! Single-choice select box.
//!
//! The stored value must be one of the configured options. Unlike the
//! advisory numeric ranges on [`Slider`](crate::Slider), option
//! membership is a hard contract: a stray value cannot be rendered as a
//! selection at all, so mounting fails rather than guessing.

use rillet_runtime::{Callback, PageCtx, PageError};
use rillet_state::{Binding, Mirrored, Value};

use crate::{Mountable, contract_err, mount_plain, mount_synced_pair};

/// Select box over a fixed list of string options.
#[derive(Debug, Clone)]
pub struct Select {
    key: String,
    label: String,
    options: Vec<String>,
    default: Option<String>,
    on_change: Option<Callback>,
}

impl Select {
    /// A select bound to `key` offering `options`, defaulting to the
    /// first option.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            options: options.into_iter().map(Into::into).collect(),
            default: None,
            on_change: None,
        }
    }

    /// Option selected for a fresh key instead of the first one.
    #[must_use]
    pub fn default(mut self, option: impl Into<String>) -> Self {
        self.default = Some(option.into());
        self
    }

    /// Handler to run after the user picks a different option.
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

    /// Configured options, in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Mount on the widget's own local key.
    pub fn mount(self, ctx: &mut PageCtx<'_>) -> Result<String, PageError> {
        let Self {
            key,
            options,
            default,
            on_change,
            ..
        } = self;
        let initial = initial_option(&key, &options, default)?;
        let value = mount_plain(ctx, &key, Value::Str(initial), on_change)?;
        option_value(&key, &options, &value)
    }

    /// Mount on a mirrored global value; edits flow back through the
    /// binding.
    pub fn mount_synced(
        self,
        ctx: &mut PageCtx<'_>,
        mirrored: &Mirrored,
        binding: Binding,
    ) -> Result<String, PageError> {
        let Self {
            key,
            options,
            on_change,
            ..
        } = self;
        let value = mount_synced_pair(ctx, &key, mirrored, binding, on_change)?;
        option_value(&key, &options, &value)
    }
}

impl Mountable for Select {
    type Output = String;

    fn mount(self, ctx: &mut PageCtx<'_>) -> Result<String, PageError> {
        Select::mount(self, ctx)
    }
}

fn initial_option(
    key: &str,
    options: &[String],
    default: Option<String>,
) -> Result<String, PageError> {
    if let Some(choice) = default {
        if !options.iter().any(|o| *o == choice) {
            return Err(contract_err(
                key,
                format!("default {choice:?} is not among the options"),
            ));
        }
        return Ok(choice);
    }
    options
        .first()
        .cloned()
        .ok_or_else(|| contract_err(key, "select has no options"))
}

fn option_value(key: &str, options: &[String], value: &Value) -> Result<String, PageError> {
    let text = value
        .as_str()
        .ok_or_else(|| contract_err(key, format!("expected str, found {}", value.type_name())))?;
    if !options.iter().any(|o| o == text) {
        return Err(contract_err(
            key,
            format!("value {text:?} is not among the options"),
        ));
    }
    Ok(text.to_owned())
}

#[cfg(test)]
mod tests {
    use rillet_runtime::{DataCache, ResourceCache};
    use rillet_state::StateStore;

    use super::*;

    fn mount_units(store: &mut StateStore) -> Result<String, PageError> {
        let (data, resources) = (DataCache::new(), ResourceCache::new());
        let mut ctx = PageCtx::detached(store, &data, &resources);
        Select::new("_units", "Units", ["celsius", "fahrenheit"]).mount(&mut ctx)
    }

    #[test]
    fn first_option_is_the_default() {
        let mut store = StateStore::new();
        assert_eq!(mount_units(&mut store).unwrap(), "celsius");
    }

    #[test]
    fn explicit_default_wins_over_first_option() {
        let mut store = StateStore::new();
        let (data, resources) = (DataCache::new(), ResourceCache::new());
        let mut ctx = PageCtx::detached(&mut store, &data, &resources);
        let choice = Select::new("_units", "Units", ["celsius", "fahrenheit"])
            .default("fahrenheit")
            .mount(&mut ctx)
            .unwrap();
        assert_eq!(choice, "fahrenheit");
    }

    #[test]
    fn default_outside_the_options_is_a_contract_error() {
        let mut store = StateStore::new();
        let (data, resources) = (DataCache::new(), ResourceCache::new());
        let mut ctx = PageCtx::detached(&mut store, &data, &resources);
        let err = Select::new("_units", "Units", ["celsius", "fahrenheit"])
            .default("kelvin")
            .mount(&mut ctx)
            .unwrap_err();
        assert!(matches!(err, PageError::WidgetContract { .. }));
    }

    #[test]
    fn empty_options_are_a_contract_error() {
        let mut store = StateStore::new();
        let (data, resources) = (DataCache::new(), ResourceCache::new());
        let mut ctx = PageCtx::detached(&mut store, &data, &resources);
        let err = Select::new("_units", "Units", Vec::<String>::new())
            .mount(&mut ctx)
            .unwrap_err();
        assert!(matches!(err, PageError::WidgetContract { .. }));
    }

    #[test]
    fn stored_value_outside_the_options_is_rejected() {
        let mut store = StateStore::new();
        store.set("_units", "kelvin");
        let err = mount_units(&mut store).unwrap_err();
        match err {
            PageError::WidgetContract { key, detail } => {
                assert_eq!(key, "_units");
                assert!(detail.contains("kelvin"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn stored_selection_survives_reruns() {
        let mut store = StateStore::new();
        store.set("_units", "fahrenheit");
        for _ in 0..3 {
            assert_eq!(mount_units(&mut store).unwrap(), "fahrenheit");
        }
    }
}

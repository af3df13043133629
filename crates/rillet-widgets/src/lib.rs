#![forbid(unsafe_code)]

//! State-backed widgets for Rillet pages.
//!
//! Every widget here is a builder that *mounts* into a render pass:
//! mounting claims the widget's key for duplicate detection and lifecycle
//! tracking, registers the handler to run when the user next touches the
//! widget, and hands the page back the value to render with. Nothing else
//! is retained — widgets are rebuilt from scratch every pass, exactly like
//! the pages that declare them.
//!
//! Value-bearing widgets come in two flavors:
//!
//! - `mount` keeps the value on the widget's own local key. Good for
//!   page-private state.
//! - `mount_synced` takes the [`Mirrored`](rillet_state::Mirrored) token
//!   and [`Binding`](rillet_state::Binding) from the sync protocol, so the
//!   widget displays a shared global value and pushes edits back to it.
//!   Requiring the token means a page cannot construct the widget before
//!   mirroring.
//!
//! Widgets check their contracts at mount time and fail the pass with
//! [`PageError::WidgetContract`] rather than guessing: a slider mounted on
//! a string, a select whose stored value is not among its options, a
//! mirrored token for a different key. Ranges are the exception — they are
//! advisory, and an out-of-range value mounts as-is (pages that want
//! clamping clamp the global key before mirroring).

pub mod button;
pub mod checkbox;
pub mod form;
pub mod number_input;
pub mod select;
pub mod slider;
pub mod text_input;

pub use button::Button;
pub use checkbox::Checkbox;
pub use form::{Form, FormHandle};
pub use number_input::NumberInput;
pub use select::Select;
pub use slider::Slider;
pub use text_input::TextInput;

use rillet_runtime::{Callback, PageCtx, PageError};
use rillet_state::{Binding, Mirrored, Value};

/// A widget that can attach to a render pass.
///
/// Mounting consumes the builder: widgets live for one pass by design.
/// The trait exists for code that treats widgets generically; concrete
/// widgets also expose `mount` inherently, so importing the trait is only
/// needed at generic seams.
pub trait Mountable {
    /// What the page receives back from mounting.
    type Output;

    /// Attach to the current pass.
    fn mount(self, ctx: &mut PageCtx<'_>) -> Result<Self::Output, PageError>;
}

pub(crate) fn contract_err(key: &str, detail: impl Into<String>) -> PageError {
    PageError::WidgetContract {
        key: key.to_owned(),
        detail: detail.into(),
    }
}

/// Common plain-mount path: claim the key, seed the default, install the
/// optional change handler, return the current value.
pub(crate) fn mount_plain(
    ctx: &mut PageCtx<'_>,
    key: &str,
    default: Value,
    on_change: Option<Callback>,
) -> Result<Value, PageError> {
    ctx.register_widget(key)?;
    let value = ctx.store_mut().set_default(key, default).clone();
    if let Some(callback) = on_change {
        ctx.register_change(key, callback);
    }
    #[cfg(feature = "tracing")]
    tracing::trace!(key, value = %value, "widget mounted");
    Ok(value)
}

/// Common synced-mount path: verify the token and binding belong to this
/// widget, claim the key, install the binder (running any extra handler
/// after it), and return the mirrored value.
pub(crate) fn mount_synced_pair(
    ctx: &mut PageCtx<'_>,
    key: &str,
    mirrored: &Mirrored,
    binding: Binding,
    extra: Option<Callback>,
) -> Result<Value, PageError> {
    if mirrored.key() != key {
        return Err(contract_err(
            key,
            format!("mirrored token belongs to key {:?}", mirrored.key()),
        ));
    }
    if binding.local_key() != key {
        return Err(contract_err(
            key,
            format!("binding reads key {:?}", binding.local_key()),
        ));
    }
    ctx.register_widget(key)?;
    let callback = match extra {
        None => Callback::bind(binding),
        Some(extra) => Callback::func(move |store| {
            binding.apply(store)?;
            extra.run(store)
        }),
    };
    ctx.register_change(key, callback);
    #[cfg(feature = "tracing")]
    tracing::trace!(key, value = %mirrored.value(), "synced widget mounted");
    Ok(mirrored.value().clone())
}

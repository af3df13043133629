#![forbid(unsafe_code)]

//! Architecture: reruns, click handlers, and widget memory.
//!
//! The same global keys as the fundamentals page, mounted here under this
//! page's own local keys — the protocol, not the pages, keeps the two in
//! agreement. Below that, a counter driven entirely by click handlers and
//! the clamp-before-mount answer to slider bounds that are themselves
//! widgets.

use rillet_runtime::{Callback, Page};
use rillet_state::{
    StateError, StateStore, Value, bind_local_to_global, init_global, mirror_global_to_local,
};
use rillet_widgets::{Button, Select, Slider};

/// Slug this page answers to in navigation events.
pub const SLUG: &str = "architecture";

/// Build the page.
#[must_use]
pub fn page() -> Page {
    Page::new(SLUG, "Architecture", |ctx| {
        init_global(ctx.store_mut(), "global_group", "A");
        init_global(ctx.store_mut(), "global_threshold", 50);
        init_global(ctx.store_mut(), "global_counter", 0);

        // Same globals as fundamentals, distinct local keys.
        let mirrored = mirror_global_to_local(ctx.store_mut(), "_arch_group", "global_group")?;
        let binding = bind_local_to_global("_arch_group", "global_group");
        Select::new("_arch_group", "Group", ["A", "B", "C"])
            .mount_synced(ctx, &mirrored, binding)?;

        let mirrored =
            mirror_global_to_local(ctx.store_mut(), "_arch_threshold", "global_threshold")?;
        let binding = bind_local_to_global("_arch_threshold", "global_threshold");
        Slider::new("_arch_threshold", "Passing score")
            .range(0, 100)
            .mount_synced(ctx, &mirrored, binding)?;

        // Counter adjusted only by click handlers, never by page code.
        Button::new("_add_five", "Add 5")
            .on_click(Callback::func(|store| adjust_counter(store, 5)))
            .mount(ctx)?;
        Button::new("_add_current", "Add current")
            .on_click(Callback::func(|store| {
                let current = store.get("global_counter")?.as_int().unwrap_or(0);
                adjust_counter(store, current)
            }))
            .mount(ctx)?;
        Button::new("_subtract_one", "Subtract 1")
            .on_click(Callback::func(|store| adjust_counter(store, -1)))
            .mount(ctx)?;

        // A keyed widget remembers across reruns without any global.
        let level = Slider::new("_memory_level", "Level")
            .range(0, 10)
            .default(3)
            .mount(ctx)?;

        // Bounds are widgets too. When they tighten, the bounded slider's
        // stored value may sit outside the new range; the core never
        // clamps, so the page does, before mounting.
        let lo = Slider::new("_bound_lo", "Lower bound")
            .range(0, 50)
            .default(0)
            .mount(ctx)?;
        let hi = Slider::new("_bound_hi", "Upper bound")
            .range(50, 100)
            .default(100)
            .mount(ctx)?;
        if let Some(stuck) = ctx.store().get_opt("_bounded").and_then(Value::as_int) {
            // Bounds are advisory like every range; only clamp while they
            // still describe a range.
            if lo <= hi {
                let clamped = stuck.clamp(lo, hi);
                if clamped != stuck {
                    tracing::debug!(was = stuck, now = clamped, "clamping value to shrunk bounds");
                    ctx.store_mut().set("_bounded", clamped);
                }
            }
        }
        let bounded = Slider::new("_bounded", "Bounded value")
            .range(lo, hi)
            .default(lo)
            .mount(ctx)?;

        let pass = ctx.pass();
        tracing::info!(pass, level, bounded, "architecture pass complete");
        Ok(())
    })
}

fn adjust_counter(store: &mut StateStore, delta: i64) -> Result<(), StateError> {
    store.update("global_counter", |value| {
        if let Value::Int(n) = value {
            *n += delta;
        }
    })
}

#![forbid(unsafe_code)]

//! Fundamentals: the full sync cycle on one page.
//!
//! Initialize the globals, mirror each into a local widget key, mount the
//! synced widgets, and filter the score table by whatever the globals
//! currently hold. Edits come back through the binders on the next pass.

use rillet_runtime::Page;
use rillet_state::{bind_local_to_global, init_global, mirror_global_to_local};
use rillet_widgets::{Select, Slider};

use crate::scores;

/// Slug this page answers to in navigation events.
pub const SLUG: &str = "fundamentals";

/// Build the page.
#[must_use]
pub fn page() -> Page {
    Page::new(SLUG, "Fundamentals", |ctx| {
        init_global(ctx.store_mut(), "global_group", "A");
        init_global(ctx.store_mut(), "global_threshold", 50);

        let mirrored = mirror_global_to_local(ctx.store_mut(), "_local_group", "global_group")?;
        let binding = bind_local_to_global("_local_group", "global_group");
        let group = Select::new("_local_group", "Group", ["A", "B", "C"])
            .mount_synced(ctx, &mirrored, binding)?;

        let mirrored =
            mirror_global_to_local(ctx.store_mut(), "_local_threshold", "global_threshold")?;
        let binding = bind_local_to_global("_local_threshold", "global_threshold");
        let threshold = Slider::new("_local_threshold", "Passing score")
            .range(0, 100)
            .mount_synced(ctx, &mirrored, binding)?;

        let passing = scores::passing(&group, threshold);
        let names: Vec<&str> = passing.iter().map(|row| row.name).collect();
        ctx.store_mut().set("global_passing_count", passing.len() as i64);
        tracing::info!(group = group.as_str(), threshold, ?names, "score table filtered");
        Ok(())
    })
}

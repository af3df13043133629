#![forbid(unsafe_code)]

//! App design: caches and background work.
//!
//! A memoized score load shared by every session, a singleton API client
//! that outlives any one pass, and an off-thread recomputation whose
//! result a later pass picks up. The worker never touches the store; the
//! page polls the task and writes the result itself.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rillet_runtime::{BackgroundTask, CacheKey, Page};
use rillet_state::init_global;

use crate::api_client::ApiClient;
use crate::scores;

/// Slug this page answers to in navigation events.
pub const SLUG: &str = "app-design";

const SCORES_TTL: Duration = Duration::from_secs(60);

/// Build the page.
#[must_use]
pub fn page() -> Page {
    Page::new(SLUG, "App design", |ctx| {
        init_global(ctx.store_mut(), "global_group", "A");
        let group = ctx
            .store()
            .get("global_group")?
            .as_str()
            .unwrap_or("A")
            .to_owned();

        // Memoized load: one computation per group for the whole app.
        let rows: Vec<(String, i64)> = ctx.data_cache().get_or_compute(
            CacheKey::of("load_scores", &[group.as_str()]),
            Some(SCORES_TTL),
            move || scores::load_scores(&group),
        );
        ctx.store_mut().set("global_loaded_rows", rows.len() as i64);

        // One live client shared by every session.
        let client: Arc<ApiClient> = ctx.resource_cache().get_or_init(
            CacheKey::of("api_client", &["https://scores.example/api"]),
            || ApiClient::connect("https://scores.example/api"),
        );
        let motd = client.fetch_motd();
        let calls = client.calls() as i64;
        ctx.store_mut().set("global_api_calls", calls);
        tracing::info!(motd = motd.as_str(), calls, "api client reachable");

        // The slow recomputation runs off-thread exactly once; later
        // passes observe its completion here.
        let task: Arc<BackgroundTask<i64>> = ctx
            .resource_cache()
            .get_or_init(CacheKey::of("rescore_total", &[]), || {
                BackgroundTask::spawn(|| {
                    thread::sleep(Duration::from_millis(25));
                    scores::total()
                })
            });
        if let Some(total) = task.try_take() {
            ctx.store_mut().set("global_rescore_total", total);
        }
        let status = if ctx.store().contains_key("global_rescore_total") {
            "ready"
        } else {
            "running"
        };
        ctx.store_mut().set("global_rescore_status", status);
        Ok(())
    })
}

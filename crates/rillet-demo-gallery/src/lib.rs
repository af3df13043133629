#![forbid(unsafe_code)]

//! The tutorial gallery, rebuilt on the Rillet core.
//!
//! Three pages, one per chapter of the original material:
//!
//! - **fundamentals** — two synced controls filtering a score table; the
//!   whole init → mirror → mount → bind cycle on one page.
//! - **architecture** — the same global keys edited from a second page,
//!   a counter driven by click handlers, and the clamp-before-mount
//!   answer to shrinking slider bounds.
//! - **app-design** — memoized data loads, a singleton API client, and
//!   background work observed by a later pass.
//!
//! The binary scripts a tour through all three; the library exposes the
//! assembled [`App`] so tests can drive it through the harness:
//!
//! ```
//! use rillet_demo_gallery::gallery;
//! use rillet_runtime::UserEvent;
//!
//! let app = gallery();
//! let mut session = app.open_session();
//! app.handle(&mut session, UserEvent::Rerun)?;
//! assert_eq!(session.page(), "fundamentals");
//! # Ok::<(), rillet_runtime::PageError>(())
//! ```

pub mod api_client;
pub mod pages;
pub mod scores;

pub use api_client::ApiClient;

use rillet_runtime::{App, Navigation};

/// The assembled gallery app with its navigation tree.
#[must_use]
pub fn gallery() -> App {
    App::new(
        Navigation::new()
            .group("Get started", vec![pages::fundamentals::page()])
            .group(
                "Develop",
                vec![pages::architecture::page(), pages::app_design::page()],
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_covers_all_three_chapters() {
        let app = gallery();
        assert_eq!(
            app.navigation().slugs(),
            vec!["fundamentals", "architecture", "app-design"]
        );
        assert_eq!(app.navigation().default_slug(), "fundamentals");
    }
}

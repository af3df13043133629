#![forbid(unsafe_code)]

//! Pages and the navigation tree.
//!
//! A [`Page`] is a render function plus identity: the driver re-executes the
//! function from top to bottom on every pass, so everything the page wants
//! to keep must go through the session store. [`Navigation`] arranges pages
//! into labelled groups, the way a sidebar presents them, and picks the
//! page a fresh session lands on.
//!
//! # Failure Modes
//!
//! | Error | Meaning |
//! |-------|---------|
//! | [`PageError::State`] | A store read failed; usually a skipped initializer |
//! | [`PageError::DuplicateWidget`] | Two widgets claimed the same key in one pass |
//! | [`PageError::WidgetContract`] | A stored value broke a widget's type/range contract |
//! | [`PageError::UnknownPage`] | A navigation target no page is registered under |

use std::fmt;

use rillet_state::StateError;

use crate::app::PageCtx;

/// Errors surfaced by a render pass.
///
/// All of these are programming errors in page code or host wiring; none
/// are transient. A failed pass leaves already-applied store mutations in
/// place and keeps the previous pass's widget registrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// A state store operation failed.
    State(StateError),
    /// Two widgets in one pass claimed the same key.
    DuplicateWidget {
        /// The key claimed twice.
        key: String,
    },
    /// A stored value violated a widget's contract (wrong type, unknown
    /// option, and so on).
    WidgetContract {
        /// The widget's key.
        key: String,
        /// Human-readable description of the violation.
        detail: String,
    },
    /// A navigation target that no registered page answers to.
    UnknownPage {
        /// The slug that failed to resolve.
        slug: String,
    },
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State(err) => write!(f, "state error: {err}"),
            Self::DuplicateWidget { key } => {
                write!(f, "duplicate widget key {key:?} within one render pass")
            }
            Self::WidgetContract { key, detail } => {
                write!(f, "widget contract violated for key {key:?}: {detail}")
            }
            Self::UnknownPage { slug } => write!(f, "no page registered for slug {slug:?}"),
        }
    }
}

impl std::error::Error for PageError {}

impl From<StateError> for PageError {
    fn from(err: StateError) -> Self {
        Self::State(err)
    }
}

type RenderFn = Box<dyn Fn(&mut PageCtx<'_>) -> Result<(), PageError> + Send + Sync>;

/// A renderable page: slug, human title, and the render function the driver
/// re-executes on every pass.
pub struct Page {
    slug: String,
    title: String,
    render: RenderFn,
}

impl Page {
    /// Create a page from its render function.
    ///
    /// The slug is the stable identifier navigation events use; the title
    /// is what a navigation UI would display.
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        render: impl Fn(&mut PageCtx<'_>) -> Result<(), PageError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            render: Box::new(render),
        }
    }

    /// Stable identifier used in navigation events.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Human-readable title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn render(&self, ctx: &mut PageCtx<'_>) -> Result<(), PageError> {
        (self.render)(ctx)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("slug", &self.slug)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// A labelled group of pages, as a sidebar section would show them.
#[derive(Debug)]
pub struct NavGroup {
    label: String,
    pages: Vec<Page>,
}

impl NavGroup {
    /// The group's sidebar label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Pages in declaration order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }
}

/// The app's page tree: ordered groups of pages plus the default landing
/// page for fresh sessions.
///
/// Built with chained calls:
///
/// ```
/// use rillet_runtime::{Navigation, Page};
///
/// let nav = Navigation::new()
///     .group("Get started", vec![Page::new("home", "Home", |_| Ok(()))])
///     .group("Develop", vec![Page::new("internals", "Internals", |_| Ok(()))])
///     .default_page("home");
///
/// assert_eq!(nav.default_slug(), "home");
/// assert!(nav.resolve("internals").is_some());
/// ```
#[derive(Debug, Default)]
pub struct Navigation {
    groups: Vec<NavGroup>,
    default_slug: Option<String>,
}

impl Navigation {
    /// An empty tree. Unless [`Navigation::default_page`] is called, the
    /// first page added becomes the default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a labelled group of pages.
    ///
    /// # Panics
    ///
    /// Panics if a page's slug is already registered anywhere in the
    /// tree. Slugs are the navigation targets and must be unique.
    #[must_use]
    pub fn group(mut self, label: impl Into<String>, pages: Vec<Page>) -> Self {
        for (i, page) in pages.iter().enumerate() {
            let taken = self.resolve(&page.slug).is_some()
                || pages[..i].iter().any(|earlier| earlier.slug == page.slug);
            if taken {
                panic!("navigation: duplicate page slug {:?}", page.slug);
            }
        }
        if self.default_slug.is_none() {
            if let Some(first) = pages.first() {
                self.default_slug = Some(first.slug.clone());
            }
        }
        self.groups.push(NavGroup {
            label: label.into(),
            pages,
        });
        self
    }

    /// Override which page fresh sessions land on.
    #[must_use]
    pub fn default_page(mut self, slug: impl Into<String>) -> Self {
        self.default_slug = Some(slug.into());
        self
    }

    /// Slug of the landing page. Empty string if no pages were added.
    #[must_use]
    pub fn default_slug(&self) -> &str {
        self.default_slug.as_deref().unwrap_or("")
    }

    /// Groups in declaration order.
    #[must_use]
    pub fn groups(&self) -> &[NavGroup] {
        &self.groups
    }

    /// Find a page by slug.
    #[must_use]
    pub fn resolve(&self, slug: &str) -> Option<&Page> {
        self.groups
            .iter()
            .flat_map(|group| group.pages.iter())
            .find(|page| page.slug == slug)
    }

    /// All slugs in declaration order.
    #[must_use]
    pub fn slugs(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(|group| group.pages.iter())
            .map(Page::slug)
            .collect()
    }
}

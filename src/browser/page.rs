//! The rendering-agent seam. The scrape layer talks to pages exclusively
//! through these traits; the production implementation drives a WebDriver
//! session and tests substitute an in-memory fake.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Element locator. CSS for bulk reads and counts, XPath where text matching
/// is required (cookie buttons, tab controls).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    Css(&'static str),
    XPath(&'static str),
}

/// One isolated page. Navigation uses a fast-commit policy: `goto` returns as
/// soon as the navigation is committed, and callers establish readiness
/// themselves by polling.
#[async_trait]
pub trait Page: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;

    /// Number of elements matching `css` that are currently rendered.
    async fn visible_count(&self, css: &str) -> Result<usize>;

    /// Attribute values of all rendered elements matching `css`, in document
    /// order. Elements missing the attribute contribute an empty string.
    async fn visible_attrs(&self, css: &str, attr: &str) -> Result<Vec<String>>;

    /// Runs a script against the document and returns its JSON result.
    async fn evaluate(&self, script: &str) -> Result<Value>;

    /// Clicks the first visible element matching `selector`. Returns whether
    /// a click happened; absence of the element is not an error.
    async fn click_first_visible(&self, selector: &Selector) -> Result<bool>;

    /// Scrolls the viewport vertically by `dy` pixels (negative = up).
    async fn scroll_by(&self, dy: i64) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// Releases the page and its session. Must be called on every exit path.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Shared browsing infrastructure that can hand out isolated pages.
#[async_trait]
pub trait Session: Send + Sync {
    async fn open_page(&self) -> Result<Box<dyn Page>>;
}

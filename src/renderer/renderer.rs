use super::Locator;
use crate::HarvestResult;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Control surface of a live rendering session (a browser tab, or a scripted
/// stand-in). One harvester owns one renderer for the whole run.
#[async_trait]
pub trait Renderer: Send {
    /// Opaque reference to a rendered element, valid while the page that
    /// produced it is still alive.
    type Element: Clone + Send + Sync;

    async fn navigate(&mut self, url: &Url) -> HarvestResult<()>;

    /// Types `query` into the element at `search_box` and submits it.
    async fn submit_search(&mut self, search_box: &Locator, query: &str) -> HarvestResult<()>;

    /// Blocks until `locator` matches, failing with `LocatorTimeout` after `timeout`.
    async fn wait_for_locator(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> HarvestResult<Self::Element>;

    /// All current matches in render order; empty when nothing matches.
    async fn find_all(&mut self, locator: &Locator) -> HarvestResult<Vec<Self::Element>>;

    /// Visible text of `element`, or `None` when it can no longer be read.
    async fn read_text(&mut self, element: &Self::Element) -> Option<String>;

    async fn click(&mut self, element: &Self::Element) -> HarvestResult<()>;

    /// Scrolls the region matched by `region` down by `pixels`.
    async fn scroll_by(&mut self, region: &Locator, pixels: i64) -> HarvestResult<()>;

    async fn sleep(&mut self, duration: Duration);

    async fn close(&mut self) -> HarvestResult<()>;

    /// Stable token for `element` read from its `anchor` descendant, if the
    /// backend can provide one.
    async fn identity_of(&mut self, _element: &Self::Element, _anchor: &Locator) -> Option<String> {
        None
    }
}

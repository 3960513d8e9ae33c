mod locator;
pub mod mock_renderer;
mod renderer;
#[cfg(feature = "webdriver")]
pub mod webdriver;

pub use locator::{Locator, LocatorSet};
pub use mock_renderer::{MockJournal, MockListing, MockRenderer};
pub use renderer::Renderer;
#[cfg(feature = "webdriver")]
pub use webdriver::{RendererOptions, WebDriverRenderer};

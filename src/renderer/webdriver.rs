use super::{Locator, Renderer};
use crate::{HarvestError, HarvestResult};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, NewSessionError};
use fantoccini::key::Key;
use fantoccini::{Client, ClientBuilder};
use log::{debug, info, warn};
use serde_json::{json, Map, Value};
use std::time::Duration;
use url::Url;

const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Construction-time browser settings.
#[derive(Debug, Clone)]
pub struct RendererOptions {
    pub webdriver_url: String,
    pub headless: bool,
    pub browser_args: Vec<String>,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: false,
            browser_args: vec![
                "--start-maximized".to_string(),
                "--disable-blink-features=AutomationControlled".to_string(),
            ],
        }
    }
}

impl RendererOptions {
    /// Reads `MAPHARVEST_WEBDRIVER_URL` and `MAPHARVEST_HEADLESS` over the defaults.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Ok(url) = std::env::var("MAPHARVEST_WEBDRIVER_URL") {
            options.webdriver_url = url;
        }
        if let Ok(flag) = std::env::var("MAPHARVEST_HEADLESS") {
            options.headless = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        options
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    fn capabilities(&self) -> Map<String, Value> {
        let mut args = self.browser_args.clone();
        if self.headless {
            args.push("--headless=new".to_string());
            args.push("--disable-gpu".to_string());
        }

        let mut caps = Map::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }
}

impl From<CmdError> for HarvestError {
    fn from(err: CmdError) -> Self {
        HarvestError::RendererError(err.to_string())
    }
}

impl From<NewSessionError> for HarvestError {
    fn from(err: NewSessionError) -> Self {
        HarvestError::RendererError(format!("failed to start WebDriver session: {}", err))
    }
}

/// [`Renderer`] backed by a WebDriver session (chromedriver by default).
pub struct WebDriverRenderer {
    client: Client,
}

impl WebDriverRenderer {
    pub async fn connect(options: RendererOptions) -> HarvestResult<Self> {
        info!("Connecting to WebDriver at {}", options.webdriver_url);
        let client = ClientBuilder::native()
            .capabilities(options.capabilities())
            .connect(&options.webdriver_url)
            .await?;

        Ok(Self { client })
    }

    fn to_fantoccini(locator: &Locator) -> (String, bool) {
        match locator.to_css() {
            Some(css) => (css, false),
            None => match locator {
                Locator::XPath(path) => (path.clone(), true),
                other => (other.to_string(), false),
            },
        }
    }

    async fn find_in(&self, locator: &Locator) -> Result<Vec<Element>, CmdError> {
        let (query, is_xpath) = Self::to_fantoccini(locator);
        if is_xpath {
            self.client.find_all(fantoccini::Locator::XPath(&query)).await
        } else {
            self.client.find_all(fantoccini::Locator::Css(&query)).await
        }
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    type Element = Element;

    async fn navigate(&mut self, url: &Url) -> HarvestResult<()> {
        debug!("Navigating to {}", url);
        self.client.goto(url.as_str()).await?;
        Ok(())
    }

    async fn submit_search(&mut self, search_box: &Locator, query: &str) -> HarvestResult<()> {
        let input = self
            .wait_for_locator(search_box, Duration::from_secs(15))
            .await?;
        input.send_keys(query).await?;
        input.send_keys(&Key::Enter.to_string()).await?;
        Ok(())
    }

    async fn wait_for_locator(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> HarvestResult<Element> {
        let (query, is_xpath) = Self::to_fantoccini(locator);
        let wait = self.client.wait().at_most(timeout);
        let found = if is_xpath {
            wait.for_element(fantoccini::Locator::XPath(&query)).await
        } else {
            wait.for_element(fantoccini::Locator::Css(&query)).await
        };

        match found {
            Ok(element) => Ok(element),
            Err(CmdError::WaitTimeout) => Err(HarvestError::LocatorTimeout {
                locator: locator.clone(),
                timeout,
            }),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_all(&mut self, locator: &Locator) -> HarvestResult<Vec<Element>> {
        Ok(self.find_in(locator).await?)
    }

    async fn read_text(&mut self, element: &Element) -> Option<String> {
        match element.text().await {
            Ok(text) => Some(text),
            Err(err) => {
                debug!("Could not read element text: {}", err);
                None
            }
        }
    }

    async fn click(&mut self, element: &Element) -> HarvestResult<()> {
        element.click().await?;
        Ok(())
    }

    async fn scroll_by(&mut self, region: &Locator, pixels: i64) -> HarvestResult<()> {
        let Some(panel) = self.find_in(region).await?.into_iter().next() else {
            warn!("Scroll region {} not found, scrolling the window", region);
            self.client
                .execute("window.scrollBy(0, arguments[0]);", vec![json!(pixels)])
                .await?;
            return Ok(());
        };

        self.client
            .execute(
                "arguments[0].scrollBy(0, arguments[1]);",
                vec![serde_json::to_value(&panel)?, json!(pixels)],
            )
            .await?;
        Ok(())
    }

    async fn sleep(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn close(&mut self) -> HarvestResult<()> {
        info!("Closing WebDriver session");
        self.client.clone().close().await?;
        Ok(())
    }

    async fn identity_of(&mut self, element: &Element, anchor: &Locator) -> Option<String> {
        let css = anchor.to_css()?;
        let link = element.find(fantoccini::Locator::Css(&css)).await.ok()?;
        link.attr("href").await.ok().flatten()
    }
}

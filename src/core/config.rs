use super::extractor::{AcceptancePolicy, SettleStrategy};
use super::retry::ScrollPolicy;
use super::tracker::TrackingMode;
use crate::renderer::LocatorSet;
use std::time::Duration;
use url::Url;

pub const DEFAULT_START_URL: &str = "https://www.google.com/maps";

#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub start_url: Url,
    pub locators: LocatorSet,
    pub initial_render_timeout: Duration,
    pub detail_timeout: Duration,
    pub settle: SettleStrategy,
    pub scroll: ScrollPolicy,
    pub acceptance: AcceptancePolicy,
    pub tracking: TrackingMode,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            start_url: Url::parse(DEFAULT_START_URL).expect("default start URL is valid"),
            locators: LocatorSet::default(),
            initial_render_timeout: Duration::from_secs(15),
            detail_timeout: Duration::from_secs(15),
            settle: SettleStrategy::default(),
            scroll: ScrollPolicy::default(),
            acceptance: AcceptancePolicy::default(),
            tracking: TrackingMode::default(),
        }
    }
}

impl HarvestConfig {
    pub fn with_start_url(mut self, url: &str) -> crate::HarvestResult<Self> {
        self.start_url = Url::parse(url)?;
        Ok(self)
    }

    pub fn with_locators(mut self, locators: LocatorSet) -> Self {
        self.locators = locators;
        self
    }

    pub fn with_initial_render_timeout(mut self, timeout: Duration) -> Self {
        self.initial_render_timeout = timeout;
        self
    }

    pub fn with_detail_timeout(mut self, timeout: Duration) -> Self {
        self.detail_timeout = timeout;
        self
    }

    pub fn with_settle(mut self, settle: SettleStrategy) -> Self {
        self.settle = settle;
        self
    }

    pub fn with_scroll(mut self, scroll: ScrollPolicy) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn with_max_stalled_scrolls(mut self, max: usize) -> Self {
        self.scroll.max_stalled_scrolls = max;
        self
    }

    pub fn with_acceptance(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_tracking(mut self, tracking: TrackingMode) -> Self {
        self.tracking = tracking;
        self
    }
}

use super::config::HarvestConfig;
use super::record::{Record, NOT_FOUND};
use super::tracker::ItemHandle;
use crate::renderer::{Locator, LocatorSet, Renderer};
use crate::{HarvestError, HarvestResult};
use log::{debug, trace};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// How long to let secondary detail fields finish rendering after the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleStrategy {
    /// Sleep once, then read.
    Fixed(Duration),
    /// Re-read every `interval` until two consecutive reads agree, giving up
    /// after `max_polls` re-reads.
    UntilStable { interval: Duration, max_polls: usize },
}

impl Default for SettleStrategy {
    fn default() -> Self {
        SettleStrategy::UntilStable {
            interval: Duration::from_millis(500),
            max_polls: 6,
        }
    }
}

/// Decides whether a read is a real listing or a half-rendered pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcceptancePolicy {
    /// Name plus at least one of address, phone or website.
    #[default]
    RequireContact,
    /// Name alone is enough.
    NameOnly,
}

impl AcceptancePolicy {
    pub fn accepts(&self, record: &Record) -> bool {
        if !record.has_name() {
            return false;
        }
        match self {
            AcceptancePolicy::RequireContact => record.has_contact(),
            AcceptancePolicy::NameOnly => true,
        }
    }

    pub fn judge(&self, record: Record) -> Extraction {
        if self.accepts(&record) {
            Extraction::Accepted(record)
        } else {
            Extraction::Rejected(record)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Accepted(Record),
    /// Carries what was read, for logging.
    Rejected(Record),
}

fn noise() -> &'static Regex {
    static NOISE: OnceLock<Regex> = OnceLock::new();
    NOISE.get_or_init(|| Regex::new(r"[\p{Co}\s]+").expect("valid noise pattern"))
}

/// Strips icon glyphs (private-use code points) and collapses whitespace.
pub fn clean_text(raw: &str) -> String {
    noise().replace_all(raw, " ").trim().to_string()
}

/// Opens one result entry and reads its detail pane.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    locators: LocatorSet,
    detail_timeout: Duration,
    settle: SettleStrategy,
    acceptance: AcceptancePolicy,
}

impl RecordExtractor {
    pub fn new(config: &HarvestConfig) -> Self {
        Self {
            locators: config.locators.clone(),
            detail_timeout: config.detail_timeout,
            settle: config.settle,
            acceptance: config.acceptance,
        }
    }

    pub async fn extract<R: Renderer>(
        &self,
        renderer: &mut R,
        handle: &ItemHandle<R::Element>,
    ) -> HarvestResult<Extraction> {
        renderer.click(&handle.element).await?;

        renderer
            .wait_for_locator(&self.locators.title, self.detail_timeout)
            .await
            .map_err(|e| {
                HarvestError::ExtractionError(format!(
                    "detail pane for item {} never rendered: {}",
                    handle.index, e
                ))
            })?;

        let record = self.settle_and_read(renderer).await;
        trace!("Item {} read as {:?}", handle.index, record);
        Ok(self.acceptance.judge(record))
    }

    async fn settle_and_read<R: Renderer>(&self, renderer: &mut R) -> Record {
        match self.settle {
            SettleStrategy::Fixed(delay) => {
                renderer.sleep(delay).await;
                self.read_record(renderer).await
            }
            SettleStrategy::UntilStable {
                interval,
                max_polls,
            } => {
                let mut previous = self.read_record(renderer).await;
                for poll in 1..=max_polls {
                    renderer.sleep(interval).await;
                    let current = self.read_record(renderer).await;
                    if current == previous {
                        trace!("Detail pane stable after {} polls", poll);
                        return current;
                    }
                    previous = current;
                }
                debug!("Detail pane still changing after {} polls", max_polls);
                previous
            }
        }
    }

    async fn read_record<R: Renderer>(&self, renderer: &mut R) -> Record {
        Record {
            name: read_field(renderer, &self.locators.title).await,
            address: read_field(renderer, &self.locators.address).await,
            phone: read_field(renderer, &self.locators.phone).await,
            website: read_field(renderer, &self.locators.website).await,
        }
    }
}

/// Text of the first match for `locator`, or [`NOT_FOUND`].
async fn read_field<R: Renderer>(renderer: &mut R, locator: &Locator) -> String {
    let element = match renderer.find_all(locator).await {
        Ok(elements) => elements.into_iter().next(),
        Err(e) => {
            debug!("Lookup of {} failed: {}", locator, e);
            None
        }
    };

    let Some(element) = element else {
        return NOT_FOUND.to_string();
    };

    match renderer.read_text(&element).await {
        Some(text) => {
            let text = clean_text(&text);
            if text.is_empty() {
                NOT_FOUND.to_string()
            } else {
                text
            }
        }
        None => NOT_FOUND.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{MockListing, MockRenderer};

    fn handle(index: usize) -> ItemHandle<crate::renderer::mock_renderer::MockElement> {
        ItemHandle {
            index,
            element: crate::renderer::mock_renderer::MockElement::Item(index),
            identity: None,
        }
    }

    fn extractor(settle: SettleStrategy, acceptance: AcceptancePolicy) -> RecordExtractor {
        RecordExtractor::new(
            &HarvestConfig::default()
                .with_settle(settle)
                .with_acceptance(acceptance),
        )
    }

    #[test]
    fn test_name_without_contact_is_rejected() {
        let record = Record::new("Acme", NOT_FOUND, NOT_FOUND, NOT_FOUND);
        assert!(!AcceptancePolicy::RequireContact.accepts(&record));
    }

    #[test]
    fn test_name_with_phone_is_accepted() {
        let record = Record::new("Acme", NOT_FOUND, "555-1234", NOT_FOUND);
        assert!(AcceptancePolicy::RequireContact.accepts(&record));
    }

    #[test]
    fn test_missing_name_always_rejects() {
        let record = Record::new(NOT_FOUND, "1 Main St", "555-1234", "acme.example");
        assert!(!AcceptancePolicy::RequireContact.accepts(&record));
        assert!(!AcceptancePolicy::NameOnly.accepts(&record));
    }

    #[test]
    fn test_name_only_policy_keeps_sparse_listing() {
        let record = Record::new("Acme", NOT_FOUND, NOT_FOUND, NOT_FOUND);
        assert!(AcceptancePolicy::NameOnly.accepts(&record));
    }

    #[test]
    fn test_clean_text_strips_icons_and_whitespace() {
        assert_eq!(clean_text("\u{e0c8}\n  12 Harbour Rd,\n Istanbul "), "12 Harbour Rd, Istanbul");
        assert_eq!(clean_text(" \u{e0b0} "), "");
    }

    #[tokio::test]
    async fn test_extract_reads_all_fields() {
        let mut renderer = MockRenderer::new(vec![MockListing::new("Acme Coffee")
            .with_address("1 Main St")
            .with_phone("555-1234")
            .with_website("acme.example")]);
        let extractor = extractor(SettleStrategy::default(), AcceptancePolicy::RequireContact);

        let extraction = extractor.extract(&mut renderer, &handle(0)).await.unwrap();
        assert_eq!(
            extraction,
            Extraction::Accepted(Record::new("Acme Coffee", "1 Main St", "555-1234", "acme.example"))
        );
    }

    #[tokio::test]
    async fn test_absent_fields_use_sentinel() {
        let mut renderer = MockRenderer::new(vec![MockListing::new("Acme").with_phone("555-1234")]);
        let extractor = extractor(SettleStrategy::Fixed(Duration::from_secs(1)), AcceptancePolicy::RequireContact);

        let extraction = extractor.extract(&mut renderer, &handle(0)).await.unwrap();
        assert_eq!(
            extraction,
            Extraction::Accepted(Record::new("Acme", NOT_FOUND, "555-1234", NOT_FOUND))
        );
    }

    #[tokio::test]
    async fn test_fixed_settle_misses_late_fields() {
        let mut renderer = MockRenderer::new(vec![MockListing::new("Acme")
            .with_phone("555-1234")
            .with_late_contact(1)]);
        let journal = renderer.journal();
        let extractor = extractor(SettleStrategy::Fixed(Duration::from_secs(1)), AcceptancePolicy::RequireContact);

        let extraction = extractor.extract(&mut renderer, &handle(0)).await.unwrap();
        assert!(matches!(extraction, Extraction::Rejected(_)));
        assert_eq!(journal.sleeps(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test]
    async fn test_until_stable_waits_for_late_fields() {
        let mut renderer = MockRenderer::new(vec![MockListing::new("Acme")
            .with_phone("555-1234")
            .with_late_contact(1)]);
        let journal = renderer.journal();
        let interval = Duration::from_millis(250);
        let extractor = extractor(
            SettleStrategy::UntilStable { interval, max_polls: 4 },
            AcceptancePolicy::RequireContact,
        );

        let extraction = extractor.extract(&mut renderer, &handle(0)).await.unwrap();
        assert_eq!(
            extraction,
            Extraction::Accepted(Record::new("Acme", NOT_FOUND, "555-1234", NOT_FOUND))
        );
        assert_eq!(journal.sleeps(), vec![interval, interval]);
    }

    #[tokio::test]
    async fn test_detail_timeout_is_extraction_error() {
        let mut renderer = MockRenderer::new(vec![MockListing::new("Acme")
            .with_phone("555-1234")
            .hanging_detail()]);
        let extractor = extractor(SettleStrategy::default(), AcceptancePolicy::RequireContact);

        let result = extractor.extract(&mut renderer, &handle(0)).await;
        assert!(matches!(result, Err(HarvestError::ExtractionError(_))));
    }

    #[tokio::test]
    async fn test_nameless_listing_is_rejected() {
        let mut renderer = MockRenderer::new(vec![MockListing::nameless().with_phone("555-1234")]);
        let extractor = extractor(SettleStrategy::default(), AcceptancePolicy::NameOnly);

        let extraction = extractor.extract(&mut renderer, &handle(0)).await.unwrap();
        assert_eq!(
            extraction,
            Extraction::Rejected(Record::new(NOT_FOUND, NOT_FOUND, "555-1234", NOT_FOUND))
        );
    }
}

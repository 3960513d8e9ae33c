use super::{Locator, LocatorSet, Renderer};
use crate::{HarvestError, HarvestResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Title,
    Address,
    Phone,
    Website,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockElement {
    SearchBox,
    Panel,
    EndOfList,
    Item(usize),
    Field { item: usize, role: FieldRole },
}

/// Scripted content of one result entry and its detail pane.
#[derive(Debug, Clone, Default)]
pub struct MockListing {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub identity: Option<String>,
    /// Clicking the entry fails as if the element went stale.
    pub fail_click: bool,
    /// The detail pane never renders its title.
    pub hang_detail: bool,
    /// Contact fields stay hidden for this many title reads after opening.
    pub late_contact_reads: usize,
}

impl MockListing {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn nameless() -> Self {
        Self::default()
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn failing_click(mut self) -> Self {
        self.fail_click = true;
        self
    }

    pub fn hanging_detail(mut self) -> Self {
        self.hang_detail = true;
        self
    }

    pub fn with_late_contact(mut self, reads: usize) -> Self {
        self.late_contact_reads = reads;
        self
    }
}

#[derive(Debug, Default)]
struct MockState {
    batches: Vec<Vec<usize>>,
    cursor: usize,
    open: Option<usize>,
    title_reads: usize,
    show_end_marker: bool,
    fail_observation_at: Option<usize>,
    observations: usize,
    clicks: Vec<usize>,
    scrolls: Vec<i64>,
    sleeps: Vec<Duration>,
    navigations: Vec<Url>,
    searches: Vec<String>,
    closed: bool,
}

impl MockState {
    fn final_batch_reached(&self) -> bool {
        self.cursor >= self.batches.len()
    }
}

/// Read-only view of what a [`MockRenderer`] was asked to do, usable after
/// the renderer itself has been moved into a harvester.
#[derive(Clone)]
pub struct MockJournal {
    state: Arc<Mutex<MockState>>,
}

impl MockJournal {
    pub fn clicks(&self) -> Vec<usize> {
        self.state.lock().clicks.clone()
    }

    pub fn scrolls(&self) -> usize {
        self.state.lock().scrolls.len()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.lock().sleeps.clone()
    }

    pub fn observations(&self) -> usize {
        self.state.lock().observations
    }

    pub fn navigations(&self) -> Vec<Url> {
        self.state.lock().navigations.clone()
    }

    pub fn searches(&self) -> Vec<String> {
        self.state.lock().searches.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

/// In-memory renderer that replays a script of result-list observations.
///
/// Each `find_all` on the result-item locator returns the next scripted batch,
/// repeating the last one once the script runs out. Delays are recorded, not
/// slept.
#[derive(Clone)]
pub struct MockRenderer {
    locators: LocatorSet,
    listings: Arc<Vec<MockListing>>,
    state: Arc<Mutex<MockState>>,
}

impl MockRenderer {
    pub fn new(listings: Vec<MockListing>) -> Self {
        let all = (0..listings.len()).collect();
        Self {
            locators: LocatorSet::default(),
            listings: Arc::new(listings),
            state: Arc::new(Mutex::new(MockState {
                batches: vec![all],
                ..Default::default()
            })),
        }
    }

    /// Script observations as growing prefixes of the listings.
    pub fn with_batch_sizes(self, sizes: &[usize]) -> Self {
        let batches = sizes.iter().map(|&size| (0..size).collect()).collect();
        self.with_batches(batches)
    }

    /// Script observations as explicit listing indices in render order.
    pub fn with_batches(self, batches: Vec<Vec<usize>>) -> Self {
        self.state.lock().batches = batches;
        self
    }

    /// Render the end-of-list marker once the final batch has been observed.
    pub fn with_end_marker(self) -> Self {
        self.state.lock().show_end_marker = true;
        self
    }

    /// Fail the `n`-th result-list observation (zero-based).
    pub fn fail_observation_at(self, n: usize) -> Self {
        self.state.lock().fail_observation_at = Some(n);
        self
    }

    pub fn journal(&self) -> MockJournal {
        MockJournal {
            state: Arc::clone(&self.state),
        }
    }

    fn listing(&self, index: usize) -> HarvestResult<&MockListing> {
        self.listings.get(index).ok_or_else(|| {
            HarvestError::ExtractionError(format!("no listing at index {}", index))
        })
    }

    fn field_role(&self, locator: &Locator) -> Option<FieldRole> {
        if *locator == self.locators.title {
            Some(FieldRole::Title)
        } else if *locator == self.locators.address {
            Some(FieldRole::Address)
        } else if *locator == self.locators.phone {
            Some(FieldRole::Phone)
        } else if *locator == self.locators.website {
            Some(FieldRole::Website)
        } else {
            None
        }
    }

    fn timeout(locator: &Locator, timeout: Duration) -> HarvestError {
        HarvestError::LocatorTimeout {
            locator: locator.clone(),
            timeout,
        }
    }

    fn observe(&self) -> HarvestResult<Vec<MockElement>> {
        let mut state = self.state.lock();
        let observation = state.observations;
        state.observations += 1;

        if state.fail_observation_at == Some(observation) {
            return Err(HarvestError::RendererError(
                "session lost while reading result list".to_string(),
            ));
        }

        let batch = match state.batches.get(state.cursor) {
            Some(batch) => batch.clone(),
            None => state.batches.last().cloned().unwrap_or_default(),
        };
        state.cursor += 1;

        Ok(batch.into_iter().map(MockElement::Item).collect())
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    type Element = MockElement;

    async fn navigate(&mut self, url: &Url) -> HarvestResult<()> {
        self.state.lock().navigations.push(url.clone());
        Ok(())
    }

    async fn submit_search(&mut self, _search_box: &Locator, query: &str) -> HarvestResult<()> {
        self.state.lock().searches.push(query.to_string());
        Ok(())
    }

    async fn wait_for_locator(
        &mut self,
        locator: &Locator,
        timeout: Duration,
    ) -> HarvestResult<MockElement> {
        if *locator == self.locators.result_item {
            let state = self.state.lock();
            return state
                .batches
                .iter()
                .flatten()
                .next()
                .map(|&index| MockElement::Item(index))
                .ok_or_else(|| Self::timeout(locator, timeout));
        }

        if *locator == self.locators.title {
            let open = self.state.lock().open;
            return match open {
                Some(item) if !self.listing(item)?.hang_detail => Ok(MockElement::Field {
                    item,
                    role: FieldRole::Title,
                }),
                _ => Err(Self::timeout(locator, timeout)),
            };
        }

        if *locator == self.locators.search_box {
            return Ok(MockElement::SearchBox);
        }

        Err(Self::timeout(locator, timeout))
    }

    async fn find_all(&mut self, locator: &Locator) -> HarvestResult<Vec<MockElement>> {
        if *locator == self.locators.result_item {
            return self.observe();
        }

        if self.locators.end_of_list.as_ref() == Some(locator) {
            let state = self.state.lock();
            let visible = state.show_end_marker && state.final_batch_reached();
            return Ok(if visible {
                vec![MockElement::EndOfList]
            } else {
                Vec::new()
            });
        }

        if *locator == self.locators.results_panel {
            return Ok(vec![MockElement::Panel]);
        }

        let Some(role) = self.field_role(locator) else {
            return Ok(Vec::new());
        };
        let Some(item) = self.state.lock().open else {
            return Ok(Vec::new());
        };

        let listing = self.listing(item)?;
        let present = match role {
            FieldRole::Title => listing.name.is_some(),
            FieldRole::Address => listing.address.is_some(),
            FieldRole::Phone => listing.phone.is_some(),
            FieldRole::Website => listing.website.is_some(),
        };

        Ok(if present {
            vec![MockElement::Field { item, role }]
        } else {
            Vec::new()
        })
    }

    async fn read_text(&mut self, element: &MockElement) -> Option<String> {
        let MockElement::Field { item, role } = element else {
            return None;
        };

        let mut state = self.state.lock();
        if state.open != Some(*item) {
            return None;
        }

        let listing = self.listings.get(*item)?;
        if *role == FieldRole::Title {
            state.title_reads += 1;
            return listing.name.clone();
        }
        if state.title_reads <= listing.late_contact_reads {
            return None;
        }

        match role {
            FieldRole::Address => listing.address.clone(),
            FieldRole::Phone => listing.phone.clone(),
            FieldRole::Website => listing.website.clone(),
            FieldRole::Title => None,
        }
    }

    async fn click(&mut self, element: &MockElement) -> HarvestResult<()> {
        let MockElement::Item(index) = element else {
            return Ok(());
        };

        let listing = self.listing(*index)?;
        let mut state = self.state.lock();
        state.clicks.push(*index);
        if listing.fail_click {
            return Err(HarvestError::ExtractionError(format!(
                "stale element reference for item {}",
                index
            )));
        }

        state.open = Some(*index);
        state.title_reads = 0;
        Ok(())
    }

    async fn scroll_by(&mut self, _region: &Locator, pixels: i64) -> HarvestResult<()> {
        self.state.lock().scrolls.push(pixels);
        Ok(())
    }

    async fn sleep(&mut self, duration: Duration) {
        self.state.lock().sleeps.push(duration);
    }

    async fn close(&mut self) -> HarvestResult<()> {
        self.state.lock().closed = true;
        Ok(())
    }

    async fn identity_of(&mut self, element: &MockElement, _anchor: &Locator) -> Option<String> {
        match element {
            MockElement::Item(index) => self.listings.get(*index)?.identity.clone(),
            _ => None,
        }
    }
}

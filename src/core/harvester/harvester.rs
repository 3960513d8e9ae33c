use crate::core::config::HarvestConfig;
use crate::core::extractor::{Extraction, RecordExtractor};
use crate::core::record::{Harvest, HarvestStatus, Record};
use crate::core::tracker::{ItemHandle, ObservationBatch, SeenTracker, TrackingMode};
use crate::renderer::Renderer;
use crate::stats::StatsTracker;
use crate::{HarvestError, HarvestResult};
use chrono::Utc;
use log::{debug, error, info, warn};

/// Drives the scroll/extract loop over a lazily-rendered result list.
pub struct ListHarvester<R: Renderer> {
    renderer: R,
    config: HarvestConfig,
    extractor: RecordExtractor,
    stats: StatsTracker,
}

impl<R: Renderer> ListHarvester<R> {
    pub fn new(renderer: R, config: HarvestConfig) -> Self {
        info!("Initializing harvester");
        let extractor = RecordExtractor::new(&config);
        Self {
            renderer,
            config,
            extractor,
            stats: StatsTracker::new(),
        }
    }

    /// Collects up to `target` accepted records for `query`.
    ///
    /// The renderer session is closed before this returns, whatever the
    /// outcome. Only a failure to render any result after the search is
    /// returned as an error; a list that stops growing or a renderer that
    /// fails mid-run still yields the records collected so far.
    pub async fn harvest(mut self, query: &str, target: usize) -> HarvestResult<Harvest> {
        if target == 0 {
            self.release().await;
            return Err(HarvestError::InvalidTarget(target));
        }

        info!("Starting harvest for {:?} (target: {})", query, target);
        let mut records = Vec::with_capacity(target);
        let outcome = self.run(query, target, &mut records).await;
        self.release().await;
        self.stats.finish();
        self.stats.log_summary();

        let status = outcome?;
        records.truncate(target);
        info!(
            "Harvest for {:?} finished with {} records ({:?})",
            query,
            records.len(),
            status
        );

        Ok(Harvest {
            query: query.to_string(),
            target,
            records,
            status,
            stats: self.stats.get_stats(),
        })
    }

    async fn release(&mut self) {
        if let Err(e) = self.renderer.close().await {
            warn!("Failed to close renderer session: {}", e);
        }
    }

    async fn run(
        &mut self,
        query: &str,
        target: usize,
        records: &mut Vec<Record>,
    ) -> HarvestResult<HarvestStatus> {
        let locators = self.config.locators.clone();

        self.renderer.navigate(&self.config.start_url).await?;
        self.renderer
            .submit_search(&locators.search_box, query)
            .await?;
        if let Err(e) = self
            .renderer
            .wait_for_locator(&locators.result_item, self.config.initial_render_timeout)
            .await
        {
            error!("No results rendered for {:?}: {}", query, e);
            return Err(e);
        }

        let mut tracker = SeenTracker::new(self.config.tracking);
        let mut stalls = 0;

        while records.len() < target {
            let batch = match self.observe(tracker.mode()).await {
                Ok(batch) => batch,
                Err(e) => return Ok(Self::abort(e)),
            };
            let fresh = tracker.fresh(&batch);
            self.stats.record_observation(fresh.is_empty());

            if fresh.is_empty() {
                if self.end_of_list_visible().await {
                    info!("End of result list reached with {} records", records.len());
                    return Ok(HarvestStatus::Exhausted {
                        stalled_scrolls: stalls,
                    });
                }
                if self.config.scroll.is_exhausted(stalls) {
                    warn!(
                        "Result list stopped growing after {} scrolls; returning {} of {} records",
                        stalls,
                        records.len(),
                        target
                    );
                    return Ok(HarvestStatus::Exhausted {
                        stalled_scrolls: stalls,
                    });
                }

                debug!("No new results, scrolling (stall {})", stalls + 1);
                if let Err(e) = self
                    .renderer
                    .scroll_by(&locators.results_panel, self.config.scroll.pixels)
                    .await
                {
                    return Ok(Self::abort(e));
                }
                self.stats.record_scroll();
                let delay = self.config.scroll.calculate_delay(stalls);
                self.renderer.sleep(delay).await;
                stalls += 1;
                continue;
            }

            stalls = 0;
            debug!(
                "Observed {} items, {} new (watermark {})",
                batch.len(),
                fresh.len(),
                tracker.watermark()
            );

            let mut stopped_early = false;
            for position in fresh {
                let handle = &batch.handles[position];
                self.process(handle, records).await;
                tracker.consume(handle);

                if records.len() >= target {
                    stopped_early = true;
                    break;
                }
            }

            if !stopped_early {
                tracker.commit(&batch);
            }
        }

        Ok(HarvestStatus::Complete)
    }

    async fn observe(&mut self, mode: TrackingMode) -> HarvestResult<ObservationBatch<R::Element>> {
        let result_item = &self.config.locators.result_item;
        let elements = self.renderer.find_all(result_item).await?;

        let mut handles = Vec::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            let identity = match mode {
                TrackingMode::Identity => {
                    self.renderer
                        .identity_of(&element, &self.config.locators.item_identity)
                        .await
                }
                TrackingMode::Watermark => None,
            };
            handles.push(ItemHandle {
                index,
                element,
                identity,
            });
        }

        Ok(ObservationBatch { handles })
    }

    async fn end_of_list_visible(&mut self) -> bool {
        let Some(marker) = &self.config.locators.end_of_list else {
            return false;
        };
        match self.renderer.find_all(marker).await {
            Ok(found) => !found.is_empty(),
            Err(e) => {
                debug!("End-of-list check failed: {}", e);
                false
            }
        }
    }

    async fn process(&mut self, handle: &ItemHandle<R::Element>, records: &mut Vec<Record>) {
        let started = Utc::now();
        let outcome = self.extractor.extract(&mut self.renderer, handle).await;
        let elapsed = Utc::now().signed_duration_since(started);

        match outcome {
            Ok(Extraction::Accepted(record)) => {
                debug!("Accepted item {}: {}", handle.index, record.name);
                self.stats.record_item(Some(true), elapsed);
                records.push(record);
            }
            Ok(Extraction::Rejected(record)) => {
                debug!("Rejected item {} as incomplete: {:?}", handle.index, record);
                self.stats.record_item(Some(false), elapsed);
            }
            Err(e) => {
                warn!("Error while processing item {}: {}", handle.index, e);
                self.stats.record_item(None, elapsed);
            }
        }
    }

    fn abort(error: HarvestError) -> HarvestStatus {
        error!("Harvest aborted: {}", error);
        HarvestStatus::Aborted {
            reason: error.to_string(),
        }
    }
}

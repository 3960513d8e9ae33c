use chrono::{DateTime, Duration, Utc};
use log::info;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HarvestStats {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub observations: usize,
    pub scrolls: usize,
    pub stalled_observations: usize,
    pub items_processed: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
    pub average_extraction_time: f64, // in milliseconds
}

#[derive(Debug, Clone)]
pub struct StatsTracker {
    stats: Arc<RwLock<HarvestStats>>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(RwLock::new(HarvestStats {
                start_time: Utc::now(),
                end_time: None,
                observations: 0,
                scrolls: 0,
                stalled_observations: 0,
                items_processed: 0,
                accepted: 0,
                rejected: 0,
                failed: 0,
                average_extraction_time: 0.0,
            })),
        }
    }

    pub fn record_observation(&self, stalled: bool) {
        let mut stats = self.stats.write();
        stats.observations += 1;
        if stalled {
            stats.stalled_observations += 1;
        }
    }

    pub fn record_scroll(&self) {
        self.stats.write().scrolls += 1;
    }

    /// Outcome of one item: `Some(true)` accepted, `Some(false)` rejected,
    /// `None` failed.
    pub fn record_item(&self, accepted: Option<bool>, duration: Duration) {
        let mut stats = self.stats.write();
        stats.items_processed += 1;

        match accepted {
            Some(true) => stats.accepted += 1,
            Some(false) => stats.rejected += 1,
            None => stats.failed += 1,
        }

        let current_total = stats.average_extraction_time * (stats.items_processed - 1) as f64;
        let new_duration = duration.num_milliseconds() as f64;
        stats.average_extraction_time = (current_total + new_duration) / stats.items_processed as f64;
    }

    pub fn finish(&self) {
        self.stats.write().end_time = Some(Utc::now());
    }

    pub fn get_stats(&self) -> HarvestStats {
        self.stats.read().clone()
    }

    pub fn log_summary(&self) {
        let stats = self.stats.read();
        let duration = stats
            .end_time
            .unwrap_or_else(Utc::now)
            .signed_duration_since(stats.start_time);

        info!("Harvest statistics:");
        info!("  Duration: {} seconds", duration.num_seconds());
        info!(
            "  Observations: {} ({} without new items)",
            stats.observations, stats.stalled_observations
        );
        info!("  Scrolls: {}", stats.scrolls);
        info!("  Items processed: {}", stats.items_processed);
        info!(
            "  Accepted: {}, rejected: {}, failed: {}",
            stats.accepted, stats.rejected, stats.failed
        );
        info!(
            "  Average extraction time: {:.2}ms",
            stats.average_extraction_time
        );
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

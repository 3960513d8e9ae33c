mod config;
mod errors;
pub mod extractor;
pub mod harvester;
pub mod record;
pub mod retry;
pub mod tracker;

pub use config::{HarvestConfig, DEFAULT_START_URL};
pub use errors::{HarvestError, HarvestResult};
pub use extractor::{AcceptancePolicy, Extraction, RecordExtractor, SettleStrategy};
pub use harvester::ListHarvester;
pub use record::{Harvest, HarvestStatus, Record, NOT_FOUND};
pub use retry::{BackoffPolicy, ScrollPolicy};
pub use tracker::{ItemHandle, ObservationBatch, SeenTracker, TrackingMode};

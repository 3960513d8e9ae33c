pub mod core;
pub mod renderer;
pub mod stats;
pub mod storage;

pub use crate::core::{
    Harvest, HarvestConfig, HarvestError, HarvestResult, HarvestStatus, ListHarvester, Record,
};
pub use crate::renderer::{Locator, LocatorSet, Renderer};
pub use crate::stats::StatsTracker;
pub use crate::storage::{create_storage, StorageBackend, StorageType};

use crate::core::record::{Harvest, HarvestStatus, Record};
use crate::HarvestResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Everything a backend may persist about one run.
#[derive(Debug, Clone, Serialize)]
pub struct StorageItem {
    pub run_id: Uuid,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub status: Option<HarvestStatus>,
    pub records: Vec<Record>,
}

impl StorageItem {
    pub fn new(query: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            query: query.into(),
            timestamp: Utc::now(),
            status: None,
            records,
        }
    }

    pub fn with_status(mut self, status: HarvestStatus) -> Self {
        self.status = Some(status);
        self
    }
}

impl From<&Harvest> for StorageItem {
    fn from(harvest: &Harvest) -> Self {
        StorageItem::new(harvest.query.clone(), harvest.records.clone())
            .with_status(harvest.status.clone())
    }
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn location(&self) -> &Path;

    /// Writes `item` in one go and returns the path written.
    async fn store(&self, item: &StorageItem) -> HarvestResult<PathBuf>;
}

pub(crate) fn ensure_parent(path: &Path) -> HarvestResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

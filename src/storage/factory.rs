use super::{CsvStorage, JsonStorage, StorageBackend, StorageItem};
use crate::HarvestResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    Csv { path: PathBuf },
    Json { path: PathBuf },
}

impl StorageType {
    /// JSON for a `.json` extension, CSV otherwise.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            StorageType::Json { path }
        } else {
            StorageType::Csv { path }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Storage {
    Csv(CsvStorage),
    Json(JsonStorage),
}

#[async_trait]
impl StorageBackend for Storage {
    fn location(&self) -> &Path {
        match self {
            Storage::Csv(storage) => storage.location(),
            Storage::Json(storage) => storage.location(),
        }
    }

    async fn store(&self, item: &StorageItem) -> HarvestResult<PathBuf> {
        match self {
            Storage::Csv(storage) => storage.store(item).await,
            Storage::Json(storage) => storage.store(item).await,
        }
    }
}

pub fn create_storage(storage_type: StorageType) -> Storage {
    match storage_type {
        StorageType::Csv { path } => Storage::Csv(CsvStorage::new(path)),
        StorageType::Json { path } => Storage::Json(JsonStorage::new(path)),
    }
}

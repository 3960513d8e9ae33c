use super::base::{ensure_parent, StorageBackend, StorageItem};
use crate::HarvestResult;
use async_trait::async_trait;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Pretty-printed JSON document with the run metadata alongside the records.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl StorageBackend for JsonStorage {
    fn location(&self) -> &Path {
        &self.path
    }

    async fn store(&self, item: &StorageItem) -> HarvestResult<PathBuf> {
        ensure_parent(&self.path)?;
        fs::write(&self.path, serde_json::to_string_pretty(item)?)?;
        debug!("Wrote {} records to {}", item.records.len(), self.path.display());
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{HarvestStatus, Record};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_document_carries_run_metadata() {
        let path = std::env::temp_dir()
            .join(format!("mapharvest-{}", Uuid::now_v7()))
            .join("results.json");
        let item = StorageItem::new(
            "coffee shops",
            vec![Record::new("Acme", "1 Main St", "555-1234", "acme.example")],
        )
        .with_status(HarvestStatus::Exhausted { stalled_scrolls: 5 });

        JsonStorage::new(&path).store(&item).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["query"], "coffee shops");
        assert_eq!(value["run_id"], item.run_id.to_string());
        assert_eq!(value["status"]["kind"], "exhausted");
        assert_eq!(value["status"]["stalled_scrolls"], 5);
        assert_eq!(value["records"][0]["phone"], "555-1234");
    }
}

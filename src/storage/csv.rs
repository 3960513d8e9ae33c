use super::base::{ensure_parent, StorageBackend, StorageItem};
use crate::core::record::RECORD_FIELDS;
use crate::HarvestResult;
use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};

/// Comma-separated table, header `name,address,phone,website`, one row per record.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl StorageBackend for CsvStorage {
    fn location(&self) -> &Path {
        &self.path
    }

    async fn store(&self, item: &StorageItem) -> HarvestResult<PathBuf> {
        ensure_parent(&self.path)?;

        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        writer.write_record(RECORD_FIELDS)?;
        for record in &item.records {
            writer.write_record(record.as_row())?;
        }
        writer.flush()?;

        debug!("Wrote {} rows to {}", item.records.len(), self.path.display());
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{Record, NOT_FOUND};
    use uuid::Uuid;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("mapharvest-{}", Uuid::now_v7()))
            .join(name)
    }

    #[tokio::test]
    async fn test_two_records_make_three_lines() {
        let path = temp_path("results.csv");
        let storage = CsvStorage::new(&path);
        let item = StorageItem::new(
            "coffee shops",
            vec![
                Record::new("Acme", "1 Main St", "555-1234", NOT_FOUND),
                Record::new("Bean, Bar & Co", NOT_FOUND, NOT_FOUND, "bean.example"),
            ],
        );

        let written = storage.store(&item).await.unwrap();
        let content = std::fs::read_to_string(&written).unwrap();
        let lines: Vec<_> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "name,address,phone,website");
        assert_eq!(lines[1], "Acme,1 Main St,555-1234,Not Found");
        assert_eq!(lines[2], "\"Bean, Bar & Co\",Not Found,Not Found,bean.example");
    }

    #[tokio::test]
    async fn test_empty_harvest_writes_header_only() {
        let path = temp_path("empty.csv");
        let storage = CsvStorage::new(&path);

        storage
            .store(&StorageItem::new("nothing", Vec::new()))
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["name,address,phone,website"]);
    }
}

use serde::{Deserialize, Serialize};

use crate::stats::HarvestStats;

/// Placeholder stored in a field whose locator matched nothing.
pub const NOT_FOUND: &str = "Not Found";

/// Column order of every tabular export.
pub const RECORD_FIELDS: [&str; 4] = ["name", "address", "phone", "website"];

/// One business listing read from a detail pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        website: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
            website: website.into(),
        }
    }

    pub fn has_name(&self) -> bool {
        is_present(&self.name)
    }

    /// True when at least one of address, phone or website was read.
    pub fn has_contact(&self) -> bool {
        is_present(&self.address) || is_present(&self.phone) || is_present(&self.website)
    }

    pub fn as_row(&self) -> [&str; 4] {
        [&self.name, &self.address, &self.phone, &self.website]
    }
}

pub fn is_present(value: &str) -> bool {
    !value.is_empty() && value != NOT_FOUND
}

/// How a harvest ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HarvestStatus {
    /// The requested number of records was collected.
    Complete,
    /// The list stopped growing before the target was met.
    Exhausted { stalled_scrolls: usize },
    /// The renderer failed mid-run; records hold what was collected before.
    Aborted { reason: String },
}

/// Outcome of one harvest: accepted records in render order, never more than
/// the requested target.
#[derive(Debug, Clone, Serialize)]
pub struct Harvest {
    pub query: String,
    pub target: usize,
    pub records: Vec<Record>,
    pub status: HarvestStatus,
    pub stats: HarvestStats,
}

impl Harvest {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.status == HarvestStatus::Complete
    }
}

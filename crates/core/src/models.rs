use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One source row, reduced to the six canonical columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub name: String,
    pub path: String,
    pub modified_by: String,
    pub item_type: String,
    pub file_size: String,
    pub modified: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Path,
    ModifiedBy,
    ItemType,
    FileSize,
    Modified,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Path,
        Field::ModifiedBy,
        Field::ItemType,
        Field::FileSize,
        Field::Modified,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn canonical_header(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Path => "Path",
            Field::ModifiedBy => "Modified By",
            Field::ItemType => "Item Type",
            Field::FileSize => "File Size",
            Field::Modified => "Modified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    pub frequency: u64,
    pub paths: BTreeSet<String>,
    pub modifiers: BTreeSet<String>,
    pub item_types: BTreeSet<String>,
    /// Uncleaned source names that produced this record.
    pub raw_names: BTreeSet<String>,
}

impl CompanyRecord {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            frequency: 0,
            paths: BTreeSet::new(),
            modifiers: BTreeSet::new(),
            item_types: BTreeSet::new(),
            raw_names: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStatistics {
    pub rows_processed: u64,
    pub excluded_by_pattern: u64,
    pub excluded_by_type: u64,
    pub excluded_by_path: u64,
    pub rows_malformed: u64,
    pub rejected_by_classifier: u64,
    pub accepted_rows: u64,
    pub unique_names: u64,
    pub enhanced_fallbacks: u64,
    pub batches: u64,
}

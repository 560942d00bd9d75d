use crate::error::AnalysisError;
use crate::models::{CompanyRecord, RawEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub frequencies: BTreeMap<String, u64>,
    pub details: BTreeMap<String, CompanyRecord>,
}

/// Accumulates accepted names across batches.
#[derive(Debug, Default)]
pub struct Aggregator {
    records: BTreeMap<String, CompanyRecord>,
    accepted: u64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, cleaned: &str, entry: &RawEntry) {
        let record = self
            .records
            .entry(cleaned.to_string())
            .or_insert_with(|| CompanyRecord::new(cleaned));
        record.frequency += 1;
        insert_non_empty(&mut record.paths, &entry.path);
        insert_non_empty(&mut record.modifiers, &entry.modified_by);
        insert_non_empty(&mut record.item_types, &entry.item_type);
        insert_non_empty(&mut record.raw_names, &entry.name);
        self.accepted += 1;
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn unique_names(&self) -> usize {
        self.records.len()
    }

    pub fn finalize(self) -> Result<AggregateSnapshot, AnalysisError> {
        let total: u64 = self.records.values().map(|r| r.frequency).sum();
        if total != self.accepted {
            return Err(AnalysisError::AggregationInvariant(format!(
                "frequency sum {total} != accepted rows {}",
                self.accepted
            )));
        }
        let frequencies = self
            .records
            .iter()
            .map(|(name, r)| (name.clone(), r.frequency))
            .collect();
        Ok(AggregateSnapshot {
            frequencies,
            details: self.records,
        })
    }
}

fn insert_non_empty(set: &mut std::collections::BTreeSet<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        set.insert(value.to_string());
    }
}

//! MessageStore: the owned, in-memory set of inbox messages.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, info};

use super::traits::MessageRepository;
use crate::error::StoreError;
use crate::pipeline::types::MessageRecord;

/// Sample inbox compiled into the binary, used when no file is configured.
const BUNDLED_MESSAGES: &str = include_str!("../../data/messages.json");

/// In-memory message storage with an id index.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    records: Vec<MessageRecord>,
    index: HashMap<i64, usize>,
}

impl MessageStore {
    /// Build a store, rejecting duplicate ids.
    pub fn new(records: Vec<MessageRecord>) -> Result<Self, StoreError> {
        let index = build_index(&records)?;
        Ok(Self { records, index })
    }

    /// Parse a JSON array of records.
    pub fn from_json(json: &str, origin: &str) -> Result<Self, StoreError> {
        let records: Vec<MessageRecord> =
            serde_json::from_str(json).map_err(|source| StoreError::Parse {
                path: origin.to_string(),
                source,
            })?;
        Self::new(records)
    }

    /// Load records from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::from_json(&json, &path.display().to_string())?;
        info!(path = %path.display(), count = store.len(), "Loaded messages");
        Ok(store)
    }

    /// The sample inbox shipped with the crate.
    pub fn bundled() -> Result<Self, StoreError> {
        Self::from_json(BUNDLED_MESSAGES, "bundled messages.json")
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Clone out the current records (e.g. to hand to the batch pass).
    pub fn snapshot(&self) -> Vec<MessageRecord> {
        self.records.clone()
    }

    /// Write back an enriched record set.
    ///
    /// Only `category` and `action_items` are taken from `updated`; records
    /// whose id is unknown are ignored. Returns how many records matched an
    /// existing id, whether or not their fields differed.
    pub fn apply_enrichment(&mut self, updated: Vec<MessageRecord>) -> usize {
        let mut applied = 0;
        for record in updated {
            let Some(&pos) = self.index.get(&record.id) else {
                debug!(message_id = record.id, "Enriched record has no match in store");
                continue;
            };
            let target = &mut self.records[pos];
            target.category = record.category;
            target.action_items = record.action_items;
            applied += 1;
        }
        applied
    }

    /// Records whose category, subject, or any action task contains `query`
    /// (case-insensitive). An empty query returns everything.
    pub fn filter(&self, query: &str) -> Vec<MessageRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.snapshot();
        }
        self.records
            .iter()
            .filter(|r| {
                r.category.label().to_lowercase().contains(&needle)
                    || r.subject.to_lowercase().contains(&needle)
                    || r
                        .action_items
                        .iter()
                        .any(|item| item.task.label().to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }
}

impl MessageRepository for MessageStore {
    fn get_message(&self, id: i64) -> Option<&MessageRecord> {
        self.index.get(&id).map(|&pos| &self.records[pos])
    }

    fn list_messages(&self) -> &[MessageRecord] {
        &self.records
    }
}

fn build_index(records: &[MessageRecord]) -> Result<HashMap<i64, usize>, StoreError> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut index = HashMap::with_capacity(records.len());
    for (pos, record) in records.iter().enumerate() {
        if !seen.insert(record.id) {
            return Err(StoreError::DuplicateId { id: record.id });
        }
        index.insert(record.id, pos);
    }
    Ok(index)
}

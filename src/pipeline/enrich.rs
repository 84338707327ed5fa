//! Batch enrichment: apply the keyword rules to every stored message.

use std::time::Duration;

use tracing::{debug, info};

use crate::pipeline::rules::RulesEngine;
use crate::pipeline::types::MessageRecord;

/// Stand-in for the latency of a real upstream enrichment call.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(1000);

/// Applies categorization and action extraction to a record set.
pub struct BatchEnricher {
    rules: RulesEngine,
    delay: Duration,
}

impl BatchEnricher {
    pub fn new(rules: RulesEngine, delay: Duration) -> Self {
        Self { rules, delay }
    }

    /// Overwrite `category` and `action_items` on one record.
    ///
    /// Only `subject` and `body` are read, so repeated runs give the same
    /// result.
    pub fn enrich(&self, record: &mut MessageRecord) {
        let text = record.rule_text();
        record.category = self.rules.categorize_text(&text);
        record.action_items = self.rules.extract_actions_text(&text);
        debug!(
            message_id = record.id,
            category = %record.category,
            actions = record.action_items.len(),
            "Message enriched"
        );
    }

    /// Enrich every record in one linear pass, then wait out the configured
    /// delay before handing the updated set back.
    pub async fn enrich_all(&self, mut records: Vec<MessageRecord>) -> Vec<MessageRecord> {
        info!(count = records.len(), "Starting batch enrichment");

        for record in records.iter_mut() {
            self.enrich(record);
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        info!(count = records.len(), "Batch enrichment complete");
        records
    }
}

impl Default for BatchEnricher {
    fn default() -> Self {
        Self::new(RulesEngine::default_rules(), DEFAULT_BATCH_DELAY)
    }
}

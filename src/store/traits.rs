//! Read-only repository traits consumed by prompt assembly.
//!
//! Kept synchronous: both repositories are in-memory and assembly never
//! suspends.

use crate::pipeline::intent::Intent;
use crate::pipeline::types::MessageRecord;

/// Lookup of message records.
pub trait MessageRepository: Send + Sync {
    /// Find a message by its integer id.
    fn get_message(&self, id: i64) -> Option<&MessageRecord>;

    /// All messages, in load order.
    fn list_messages(&self) -> &[MessageRecord];
}

/// Lookup of instruction templates by intent.
pub trait TemplateRepository: Send + Sync {
    /// Template text bound to `intent`, if any.
    fn template(&self, intent: Intent) -> Option<&str>;
}

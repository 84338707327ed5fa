//! Message pipeline.
//!
//! Two independent paths run over stored messages:
//! 1. Query: `intent::classify()` picks a template, `prompt::assemble()` builds
//!    the model prompt around one message and the user's instruction.
//! 2. Enrichment: `enrich::BatchEnricher` runs `rules::RulesEngine` over every
//!    message to set its category and action items. No LLM involved.

pub mod enrich;
pub mod intent;
pub mod prompt;
pub mod rules;
pub mod types;

pub use enrich::BatchEnricher;
pub use intent::{Intent, classify};
pub use prompt::{AssembledPrompt, assemble};
pub use rules::{RulesEngine, categorize, extract_actions};
pub use types::{ActionItem, ActionTask, Category, MessageRecord};

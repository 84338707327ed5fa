//! Intent classification for free-text user instructions.
//!
//! The instruction is lowercased and checked against an ordered keyword
//! table. The first rule with any matching keyword decides the intent; when
//! nothing matches the instruction is treated as a reply request.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which instruction template governs an assembled prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Summarize,
    DraftReply,
    ActionItem,
}

impl Intent {
    /// Every declared intent, in table order.
    pub const ALL: [Intent; 3] = [Intent::Summarize, Intent::DraftReply, Intent::ActionItem];

    /// Key used for this intent in template files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::DraftReply => "draft_reply",
            Self::ActionItem => "action_item",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Intent used when no keyword matches.
pub const DEFAULT_INTENT: Intent = Intent::DraftReply;

/// Ordered (keywords, intent) rules. Order is the tie-break.
pub const INTENT_RULES: &[(&[&str], Intent)] = &[
    (&["summarize", "summary"], Intent::Summarize),
    (&["reply", "draft", "write"], Intent::DraftReply),
    (&["task", "action item", "actions"], Intent::ActionItem),
];

/// Classify a user instruction into an intent.
pub fn classify(instruction: &str) -> Intent {
    let lower = instruction.to_lowercase();
    INTENT_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, intent)| *intent)
        .unwrap_or(DEFAULT_INTENT)
}

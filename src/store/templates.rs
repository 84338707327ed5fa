//! TemplateStore: instruction templates keyed by intent.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use super::traits::TemplateRepository;
use crate::error::StoreError;
use crate::pipeline::intent::Intent;

const SUMMARIZE_TEMPLATE: &str = "\
Summarize the email below in three to five concise bullet points. \
Lead with the single most important point, note any deadlines or requests, \
and leave out greetings and signatures.";

const DRAFT_REPLY_TEMPLATE: &str = "\
Draft a clear, professional reply to the email below. Answer every question \
the sender asked, keep the tone friendly and concise, and follow any extra \
guidance in the user command.";

const ACTION_ITEM_TEMPLATE: &str = "\
Extract every concrete action item from the email below as a numbered list. \
For each item give the task, who owns it, and any due date mentioned. \
If there are no action items, say so.";

/// Template text for each intent. Every intent is bound.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    templates: HashMap<Intent, String>,
}

impl TemplateStore {
    /// Built-in templates.
    pub fn builtin() -> Self {
        let templates = HashMap::from([
            (Intent::Summarize, SUMMARIZE_TEMPLATE.to_string()),
            (Intent::DraftReply, DRAFT_REPLY_TEMPLATE.to_string()),
            (Intent::ActionItem, ACTION_ITEM_TEMPLATE.to_string()),
        ]);
        Self { templates }
    }

    /// Build from an intent map, requiring a template for every intent.
    pub fn new(templates: HashMap<Intent, String>) -> Result<Self, StoreError> {
        if let Some(intent) = Intent::ALL
            .into_iter()
            .find(|intent| !templates.contains_key(intent))
        {
            return Err(StoreError::MissingTemplate { intent });
        }
        Ok(Self { templates })
    }

    /// Parse a JSON object keyed by `summarize`, `draft_reply`, `action_item`.
    pub fn from_json(json: &str, origin: &str) -> Result<Self, StoreError> {
        let templates: HashMap<Intent, String> =
            serde_json::from_str(json).map_err(|source| StoreError::Parse {
                path: origin.to_string(),
                source,
            })?;
        Self::new(templates)
    }

    /// Load templates from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::from_json(&json, &path.display().to_string())?;
        info!(path = %path.display(), "Loaded prompt templates");
        Ok(store)
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateRepository for TemplateStore {
    fn template(&self, intent: Intent) -> Option<&str> {
        self.templates.get(&intent).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_binds_every_intent() {
        let store = TemplateStore::builtin();
        for intent in Intent::ALL {
            assert!(store.template(intent).is_some(), "{intent} unbound");
        }
    }

    #[test]
    fn parses_snake_case_keys() {
        let json = r#"{
            "summarize": "S",
            "draft_reply": "D",
            "action_item": "A"
        }"#;
        let store = TemplateStore::from_json(json, "test").unwrap();
        assert_eq!(store.template(Intent::Summarize), Some("S"));
        assert_eq!(store.template(Intent::DraftReply), Some("D"));
        assert_eq!(store.template(Intent::ActionItem), Some("A"));
    }

    #[test]
    fn missing_intent_is_rejected() {
        let json = r#"{"summarize": "S", "action_item": "A"}"#;
        let err = TemplateStore::from_json(json, "test").unwrap_err();
        assert!(matches!(
            err,
            StoreError::MissingTemplate {
                intent: Intent::DraftReply
            }
        ));
    }

    #[test]
    fn unknown_key_is_parse_error() {
        let json = r#"{"summarize": "S", "draft_reply": "D", "action_item": "A", "translate": "T"}"#;
        assert!(matches!(
            TemplateStore::from_json(json, "test"),
            Err(StoreError::Parse { .. })
        ));
    }

    #[test]
    fn load_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"{"summarize": "S", "draft_reply": "D", "action_item": "A"}"#,
        )
        .unwrap();
        let store = TemplateStore::load(file.path()).unwrap();
        assert_eq!(store.template(Intent::DraftReply), Some("D"));
    }
}

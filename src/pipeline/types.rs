//! Shared types for the message pipeline.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Message record ──────────────────────────────────────────────────

/// A stored inbox message plus the fields derived by the batch pass.
///
/// `sender`, `subject` and `body` never change after load. `category` and
/// `action_items` are overwritten by enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    /// Unique integer key.
    pub id: i64,
    pub sender: String,
    pub subject: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
}

impl MessageRecord {
    /// Text the keyword rules run against: subject and body, lowercased.
    pub fn rule_text(&self) -> String {
        rule_text(&self.subject, &self.body)
    }
}

/// Join subject and body with a single space and lowercase the result.
pub fn rule_text(subject: &str, body: &str) -> String {
    format!("{subject} {body}").to_lowercase()
}

// ── Category ────────────────────────────────────────────────────────

/// Topic label assigned by the categorization rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Urgent,
    Meeting,
    Newsletter,
    Financial,
    #[serde(rename = "HR/Admin")]
    HrAdmin,
    Personal,
    #[default]
    General,
}

impl Category {
    /// Display label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Urgent => "Urgent",
            Self::Meeting => "Meeting",
            Self::Newsletter => "Newsletter",
            Self::Financial => "Financial",
            Self::HrAdmin => "HR/Admin",
            Self::Personal => "Personal",
            Self::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Action items ────────────────────────────────────────────────────

/// The fixed set of tasks the action rules can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionTask {
    #[serde(rename = "Prepare/Review Report")]
    PrepareReport,
    #[serde(rename = "Join Meeting/Bridge")]
    JoinBridge,
    #[serde(rename = "Draft Reply")]
    DraftReply,
    #[serde(rename = "Update Calendar")]
    UpdateCalendar,
    #[serde(rename = "Complete Peer Review")]
    PeerReview,
    #[serde(rename = "Log into HR Portal")]
    HrPortal,
}

impl ActionTask {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PrepareReport => "Prepare/Review Report",
            Self::JoinBridge => "Join Meeting/Bridge",
            Self::DraftReply => "Draft Reply",
            Self::UpdateCalendar => "Update Calendar",
            Self::PeerReview => "Complete Peer Review",
            Self::HrPortal => "Log into HR Portal",
        }
    }
}

impl fmt::Display for ActionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A candidate follow-up derived from message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub task: ActionTask,
}

impl From<ActionTask> for ActionItem {
    fn from(task: ActionTask) -> Self {
        Self { task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_camel_case_and_defaults() {
        let json = serde_json::json!({
            "id": 7,
            "sender": "alice@example.com",
            "subject": "Hi",
            "body": "Hello",
            "timestamp": "2024-05-01T09:30:00Z"
        });
        let record: MessageRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.category, Category::General);
        assert!(record.action_items.is_empty());

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["category"], "General");
        assert!(out["actionItems"].as_array().unwrap().is_empty());
    }

    #[test]
    fn labels_match_serialized_form() {
        assert_eq!(serde_json::to_value(Category::HrAdmin).unwrap(), "HR/Admin");
        assert_eq!(
            serde_json::to_value(ActionItem::from(ActionTask::HrPortal)).unwrap(),
            serde_json::json!({ "task": "Log into HR Portal" })
        );
        for task in [
            ActionTask::PrepareReport,
            ActionTask::JoinBridge,
            ActionTask::DraftReply,
            ActionTask::UpdateCalendar,
            ActionTask::PeerReview,
            ActionTask::HrPortal,
        ] {
            assert_eq!(serde_json::to_value(task).unwrap(), task.label());
        }
    }

    #[test]
    fn rule_text_joins_and_lowercases() {
        assert_eq!(rule_text("Server OUTAGE", "Join Now"), "server outage join now");
    }
}

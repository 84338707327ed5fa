//! Keyword rules engine for categorization and action extraction.
//!
//! Both engines run over the same text (subject + body, lowercased) using
//! plain substring matching, but they evaluate differently:
//! - Categorization is exclusive: the first rule with a matching keyword wins.
//! - Action extraction is inclusive: every rule is checked, and each one that
//!   fires contributes one item, in declaration order.
//!
//! Matching has no word-boundary guard, so short keywords like "hr" also fire
//! inside longer words ("three", "through").

use tracing::debug;

use crate::pipeline::types::{ActionItem, ActionTask, Category, rule_text};

/// Maps a set of keywords to a category. Fires if any keyword is present.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub keywords: Vec<&'static str>,
    pub category: Category,
}

/// How an action rule's terms combine.
#[derive(Debug, Clone)]
pub enum Trigger {
    /// Every term must be present.
    All(Vec<&'static str>),
    /// At least one term must be present.
    Any(Vec<&'static str>),
}

impl Trigger {
    fn matches(&self, text: &str) -> bool {
        match self {
            Self::All(terms) => terms.iter().all(|t| text.contains(t)),
            Self::Any(terms) => terms.iter().any(|t| text.contains(t)),
        }
    }
}

/// Emits one action item when its trigger matches.
#[derive(Debug, Clone)]
pub struct ActionRule {
    pub trigger: Trigger,
    pub task: ActionTask,
}

/// Deterministic keyword rules for enrichment.
#[derive(Debug, Clone)]
pub struct RulesEngine {
    category_rules: Vec<CategoryRule>,
    action_rules: Vec<ActionRule>,
}

impl RulesEngine {
    /// Create a rules engine with the built-in rule tables.
    pub fn default_rules() -> Self {
        let category_rules = vec![
            CategoryRule {
                keywords: vec!["urgent", "critical", "deadline", "outage"],
                category: Category::Urgent,
            },
            CategoryRule {
                keywords: vec!["meeting", "schedule", "invite", "kickoff"],
                category: Category::Meeting,
            },
            CategoryRule {
                keywords: vec!["newsletter", "digest", "tips"],
                category: Category::Newsletter,
            },
            CategoryRule {
                keywords: vec!["payment", "invoice", "price", "cost"],
                category: Category::Financial,
            },
            CategoryRule {
                keywords: vec!["hr", "benefits", "enrollment"],
                category: Category::HrAdmin,
            },
            CategoryRule {
                keywords: vec!["party", "dinner", "family"],
                category: Category::Personal,
            },
        ];

        let action_rules = vec![
            ActionRule {
                trigger: Trigger::All(vec!["report", "need"]),
                task: ActionTask::PrepareReport,
            },
            ActionRule {
                trigger: Trigger::All(vec!["join", "bridge"]),
                task: ActionTask::JoinBridge,
            },
            ActionRule {
                trigger: Trigger::All(vec!["reply"]),
                task: ActionTask::DraftReply,
            },
            ActionRule {
                trigger: Trigger::All(vec!["accept", "invite"]),
                task: ActionTask::UpdateCalendar,
            },
            ActionRule {
                trigger: Trigger::All(vec!["review", "peer"]),
                task: ActionTask::PeerReview,
            },
            ActionRule {
                trigger: Trigger::Any(vec!["log into", "portal"]),
                task: ActionTask::HrPortal,
            },
        ];

        Self {
            category_rules,
            action_rules,
        }
    }

    /// Assign exactly one category. Falls back to `General`.
    pub fn categorize(&self, subject: &str, body: &str) -> Category {
        self.categorize_text(&rule_text(subject, body))
    }

    /// Categorize already-normalized text (see [`rule_text`]).
    pub fn categorize_text(&self, text: &str) -> Category {
        for rule in &self.category_rules {
            if let Some(keyword) = rule.keywords.iter().find(|k| text.contains(*k)) {
                debug!(keyword = %keyword, category = %rule.category, "Category rule matched");
                return rule.category;
            }
        }
        Category::General
    }

    /// Collect every action whose rule fires, in declaration order.
    pub fn extract_actions(&self, subject: &str, body: &str) -> Vec<ActionItem> {
        self.extract_actions_text(&rule_text(subject, body))
    }

    /// Extract actions from already-normalized text (see [`rule_text`]).
    pub fn extract_actions_text(&self, text: &str) -> Vec<ActionItem> {
        self.action_rules
            .iter()
            .filter(|rule| rule.trigger.matches(text))
            .map(|rule| ActionItem::from(rule.task))
            .collect()
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::default_rules()
    }
}

/// Categorize with the built-in rules.
pub fn categorize(subject: &str, body: &str) -> Category {
    RulesEngine::default_rules().categorize(subject, body)
}

/// Extract actions with the built-in rules.
pub fn extract_actions(subject: &str, body: &str) -> Vec<ActionItem> {
    RulesEngine::default_rules().extract_actions(subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks(items: &[ActionItem]) -> Vec<ActionTask> {
        items.iter().map(|i| i.task).collect()
    }

    #[test]
    fn outage_is_urgent_with_bridge_and_reply() {
        let engine = RulesEngine::default_rules();
        let subject = "Server Outage";
        let body = "This is urgent, please join the bridge and reply";
        assert_eq!(engine.categorize(subject, body), Category::Urgent);
        assert_eq!(
            tasks(&engine.extract_actions(subject, body)),
            vec![ActionTask::JoinBridge, ActionTask::DraftReply]
        );
    }

    #[test]
    fn family_dinner_is_personal_without_actions() {
        let engine = RulesEngine::default_rules();
        let subject = "Team Lunch";
        let body = "Join us for dinner with the family";
        assert_eq!(engine.categorize(subject, body), Category::Personal);
        assert!(engine.extract_actions(subject, body).is_empty());
    }

    #[test]
    fn first_matching_category_wins() {
        let engine = RulesEngine::default_rules();
        // Meeting and Financial both match; Meeting is declared first
        assert_eq!(
            engine.categorize("Invoice review meeting", "Discuss the payment"),
            Category::Meeting
        );
        // Urgent beats everything
        assert_eq!(
            engine.categorize("Newsletter", "Critical security tips"),
            Category::Urgent
        );
    }

    #[test]
    fn each_category_reachable() {
        let engine = RulesEngine::default_rules();
        assert_eq!(engine.categorize("Q3 kickoff", ""), Category::Meeting);
        assert_eq!(engine.categorize("Weekly digest", ""), Category::Newsletter);
        assert_eq!(engine.categorize("Price update", ""), Category::Financial);
        assert_eq!(engine.categorize("Open enrollment", ""), Category::HrAdmin);
        assert_eq!(engine.categorize("Birthday party", ""), Category::Personal);
        assert_eq!(engine.categorize("Hello", "Just saying hi"), Category::General);
    }

    #[test]
    fn short_keyword_matches_inside_words() {
        // "hr" inside "three" triggers HR/Admin; accepted behavior
        let engine = RulesEngine::default_rules();
        assert_eq!(
            engine.categorize("Three things", "See you soon"),
            Category::HrAdmin
        );
    }

    #[test]
    fn subject_and_body_are_joined_with_space() {
        let engine = RulesEngine::default_rules();
        // "log" at end of subject + "into" at start of body forms "log into"
        assert_eq!(
            tasks(&engine.extract_actions("Please log", "into the system")),
            vec![ActionTask::HrPortal]
        );
    }

    #[test]
    fn conjunctive_rules_need_every_term() {
        let engine = RulesEngine::default_rules();
        assert!(engine.extract_actions("Report", "Quarterly numbers").is_empty());
        assert_eq!(
            tasks(&engine.extract_actions("Report", "I need it by Friday")),
            vec![ActionTask::PrepareReport]
        );
    }

    #[test]
    fn all_actions_in_declaration_order() {
        let engine = RulesEngine::default_rules();
        let body = "Please reply. I need the report. Join the bridge, accept the invite, \
                    do the peer review and log into the portal.";
        assert_eq!(
            tasks(&engine.extract_actions("Everything", body)),
            vec![
                ActionTask::PrepareReport,
                ActionTask::JoinBridge,
                ActionTask::DraftReply,
                ActionTask::UpdateCalendar,
                ActionTask::PeerReview,
                ActionTask::HrPortal,
            ]
        );
    }

    #[test]
    fn each_rule_fires_at_most_once() {
        let engine = RulesEngine::default_rules();
        let items = engine.extract_actions("reply reply", "reply please, reply");
        assert_eq!(tasks(&items), vec![ActionTask::DraftReply]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let engine = RulesEngine::default_rules();
        assert_eq!(engine.categorize("URGENT", ""), Category::Urgent);
        assert_eq!(
            tasks(&engine.extract_actions("PEER REVIEW", "")),
            vec![ActionTask::PeerReview]
        );
    }

    #[test]
    fn free_functions_use_default_rules() {
        assert_eq!(categorize("Invoice #12", "Amount due"), Category::Financial);
        assert_eq!(
            tasks(&extract_actions("Benefits", "Visit the portal")),
            vec![ActionTask::HrPortal]
        );
    }

    #[test]
    fn categorize_is_deterministic() {
        let engine = RulesEngine::default_rules();
        let a = engine.categorize("Budget cost review", "numbers attached");
        let b = engine.categorize("Budget cost review", "numbers attached");
        assert_eq!(a, b);
    }
}

//! Data models for forms, responses and their statistics.
//!
//! This module contains the core data structures used throughout
//! the application for representing forms, answers and summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Pick exactly one of the declared options
    Choice,
    /// Free-text answer
    Text,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Choice => write!(f, "Multiple Choice"),
            QuestionKind::Text => write!(f, "Text Response"),
        }
    }
}

/// A single prompt within a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the owning form.
    pub id: String,
    /// Kind of the question.
    pub kind: QuestionKind,
    /// Prompt text shown to respondents.
    pub prompt: String,
    /// Declared options in display order (choice questions only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Whether an answer is mandatory.
    #[serde(default)]
    pub required: bool,
}

impl Question {
    /// Whether `value` is one of the declared options.
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }
}

/// An answer, resolved against the kind of the question it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Answer {
    Text(String),
    Choice(String),
}

impl Answer {
    /// Build an answer for a question of `kind`. Empty input means "not answered".
    pub fn resolve(kind: QuestionKind, raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return None;
        }

        Some(match kind {
            QuestionKind::Choice => Answer::Choice(raw),
            QuestionKind::Text => Answer::Text(raw),
        })
    }

    /// The answered value.
    pub fn value(&self) -> &str {
        match self {
            Answer::Text(s) | Answer::Choice(s) => s,
        }
    }
}

/// One anonymous submission to a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub id: String,
    pub form_id: String,
    /// Answers keyed by question id.
    pub answers: BTreeMap<String, Answer>,
    pub submitted_at: DateTime<Utc>,
}

impl Response {
    /// Returns the non-empty answer given to a question, if any.
    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.answers
            .get(question_id)
            .map(Answer::value)
            .filter(|v| !v.is_empty())
    }
}

/// Whether a form still accepts responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Active,
    Closed,
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormStatus::Active => write!(f, "Active"),
            FormStatus::Closed => write!(f, "Closed"),
        }
    }
}

impl FormStatus {
    /// Returns an emoji representation of the status.
    pub fn emoji(&self) -> &'static str {
        match self {
            FormStatus::Active => "🟢",
            FormStatus::Closed => "🔴",
        }
    }
}

/// A named set of questions plus its accumulated responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<Question>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Append-only, in submission order.
    #[serde(default)]
    pub responses: Vec<Response>,
}

impl Form {
    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Look up a question by its 1-based position.
    pub fn question_by_number(&self, number: usize) -> Option<&Question> {
        number.checked_sub(1).and_then(|i| self.questions.get(i))
    }

    /// Resolve a question by id, falling back to a 1-based question number.
    pub fn resolve_question(&self, key: &str) -> Option<&Question> {
        self.question(key).or_else(|| {
            key.trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| self.question_by_number(n))
        })
    }

    pub fn status(&self) -> FormStatus {
        if self.is_active {
            FormStatus::Active
        } else {
            FormStatus::Closed
        }
    }
}

/// Tally for one declared option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionStat {
    pub option: String,
    pub count: usize,
    /// Rounded share of the question's tallied answers (0-100).
    pub percentage: u32,
}

/// Aggregated answers to a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QuestionStats {
    Choice {
        /// Answers that matched a declared option.
        total_answered: usize,
        options: Vec<OptionStat>,
    },
    Text {
        answers: Vec<String>,
    },
}

impl QuestionStats {
    /// Whether any answer contributed to these stats.
    pub fn is_empty(&self) -> bool {
        match self {
            QuestionStats::Choice { total_answered, .. } => *total_answered == 0,
            QuestionStats::Text { answers } => answers.is_empty(),
        }
    }
}

/// Stats for one question, keyed by its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub question_id: String,
    pub prompt: String,
    pub stats: QuestionStats,
}

/// Per-question summaries of a form, in question order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub questions: Vec<QuestionSummary>,
}

impl FormSummary {
    /// Stats for a question id.
    #[cfg(test)]
    pub fn get(&self, question_id: &str) -> Option<&QuestionStats> {
        self.questions
            .iter()
            .find(|s| s.question_id == question_id)
            .map(|s| &s.stats)
    }
}

/// Headline numbers shown above the per-question stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub total_responses: usize,
    pub question_count: usize,
    /// 100 once any response exists, 0 otherwise.
    pub completion_rate: u32,
    pub status: FormStatus,
}

impl Overview {
    pub fn from_form(form: &Form) -> Self {
        let total_responses = form.responses.len();
        Self {
            total_responses,
            question_count: form.questions.len(),
            completion_rate: if total_responses > 0 { 100 } else { 0 },
            status: form.status(),
        }
    }
}

/// A recent submission as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentResponse {
    /// Display number, `#total` for the newest.
    pub number: usize,
    pub response_id: String,
    pub submitted_at: DateTime<Utc>,
}

/// Everything the stats report renders for one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub form_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub overview: Overview,
    pub summary: FormSummary,
    pub recent_responses: Vec<RecentResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(kind: QuestionKind) -> Question {
        Question {
            id: "q1".to_string(),
            kind,
            prompt: "Favourite colour?".to_string(),
            options: match kind {
                QuestionKind::Choice => vec!["Red".to_string(), "Blue".to_string()],
                QuestionKind::Text => Vec::new(),
            },
            required: false,
        }
    }

    #[test]
    fn test_answer_resolve_by_kind() {
        assert_eq!(
            Answer::resolve(QuestionKind::Choice, "Red"),
            Some(Answer::Choice("Red".to_string()))
        );
        assert_eq!(
            Answer::resolve(QuestionKind::Text, "hello"),
            Some(Answer::Text("hello".to_string()))
        );
        assert_eq!(Answer::resolve(QuestionKind::Text, ""), None);
    }

    #[test]
    fn test_answer_serialization_is_tagged() {
        let json = serde_json::to_string(&Answer::Choice("Red".to_string())).unwrap();
        assert_eq!(json, r#"{"kind":"choice","value":"Red"}"#);

        let back: Answer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(), "Red");
    }

    #[test]
    fn test_has_option() {
        let q = question(QuestionKind::Choice);
        assert!(q.has_option("Red"));
        assert!(!q.has_option("red"));
        assert!(!question(QuestionKind::Text).has_option("Red"));
    }

    #[test]
    fn test_text_question_omits_options_when_serialized() {
        let json = serde_json::to_string(&question(QuestionKind::Text)).unwrap();
        assert!(!json.contains("options"));
        assert!(json.contains(r#""kind":"text""#));
    }

    #[test]
    fn test_question_by_number() {
        let form = Form {
            id: "f1".to_string(),
            title: "Survey".to_string(),
            description: None,
            questions: vec![question(QuestionKind::Choice)],
            is_active: true,
            created_at: Utc::now(),
            responses: Vec::new(),
        };

        assert_eq!(form.question_by_number(1).map(|q| q.id.as_str()), Some("q1"));
        assert_eq!(form.resolve_question("q1").map(|q| q.id.as_str()), Some("q1"));
        assert_eq!(form.resolve_question("1").map(|q| q.id.as_str()), Some("q1"));
        assert!(form.resolve_question("q2").is_none());
        assert!(form.question_by_number(0).is_none());
        assert!(form.question_by_number(2).is_none());
        assert_eq!(form.status(), FormStatus::Active);
    }

    #[test]
    fn test_overview_completion_rate() {
        let mut form = Form {
            id: "f1".to_string(),
            title: "Survey".to_string(),
            description: None,
            questions: vec![question(QuestionKind::Text)],
            is_active: false,
            created_at: Utc::now(),
            responses: Vec::new(),
        };
        let overview = Overview::from_form(&form);
        assert_eq!(overview.completion_rate, 0);
        assert_eq!(overview.status, FormStatus::Closed);

        form.responses.push(Response {
            id: "r1".to_string(),
            form_id: "f1".to_string(),
            answers: BTreeMap::new(),
            submitted_at: Utc::now(),
        });
        let overview = Overview::from_form(&form);
        assert_eq!(overview.total_responses, 1);
        assert_eq!(overview.completion_rate, 100);
    }
}

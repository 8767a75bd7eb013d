//! Form authoring.
//!
//! A form is authored as a draft (usually a TOML or JSON definition file),
//! validated as a whole, and only then turned into a stored [`Form`].

use crate::ids::IdGenerator;
use crate::models::{Form, Question, QuestionKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Why a draft cannot become a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Please enter a form title")]
    MissingTitle,

    #[error("Please add at least one question")]
    NoQuestions,

    #[error("Please complete all questions and options (question {number} is incomplete)")]
    IncompleteQuestion { number: usize },
}

/// A question as written by the form author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub kind: QuestionKind,
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

impl QuestionDraft {
    fn is_complete(&self) -> bool {
        if self.prompt.trim().is_empty() {
            return false;
        }

        match self.kind {
            QuestionKind::Choice => {
                !self.options.is_empty() && self.options.iter().all(|o| !o.trim().is_empty())
            }
            QuestionKind::Text => self.options.is_empty(),
        }
    }
}

/// A form as written by its author, before ids and timestamps are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

impl FormDraft {
    /// Load a draft from a `.json` or `.toml` definition file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read form definition: {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let draft = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse form definition: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse form definition: {}", path.display()))?
        };

        Ok(draft)
    }

    /// Check the draft can be published.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.title.trim().is_empty() {
            return Err(BuildError::MissingTitle);
        }

        if self.questions.is_empty() {
            return Err(BuildError::NoQuestions);
        }

        if let Some(index) = self.questions.iter().position(|q| !q.is_complete()) {
            return Err(BuildError::IncompleteQuestion { number: index + 1 });
        }

        Ok(())
    }

    /// Validate and turn the draft into a new, active form with no responses.
    pub fn build(&self, ids: &mut dyn IdGenerator) -> Result<Form, BuildError> {
        self.validate()?;

        let questions = self
            .questions
            .iter()
            .map(|q| Question {
                id: ids.next_id(),
                kind: q.kind,
                prompt: q.prompt.trim().to_string(),
                options: q.options.iter().map(|o| o.trim().to_string()).collect(),
                required: q.required,
            })
            .collect();

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from);

        Ok(Form {
            id: ids.next_id(),
            title: self.title.trim().to_string(),
            description,
            questions,
            is_active: true,
            created_at: ids.now(),
            responses: Vec::new(),
        })
    }
}

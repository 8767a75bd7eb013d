//! The form store.
//!
//! [`FormStore`] holds every form together with its responses. Operations
//! never modify a store in place: each one returns a new snapshot and leaves
//! the previous one untouched.

pub mod persist;

pub use persist::{JsonFileStore, KeyValueStore, PersistError};

use crate::builder::{BuildError, FormDraft};
use crate::ids::IdGenerator;
use crate::models::{Answer, Form, QuestionKind, Response};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Key the forms collection is persisted under.
pub const FORMS_KEY: &str = "forms";

/// Failure to locate a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("Form id prefix '{prefix}' matches {count} forms")]
    AmbiguousId { prefix: String, count: usize },
}

/// Why a submission was not recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("This form is closed and is no longer accepting responses")]
    FormClosed,

    #[error("Form has no question '{0}'")]
    UnknownQuestion(String),

    #[error("Please answer all required questions (missing: {prompt})")]
    MissingRequired { prompt: String },
}

/// Raw answers to a form, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub form_id: String,
    pub answers: Vec<(String, String)>,
}

impl Submission {
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            answers: Vec::new(),
        }
    }

    /// Add an answer. A later answer to the same question replaces an earlier one.
    pub fn answer(mut self, question_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.answers.push((question_id.into(), value.into()));
        self
    }
}

/// Immutable snapshot of all forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormStore {
    forms: Vec<Form>,
}

impl FormStore {
    /// Load the forms collection, empty when nothing was saved yet.
    pub fn load(kv: &impl KeyValueStore) -> Result<Self, PersistError> {
        let forms: Vec<Form> = kv.load(FORMS_KEY)?;
        debug!("Loaded {} forms", forms.len());
        Ok(Self { forms })
    }

    /// Persist this snapshot.
    pub fn save(&self, kv: &impl KeyValueStore) -> Result<(), PersistError> {
        kv.save(FORMS_KEY, &self.forms)
    }

    /// All forms, oldest first.
    pub fn forms(&self) -> &[Form] {
        &self.forms
    }

    pub fn get(&self, form_id: &str) -> Option<&Form> {
        self.forms.iter().find(|f| f.id == form_id)
    }

    /// Find a form by its full id or a unique id prefix.
    pub fn find(&self, id_or_prefix: &str) -> Result<&Form, StoreError> {
        if let Some(form) = self.get(id_or_prefix) {
            return Ok(form);
        }

        let matches: Vec<&Form> = self
            .forms
            .iter()
            .filter(|f| !id_or_prefix.is_empty() && f.id.starts_with(id_or_prefix))
            .collect();

        match matches.as_slice() {
            [form] => Ok(form),
            [] => Err(StoreError::FormNotFound(id_or_prefix.to_string())),
            _ => Err(StoreError::AmbiguousId {
                prefix: id_or_prefix.to_string(),
                count: matches.len(),
            }),
        }
    }

    fn position(&self, form_id: &str) -> Option<usize> {
        self.forms.iter().position(|f| f.id == form_id)
    }

    /// Publish a draft as a new active form.
    pub fn create(
        &self,
        draft: &FormDraft,
        ids: &mut dyn IdGenerator,
    ) -> Result<(Self, String), BuildError> {
        let form = draft.build(ids)?;
        let form_id = form.id.clone();

        info!("Created form {} ({} questions)", form_id, form.questions.len());

        let mut next = self.clone();
        next.forms.push(form);
        Ok((next, form_id))
    }

    /// Record a submission against its form.
    ///
    /// Answers are resolved against each question's kind. Empty answers are
    /// dropped; choice answers outside the declared options are kept and left
    /// for the aggregator to exclude.
    pub fn append_response(
        &self,
        submission: Submission,
        ids: &mut dyn IdGenerator,
    ) -> Result<(Self, String), SubmissionError> {
        let index = self
            .position(&submission.form_id)
            .ok_or_else(|| SubmissionError::FormNotFound(submission.form_id.clone()))?;
        let form = &self.forms[index];

        if !form.is_active {
            return Err(SubmissionError::FormClosed);
        }

        let mut answers = BTreeMap::new();
        for (question_id, raw) in submission.answers {
            let question = form
                .question(&question_id)
                .ok_or_else(|| SubmissionError::UnknownQuestion(question_id.clone()))?;

            if question.kind == QuestionKind::Choice && !raw.is_empty() && !question.has_option(&raw)
            {
                warn!(
                    "Answer '{}' is not an option of question '{}'",
                    raw, question.prompt
                );
            }

            match Answer::resolve(question.kind, raw) {
                Some(answer) => {
                    answers.insert(question_id, answer);
                }
                None => {
                    answers.remove(&question_id);
                }
            }
        }

        if let Some(missing) = form
            .questions
            .iter()
            .find(|q| q.required && !answers.contains_key(&q.id))
        {
            return Err(SubmissionError::MissingRequired {
                prompt: missing.prompt.clone(),
            });
        }

        let response = Response {
            id: ids.next_id(),
            form_id: form.id.clone(),
            answers,
            submitted_at: ids.now(),
        };
        let response_id = response.id.clone();

        debug!("Recorded response {} for form {}", response_id, form.id);

        let mut next = self.clone();
        next.forms[index].responses.push(response);
        Ok((next, response_id))
    }

    /// Close an active form or reopen a closed one.
    pub fn toggle_active(&self, form_id: &str) -> Result<Self, StoreError> {
        let index = self
            .position(form_id)
            .ok_or_else(|| StoreError::FormNotFound(form_id.to_string()))?;

        let mut next = self.clone();
        let form = &mut next.forms[index];
        form.is_active = !form.is_active;

        info!("Form {} is now {}", form.id, form.status());
        Ok(next)
    }
}

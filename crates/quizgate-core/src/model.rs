//! Core data model types for quizgate.
//!
//! Assessment definitions, questions, users and attempt records. Invariants
//! are checked when values are built or deserialized, never at read time.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DefinitionError;

/// Generate a short prefixed identifier such as `a_1f3c9e2b`.
pub fn short_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", &hex[..8])
}

/// A single-correct-option multiple choice question.
///
/// Fields are private so that `correct` is always a valid index into
/// `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct: usize,
}

/// Wire shape of a question before validation. `correct` defaults to 0.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    text: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct: usize,
}

impl TryFrom<RawQuestion> for Question {
    type Error = DefinitionError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        Question::new(raw.text, raw.options, raw.correct)
    }
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct: usize,
    ) -> Result<Self, DefinitionError> {
        let text = text.into();
        if options.is_empty() {
            return Err(DefinitionError::NoOptions { text });
        }
        if correct >= options.len() {
            return Err(DefinitionError::CorrectOutOfRange {
                text,
                correct,
                option_count: options.len(),
            });
        }
        Ok(Self {
            text,
            options,
            correct,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Zero-based index of the correct option.
    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct
    }
}

/// An assessment: a titled, ordered sequence of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AssessmentDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            questions,
            created_at: None,
        }
    }

    /// Create an empty assessment with a generated `a_` identifier.
    pub fn draft(title: &str) -> Result<Self, DefinitionError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DefinitionError::EmptyTitle);
        }
        Ok(Self {
            id: short_id("a_"),
            title: title.to_string(),
            questions: Vec::new(),
            created_at: Some(Utc::now()),
        })
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Student => write!(f, "student"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A user as seen by the engine. Credentials live with the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// The identity an attempt is taken under, passed explicitly into the
/// runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub id: String,
    pub name: String,
}

impl From<&User> for UserContext {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
        }
    }
}

/// A finished attempt. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub id: Uuid,
    pub assessment_id: String,
    pub assessment_title: String,
    pub user_id: String,
    pub user_name: String,
    /// Percentage score, 0..=100.
    pub score: u8,
    pub taken_at: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn new(definition: &AssessmentDefinition, user: &UserContext, score: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            assessment_id: definition.id.clone(),
            assessment_title: definition.title.clone(),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            score: score.min(100),
            taken_at: Utc::now(),
        }
    }
}

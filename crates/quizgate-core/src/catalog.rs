//! Assessment catalog adapter: definitions joined with attempt status.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{AssessmentDefinition, AttemptRecord, Role, User};
use crate::store::AttemptStore;
use crate::traits::AssessmentCatalog;

/// Completion badge for one (assessment, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptStatus {
    Completed,
    Pending,
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptStatus::Completed => write!(f, "Completed"),
            AttemptStatus::Pending => write!(f, "Pending"),
        }
    }
}

/// What the catalog view offers the user for an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryAction {
    Start,
    Review,
    Delete,
}

impl fmt::Display for EntryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryAction::Start => write!(f, "Start"),
            EntryAction::Review => write!(f, "Review"),
            EntryAction::Delete => write!(f, "Delete"),
        }
    }
}

/// One row of the catalog view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub assessment_id: String,
    pub title: String,
    pub question_count: usize,
    pub status: AttemptStatus,
    pub action: EntryAction,
    /// Score of the record that decided the badge.
    pub score: Option<u8>,
}

/// Read path over the catalog collaborator and the attempt store.
#[derive(Clone)]
pub struct CatalogAdapter {
    catalog: Arc<dyn AssessmentCatalog>,
    attempts: AttemptStore,
}

impl CatalogAdapter {
    pub fn new(catalog: Arc<dyn AssessmentCatalog>, attempts: AttemptStore) -> Self {
        Self { catalog, attempts }
    }

    pub fn list_assessments(&self) -> Result<Vec<AssessmentDefinition>> {
        self.catalog.list_assessments()
    }

    pub fn get(&self, assessment_id: &str) -> Result<Option<AssessmentDefinition>> {
        self.catalog.get_assessment(assessment_id)
    }

    /// `Completed` once any record exists for the pair, else `Pending`.
    pub fn attempt_status(&self, assessment_id: &str, user_id: &str) -> Result<AttemptStatus> {
        let found = self
            .attempts
            .find_by_assessment_and_user(assessment_id, user_id)?;
        Ok(status_of(found.as_ref()))
    }

    /// The catalog as `user` sees it.
    pub fn entries_for(&self, user: &User) -> Result<Vec<CatalogEntry>> {
        let attempts = self.attempts.all()?;
        let entries = self
            .catalog
            .list_assessments()?
            .into_iter()
            .map(|a| {
                let mine = attempts
                    .iter()
                    .find(|r| r.assessment_id == a.id && r.user_id == user.id);
                let status = status_of(mine);
                let action = match (user.role, status) {
                    (Role::Admin, _) => EntryAction::Delete,
                    (Role::Student, AttemptStatus::Completed) => EntryAction::Review,
                    (Role::Student, AttemptStatus::Pending) => EntryAction::Start,
                };
                CatalogEntry {
                    question_count: a.question_count(),
                    assessment_id: a.id,
                    title: a.title,
                    status,
                    action,
                    score: mine.map(|r| r.score),
                }
            })
            .collect();
        Ok(entries)
    }

    /// Create an empty assessment at the top of the catalog.
    pub fn create(&self, title: &str) -> Result<AssessmentDefinition> {
        let definition = AssessmentDefinition::draft(title)?;
        self.catalog.insert(definition.clone())?;
        tracing::info!(assessment = %definition.id, title = %definition.title, "assessment created");
        Ok(definition)
    }

    /// Remove an assessment. Attempt records that reference it are kept.
    pub fn remove(&self, assessment_id: &str) -> Result<bool> {
        let removed = self.catalog.remove(assessment_id)?;
        if removed {
            tracing::info!(assessment = %assessment_id, "assessment removed");
        }
        Ok(removed)
    }
}

fn status_of(record: Option<&AttemptRecord>) -> AttemptStatus {
    match record {
        Some(_) => AttemptStatus::Completed,
        None => AttemptStatus::Pending,
    }
}

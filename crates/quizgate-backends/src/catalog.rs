//! Assessment catalog over the assessments collection.

use std::sync::Arc;

use quizgate_core::error::Result;
use quizgate_core::model::AssessmentDefinition;
use quizgate_core::store::{load_typed, save_typed, ASSESSMENTS_KEY};
use quizgate_core::traits::{AssessmentCatalog, CollectionStore};

/// [`AssessmentCatalog`] that reads and rewrites one collection.
#[derive(Clone)]
pub struct StoredCatalog {
    collections: Arc<dyn CollectionStore>,
    key: String,
}

impl StoredCatalog {
    pub fn new(collections: Arc<dyn CollectionStore>) -> Self {
        Self {
            collections,
            key: ASSESSMENTS_KEY.to_string(),
        }
    }

    /// Add definitions whose id is not already present, keeping their order.
    pub fn seed(&self, definitions: impl IntoIterator<Item = AssessmentDefinition>) -> Result<usize> {
        let mut all = self.list_assessments()?;
        let mut added = 0;
        for definition in definitions {
            if all.iter().any(|d| d.id == definition.id) {
                tracing::debug!("assessment '{}' already present", definition.id);
                continue;
            }
            all.push(definition);
            added += 1;
        }
        save_typed(self.collections.as_ref(), &self.key, &all)?;
        Ok(added)
    }

    /// Find by id, falling back to a case-insensitive title match.
    pub fn resolve(&self, id_or_title: &str) -> Result<Option<AssessmentDefinition>> {
        let all = self.list_assessments()?;
        if let Some(found) = all.iter().find(|d| d.id == id_or_title) {
            return Ok(Some(found.clone()));
        }
        let needle = id_or_title.trim().to_lowercase();
        Ok(all.into_iter().find(|d| d.title.to_lowercase() == needle))
    }
}

impl AssessmentCatalog for StoredCatalog {
    fn get_assessment(&self, id: &str) -> Result<Option<AssessmentDefinition>> {
        Ok(self.list_assessments()?.into_iter().find(|d| d.id == id))
    }

    fn list_assessments(&self) -> Result<Vec<AssessmentDefinition>> {
        load_typed(self.collections.as_ref(), &self.key)
    }

    fn insert(&self, definition: AssessmentDefinition) -> Result<()> {
        let mut all = self.list_assessments()?;
        all.insert(0, definition);
        save_typed(self.collections.as_ref(), &self.key, &all)
    }

    fn remove(&self, id: &str) -> Result<bool> {
        let mut all = self.list_assessments()?;
        let before = all.len();
        all.retain(|d| d.id != id);
        if all.len() == before {
            return Ok(false);
        }
        save_typed(self.collections.as_ref(), &self.key, &all)?;
        Ok(true)
    }
}

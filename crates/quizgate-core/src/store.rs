//! Append-only attempt store built on a whole-collection `CollectionStore`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::model::AttemptRecord;
use crate::traits::CollectionStore;

/// Collection key for finished attempts.
pub const ATTEMPTS_KEY: &str = "lms_attempts_v4";
/// Collection key for assessment definitions.
pub const ASSESSMENTS_KEY: &str = "lms_assessments_v4";
/// Collection key for user accounts.
pub const USERS_KEY: &str = "lms_users_v4";

/// Load a collection and deserialize each item.
///
/// Items that do not match `T` are skipped with a warning so one bad entry
/// does not hide the rest of the collection.
pub fn load_typed<T: DeserializeOwned>(store: &dyn CollectionStore, key: &str) -> Result<Vec<T>> {
    let items = store.load_collection(key)?;
    let mut typed = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value(item) {
            Ok(value) => typed.push(value),
            Err(e) => tracing::warn!("skipping malformed item {i} in '{key}': {e}"),
        }
    }
    Ok(typed)
}

/// Serialize `items` and replace the collection under `key`.
pub fn save_typed<T: Serialize>(store: &dyn CollectionStore, key: &str, items: &[T]) -> Result<()> {
    let values = items
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    store.save_collection(key, &values)
}

/// Durable record of finished attempts, most recent first.
///
/// There is no update or delete. Uniqueness per (assessment, user) is not
/// enforced.
#[derive(Clone)]
pub struct AttemptStore {
    collections: Arc<dyn CollectionStore>,
    key: String,
}

impl AttemptStore {
    pub fn new(collections: Arc<dyn CollectionStore>) -> Self {
        Self {
            collections,
            key: ATTEMPTS_KEY.to_string(),
        }
    }

    /// Use a different collection key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Insert `record` at the front of the collection.
    pub fn append(&self, record: &AttemptRecord) -> Result<()> {
        // Work on raw values so entries this build cannot parse survive the rewrite.
        let mut items = self.collections.load_collection(&self.key)?;
        items.insert(0, serde_json::to_value(record)?);
        self.collections.save_collection(&self.key, &items)?;
        tracing::debug!(
            attempt = %record.id,
            assessment = %record.assessment_id,
            user = %record.user_id,
            "attempt appended"
        );
        Ok(())
    }

    /// Every record, in store order.
    pub fn all(&self) -> Result<Vec<AttemptRecord>> {
        load_typed(self.collections.as_ref(), &self.key)
    }

    /// The first record in store order for this pair.
    pub fn find_by_assessment_and_user(
        &self,
        assessment_id: &str,
        user_id: &str,
    ) -> Result<Option<AttemptRecord>> {
        Ok(self
            .all()?
            .into_iter()
            .find(|r| r.assessment_id == assessment_id && r.user_id == user_id))
    }

    /// Records taken by one user, in store order.
    pub fn for_user(&self, user_id: &str) -> Result<Vec<AttemptRecord>> {
        let mut records = self.all()?;
        records.retain(|r| r.user_id == user_id);
        Ok(records)
    }

    /// Number of readable records; agrees with `all().len()`.
    pub fn count(&self) -> Result<usize> {
        Ok(self.all()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::model::{AssessmentDefinition, UserContext};

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, Vec<serde_json::Value>>>);

    impl CollectionStore for MapStore {
        fn load_collection(&self, key: &str) -> Result<Vec<serde_json::Value>> {
            Ok(self.0.lock().unwrap().get(key).cloned().unwrap_or_default())
        }
        fn save_collection(&self, key: &str, items: &[serde_json::Value]) -> Result<()> {
            self.0.lock().unwrap().insert(key.to_string(), items.to_vec());
            Ok(())
        }
    }

    fn record(assessment: &str, user: &str, score: u8) -> AttemptRecord {
        let def = AssessmentDefinition::new(assessment, format!("{assessment} title"), vec![]);
        let ctx = UserContext {
            id: user.into(),
            name: format!("{user} name"),
        };
        AttemptRecord::new(&def, &ctx, score)
    }

    #[test]
    fn append_is_most_recent_first() {
        let store = AttemptStore::new(Arc::new(MapStore::default()));
        store.append(&record("a1", "u1", 10)).unwrap();
        store.append(&record("a2", "u1", 20)).unwrap();

        let all = store.all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].assessment_id, "a2");
        assert_eq!(all[1].assessment_id, "a1");
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn find_returns_first_in_store_order() {
        let store = AttemptStore::new(Arc::new(MapStore::default()));
        store.append(&record("a1", "u1", 100)).unwrap();
        store.append(&record("a1", "u1", 0)).unwrap();

        let found = store.find_by_assessment_and_user("a1", "u1").unwrap().unwrap();
        assert_eq!(found.score, 0);
        assert!(store.find_by_assessment_and_user("a1", "u2").unwrap().is_none());
    }

    #[test]
    fn for_user_filters() {
        let store = AttemptStore::new(Arc::new(MapStore::default()));
        store.append(&record("a1", "u1", 50)).unwrap();
        store.append(&record("a1", "u2", 60)).unwrap();
        store.append(&record("a2", "u1", 70)).unwrap();

        let mine = store.for_user("u1").unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|r| r.user_id == "u1"));
    }

    #[test]
    fn malformed_entries_are_skipped_but_kept() {
        let backing = Arc::new(MapStore::default());
        backing
            .save_collection(ATTEMPTS_KEY, &[serde_json::json!({"bogus": true})])
            .unwrap();
        let store = AttemptStore::new(backing.clone());

        store.append(&record("a1", "u1", 100)).unwrap();
        assert_eq!(store.all().unwrap().len(), 1);
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(backing.load_collection(ATTEMPTS_KEY).unwrap().len(), 2);
    }

    #[test]
    fn custom_key_isolates_collections() {
        let backing = Arc::new(MapStore::default());
        let main = AttemptStore::new(backing.clone());
        let practice = AttemptStore::new(backing).with_key("practice_attempts");

        practice.append(&record("a1", "u1", 100)).unwrap();
        assert_eq!(main.count().unwrap(), 0);
        assert_eq!(practice.count().unwrap(), 1);
    }
}

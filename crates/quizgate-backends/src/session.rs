//! Wiring of the in-memory backends into a ready-to-use flow.

use std::sync::Arc;

use anyhow::{Context, Result};

use quizgate_core::engine::ProctoredFlow;
use quizgate_core::parser::load_assessments;
use quizgate_core::proctor::ProctorGate;
use quizgate_core::store::AttemptStore;
use quizgate_core::traits::Notifier;

use crate::camera::ScriptedCamera;
use crate::catalog::StoredCatalog;
use crate::config::QuizgateConfig;
use crate::directory::StoredDirectory;
use crate::memory::MemoryCollectionStore;
use crate::preview::RecordingPreview;

/// What [`SessionEnv::seed`] added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub assessments: usize,
}

/// Every collaborator of one session, sharing a single collection store.
pub struct SessionEnv {
    pub store: Arc<MemoryCollectionStore>,
    pub directory: Arc<StoredDirectory>,
    pub catalog: Arc<StoredCatalog>,
    pub camera: Arc<ScriptedCamera>,
    pub preview: Arc<RecordingPreview>,
    pub notifier: Arc<dyn Notifier>,
    pub config: QuizgateConfig,
}

impl SessionEnv {
    /// Build empty backends for `config`. Call [`SessionEnv::seed`] to load
    /// the configured users and assessments.
    pub fn new(config: QuizgateConfig, notifier: Arc<dyn Notifier>) -> Self {
        let store = Arc::new(MemoryCollectionStore::new());
        Self {
            directory: Arc::new(StoredDirectory::new(store.clone())),
            catalog: Arc::new(StoredCatalog::new(store.clone())),
            camera: Arc::new(ScriptedCamera::new(config.camera)),
            preview: Arc::new(RecordingPreview::new()),
            store,
            notifier,
            config,
        }
    }

    /// Build and seed in one step.
    pub fn from_config(config: QuizgateConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let env = Self::new(config, notifier);
        env.seed()?;
        Ok(env)
    }

    /// Insert the configured accounts and assessments, then any assessment
    /// files listed in `assessment_paths`.
    pub fn seed(&self) -> Result<SeedReport> {
        let users = self
            .directory
            .seed(self.config.accounts())
            .context("failed to seed users")?;

        let mut definitions = self.config.assessments.clone();
        for path in &self.config.assessment_paths {
            definitions.extend(load_assessments(path)?);
        }
        let assessments = self
            .catalog
            .seed(definitions)
            .context("failed to seed assessments")?;

        tracing::info!("seeded {users} users and {assessments} assessments");
        Ok(SeedReport { users, assessments })
    }

    pub fn attempts(&self) -> AttemptStore {
        AttemptStore::new(self.store.clone())
    }

    /// A proctored flow over these backends.
    pub fn flow(&self) -> ProctoredFlow {
        let gate = ProctorGate::new(self.camera.clone(), self.preview.clone());
        ProctoredFlow::new(
            self.directory.clone(),
            self.catalog.clone(),
            gate,
            self.attempts(),
            Arc::clone(&self.notifier),
            self.config.flow_config(),
        )
    }
}

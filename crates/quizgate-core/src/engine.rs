//! Proctored flow orchestrator.
//!
//! Resolves the user and the assessment, passes the proctor gate, then hands
//! out an [`ActiveAttempt`] that drives the runner and releases the camera
//! when the attempt finishes or is abandoned. Every failure is turned into a
//! notification at this boundary before it is returned.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::CatalogAdapter;
use crate::error::{AssessmentError, Missing, Result};
use crate::model::{AttemptRecord, UserContext};
use crate::proctor::{ProctorGate, ProctorSession, DEFAULT_PERMISSION_TIMEOUT};
use crate::runner::{AssessmentRunner, Progress, QuestionView, RunnerState, Step};
use crate::scoring::{passed, ScoringMode, DEFAULT_PASS_THRESHOLD};
use crate::store::AttemptStore;
use crate::traits::{AssessmentCatalog, Notifier, Severity, UserDirectory};

pub const MSG_NOT_SIGNED_IN: &str = "Log in to take an assessment";
pub const MSG_NOT_FOUND: &str = "Assessment not found";
pub const MSG_CAMERA_REQUIRED: &str = "Camera permission required to start assessment";
pub const MSG_SAVE_FAILED: &str = "Could not save attempt";
pub const MSG_ABORTED: &str = "Assessment closed, no attempt recorded";

/// Configuration for the flow.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// How revisited questions are scored.
    pub scoring_mode: ScoringMode,
    /// Scores at or above this are announced as a success.
    pub pass_threshold: u8,
    /// How long to wait for the camera permission prompt.
    pub permission_timeout: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            scoring_mode: ScoringMode::default(),
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            permission_timeout: DEFAULT_PERMISSION_TIMEOUT,
        }
    }
}

/// The collaborators a flow needs.
pub struct ProctoredFlow {
    directory: Arc<dyn UserDirectory>,
    catalog: Arc<dyn AssessmentCatalog>,
    gate: ProctorGate,
    attempts: AttemptStore,
    notifier: Arc<dyn Notifier>,
    config: FlowConfig,
}

impl ProctoredFlow {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        catalog: Arc<dyn AssessmentCatalog>,
        gate: ProctorGate,
        attempts: AttemptStore,
        notifier: Arc<dyn Notifier>,
        config: FlowConfig,
    ) -> Self {
        let gate = gate.with_permission_timeout(config.permission_timeout);
        Self {
            directory,
            catalog,
            gate,
            attempts,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn attempts(&self) -> &AttemptStore {
        &self.attempts
    }

    /// The catalog view over the same stores this flow writes to.
    pub fn catalog(&self) -> CatalogAdapter {
        CatalogAdapter::new(Arc::clone(&self.catalog), self.attempts.clone())
    }

    /// Start a proctored attempt.
    ///
    /// Nothing is acquired until the user and the assessment are resolved.
    /// The runner is only built once the camera has been granted.
    pub async fn start(&self, assessment_id: &str) -> Result<ActiveAttempt> {
        let Some(user) = self.directory.current_user() else {
            return Err(self.fail(AssessmentError::NotFound(Missing::User), MSG_NOT_SIGNED_IN));
        };

        let definition = match self.catalog.get_assessment(assessment_id) {
            Ok(Some(definition)) => definition,
            Ok(None) => {
                let err = AssessmentError::NotFound(Missing::Assessment(assessment_id.to_string()));
                return Err(self.fail(err, MSG_NOT_FOUND));
            }
            Err(e) => return Err(self.fail(e, MSG_NOT_FOUND)),
        };

        let session = match self.gate.begin().await {
            Ok(session) => session,
            Err(e) => return Err(self.fail(e, MSG_CAMERA_REQUIRED)),
        };

        let runner = match AssessmentRunner::new(
            Arc::new(definition),
            UserContext::from(&user),
            self.attempts.clone(),
            self.config.scoring_mode,
        ) {
            Ok(runner) => runner,
            // `session` is dropped here, which releases the camera.
            Err(e) => return Err(self.fail(e, MSG_SAVE_FAILED)),
        };

        let mut attempt = ActiveAttempt {
            runner,
            session,
            notifier: Arc::clone(&self.notifier),
            pass_threshold: self.config.pass_threshold,
            aborted: false,
        };
        if let Some(record) = attempt.runner.record().cloned() {
            attempt.complete(&record);
        }
        Ok(attempt)
    }

    fn fail(&self, err: AssessmentError, message: &str) -> AssessmentError {
        tracing::warn!("cannot start assessment: {err}");
        self.notifier.notify(message, Severity::Danger);
        err
    }
}

/// Outcome of [`ActiveAttempt::drive`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DriveOutcome {
    /// The record, if the script reached the end of the assessment.
    pub record: Option<AttemptRecord>,
    /// Steps rejected as validation errors (and skipped).
    pub rejected: usize,
    /// Whether the script closed the attempt.
    pub aborted: bool,
}

/// An attempt in progress: the runner plus the camera session it holds.
pub struct ActiveAttempt {
    runner: AssessmentRunner,
    session: ProctorSession,
    notifier: Arc<dyn Notifier>,
    pass_threshold: u8,
    aborted: bool,
}

impl ActiveAttempt {
    pub fn state(&self) -> RunnerState {
        self.runner.state()
    }

    pub fn view(&self) -> Option<QuestionView<'_>> {
        self.runner.view()
    }

    pub fn is_finished(&self) -> bool {
        self.runner.is_finished()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Whether the camera is still held.
    pub fn is_proctored(&self) -> bool {
        self.session.is_active()
    }

    pub fn record(&self) -> Option<&AttemptRecord> {
        self.runner.record()
    }

    pub fn runner(&self) -> &AssessmentRunner {
        &self.runner
    }

    pub fn select_option(&mut self, option: usize) -> Result<()> {
        self.ensure_open()?;
        self.runner
            .select_option(option)
            .map_err(|e| self.prompt(e))
    }

    pub fn next(&mut self) -> Result<Progress> {
        self.ensure_open()?;
        match self.runner.next() {
            Ok(Progress::Finished(record)) => {
                self.complete(&record);
                Ok(Progress::Finished(record))
            }
            Ok(progress) => Ok(progress),
            Err(e @ AssessmentError::Storage(_)) => {
                self.notifier.notify(MSG_SAVE_FAILED, Severity::Danger);
                Err(e)
            }
            Err(e) => Err(self.prompt(e)),
        }
    }

    pub fn prev(&mut self) -> Result<RunnerState> {
        self.ensure_open()?;
        self.runner.prev()
    }

    /// Close the attempt without recording it. Returns `false` if it had
    /// already finished or been closed.
    pub fn abort(&mut self) -> bool {
        if self.runner.is_finished() || self.aborted {
            return false;
        }
        self.aborted = true;
        self.session.end();
        tracing::info!(
            assessment = %self.runner.definition().id,
            user = %self.runner.user().id,
            "attempt aborted"
        );
        self.notifier.notify(MSG_ABORTED, Severity::Warning);
        true
    }

    pub fn apply(&mut self, step: Step) -> Result<Option<Progress>> {
        match step {
            Step::Select(option) => self.select_option(option).map(|_| None),
            Step::Next => self.next().map(Some),
            Step::Prev => self.prev().map(|_| None),
            Step::Abort => {
                self.abort();
                Ok(None)
            }
        }
    }

    /// Apply a script of steps. Validation rejections are counted and
    /// skipped; any other error stops the script. Steps left over once the
    /// attempt has finished are ignored.
    pub fn drive(&mut self, steps: &[Step]) -> Result<DriveOutcome> {
        let mut outcome = DriveOutcome::default();
        for &step in steps {
            if self.runner.is_finished() {
                break;
            }
            match self.apply(step) {
                Ok(Some(Progress::Finished(record))) => outcome.record = Some(record),
                Ok(_) => {}
                Err(e) if e.is_recoverable() => outcome.rejected += 1,
                Err(e) => return Err(e),
            }
            if self.aborted {
                outcome.aborted = true;
                break;
            }
        }
        Ok(outcome)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.aborted {
            return Err(AssessmentError::AlreadyFinished);
        }
        Ok(())
    }

    /// Surface a recoverable error as an inline prompt.
    fn prompt(&self, err: AssessmentError) -> AssessmentError {
        if err.is_recoverable() {
            self.notifier.notify(&err.to_string(), Severity::Warning);
        }
        err
    }

    fn complete(&mut self, record: &AttemptRecord) {
        self.session.end();
        let severity = if passed(record.score, self.pass_threshold) {
            Severity::Success
        } else {
            Severity::Danger
        };
        self.notifier
            .notify(&format!("Finished — Score: {}%", record.score), severity);
    }
}

impl std::fmt::Debug for ActiveAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveAttempt")
            .field("assessment", &self.runner.definition().id)
            .field("state", &self.runner.state())
            .field("aborted", &self.aborted)
            .field("proctored", &self.is_proctored())
            .finish()
    }
}

impl Drop for ActiveAttempt {
    fn drop(&mut self) {
        if !self.runner.is_finished() && !self.aborted {
            tracing::debug!(
                assessment = %self.runner.definition().id,
                "attempt dropped before finishing"
            );
            self.abort();
        }
    }
}

//! Assessment runner: the question-by-question state machine.
//!
//! States are `AwaitingAnswer(i)` for `i` in `0..N` and `Finished`. The
//! runner owns its definition snapshot and the explicit user context, and
//! writes exactly one [`AttemptRecord`] to the [`AttemptStore`] when it
//! reaches `Finished`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{AssessmentError, Result, ValidationIssue};
use crate::model::{AssessmentDefinition, AttemptRecord, Question, UserContext};
use crate::scoring::{percentage, ScoringMode};
use crate::store::AttemptStore;

/// Position of the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    AwaitingAnswer(usize),
    Finished,
}

/// Result of an accepted `next`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Moved on to the question at this index.
    Advanced(usize),
    /// The last question was answered and the record persisted.
    Finished(AttemptRecord),
}

/// One scripted user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Select(usize),
    Next,
    Prev,
    Abort,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Select(i) => write!(f, "select:{i}"),
            Step::Next => write!(f, "next"),
            Step::Prev => write!(f, "prev"),
            Step::Abort => write!(f, "abort"),
        }
    }
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "next" | "n" => return Ok(Step::Next),
            "prev" | "p" | "back" => return Ok(Step::Prev),
            "abort" | "close" => return Ok(Step::Abort),
            _ => {}
        }
        let index = s.strip_prefix("select:").unwrap_or(&s);
        index
            .parse::<usize>()
            .map(Step::Select)
            .map_err(|_| format!("unknown step: {s}"))
    }
}

/// Parse a comma-separated script such as `"select:1,next,prev"`.
pub fn parse_steps(script: &str) -> std::result::Result<Vec<Step>, String> {
    script
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// What a presentation layer needs to render the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView<'a> {
    pub index: usize,
    pub total: usize,
    pub text: &'a str,
    pub options: &'a [String],
    pub selected: Option<usize>,
    pub prev_enabled: bool,
}

impl QuestionView<'_> {
    /// "Question 2 of 5".
    pub fn progress_label(&self) -> String {
        format!("Question {} of {}", self.index + 1, self.total)
    }
}

/// Runs one attempt of one assessment for one user.
pub struct AssessmentRunner {
    definition: Arc<AssessmentDefinition>,
    user: UserContext,
    store: AttemptStore,
    mode: ScoringMode,
    state: RunnerState,
    selected: Option<usize>,
    /// Monotonic counter bumped on every correct forward transition.
    correct_count: u32,
    /// Verdict of the latest forward pass per question slot.
    verdicts: Vec<Option<bool>>,
    record: Option<AttemptRecord>,
}

impl AssessmentRunner {
    /// Build a runner. An assessment with no questions finishes (and is
    /// persisted with a score of 0) immediately.
    pub fn new(
        definition: Arc<AssessmentDefinition>,
        user: UserContext,
        store: AttemptStore,
        mode: ScoringMode,
    ) -> Result<Self> {
        let verdicts = vec![None; definition.question_count()];
        let mut runner = Self {
            definition,
            user,
            store,
            mode,
            state: RunnerState::AwaitingAnswer(0),
            selected: None,
            correct_count: 0,
            verdicts,
            record: None,
        };
        tracing::info!(
            assessment = %runner.definition.id,
            user = %runner.user.id,
            questions = runner.definition.question_count(),
            %mode,
            "attempt started"
        );
        if runner.definition.questions.is_empty() {
            let record = runner.build_record(0);
            runner.commit_finish(record)?;
        }
        Ok(runner)
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == RunnerState::Finished
    }

    pub fn definition(&self) -> &AssessmentDefinition {
        &self.definition
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    pub fn scoring_mode(&self) -> ScoringMode {
        self.mode
    }

    /// Correct forward transitions so far (the cumulative accumulator).
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The persisted record, once finished.
    pub fn record(&self) -> Option<&AttemptRecord> {
        self.record.as_ref()
    }

    /// The current question, or `None` when finished.
    pub fn view(&self) -> Option<QuestionView<'_>> {
        let RunnerState::AwaitingAnswer(index) = self.state else {
            return None;
        };
        let question = &self.definition.questions[index];
        Some(QuestionView {
            index,
            total: self.definition.question_count(),
            text: question.text(),
            options: question.options(),
            selected: self.selected,
            prev_enabled: index > 0,
        })
    }

    /// Select an option of the current question, replacing any earlier
    /// selection.
    pub fn select_option(&mut self, option: usize) -> Result<()> {
        let question = self.current_question()?;
        let option_count = question.options().len();
        if option >= option_count {
            return Err(AssessmentError::ValidationRejected(
                ValidationIssue::OptionOutOfRange {
                    index: option,
                    option_count,
                },
            ));
        }
        self.selected = Some(option);
        Ok(())
    }

    /// Score the current selection and advance.
    ///
    /// Rejected without any state change when nothing is selected, or when
    /// persisting the final record fails.
    pub fn next(&mut self) -> Result<Progress> {
        let RunnerState::AwaitingAnswer(index) = self.state else {
            return Err(AssessmentError::AlreadyFinished);
        };
        let Some(selected) = self.selected else {
            return Err(AssessmentError::ValidationRejected(
                ValidationIssue::NoSelection,
            ));
        };
        let hit = self.definition.questions[index].is_correct(selected);
        let next_index = index + 1;

        if next_index == self.definition.question_count() {
            let points = self.points_with(index, hit);
            let record = self.build_record(points);
            self.commit_finish(record.clone())?;
            self.record_verdict(index, hit);
            return Ok(Progress::Finished(record));
        }

        self.record_verdict(index, hit);
        self.selected = None;
        self.state = RunnerState::AwaitingAnswer(next_index);
        tracing::debug!(from = index, to = next_index, hit, "advanced");
        Ok(Progress::Advanced(next_index))
    }

    /// Step back one question. A no-op on the first question. Never touches
    /// the score.
    pub fn prev(&mut self) -> Result<RunnerState> {
        let RunnerState::AwaitingAnswer(index) = self.state else {
            return Err(AssessmentError::AlreadyFinished);
        };
        if index > 0 {
            self.selected = None;
            self.state = RunnerState::AwaitingAnswer(index - 1);
            tracing::debug!(from = index, to = index - 1, "went back");
        }
        Ok(self.state)
    }

    fn current_question(&self) -> Result<&Question> {
        match self.state {
            RunnerState::AwaitingAnswer(index) => Ok(&self.definition.questions[index]),
            RunnerState::Finished => Err(AssessmentError::AlreadyFinished),
        }
    }

    fn record_verdict(&mut self, index: usize, hit: bool) {
        if hit {
            self.correct_count += 1;
        }
        self.verdicts[index] = Some(hit);
    }

    /// Points the attempt would earn if `index` were answered with `hit`.
    fn points_with(&self, index: usize, hit: bool) -> u32 {
        match self.mode {
            ScoringMode::Cumulative => self.correct_count + u32::from(hit),
            ScoringMode::LastAnswer => {
                let others = self
                    .verdicts
                    .iter()
                    .enumerate()
                    .filter(|(i, v)| *i != index && **v == Some(true))
                    .count() as u32;
                others + u32::from(hit)
            }
        }
    }

    fn build_record(&self, points: u32) -> AttemptRecord {
        let score = percentage(points, self.definition.question_count());
        AttemptRecord::new(&self.definition, &self.user, score)
    }

    fn commit_finish(&mut self, record: AttemptRecord) -> Result<()> {
        self.store.append(&record)?;
        tracing::info!(
            attempt = %record.id,
            assessment = %record.assessment_id,
            user = %record.user_id,
            score = record.score,
            "attempt finished"
        );
        self.state = RunnerState::Finished;
        self.selected = None;
        self.record = Some(record);
        Ok(())
    }
}

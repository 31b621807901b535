pub mod certificate;
pub mod export_users;
pub mod init;
pub mod list;
pub mod take;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use quizgate_backends::config::load_config_from;
use quizgate_backends::{ConsoleNotifier, QuizgateConfig, SessionEnv};

/// Load config, add an optional assessment path, and seed fresh backends.
pub(crate) fn open_session(
    config_path: Option<&Path>,
    extra_assessments: Option<PathBuf>,
    tweak: impl FnOnce(&mut QuizgateConfig) -> Result<()>,
) -> Result<SessionEnv> {
    let mut config = load_config_from(config_path)?;
    if let Some(path) = extra_assessments {
        config.assessment_paths.push(path);
    }
    tweak(&mut config)?;
    SessionEnv::from_config(config, Arc::new(ConsoleNotifier::new()))
}

//! Configuration loading and seed data.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizgate_core::engine::FlowConfig;
use quizgate_core::model::{AssessmentDefinition, Question, Role};
use quizgate_core::scoring::{ScoringMode, DEFAULT_PASS_THRESHOLD};

use crate::camera::CameraBehavior;
use crate::directory::Account;

/// A user account to create on startup.
///
/// Note: Custom Debug impl masks the password to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct SeedUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl std::fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .field("role", &self.role)
            .field("active", &self.active)
            .finish()
    }
}

impl SeedUser {
    pub fn to_account(&self) -> Account {
        let mut account = Account::new(&self.name, &self.email, &self.password, self.role);
        account.user.active = self.active;
        account
    }
}

fn default_role() -> Role {
    Role::Student
}
fn default_true() -> bool {
    true
}

/// Top-level quizgate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizgateConfig {
    /// How answers given after going back are scored.
    #[serde(default)]
    pub scoring_mode: ScoringMode,
    /// Pass mark in percent.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u8,
    /// How long to wait for the camera permission prompt.
    #[serde(default = "default_permission_timeout_ms")]
    pub permission_timeout_ms: u64,
    /// How the built-in camera answers permission requests.
    #[serde(default)]
    pub camera: CameraBehavior,
    /// Accounts created on startup.
    #[serde(default = "default_users")]
    pub users: Vec<SeedUser>,
    /// Assessments created on startup.
    #[serde(default = "default_assessments")]
    pub assessments: Vec<AssessmentDefinition>,
    /// Extra assessment files or directories to load.
    #[serde(default)]
    pub assessment_paths: Vec<PathBuf>,
}

fn default_pass_threshold() -> u8 {
    DEFAULT_PASS_THRESHOLD
}
fn default_permission_timeout_ms() -> u64 {
    30_000
}

fn default_users() -> Vec<SeedUser> {
    vec![
        SeedUser {
            name: "Administrator".into(),
            email: "admin@lms.com".into(),
            password: "admin".into(),
            role: Role::Admin,
            active: true,
        },
        SeedUser {
            name: "Student One".into(),
            email: "student@lms.com".into(),
            password: "student".into(),
            role: Role::Student,
            active: true,
        },
    ]
}

/// The demo quiz every fresh install starts with.
pub fn ux_basics_quiz() -> AssessmentDefinition {
    let questions = Question::new("2+2=?", vec!["3".into(), "4".into(), "5".into()], 1)
        .into_iter()
        .collect();
    AssessmentDefinition::new("a_uxbasics", "UX Basics Quiz", questions)
}

fn default_assessments() -> Vec<AssessmentDefinition> {
    vec![ux_basics_quiz()]
}

impl Default for QuizgateConfig {
    fn default() -> Self {
        Self {
            scoring_mode: ScoringMode::default(),
            pass_threshold: default_pass_threshold(),
            permission_timeout_ms: default_permission_timeout_ms(),
            camera: CameraBehavior::default(),
            users: default_users(),
            assessments: default_assessments(),
            assessment_paths: Vec::new(),
        }
    }
}

impl QuizgateConfig {
    /// Engine settings derived from this config.
    pub fn flow_config(&self) -> FlowConfig {
        FlowConfig {
            scoring_mode: self.scoring_mode,
            pass_threshold: self.pass_threshold.min(100),
            permission_timeout: Duration::from_millis(self.permission_timeout_ms),
        }
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.users.iter().map(SeedUser::to_account).collect()
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_seed_user(user: &SeedUser) -> SeedUser {
    SeedUser {
        name: resolve_env_vars(&user.name),
        email: resolve_env_vars(&user.email),
        password: resolve_env_vars(&user.password),
        role: user.role,
        active: user.active,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizgate.toml` in the current directory
/// 2. `~/.config/quizgate/config.toml`
///
/// Environment variable override: `QUIZGATE_SCORING_MODE`.
pub fn load_config() -> Result<QuizgateConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizgateConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizgate.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizgateConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizgateConfig::default(),
    };

    // Apply env var overrides
    if let Ok(mode) = std::env::var("QUIZGATE_SCORING_MODE") {
        config.scoring_mode = mode
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("invalid QUIZGATE_SCORING_MODE")?;
    }

    config.users = config.users.iter().map(resolve_seed_user).collect();

    if config.pass_threshold > 100 {
        anyhow::bail!(
            "pass_threshold must be between 0 and 100, got {}",
            config.pass_threshold
        );
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizgate"))
}

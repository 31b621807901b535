//! In-memory collaborators and configuration for quizgate.
//!
//! Everything here lives for one process, the same way browser tab storage
//! lives for one tab.

pub mod camera;
pub mod catalog;
pub mod config;
pub mod directory;
pub mod error;
pub mod memory;
pub mod notify;
pub mod preview;
pub mod session;

pub use camera::{CameraBehavior, ScriptedCamera};
pub use catalog::StoredCatalog;
pub use config::{load_config, load_config_from, QuizgateConfig};
pub use directory::{Account, StoredDirectory};
pub use error::DirectoryError;
pub use memory::MemoryCollectionStore;
pub use notify::{ConsoleNotifier, RecordingNotifier};
pub use preview::RecordingPreview;
pub use session::{SeedReport, SessionEnv};

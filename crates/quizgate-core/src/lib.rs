//! quizgate-core — Proctored assessment engine.
//!
//! This crate defines the data model, the collaborator traits, and the
//! assessment-taking engine: the proctor gate, the question-by-question
//! runner, scoring, and the attempt store.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod proctor;
pub mod report;
pub mod runner;
pub mod scoring;
pub mod store;
pub mod traits;

pub use error::{AssessmentError, Result};

//! # Pakar Core
//!
//! Core business logic for the pakar printer-diagnosis expert system.
//!
//! This crate contains pure knowledge and matching operations:
//! - Knowledge-base loading, validation and read-only lookups (`knowledge`)
//! - Forward-chaining subset matching over the rule catalog (`inference`)
//! - Catalog path resolution and shared constants (`config`, `constants`)
//!
//! **No presentation concerns**: question flow, terminal prompts or HTTP
//! interfaces belong in `pakar-cli` and the `pakar-run` service binary.

pub mod config;
pub mod constants;
pub mod error;
pub mod inference;
pub mod knowledge;

pub use error::{KnowledgeError, KnowledgeResult};
pub use inference::{InferenceEngine, Match, PartialMatch};
pub use knowledge::{DanglingCondition, KnowledgeBase, KnowledgeDocument, Rule, Symptom};

// Re-exported so downstream crates need not depend on pakar-types directly.
pub use pakar_types::{Code, CodeError};

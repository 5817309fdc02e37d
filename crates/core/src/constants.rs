//! Constants used throughout the pakar core crate.
//!
//! This module contains all path and filename constants to ensure
//! consistency across the codebase and make maintenance easier.

/// Directory name for reference data shipped with a deployment.
pub const DATA_DIR_NAME: &str = "data";

/// Filename for the persisted knowledge base document.
pub const KNOWLEDGE_BASE_FILENAME: &str = "knowledge_base.json";

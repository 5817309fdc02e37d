//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour between deployments and
//! test harnesses.

use crate::constants::{DATA_DIR_NAME, KNOWLEDGE_BASE_FILENAME};
use crate::error::{KnowledgeError, KnowledgeResult};
use std::path::{Path, PathBuf};

/// Resolve the knowledge-base document path without reading environment variables.
///
/// If `override_path` is provided it is returned unchanged; an explicit path is the
/// caller's choice, and [`KnowledgeBase::load`](crate::KnowledgeBase::load) reports a
/// missing file. Otherwise this searches for `data/knowledge_base.json` relative to the
/// current working directory and then walks up from `CARGO_MANIFEST_DIR`.
pub fn resolve_knowledge_base_path(override_path: Option<PathBuf>) -> KnowledgeResult<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path);
    }

    let cwd_relative = Path::new(DATA_DIR_NAME).join(KNOWLEDGE_BASE_FILENAME);
    if cwd_relative.is_file() {
        return Ok(cwd_relative);
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(DATA_DIR_NAME).join(KNOWLEDGE_BASE_FILENAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(KnowledgeError::InvalidInput(
        "could not locate data/knowledge_base.json".into(),
    ))
}

use pakar_types::Code;

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("knowledge base not found: {}", .path.display())]
    NotFound { path: std::path::PathBuf },
    #[error("failed to read knowledge base: {0}")]
    Read(std::io::Error),
    #[error("failed to parse knowledge base: {0}")]
    Parse(serde_json::Error),
    #[error("duplicate symptom code in catalog: {code}")]
    DuplicateSymptomCode { code: Code },
    #[error("duplicate rule code in catalog: {code}")]
    DuplicateRuleCode { code: Code },
    #[error("rule {rule} has an empty condition list")]
    EmptyConditions { rule: Code },
}

pub type KnowledgeResult<T> = std::result::Result<T, KnowledgeError>;

use crate::section::SectionKey;

#[derive(Debug, thiserror::Error)]
pub enum BlueprintError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unknown section: {0}")]
    UnknownSection(String),
    #[error("unknown field '{field}' for section {section}")]
    UnknownField { section: SectionKey, field: String },
    #[error("section {0} is not being edited")]
    NotEditing(SectionKey),
    #[error("schema mismatch: {0}")]
    Schema(String),
    #[error("not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(String),
    #[error("collaborator responded with status {status}")]
    Status { status: u16 },
    #[error("failed to serialize request: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize response: {0}")]
    Deserialization(serde_json::Error),

    #[error("text error: {0}")]
    Text(#[from] blueprint_types::TextError),
}

pub type BlueprintResult<T> = std::result::Result<T, BlueprintError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Failed to read message source '{source_id}': {cause}")]
    Source { source_id: String, cause: String },

    #[error("JSON (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write output '{path}': {cause}")]
    Output { path: String, cause: String },
}

impl EtlError {
    pub fn source_failure(source_id: impl Into<String>, cause: impl ToString) -> Self {
        EtlError::Source {
            source_id: source_id.into(),
            cause: cause.to_string(),
        }
    }

    pub fn output_failure(path: impl Into<String>, cause: impl ToString) -> Self {
        EtlError::Output {
            path: path.into(),
            cause: cause.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

// src/infra/errors.rs — Error types for persona dispatch

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    // Configuration errors (caller retries with a valid value)
    #[error("Confidence threshold must be between 0.0 and 1.0 (got {value})")]
    InvalidThreshold { value: f64 },

    #[error("Feedback score must be between 1 and 5 (got {score})")]
    InvalidFeedback { score: u8 },

    // Catalog errors (fatal for the current call)
    #[error("No personas available for selection")]
    EmptyCatalog,

    #[error("Failed to retrieve personas: {0}")]
    Catalog(String),

    #[error("Persona '{id}' not found")]
    PersonaNotFound { id: String },

    #[error("Persona '{id}' already exists")]
    PersonaExists { id: String },

    #[error("Invalid persona: {0}")]
    InvalidPersona(String),

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DispatchError {
    /// Errors caused by bad caller input rather than by the catalog or infra.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidThreshold { .. }
                | DispatchError::InvalidFeedback { .. }
                | DispatchError::InvalidPersona(_)
                | DispatchError::PersonaExists { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;

// src/core/mod.rs — Task analysis, scoring and the selection controller

pub mod analytics;
pub mod analyzer;
pub mod classifier;
pub mod dispatcher;
pub mod scorer;
pub mod types;

pub use dispatcher::{AutoGenerationStatus, Dispatcher};
pub use types::{PersonaRecommendation, ScoredPersona, TaskCategory, TaskContext};

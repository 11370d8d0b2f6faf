// src/api/types.rs

use serde::{Deserialize, Serialize};

use crate::core::types::{TaskCategory, TaskContext};

/// Request body for persona selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectRequest {
    pub task_description: String,
    #[serde(default)]
    pub context: String,
    /// Project whose context biases the choice (configured default if absent).
    #[serde(default)]
    pub project: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub task_description: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub task_context: TaskContext,
    pub task_category: TaskCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub task_description: String,
    pub persona_id: String,
    /// 1 (poor) to 5 (excellent).
    pub score: u8,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementsRequest {
    pub task_description: String,
}

#[derive(Debug, Serialize)]
pub struct ImprovementsResponse {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoGenerationRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdRequest {
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteTaskRequest {
    pub task_description: String,
    pub result: String,
    pub persona_id: String,
    #[serde(default)]
    pub project: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompleteTaskResponse {
    pub context_updated: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PersonaQuery {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub project: Option<String>,
}

/// Context summary plus suggested priorities for one project.
#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub summary: Option<crate::context::ContextSummary>,
    pub priorities: Vec<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

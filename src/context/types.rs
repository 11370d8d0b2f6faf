// src/context/types.rs — Project context records and derived signals

use serde::{Deserialize, Serialize};

use crate::core::types::{TaskCategory, Urgency};

/// Snapshot of one project as served by the context service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectContext {
    pub name: String,
    pub current_goal: String,
    pub completed_features: Vec<String>,
    pub current_issues: Vec<String>,
    pub next_steps: Vec<String>,
    pub current_state: serde_json::Map<String, serde_json::Value>,
    pub key_files: Vec<String>,
    pub context_anchors: Vec<String>,
    pub conversation_history: Vec<serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// How a task relates to the active project. The default value is the
/// neutral answer used whenever no context is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextAnalysis {
    pub priority: Priority,
    pub domain: TaskCategory,
    pub urgency: Urgency,
    /// Sum of every relevance score that cleared its threshold. Not normalized.
    pub context_relevance: f64,
    pub recommended_personas: Vec<String>,
    pub context_insights: Vec<String>,
}

impl Default for ContextAnalysis {
    fn default() -> Self {
        Self {
            priority: Priority::Medium,
            domain: TaskCategory::General,
            urgency: Urgency::Normal,
            context_relevance: 0.0,
            recommended_personas: Vec::new(),
            context_insights: Vec::new(),
        }
    }
}

impl ContextAnalysis {
    pub fn recommends(&self, persona_id: &str) -> bool {
        self.recommended_personas.iter().any(|p| p == persona_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextProgress {
    pub features_completed: usize,
    pub issues_open: usize,
    pub steps_pending: usize,
    pub completion_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentFocus {
    pub primary_goal: String,
    pub active_issues: Vec<String>,
    pub next_priorities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSummary {
    pub project_name: String,
    pub current_goal: String,
    pub progress: ContextProgress,
    pub current_focus: CurrentFocus,
    pub last_updated: String,
}

impl From<&ProjectContext> for ContextSummary {
    fn from(ctx: &ProjectContext) -> Self {
        let done = ctx.completed_features.len();
        let pending = ctx.next_steps.len();
        Self {
            project_name: ctx.name.clone(),
            current_goal: ctx.current_goal.clone(),
            progress: ContextProgress {
                features_completed: done,
                issues_open: ctx.current_issues.len(),
                steps_pending: pending,
                completion_percentage: done as f64 / (done + pending).max(1) as f64 * 100.0,
            },
            current_focus: CurrentFocus {
                primary_goal: ctx.current_goal.clone(),
                active_issues: ctx.current_issues.clone(),
                next_priorities: ctx.next_steps.iter().take(3).cloned().collect(),
            },
            last_updated: ctx.updated_at.clone(),
        }
    }
}

/// Write operations understood by the context service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextUpdate {
    TaskComplete {
        task: String,
        result: String,
        persona_used: String,
        completion_type: String,
    },
    CompleteFeature {
        feature: String,
    },
    ResolveIssue {
        issue: String,
    },
    AddStep {
        step: String,
    },
    LogInteraction {
        timestamp: String,
        #[serde(rename = "type")]
        kind: String,
        task: String,
        result: String,
        persona_used: String,
    },
}

impl ContextUpdate {
    /// Path below `/project/{name}/`.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ContextUpdate::TaskComplete { .. } => "task/complete",
            ContextUpdate::CompleteFeature { .. } => "complete-feature",
            ContextUpdate::ResolveIssue { .. } => "resolve-issue",
            ContextUpdate::AddStep { .. } => "add-step",
            ContextUpdate::LogInteraction { .. } => "log-interaction",
        }
    }
}

// src/core/types.rs — Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::persona::types::Persona;

/// Closed set of task genres used as a scoring dimension and as the
/// generation-template key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Technical,
    Creative,
    Business,
    Educational,
    Design,
    Scientific,
    Consulting,
    Mentoring,
    General,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Technical => "technical",
            TaskCategory::Creative => "creative",
            TaskCategory::Business => "business",
            TaskCategory::Educational => "educational",
            TaskCategory::Design => "design",
            TaskCategory::Scientific => "scientific",
            TaskCategory::Consulting => "consulting",
            TaskCategory::Mentoring => "mentoring",
            TaskCategory::General => "general",
        }
    }

    pub fn all() -> &'static [TaskCategory] {
        &[
            TaskCategory::Technical,
            TaskCategory::Creative,
            TaskCategory::Business,
            TaskCategory::Educational,
            TaskCategory::Design,
            TaskCategory::Scientific,
            TaskCategory::Consulting,
            TaskCategory::Mentoring,
            TaskCategory::General,
        ]
    }

    /// Category for a legacy persona that was stored without one, derived from
    /// its display name. Only used when a record is created, never when scoring.
    pub fn infer_from_name(name: &str) -> Option<TaskCategory> {
        const NAME_TABLE: &[(&str, TaskCategory)] = &[
            ("tech expert", TaskCategory::Technical),
            ("creative writer", TaskCategory::Creative),
            ("business analyst", TaskCategory::Business),
            ("educator", TaskCategory::Educational),
            ("designer", TaskCategory::Design),
            ("scientist", TaskCategory::Scientific),
            ("consultant", TaskCategory::Consulting),
            ("mentor", TaskCategory::Mentoring),
        ];
        let lower = name.to_lowercase();
        NAME_TABLE
            .iter()
            .find(|(key, _)| lower.contains(key) || lower.contains(&key.replace(' ', "_")))
            .map(|(_, cat)| *cat)
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskCategory::all()
            .iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| format!("Unknown task category '{s}'"))
    }
}

/// Subject-matter domain derived by the task analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Technology,
    Business,
    Creative,
    Education,
    Science,
    Healthcare,
    Finance,
    Legal,
    #[default]
    General,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Technology => "technology",
            Domain::Business => "business",
            Domain::Creative => "creative",
            Domain::Education => "education",
            Domain::Science => "science",
            Domain::Healthcare => "healthcare",
            Domain::Finance => "finance",
            Domain::Legal => "legal",
            Domain::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Technical,
    Business,
    Expert,
    #[default]
    General,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Technical => "technical",
            Audience::Business => "business",
            Audience::Expert => "expert",
            Audience::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Code,
    Analysis,
    Creative,
    Documentation,
    #[default]
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Code => "code",
            OutputFormat::Analysis => "analysis",
            OutputFormat::Creative => "creative",
            OutputFormat::Documentation => "documentation",
            OutputFormat::Text => "text",
        }
    }
}

/// Structured view of one task, built fresh per call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContext {
    pub task_description: String,
    pub user_context: String,
    pub domain: Domain,
    pub complexity: Complexity,
    pub urgency: Urgency,
    pub audience: Audience,
    pub output_format: OutputFormat,
}

impl TaskContext {
    /// Lower-cased task + context text that every keyword matcher reads.
    pub fn full_text(&self) -> String {
        crate::util::combined_text(&self.task_description, &self.user_context)
    }
}

/// One catalog entry with its match score for the current task.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPersona {
    pub persona_id: String,
    pub persona: Persona,
    pub score: f64,
    pub reasoning: Vec<String>,
}

/// Result of a persona selection.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaRecommendation {
    pub persona_id: String,
    pub persona_data: Persona,
    /// Always within [0, 1].
    pub confidence_score: f64,
    pub reasoning: Vec<String>,
    /// At most three runners-up, best first.
    pub alternative_personas: Vec<Persona>,
    pub task_category: TaskCategory,
    /// Project-context insights for this task. They sit beside
    /// `persona_data`, not inside it; generation details (`auto_generated`,
    /// `generation_reason`) are fields of the persona itself. Omitted from
    /// JSON when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context_insights: Vec<String>,
}

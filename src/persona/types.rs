// src/persona/types.rs — Persona records

use serde::{Deserialize, Serialize};

use crate::core::types::TaskCategory;

/// A named bundle of expertise, communication style and usage context.
///
/// Records are owned by the storage collaborator; optional fields default so
/// catalogs written before a field existed still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub communication_style: String,
    /// Free-text hint on when to use this persona.
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub personality_traits: Vec<String>,
    /// Explicit category set at creation time. `None` scores as uncategorized.
    #[serde(default)]
    pub category: Option<TaskCategory>,
    #[serde(default)]
    pub auto_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_category: Option<TaskCategory>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Persona {
    /// Minimal persona; everything else empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            expertise: Vec::new(),
            communication_style: String::new(),
            context: String::new(),
            personality_traits: Vec::new(),
            category: None,
            auto_generated: false,
            generation_reason: None,
            original_task: None,
            task_category: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    pub fn with_expertise<I, S>(mut self, expertise: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expertise = expertise.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.communication_style = style.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.personality_traits = traits.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Case-insensitive substring match over name, description and expertise.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self.description.to_lowercase().contains(&q)
            || self.expertise.iter().any(|e| e.to_lowercase().contains(&q))
    }
}

/// Partial update applied by the persona manager. `None` leaves a field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub expertise: Option<Vec<String>>,
    pub communication_style: Option<String>,
    pub context: Option<String>,
    pub personality_traits: Option<Vec<String>>,
    pub category: Option<TaskCategory>,
}

impl PersonaUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.expertise.is_none()
            && self.communication_style.is_none()
            && self.context.is_none()
            && self.personality_traits.is_none()
            && self.category.is_none()
    }

    pub fn apply(self, persona: &mut Persona) {
        if let Some(v) = self.name {
            persona.name = v;
        }
        if let Some(v) = self.description {
            persona.description = v;
        }
        if let Some(v) = self.expertise {
            persona.expertise = v;
        }
        if let Some(v) = self.communication_style {
            persona.communication_style = v;
        }
        if let Some(v) = self.context {
            persona.context = v;
        }
        if let Some(v) = self.personality_traits {
            persona.personality_traits = v;
        }
        if let Some(v) = self.category {
            persona.category = Some(v);
        }
    }
}

/// Listing row for auto-generated personas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPersonaSummary {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub generation_reason: String,
    pub original_task: String,
    pub task_category: Option<TaskCategory>,
}

impl From<&Persona> for GeneratedPersonaSummary {
    fn from(p: &Persona) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            created_at: p.created_at.clone(),
            generation_reason: p.generation_reason.clone().unwrap_or_default(),
            original_task: p.original_task.clone().unwrap_or_default(),
            task_category: p.task_category,
        }
    }
}

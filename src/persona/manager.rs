// src/persona/manager.rs — Catalog CRUD on top of a PersonaStore

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use super::store::{PersonaMap, PersonaStore, StoreMetadata};
use super::types::{Persona, PersonaUpdate};
use crate::core::types::TaskCategory;
use crate::infra::errors::{DispatchError, Result};
use crate::util::{now_rfc3339, sanitize_id};

/// Aggregate counts over the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaStatistics {
    pub total_personas: usize,
    pub expertise_distribution: BTreeMap<String, usize>,
    pub communication_style_distribution: BTreeMap<String, usize>,
    pub metadata: StoreMetadata,
}

/// File format of `export` / `import`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportBundle {
    pub exported_at: String,
    pub total_personas: usize,
    pub personas: PersonaMap,
}

/// The four personas an empty catalog starts with.
pub fn default_personas() -> Vec<Persona> {
    vec![
        Persona::new(
            "tech_expert",
            "Tech Expert",
            "A knowledgeable software engineer with expertise in Python, AI, and system architecture",
        )
        .with_expertise(["Python", "Machine Learning", "Software Architecture", "API Design"])
        .with_style("Professional and technical")
        .with_context(
            "Use when discussing technical implementation details, code reviews, or system design",
        )
        .with_traits(["analytical", "detail-oriented", "problem-solver"])
        .with_category(TaskCategory::Technical),
        Persona::new(
            "creative_writer",
            "Creative Writer",
            "An imaginative storyteller with a flair for engaging narratives and creative content",
        )
        .with_expertise(["Creative Writing", "Storytelling", "Content Creation", "Marketing Copy"])
        .with_style("Engaging and imaginative")
        .with_context("Use when creating stories, marketing content, or creative writing projects")
        .with_traits(["creative", "imaginative", "expressive"])
        .with_category(TaskCategory::Creative),
        Persona::new(
            "business_analyst",
            "Business Analyst",
            "A strategic thinker focused on business processes, data analysis, and market insights",
        )
        .with_expertise(["Business Analysis", "Data Analysis", "Process Optimization", "Market Research"])
        .with_style("Strategic and analytical")
        .with_context("Use when analyzing business processes, market trends, or strategic planning")
        .with_traits(["strategic", "analytical", "business-focused"])
        .with_category(TaskCategory::Business),
        Persona::new(
            "educator",
            "Educator",
            "A patient teacher who excels at explaining complex concepts in simple terms",
        )
        .with_expertise(["Education", "Curriculum Design", "Instructional Design", "Learning Theory"])
        .with_style("Patient and explanatory")
        .with_context(
            "Use when teaching concepts, creating educational content, or explaining complex topics",
        )
        .with_traits(["patient", "explanatory", "encouraging"])
        .with_category(TaskCategory::Educational),
    ]
}

/// Structural checks applied before a record is written.
pub fn validate_persona(persona: &Persona) -> Result<()> {
    if persona.name.trim().is_empty() {
        return Err(DispatchError::InvalidPersona(
            "Name must be a non-empty string".into(),
        ));
    }
    if persona.description.trim().is_empty() {
        return Err(DispatchError::InvalidPersona(
            "Description must be a non-empty string".into(),
        ));
    }
    if persona.expertise.is_empty() {
        return Err(DispatchError::InvalidPersona(
            "Expertise must be a non-empty list".into(),
        ));
    }
    if persona.expertise.iter().any(|e| e.trim().is_empty()) {
        return Err(DispatchError::InvalidPersona(
            "All expertise items must be non-empty strings".into(),
        ));
    }
    if persona.personality_traits.iter().any(|t| t.trim().is_empty()) {
        return Err(DispatchError::InvalidPersona(
            "All personality_traits items must be non-empty strings".into(),
        ));
    }
    Ok(())
}

pub struct PersonaManager {
    store: Arc<dyn PersonaStore>,
}

impl PersonaManager {
    pub fn new(store: Arc<dyn PersonaStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<dyn PersonaStore> {
        Arc::clone(&self.store)
    }

    /// Write the default personas into an empty catalog. Returns how many
    /// were created (0 when the catalog already had records).
    pub fn seed_defaults(&self) -> Result<usize> {
        if !self.store.get_all_personas()?.is_empty() {
            return Ok(0);
        }
        let mut created = 0;
        for persona in default_personas() {
            let id = persona.id.clone();
            if self.store.create_persona(&id, persona)? {
                created += 1;
            }
        }
        tracing::info!("Seeded {} default personas", created);
        Ok(created)
    }

    /// Validate, assign an id derived from the name and store a new persona.
    /// Personas without a category get one inferred from their name.
    pub fn create_persona(&self, mut persona: Persona) -> Result<String> {
        validate_persona(&persona)?;
        if persona.category.is_none() {
            persona.category = TaskCategory::infer_from_name(&persona.name);
        }

        let id = self.allocate_id(&persona.name)?;
        let now = now_rfc3339();
        persona.id = id.clone();
        persona.created_at = now.clone();
        persona.updated_at = now;

        if !self.store.create_persona(&id, persona)? {
            return Err(DispatchError::PersonaExists { id });
        }
        tracing::info!("Created persona {}", id);
        Ok(id)
    }

    /// Slug of `name`, suffixed `_1`, `_2`, … until unused.
    fn allocate_id(&self, name: &str) -> Result<String> {
        let base = sanitize_id(name);
        if base.is_empty() {
            return Err(DispatchError::InvalidPersona(format!(
                "Name '{name}' has no usable characters for an id"
            )));
        }
        let mut id = base.clone();
        let mut counter = 1;
        while self.store.get_persona(&id)?.is_some() {
            id = format!("{base}_{counter}");
            counter += 1;
        }
        Ok(id)
    }

    pub fn get_persona(&self, id: &str) -> Result<Persona> {
        self.store
            .get_persona(id)?
            .ok_or_else(|| DispatchError::PersonaNotFound { id: id.to_string() })
    }

    pub fn get_all_personas(&self) -> Result<PersonaMap> {
        self.store.get_all_personas()
    }

    /// Merge `update` into the stored record and re-validate it.
    pub fn update_persona(&self, id: &str, update: PersonaUpdate) -> Result<Persona> {
        let mut persona = self.get_persona(id)?;
        update.apply(&mut persona);
        validate_persona(&persona)?;
        self.store.save_persona(id, persona)?;
        tracing::info!("Updated persona {}", id);
        self.get_persona(id)
    }

    pub fn delete_persona(&self, id: &str) -> Result<()> {
        if self.store.delete_persona(id)? {
            Ok(())
        } else {
            Err(DispatchError::PersonaNotFound { id: id.to_string() })
        }
    }

    pub fn search_personas(&self, query: &str) -> Result<Vec<Persona>> {
        self.store.search_personas(query)
    }

    pub fn statistics(&self) -> Result<PersonaStatistics> {
        let personas = self.store.get_all_personas()?;
        let mut expertise_distribution = BTreeMap::new();
        let mut communication_style_distribution = BTreeMap::new();

        for persona in personas.values() {
            for exp in &persona.expertise {
                *expertise_distribution.entry(exp.clone()).or_insert(0) += 1;
            }
            let style = if persona.communication_style.is_empty() {
                "Unknown".to_string()
            } else {
                persona.communication_style.clone()
            };
            *communication_style_distribution.entry(style).or_insert(0) += 1;
        }

        Ok(PersonaStatistics {
            total_personas: personas.len(),
            expertise_distribution,
            communication_style_distribution,
            metadata: self.store.metadata()?,
        })
    }

    /// Write the whole catalog to `path`. Returns the record count.
    pub fn export(&self, path: &Path) -> Result<usize> {
        let personas = self.store.get_all_personas()?;
        let bundle = ExportBundle {
            exported_at: now_rfc3339(),
            total_personas: personas.len(),
            personas,
        };
        std::fs::write(path, serde_json::to_string_pretty(&bundle)?)?;
        tracing::info!("Exported {} personas to {}", bundle.total_personas, path.display());
        Ok(bundle.total_personas)
    }

    /// Load a bundle written by [`export`](Self::export). Every record is
    /// validated before any is written; existing ids are overwritten.
    /// Records without a category get one inferred from their name.
    pub fn import(&self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)?;
        let bundle: ExportBundle = serde_json::from_str(&content)?;

        for (id, persona) in &bundle.personas {
            validate_persona(persona).map_err(|e| {
                DispatchError::InvalidPersona(format!("Invalid persona data for {id}: {e}"))
            })?;
        }

        let count = bundle.personas.len();
        for (id, mut persona) in bundle.personas {
            if persona.category.is_none() {
                persona.category = TaskCategory::infer_from_name(&persona.name);
            }
            self.store.save_persona(&id, persona)?;
        }
        tracing::info!("Imported {} personas from {}", count, path.display());
        Ok(count)
    }
}

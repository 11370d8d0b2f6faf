// src/persona/mod.rs — Persona catalog: records, storage, management, generation

pub mod generator;
pub mod manager;
pub mod store;
pub mod templates;
pub mod types;

pub use generator::PersonaGenerator;
pub use manager::PersonaManager;
pub use store::{JsonFileStore, MemoryStore, PersonaMap, PersonaStore};
pub use types::{GeneratedPersonaSummary, Persona, PersonaUpdate};

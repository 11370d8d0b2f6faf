// src/persona/store.rs — Persona catalog storage
//
// The catalog is a flat id → persona map. `JsonFileStore` keeps it in
// `personas.json` next to a small `metadata.json`; every write goes to a temp
// file first and is renamed into place. `MemoryStore` backs tests and
// ephemeral runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use super::types::Persona;
use crate::infra::errors::{DispatchError, Result};
use crate::util::now_rfc3339;

/// Catalog snapshot, iterated in ascending id order.
pub type PersonaMap = BTreeMap<String, Persona>;

const STORE_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMetadata {
    pub created_at: String,
    pub last_updated: String,
    pub version: String,
    #[serde(default)]
    pub total_personas: usize,
}

impl StoreMetadata {
    fn fresh() -> Self {
        let now = now_rfc3339();
        Self {
            created_at: now.clone(),
            last_updated: now,
            version: STORE_VERSION.into(),
            total_personas: 0,
        }
    }
}

/// Shape written by [`PersonaStore::backup`].
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreBackup {
    pub personas: PersonaMap,
    pub metadata: StoreMetadata,
    pub backup_created_at: String,
}

/// Storage collaborator for persona records.
///
/// The dispatcher fetches a fresh snapshot per selection; implementations
/// provide their own consistency for concurrent writers.
#[cfg_attr(test, mockall::automock)]
pub trait PersonaStore: Send + Sync {
    fn get_all_personas(&self) -> Result<PersonaMap>;

    fn get_persona(&self, id: &str) -> Result<Option<Persona>>;

    /// Insert a new record. `Ok(false)` when the id is taken.
    fn create_persona(&self, id: &str, persona: Persona) -> Result<bool>;

    /// Upsert; stamps `id` and `updated_at`.
    fn save_persona(&self, id: &str, persona: Persona) -> Result<()>;

    /// `Ok(false)` when nothing was stored under `id`.
    fn delete_persona(&self, id: &str) -> Result<bool>;

    fn metadata(&self) -> Result<StoreMetadata>;

    /// Case-insensitive substring search over name, description and expertise.
    fn search_personas(&self, query: &str) -> Result<Vec<Persona>> {
        Ok(self
            .get_all_personas()?
            .into_values()
            .filter(|p| p.matches_query(query))
            .collect())
    }

    /// Write every record plus metadata to `path` as one JSON document.
    fn backup(&self, path: &Path) -> Result<()> {
        let backup = StoreBackup {
            personas: self.get_all_personas()?,
            metadata: self.metadata()?,
            backup_created_at: now_rfc3339(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_atomic(path, &serde_json::to_string_pretty(&backup)?)?;
        tracing::info!("Created persona backup at {}", path.display());
        Ok(())
    }
}

fn stamp(id: &str, mut persona: Persona, now: &str) -> Persona {
    persona.id = id.to_string();
    if persona.created_at.is_empty() {
        persona.created_at = now.to_string();
    }
    persona.updated_at = now.to_string();
    persona
}

/// Write `content` to a sibling temp file, then rename over `path`.
fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)
}

// ─── JSON file store ────────────────────────────────────────────

pub struct JsonFileStore {
    dir: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (creating if needed) a catalog directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let store = Self {
            dir,
            write_lock: Mutex::new(()),
        };
        if !store.personas_path().exists() {
            store.write_personas(&PersonaMap::new())?;
        }
        if !store.metadata_path().exists() {
            store.write_metadata(&StoreMetadata::fresh())?;
        }
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn personas_path(&self) -> PathBuf {
        self.dir.join("personas.json")
    }

    fn metadata_path(&self) -> PathBuf {
        self.dir.join("metadata.json")
    }

    fn read_personas(&self) -> Result<PersonaMap> {
        let path = self.personas_path();
        if !path.exists() {
            return Ok(PersonaMap::new());
        }
        let content = std::fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(PersonaMap::new());
        }
        let mut personas: PersonaMap = serde_json::from_str(&content)?;
        // Older files may omit the id inside the record
        for (id, persona) in personas.iter_mut() {
            if persona.id.is_empty() {
                persona.id = id.clone();
            }
        }
        Ok(personas)
    }

    fn write_personas(&self, personas: &PersonaMap) -> Result<()> {
        write_atomic(&self.personas_path(), &serde_json::to_string_pretty(personas)?)?;
        Ok(())
    }

    fn read_metadata(&self) -> StoreMetadata {
        std::fs::read_to_string(self.metadata_path())
            .ok()
            .and_then(|c| serde_json::from_str(&c).ok())
            .unwrap_or_else(|| {
                tracing::warn!("metadata.json missing or unreadable, recreating");
                StoreMetadata::fresh()
            })
    }

    fn write_metadata(&self, metadata: &StoreMetadata) -> Result<()> {
        write_atomic(&self.metadata_path(), &serde_json::to_string_pretty(metadata)?)?;
        Ok(())
    }

    fn commit(&self, personas: &PersonaMap) -> Result<()> {
        self.write_personas(personas)?;
        let mut metadata = self.read_metadata();
        metadata.last_updated = now_rfc3339();
        metadata.total_personas = personas.len();
        self.write_metadata(&metadata)
    }
}

impl PersonaStore for JsonFileStore {
    fn get_all_personas(&self) -> Result<PersonaMap> {
        self.read_personas()
    }

    fn get_persona(&self, id: &str) -> Result<Option<Persona>> {
        Ok(self.read_personas()?.remove(id))
    }

    fn create_persona(&self, id: &str, persona: Persona) -> Result<bool> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut personas = self.read_personas()?;
        if personas.contains_key(id) {
            return Ok(false);
        }
        personas.insert(id.to_string(), stamp(id, persona, &now_rfc3339()));
        self.commit(&personas)?;
        tracing::info!("Created persona: {}", id);
        Ok(true)
    }

    fn save_persona(&self, id: &str, persona: Persona) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut personas = self.read_personas()?;
        personas.insert(id.to_string(), stamp(id, persona, &now_rfc3339()));
        self.commit(&personas)?;
        tracing::debug!("Saved persona: {}", id);
        Ok(())
    }

    fn delete_persona(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut personas = self.read_personas()?;
        if personas.remove(id).is_none() {
            return Ok(false);
        }
        self.commit(&personas)?;
        tracing::info!("Deleted persona: {}", id);
        Ok(true)
    }

    fn metadata(&self) -> Result<StoreMetadata> {
        let mut metadata = self.read_metadata();
        metadata.total_personas = self.read_personas()?.len();
        Ok(metadata)
    }
}

// ─── In-memory store ────────────────────────────────────────────

pub struct MemoryStore {
    personas: RwLock<PersonaMap>,
    metadata: Mutex<StoreMetadata>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            personas: RwLock::new(PersonaMap::new()),
            metadata: Mutex::new(StoreMetadata::fresh()),
        }
    }

    /// Store pre-filled with `personas`, keyed by their ids.
    pub fn with_personas(personas: impl IntoIterator<Item = Persona>) -> Self {
        let store = Self::new();
        {
            let mut map = store.personas.write().unwrap_or_else(PoisonError::into_inner);
            let now = now_rfc3339();
            for p in personas {
                let id = p.id.clone();
                map.insert(id.clone(), stamp(&id, p, &now));
            }
        }
        store
    }

    fn touch(&self, total: usize) {
        let mut metadata = self.metadata.lock().unwrap_or_else(PoisonError::into_inner);
        metadata.last_updated = now_rfc3339();
        metadata.total_personas = total;
    }
}

impl PersonaStore for MemoryStore {
    fn get_all_personas(&self) -> Result<PersonaMap> {
        Ok(self
            .personas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn get_persona(&self, id: &str) -> Result<Option<Persona>> {
        Ok(self
            .personas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned())
    }

    fn create_persona(&self, id: &str, persona: Persona) -> Result<bool> {
        let total = {
            let mut map = self.personas.write().unwrap_or_else(PoisonError::into_inner);
            if map.contains_key(id) {
                return Ok(false);
            }
            map.insert(id.to_string(), stamp(id, persona, &now_rfc3339()));
            map.len()
        };
        self.touch(total);
        Ok(true)
    }

    fn save_persona(&self, id: &str, persona: Persona) -> Result<()> {
        let total = {
            let mut map = self.personas.write().unwrap_or_else(PoisonError::into_inner);
            map.insert(id.to_string(), stamp(id, persona, &now_rfc3339()));
            map.len()
        };
        self.touch(total);
        Ok(())
    }

    fn delete_persona(&self, id: &str) -> Result<bool> {
        let (removed, total) = {
            let mut map = self.personas.write().unwrap_or_else(PoisonError::into_inner);
            let removed = map.remove(id).is_some();
            (removed, map.len())
        };
        if removed {
            self.touch(total);
        }
        Ok(removed)
    }

    fn metadata(&self) -> Result<StoreMetadata> {
        let mut metadata = self
            .metadata
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        metadata.total_personas = self
            .personas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        Ok(metadata)
    }
}

/// Map a storage failure to the catalog error the dispatcher surfaces.
pub fn catalog_error(err: DispatchError) -> DispatchError {
    match err {
        DispatchError::Catalog(_) => err,
        other => DispatchError::Catalog(other.to_string()),
    }
}

// tests/store_test.rs — Integration test: JSON catalog on disk + manager + dispatcher

use std::sync::Arc;

use pretty_assertions::assert_eq;

use persona_dispatch::context::ContextIntegrator;
use persona_dispatch::core::types::TaskCategory;
use persona_dispatch::core::Dispatcher;
use persona_dispatch::infra::config::DispatcherConfig;
use persona_dispatch::infra::errors::DispatchError;
use persona_dispatch::persona::{JsonFileStore, Persona, PersonaManager, PersonaStore, PersonaUpdate};

fn open(dir: &std::path::Path) -> Arc<JsonFileStore> {
    Arc::new(JsonFileStore::open(dir).unwrap())
}

#[test]
fn test_seeded_catalog_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let manager = PersonaManager::new(open(dir.path()));
        assert_eq!(manager.seed_defaults().unwrap(), 4);
        // Second seed is a no-op on a non-empty catalog
        assert_eq!(manager.seed_defaults().unwrap(), 0);
    }

    let store = open(dir.path());
    let all = store.get_all_personas().unwrap();
    let ids: Vec<&str> = all.keys().map(String::as_str).collect();
    assert_eq!(
        ids,
        vec!["business_analyst", "creative_writer", "educator", "tech_expert"]
    );
    assert_eq!(store.metadata().unwrap().total_personas, 4);
    assert!(dir.path().join("metadata.json").exists());
    assert!(!dir.path().join("personas.json.tmp").exists());
}

#[test]
fn test_create_allocates_suffixed_ids_and_infers_category() {
    let dir = tempfile::tempdir().unwrap();
    let manager = PersonaManager::new(open(dir.path()));

    let draft = || {
        Persona::new("", "Senior Designer", "Designs interfaces")
            .with_expertise(["Figma", "Wireframes"])
    };
    let first = manager.create_persona(draft()).unwrap();
    let second = manager.create_persona(draft()).unwrap();
    assert_eq!(first, "senior_designer");
    assert_eq!(second, "senior_designer_1");

    let p = manager.get_persona(&second).unwrap();
    assert_eq!(p.category, Some(TaskCategory::Design));
    assert!(!p.created_at.is_empty());
}

#[test]
fn test_invalid_persona_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let manager = PersonaManager::new(open(dir.path()));
    let err = manager
        .create_persona(Persona::new("", "Nobody", "No expertise"))
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidPersona(_)));
    assert!(manager.get_all_personas().unwrap().is_empty());
}

#[test]
fn test_update_delete_and_search() {
    let dir = tempfile::tempdir().unwrap();
    let manager = PersonaManager::new(open(dir.path()));
    manager.seed_defaults().unwrap();

    let updated = manager
        .update_persona(
            "educator",
            PersonaUpdate {
                communication_style: Some("Socratic".into()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.communication_style, "Socratic");
    assert_eq!(updated.name, "Educator");

    let found = manager.search_personas("MARKET RESEARCH").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "business_analyst");

    manager.delete_persona("educator").unwrap();
    assert!(matches!(
        manager.delete_persona("educator"),
        Err(DispatchError::PersonaNotFound { .. })
    ));
}

#[test]
fn test_export_import_between_catalogs() {
    let src_dir = tempfile::tempdir().unwrap();
    let dst_dir = tempfile::tempdir().unwrap();
    let bundle = src_dir.path().join("bundle.json");

    let src = PersonaManager::new(open(src_dir.path()));
    src.seed_defaults().unwrap();
    assert_eq!(src.export(&bundle).unwrap(), 4);

    let dst = PersonaManager::new(open(dst_dir.path()));
    assert_eq!(dst.import(&bundle).unwrap(), 4);
    assert_eq!(
        dst.get_persona("tech_expert").unwrap().expertise,
        src.get_persona("tech_expert").unwrap().expertise
    );
}

#[test]
fn test_backup_writes_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path());
    PersonaManager::new(store.clone()).seed_defaults().unwrap();

    let path = dir.path().join("backups").join("catalog.json");
    store.backup(&path).unwrap();
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["personas"].as_object().unwrap().len(), 4);
    assert!(raw["backup_created_at"].is_string());
}

#[test]
fn test_legacy_record_without_optional_fields_loads() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("personas.json"),
        r#"{"old_hand": {"name": "Old Hand", "description": "Legacy", "expertise": ["COBOL"]}}"#,
    )
    .unwrap();

    let store = open(dir.path());
    let p = store.get_persona("old_hand").unwrap().unwrap();
    assert_eq!(p.id, "old_hand");
    assert!(!p.auto_generated);
    assert_eq!(p.category, None);
}

#[tokio::test]
async fn test_generated_persona_persisted_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path());
    PersonaManager::new(store.clone()).seed_defaults().unwrap();

    let config = DispatcherConfig {
        auto_generation: true,
        confidence_threshold: 0.9,
        history_limit: 10,
    };
    let d = Dispatcher::new(store, ContextIntegrator::disabled(), &config).unwrap();
    d.select_persona("analyze cryptocurrency market trends", "", None)
        .await
        .unwrap();

    let reopened = open(dir.path());
    let generated: Vec<Persona> = reopened
        .get_all_personas()
        .unwrap()
        .into_values()
        .filter(|p| p.auto_generated)
        .collect();
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].task_category, Some(TaskCategory::Business));
}

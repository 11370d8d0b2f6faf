// src/cli/personas.rs — Catalog management commands

use std::path::Path;

use super::{print_json, App};
use crate::persona::{GeneratedPersonaSummary, Persona};

fn print_row(p: &Persona) {
    let marker = if p.auto_generated { " [generated]" } else { "" };
    println!("  {:<32} {}{}", p.id, p.name, marker);
}

pub fn run_list(app: &App) -> anyhow::Result<()> {
    let personas = app.manager.get_all_personas()?;
    if app.json {
        return print_json(&personas);
    }
    println!("{} personas", personas.len());
    personas.values().for_each(print_row);
    Ok(())
}

pub fn run_get(app: &App, id: &str) -> anyhow::Result<()> {
    let p = app.manager.get_persona(id)?;
    if app.json {
        return print_json(&p);
    }

    println!("{} ({})", p.name, p.id);
    println!("  {}", p.description);
    println!("  Expertise:  {}", p.expertise.join(", "));
    println!("  Style:      {}", p.communication_style);
    if !p.context.is_empty() {
        println!("  Context:    {}", p.context);
    }
    if !p.personality_traits.is_empty() {
        println!("  Traits:     {}", p.personality_traits.join(", "));
    }
    if let Some(cat) = p.category {
        println!("  Category:   {cat}");
    }
    if let Some(reason) = &p.generation_reason {
        println!("  Generated:  {reason}");
    }
    Ok(())
}

pub fn run_search(app: &App, query: &str) -> anyhow::Result<()> {
    let found = app.manager.search_personas(query)?;
    if app.json {
        return print_json(&found);
    }
    if found.is_empty() {
        println!("No personas match '{query}'");
    }
    found.iter().for_each(print_row);
    Ok(())
}

pub fn run_create(app: &App, persona: Persona) -> anyhow::Result<()> {
    let id = app.manager.create_persona(persona)?;
    if app.json {
        return print_json(&serde_json::json!({ "id": id }));
    }
    println!("Created persona {id}");
    Ok(())
}

pub fn run_delete(app: &App, id: &str) -> anyhow::Result<()> {
    app.manager.delete_persona(id)?;
    if !app.json {
        println!("Deleted persona {id}");
    }
    Ok(())
}

pub fn run_stats(app: &App) -> anyhow::Result<()> {
    let stats = app.manager.statistics()?;
    if app.json {
        return print_json(&stats);
    }

    println!("  Personas:     {}", stats.total_personas);
    println!("  Last updated: {}", stats.metadata.last_updated);
    println!();
    println!("  Expertise:");
    let mut expertise: Vec<_> = stats.expertise_distribution.iter().collect();
    expertise.sort_by(|a, b| b.1.cmp(a.1));
    for (area, count) in expertise.into_iter().take(10) {
        println!("    {count:>3}  {area}");
    }
    println!();
    println!("  Communication styles:");
    for (style, count) in &stats.communication_style_distribution {
        println!("    {count:>3}  {style}");
    }
    Ok(())
}

pub fn run_generated(app: &App) -> anyhow::Result<()> {
    let generated = app.dispatcher.list_generated_personas()?;
    if app.json {
        return print_json(&generated);
    }
    if generated.is_empty() {
        println!("No generated personas yet.");
    }
    for g in &generated {
        for line in generated_lines(g) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Text rows for one generated persona: id and name, then the task it was made for.
fn generated_lines(g: &GeneratedPersonaSummary) -> Vec<String> {
    let mut lines = vec![format!("  {:<40} {}", g.id, g.name)];
    if !g.original_task.is_empty() {
        lines.push(format!("      for: {}", g.original_task));
    }
    lines
}

pub fn run_export(app: &App, path: &Path) -> anyhow::Result<()> {
    let count = app.manager.export(path)?;
    println!("Exported {count} personas to {}", path.display());
    Ok(())
}

pub fn run_import(app: &App, path: &Path) -> anyhow::Result<()> {
    let count = app.manager.import(path)?;
    println!("Imported {count} personas from {}", path.display());
    Ok(())
}

// src/cli/select.rs — Selection, analysis and improvement commands

use super::{print_json, App};
use crate::core::types::PersonaRecommendation;

pub async fn run_select(
    app: &App,
    task: &str,
    context: &str,
    project: Option<&str>,
) -> anyhow::Result<()> {
    let rec = app.dispatcher.select_persona(task, context, project).await?;
    if app.json {
        return print_json(&rec);
    }
    print_recommendation(&rec);
    Ok(())
}

fn print_recommendation(rec: &PersonaRecommendation) {
    let p = &rec.persona_data;
    println!("{} ({})", p.name, rec.persona_id);
    println!("  Confidence: {:.2}", rec.confidence_score);
    println!("  Category:   {}", rec.task_category);
    if p.auto_generated {
        println!("  Generated:  yes");
    }
    println!("  Style:      {}", p.communication_style);
    println!("  Expertise:  {}", p.expertise.join(", "));

    if !rec.reasoning.is_empty() {
        println!();
        println!("  Reasoning:");
        for r in &rec.reasoning {
            println!("    - {r}");
        }
    }
    if !rec.context_insights.is_empty() {
        println!();
        println!("  Project context:");
        for i in &rec.context_insights {
            println!("    - {i}");
        }
    }
    if !rec.alternative_personas.is_empty() {
        println!();
        println!("  Alternatives:");
        for alt in &rec.alternative_personas {
            println!("    {} ({})", alt.name, alt.id);
        }
    }
}

pub fn run_analyze(app: &App, task: &str, context: &str) -> anyhow::Result<()> {
    let ctx = app.dispatcher.analyze_task(task, context);
    let category = app.dispatcher.classify_task(&ctx);
    if app.json {
        return print_json(&serde_json::json!({
            "task_context": ctx,
            "task_category": category,
        }));
    }

    println!("  Category:   {category}");
    println!("  Domain:     {}", ctx.domain.as_str());
    println!("  Complexity: {}", ctx.complexity.as_str());
    println!("  Urgency:    {}", ctx.urgency.as_str());
    println!("  Audience:   {}", ctx.audience.as_str());
    println!("  Output:     {}", ctx.output_format.as_str());
    Ok(())
}

pub fn run_improve(app: &App, task: &str) -> anyhow::Result<()> {
    let suggestions = app.dispatcher.suggest_persona_improvements(task)?;
    if app.json {
        return print_json(&suggestions);
    }
    if suggestions.is_empty() {
        println!("The catalog already covers this task.");
    }
    for s in &suggestions {
        println!("  - {s}");
    }
    Ok(())
}

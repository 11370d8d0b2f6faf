// src/cli/context.rs — Project context commands

use super::{print_json, App};

pub async fn run_context(app: &App, project: Option<&str>) -> anyhow::Result<()> {
    let summary = app.dispatcher.get_context_summary(project).await;
    let priorities = app.dispatcher.suggest_task_priorities(project).await;
    if app.json {
        return print_json(&serde_json::json!({
            "summary": summary,
            "priorities": priorities,
        }));
    }

    match summary {
        Some(s) => {
            println!("{}", s.project_name);
            println!("  Goal:      {}", s.current_goal);
            println!(
                "  Progress:  {:.0}% ({} done, {} pending, {} open issues)",
                s.progress.completion_percentage,
                s.progress.features_completed,
                s.progress.steps_pending,
                s.progress.issues_open
            );
            println!("  Updated:   {}", s.last_updated);
        }
        None => println!(
            "No context for project '{}'",
            project.unwrap_or(app.dispatcher.context().default_project())
        ),
    }
    println!();
    println!("  Priorities:");
    for p in &priorities {
        println!("    - {p}");
    }
    Ok(())
}

pub async fn run_complete(
    app: &App,
    task: &str,
    result: &str,
    persona: &str,
    project: Option<&str>,
) -> anyhow::Result<()> {
    let updated = app
        .dispatcher
        .complete_task_with_context_update(task, result, persona, project)
        .await;
    if app.json {
        return print_json(&serde_json::json!({ "context_updated": updated }));
    }
    if updated {
        println!("Project context updated.");
    } else {
        println!("Project context not updated (service unavailable or rejected the update).");
    }
    Ok(())
}

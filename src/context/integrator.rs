// src/context/integrator.rs — Project-context awareness for persona selection
//
// Context is a soft signal. Every failure to reach the context service is
// logged and collapses to the neutral `ContextAnalysis::default()`; nothing
// in here returns an error to the dispatcher.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::client::{ContextSource, DisabledContextSource, HttpContextSource};
use super::types::{ContextAnalysis, ContextSummary, ContextUpdate, Priority, ProjectContext};
use crate::core::types::{TaskCategory, Urgency};
use crate::infra::config::ContextConfig;
use crate::util::{best_label, keyword_hits, token_jaccard, truncate_str};

const GOAL_RELEVANCE: f64 = 0.3;
const ISSUE_RELEVANCE: f64 = 0.4;
const STEP_RELEVANCE: f64 = 0.3;

/// Smaller domain table applied to task + project text.
const CONTEXT_DOMAIN_KEYWORDS: &[(TaskCategory, &[&str])] = &[
    (
        TaskCategory::Technical,
        &[
            "code", "programming", "software", "technical", "implementation", "debug", "api",
            "database", "server", "deployment",
        ],
    ),
    (
        TaskCategory::Business,
        &["business", "analysis", "strategy", "market", "process", "optimization", "roi", "efficiency"],
    ),
    (
        TaskCategory::Creative,
        &["write", "story", "creative", "narrative", "content", "marketing", "copy", "brand"],
    ),
    (
        TaskCategory::Educational,
        &["teach", "explain", "educate", "learn", "training", "curriculum", "tutorial"],
    ),
    (
        TaskCategory::Design,
        &["design", "ui", "ux", "visual", "graphic", "aesthetic", "interface", "prototype"],
    ),
    (
        TaskCategory::Scientific,
        &["research", "scientific", "methodology", "evidence", "analysis", "experiment", "data"],
    ),
    (
        TaskCategory::Consulting,
        &["consult", "advise", "strategy", "problem solving", "organizational", "solution"],
    ),
];

/// Task keyword group → persona ids worth boosting.
const PERSONA_HINTS: &[(&[&str], &[&str])] = &[
    (
        &["code", "programming", "software", "technical", "api", "database"],
        &["tech_expert", "software_engineer"],
    ),
    (
        &["business", "analysis", "strategy", "market", "process"],
        &["business_analyst", "domain_specialist"],
    ),
    (
        &["write", "story", "creative", "content", "marketing"],
        &["creative_writer", "domain_specialist"],
    ),
    (
        &["teach", "explain", "educate", "learn", "tutorial"],
        &["educator", "domain_specialist"],
    ),
    (
        &["data", "analysis", "statistics", "research"],
        &["data_scientist", "business_analyst"],
    ),
];

const FEATURE_WORDS: &[&str] = &["implement", "complete", "finish", "done"];
const ISSUE_WORDS: &[&str] = &["fix", "resolve", "solve", "address"];
const STEP_WORDS: &[&str] = &["plan", "next", "should", "need to"];

struct CachedContext {
    context: ProjectContext,
    fetched_at: Instant,
}

pub struct ContextIntegrator {
    source: Arc<dyn ContextSource>,
    default_project: String,
    ttl: Duration,
    cache: Mutex<HashMap<String, CachedContext>>,
}

impl ContextIntegrator {
    pub fn new(source: Arc<dyn ContextSource>, default_project: impl Into<String>, ttl: Duration) -> Self {
        Self {
            source,
            default_project: default_project.into(),
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// HTTP-backed integrator, or a disabled one when `enabled = false`.
    pub fn from_config(config: &ContextConfig) -> anyhow::Result<Self> {
        let source: Arc<dyn ContextSource> = if config.enabled {
            Arc::new(HttpContextSource::new(&config.url, config.timeout())?)
        } else {
            Arc::new(DisabledContextSource)
        };
        Ok(Self::new(source, config.project.clone(), config.cache_ttl()))
    }

    /// Integrator that never has context.
    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledContextSource), "", Duration::ZERO)
    }

    pub fn default_project(&self) -> &str {
        &self.default_project
    }

    fn resolve<'a>(&'a self, project: Option<&'a str>) -> &'a str {
        project
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(&self.default_project)
    }

    /// Cached snapshot if younger than the TTL, otherwise a fresh fetch.
    /// `None` when the service has nothing or cannot be reached.
    pub async fn get_project_context(
        &self,
        project: Option<&str>,
        force_refresh: bool,
    ) -> Option<ProjectContext> {
        let project = self.resolve(project);

        if !force_refresh {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = cache.get(project) {
                if entry.fetched_at.elapsed() < self.ttl {
                    tracing::debug!("Context cache hit for {}", project);
                    return Some(entry.context.clone());
                }
            }
        }
        tracing::debug!("Context cache miss for {}", project);

        match self.source.fetch(project).await {
            Ok(Some(context)) => {
                let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
                cache.insert(
                    project.to_string(),
                    CachedContext {
                        context: context.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                tracing::info!("Retrieved context for project: {}", project);
                Some(context)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Context service unavailable for {}: {}", project, e);
                None
            }
        }
    }

    pub fn invalidate(&self, project: &str) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(project);
    }

    pub async fn analyze_context_for_task(&self, task: &str, project: Option<&str>) -> ContextAnalysis {
        match self.get_project_context(project, false).await {
            Some(context) => analyze_against(&context, task),
            None => ContextAnalysis::default(),
        }
    }

    /// Report a finished task to the context service. Tries the combined
    /// completion endpoint first and falls back to individual updates.
    /// Returns whether any update was accepted.
    pub async fn update_context_from_task(
        &self,
        task: &str,
        result: &str,
        persona_used: &str,
        project: Option<&str>,
    ) -> bool {
        let project = self.resolve(project);
        let update = ContextUpdate::TaskComplete {
            task: task.to_string(),
            result: result.to_string(),
            persona_used: persona_used.to_string(),
            completion_type: "general".into(),
        };

        match self.source.send(project, &update).await {
            Ok(true) => {
                tracing::info!(
                    "Updated context from task completion: {}...",
                    truncate_str(task, 50)
                );
                self.invalidate(project);
                true
            }
            Ok(false) => self.fallback_update(task, result, persona_used, project).await,
            Err(e) => {
                tracing::warn!("Task completion update failed: {}", e);
                self.fallback_update(task, result, persona_used, project).await
            }
        }
    }

    async fn fallback_update(&self, task: &str, result: &str, persona_used: &str, project: &str) -> bool {
        let Some(context) = self.get_project_context(Some(project), false).await else {
            return false;
        };
        let lower = task.to_lowercase();
        let mut updates = Vec::new();

        if keyword_hits(&lower, FEATURE_WORDS) > 0 {
            updates.push(ContextUpdate::CompleteFeature {
                feature: task.to_string(),
            });
        }
        if keyword_hits(&lower, ISSUE_WORDS) > 0 {
            match matching_issue(&context, &lower) {
                Some(issue) => updates.push(ContextUpdate::ResolveIssue { issue }),
                None => tracing::info!("No matching issue found for task: {}", task),
            }
        }
        if keyword_hits(&lower, STEP_WORDS) > 0 {
            updates.push(ContextUpdate::AddStep {
                step: task.to_string(),
            });
        }
        updates.push(ContextUpdate::LogInteraction {
            timestamp: crate::util::now_rfc3339(),
            kind: "task_completion".into(),
            task: task.to_string(),
            result: result.to_string(),
            persona_used: persona_used.to_string(),
        });

        let mut accepted = 0;
        for update in &updates {
            match self.source.send(project, update).await {
                Ok(true) => accepted += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!("Context update {} failed: {}", update.endpoint(), e),
            }
        }
        tracing::info!("Fallback context update: {} of {} accepted", accepted, updates.len());
        if accepted > 0 {
            self.invalidate(project);
        }
        accepted > 0
    }

    pub async fn get_context_summary(&self, project: Option<&str>) -> Option<ContextSummary> {
        self.get_project_context(project, false)
            .await
            .map(|ctx| ContextSummary::from(&ctx))
    }

    /// Up to five suggestions: open issues, then next steps, then the goal.
    pub async fn suggest_task_priorities(&self, project: Option<&str>) -> Vec<String> {
        let Some(ctx) = self.get_project_context(project, false).await else {
            return vec!["No context available for suggestions".to_string()];
        };
        ctx.current_issues
            .iter()
            .map(|i| format!("Address issue: {i}"))
            .chain(ctx.next_steps.iter().map(|s| format!("Work on: {s}")))
            .chain(
                (!ctx.current_goal.is_empty())
                    .then(|| format!("Progress toward goal: {}", ctx.current_goal)),
            )
            .take(5)
            .collect()
    }
}

/// First open issue sharing any word with the task.
fn matching_issue(context: &ProjectContext, task_lower: &str) -> Option<String> {
    context
        .current_issues
        .iter()
        .find(|issue| {
            let issue = issue.to_lowercase();
            task_lower.split_whitespace().any(|w| issue.contains(w))
        })
        .cloned()
}

/// Relevance of `task` to a known project snapshot.
pub fn analyze_against(context: &ProjectContext, task: &str) -> ContextAnalysis {
    let mut analysis = ContextAnalysis::default();

    let goal = token_jaccard(task, &context.current_goal);
    if goal > GOAL_RELEVANCE {
        analysis.priority = Priority::High;
        analysis.context_relevance += goal;
        analysis
            .context_insights
            .push(format!("Task aligns with current goal: {}", context.current_goal));
    }

    for issue in &context.current_issues {
        let r = token_jaccard(task, issue);
        if r > ISSUE_RELEVANCE {
            analysis.urgency = Urgency::High;
            analysis.context_relevance += r;
            analysis
                .context_insights
                .push(format!("Task addresses current issue: {issue}"));
        }
    }

    for step in &context.next_steps {
        let r = token_jaccard(task, step);
        if r > STEP_RELEVANCE {
            analysis.priority = Priority::High;
            analysis.context_relevance += r;
            analysis
                .context_insights
                .push(format!("Task supports next step: {step}"));
        }
    }

    let text = format!(
        "{} {} {} {}",
        task,
        context.current_goal,
        context.current_issues.join(" "),
        context.next_steps.join(" ")
    )
    .to_lowercase();
    analysis.domain = best_label(&text, CONTEXT_DOMAIN_KEYWORDS).unwrap_or(TaskCategory::General);
    analysis.recommended_personas = recommend_personas(task);
    analysis
}

/// Persona ids suggested by task keywords, first occurrence kept.
fn recommend_personas(task: &str) -> Vec<String> {
    let lower = task.to_lowercase();
    let mut out: Vec<String> = Vec::new();
    for (keywords, personas) in PERSONA_HINTS {
        if keyword_hits(&lower, keywords) == 0 {
            continue;
        }
        for p in *personas {
            if !out.iter().any(|o| o == p) {
                out.push(p.to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSource {
        context: Option<ProjectContext>,
        fail: bool,
        fetches: AtomicUsize,
        accept_complete: bool,
        sent: Mutex<Vec<&'static str>>,
    }

    impl FakeSource {
        fn with(context: ProjectContext) -> Self {
            Self {
                context: Some(context),
                fail: false,
                fetches: AtomicUsize::new(0),
                accept_complete: true,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ContextSource for FakeSource {
        async fn fetch(&self, _project: &str) -> anyhow::Result<Option<ProjectContext>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("connection refused");
            }
            Ok(self.context.clone())
        }

        async fn send(&self, _project: &str, update: &ContextUpdate) -> anyhow::Result<bool> {
            self.sent.lock().unwrap().push(update.endpoint());
            match update {
                ContextUpdate::TaskComplete { .. } => Ok(self.accept_complete),
                _ => Ok(true),
            }
        }
    }

    fn project() -> ProjectContext {
        ProjectContext {
            name: "demo".into(),
            current_goal: "ship the api server".into(),
            current_issues: vec!["database timeout on login".into()],
            next_steps: vec!["write api docs".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_analyze_against_goal_and_issue() {
        let a = analyze_against(&project(), "ship the api server");
        assert_eq!(a.priority, Priority::High);
        assert!(a.context_relevance >= 1.0);
        assert_eq!(a.context_insights.len(), 1);
        assert_eq!(a.domain, TaskCategory::Technical);

        let a = analyze_against(&project(), "database timeout on login");
        assert_eq!(a.urgency, Urgency::High);
        assert!(a.context_insights[0].starts_with("Task addresses current issue"));
    }

    #[test]
    fn test_recommendations_dedup_in_order() {
        let recs = recommend_personas("Market analysis of research data");
        assert_eq!(
            recs,
            vec!["business_analyst", "domain_specialist", "data_scientist"]
        );
        assert!(recommend_personas("hello").is_empty());
    }

    #[tokio::test]
    async fn test_cache_respects_ttl_and_force_refresh() {
        let source = Arc::new(FakeSource::with(project()));
        let integrator = ContextIntegrator::new(source.clone(), "demo", Duration::from_secs(300));

        integrator.get_project_context(None, false).await.unwrap();
        integrator.get_project_context(None, false).await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);

        integrator.get_project_context(None, true).await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);

        // Separate entry per project
        integrator.get_project_context(Some("other"), false).await.unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_refetches() {
        let source = Arc::new(FakeSource::with(project()));
        let integrator = ContextIntegrator::new(source.clone(), "demo", Duration::ZERO);
        integrator.get_project_context(None, false).await;
        integrator.get_project_context(None, false).await;
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_service_failure_degrades_to_neutral() {
        let mut source = FakeSource::with(project());
        source.fail = true;
        let integrator = ContextIntegrator::new(Arc::new(source), "demo", Duration::from_secs(300));
        let a = integrator.analyze_context_for_task("ship the api server", None).await;
        assert_eq!(a, ContextAnalysis::default());
        assert_eq!(
            integrator.suggest_task_priorities(None).await,
            vec!["No context available for suggestions"]
        );
    }

    #[tokio::test]
    async fn test_completion_uses_combined_endpoint() {
        let source = Arc::new(FakeSource::with(project()));
        let integrator = ContextIntegrator::new(source.clone(), "demo", Duration::from_secs(300));
        assert!(integrator.update_context_from_task("implement login", "done", "tech_expert", None).await);
        assert_eq!(*source.sent.lock().unwrap(), vec!["task/complete"]);
    }

    #[tokio::test]
    async fn test_completion_fallback() {
        let mut source = FakeSource::with(project());
        source.accept_complete = false;
        let source = Arc::new(source);
        let integrator = ContextIntegrator::new(source.clone(), "demo", Duration::from_secs(300));

        let ok = integrator
            .update_context_from_task("fix the login timeout", "patched", "tech_expert", None)
            .await;
        assert!(ok);
        assert_eq!(
            *source.sent.lock().unwrap(),
            vec!["task/complete", "resolve-issue", "log-interaction"]
        );
    }

    #[tokio::test]
    async fn test_priorities() {
        let source = Arc::new(FakeSource::with(project()));
        let integrator = ContextIntegrator::new(source, "demo", Duration::from_secs(300));
        assert_eq!(
            integrator.suggest_task_priorities(None).await,
            vec![
                "Address issue: database timeout on login",
                "Work on: write api docs",
                "Progress toward goal: ship the api server",
            ]
        );
    }
}

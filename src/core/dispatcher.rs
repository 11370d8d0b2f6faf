// src/core/dispatcher.rs — Persona selection controller
//
// One `select_persona` call runs ANALYZE → CLASSIFY → CONTEXT → SCORE →
// (GENERATE) → RANK → LOG. The context fetch is the only await point; the
// state lock is taken only for short synchronous sections and never held
// across it.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::analytics::{
    AutoGenerationSettings, CompletionEntry, DispatcherState, PerformanceReport, SelectionAnalytics,
};
use super::analyzer::TaskAnalyzer;
use super::classifier::TaskClassifier;
use super::scorer::{apply_context_boost, PersonaScorer};
use super::types::{Domain, PersonaRecommendation, ScoredPersona, TaskCategory, TaskContext};
use crate::context::{ContextIntegrator, ContextSummary};
use crate::infra::config::DispatcherConfig;
use crate::infra::errors::{DispatchError, Result};
use crate::persona::generator::PersonaGenerator;
use crate::persona::store::{catalog_error, PersonaStore};
use crate::persona::types::GeneratedPersonaSummary;
use crate::util::{extract_keywords, now_rfc3339, truncate_str};

/// Alternatives returned beside the winner.
const MAX_ALTERNATIVES: usize = 3;

/// Persona ids expected to cover each task domain.
fn domain_coverage(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Technology => &["tech_expert"],
        Domain::Business => &["business_analyst", "consultant"],
        Domain::Creative => &["creative_writer", "designer"],
        Domain::Education => &["educator", "mentor"],
        Domain::Science => &["scientist"],
        _ => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoGenerationStatus {
    pub enabled: bool,
    pub confidence_threshold: f64,
    pub total_generated: usize,
}

/// Matches tasks to personas and keeps selection/feedback analytics.
///
/// `Send + Sync`; share it behind an `Arc`.
pub struct Dispatcher {
    store: Arc<dyn PersonaStore>,
    context: ContextIntegrator,
    analyzer: TaskAnalyzer,
    classifier: TaskClassifier,
    scorer: PersonaScorer,
    generator: PersonaGenerator,
    state: Mutex<DispatcherState>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn PersonaStore>,
        context: ContextIntegrator,
        config: &DispatcherConfig,
    ) -> Result<Self> {
        let state = DispatcherState::new(
            config.auto_generation,
            config.confidence_threshold,
            config.history_limit,
        )?;
        Ok(Self {
            store,
            context,
            analyzer: TaskAnalyzer::new(),
            classifier: TaskClassifier::new(),
            scorer: PersonaScorer::new(),
            generator: PersonaGenerator::new(),
            state: Mutex::new(state),
        })
    }

    fn state(&self) -> MutexGuard<'_, DispatcherState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store(&self) -> Arc<dyn PersonaStore> {
        Arc::clone(&self.store)
    }

    pub fn context(&self) -> &ContextIntegrator {
        &self.context
    }

    pub fn analyze_task(&self, task: &str, context: &str) -> TaskContext {
        self.analyzer.analyze(task, context)
    }

    pub fn classify_task(&self, task: &TaskContext) -> TaskCategory {
        self.classifier.classify(task)
    }

    /// Pick the best persona for `task`. `project` selects which project's
    /// context biases the choice (the configured default when `None`).
    ///
    /// Fails only when the catalog is empty or cannot be read.
    pub async fn select_persona(
        &self,
        task: &str,
        context: &str,
        project: Option<&str>,
    ) -> Result<PersonaRecommendation> {
        let mut task_ctx = self.analyzer.analyze(task, context);
        let analysis = self.context.analyze_context_for_task(task, project).await;

        // Fold project insights into the context and analyze once more
        if !analysis.context_insights.is_empty() {
            let enhanced = format!(
                "{context}\n\nProject Context: {}",
                analysis.context_insights.join("; ")
            );
            task_ctx = self.analyzer.analyze(task, &enhanced);
        }
        let category = self.classifier.classify(&task_ctx);

        let personas = self.store.get_all_personas().map_err(|e| {
            tracing::error!("Error getting personas: {}", e);
            catalog_error(e)
        })?;
        if personas.is_empty() {
            return Err(DispatchError::EmptyCatalog);
        }

        let mut ranked: Vec<ScoredPersona> = personas
            .iter()
            .map(|(id, persona)| {
                let mut scored = self.scorer.score_persona(id, persona, &task_ctx, category);
                if analysis.recommends(id) {
                    apply_context_boost(&mut scored, analysis.context_relevance);
                    tracing::debug!("Boosted {} from project context", id);
                }
                scored
            })
            .collect();
        // Stable: equal scores keep catalog (ascending id) order
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let settings = self.state().settings();
        let (winner, alternatives) = self.maybe_generate(ranked, &task_ctx, category, settings);

        let recommendation = PersonaRecommendation {
            persona_id: winner.persona_id,
            persona_data: winner.persona,
            confidence_score: winner.score.clamp(0.0, 1.0),
            reasoning: winner.reasoning,
            alternative_personas: alternatives.into_iter().map(|s| s.persona).collect(),
            task_category: category,
            context_insights: analysis.context_insights,
        };

        let auto_generated = recommendation.persona_data.auto_generated;
        self.state()
            .log_selection(&task_ctx, &recommendation, auto_generated);
        tracing::info!(
            "Selected persona '{}' (confidence: {:.2}) for task: {}...",
            recommendation.persona_id,
            recommendation.confidence_score,
            truncate_str(task, 50)
        );

        Ok(recommendation)
    }

    /// Split `ranked` (non-empty, best first) into winner and alternatives,
    /// synthesizing a persona first when the best score is under threshold.
    fn maybe_generate(
        &self,
        mut ranked: Vec<ScoredPersona>,
        task_ctx: &TaskContext,
        category: TaskCategory,
        settings: AutoGenerationSettings,
    ) -> (ScoredPersona, Vec<ScoredPersona>) {
        let best_score = ranked[0].score;
        let generated = if settings.enabled && best_score < settings.confidence_threshold {
            self.generate_and_store(task_ctx, category, best_score)
        } else {
            None
        };

        match generated {
            Some(new) if new.score > best_score => {
                tracing::info!(
                    "Generated and selected new persona '{}' with confidence {:.2}",
                    new.persona.name,
                    new.score
                );
                ranked.truncate(MAX_ALTERNATIVES);
                (new, ranked)
            }
            Some(new) => {
                let winner = ranked.remove(0);
                ranked.truncate(MAX_ALTERNATIVES);
                ranked.push(new);
                ranked.sort_by(|a, b| {
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                ranked.truncate(MAX_ALTERNATIVES);
                (winner, ranked)
            }
            None => {
                let winner = ranked.remove(0);
                ranked.truncate(MAX_ALTERNATIVES);
                (winner, ranked)
            }
        }
    }

    /// Generate, persist and score a new persona. Never fails: any problem
    /// is logged and the caller keeps its existing ranking.
    fn generate_and_store(
        &self,
        task_ctx: &TaskContext,
        category: TaskCategory,
        best_score: f64,
    ) -> Option<ScoredPersona> {
        let persona = self.generator.generate(task_ctx, category, best_score)?;
        let id = persona.id.clone();

        match self.store.create_persona(&id, persona.clone()) {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("Generated persona id {} already exists, skipping", id);
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to store generated persona {}: {}", id, e);
                return None;
            }
        }

        let stored = match self.store.get_persona(&id) {
            Ok(Some(p)) => p,
            _ => persona,
        };
        Some(self.scorer.score_persona(&id, &stored, task_ctx, category))
    }

    /// Record a 1–5 rating for a persona chosen for `task`.
    pub fn record_feedback(&self, task: &str, persona_id: &str, score: u8, comment: &str) -> Result<()> {
        let category = self.classify_task(&self.analyze_task(task, ""));
        self.state()
            .record_feedback(task, persona_id, score, comment, category)?;
        tracing::info!("Recorded feedback for {}: {}/5", persona_id, score);
        Ok(())
    }

    pub fn get_selection_analytics(&self) -> SelectionAnalytics {
        self.state().analytics()
    }

    pub fn get_performance_metrics(&self) -> PerformanceReport {
        self.state().performance_report()
    }

    /// Coverage gaps for the task's domain and task keywords no persona lists
    /// as expertise.
    pub fn suggest_persona_improvements(&self, task: &str) -> Result<Vec<String>> {
        let task_ctx = self.analyze_task(task, "");
        let personas = self.store.get_all_personas().map_err(catalog_error)?;
        let mut suggestions = Vec::new();

        let missing: Vec<&str> = domain_coverage(task_ctx.domain)
            .iter()
            .filter(|id| !personas.contains_key(**id))
            .copied()
            .collect();
        if !missing.is_empty() {
            suggestions.push(format!(
                "Consider adding personas for {} domain: {}",
                task_ctx.domain.as_str(),
                missing.join(", ")
            ));
        }

        let covered: Vec<String> = personas
            .values()
            .flat_map(|p| p.expertise.iter().map(|e| e.to_lowercase()))
            .collect();
        let uncovered: Vec<String> = extract_keywords(task)
            .into_iter()
            .filter(|kw| !covered.contains(kw))
            .take(5)
            .collect();
        if !uncovered.is_empty() {
            suggestions.push(format!(
                "Consider adding expertise areas: {}",
                uncovered.join(", ")
            ));
        }

        Ok(suggestions)
    }

    pub fn enable_auto_generation(&self, enabled: bool) {
        self.state().set_auto_generation(enabled);
        tracing::info!(
            "Auto-generation {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }

    /// Fails with `InvalidThreshold` outside [0, 1]; the old value stays.
    pub fn set_confidence_threshold(&self, threshold: f64) -> Result<()> {
        self.state().set_confidence_threshold(threshold)?;
        tracing::info!("Confidence threshold set to {}", threshold);
        Ok(())
    }

    pub fn get_auto_generation_status(&self) -> Result<AutoGenerationStatus> {
        let settings = self.state().settings();
        let total_generated = self
            .store
            .get_all_personas()
            .map_err(catalog_error)?
            .values()
            .filter(|p| p.auto_generated)
            .count();
        Ok(AutoGenerationStatus {
            enabled: settings.enabled,
            confidence_threshold: settings.confidence_threshold,
            total_generated,
        })
    }

    pub fn list_generated_personas(&self) -> Result<Vec<GeneratedPersonaSummary>> {
        Ok(self
            .store
            .get_all_personas()
            .map_err(catalog_error)?
            .values()
            .filter(|p| p.auto_generated)
            .map(GeneratedPersonaSummary::from)
            .collect())
    }

    /// Report a finished task to the project context and log it. Returns
    /// whether the context service accepted any update.
    pub async fn complete_task_with_context_update(
        &self,
        task: &str,
        result: &str,
        persona_id: &str,
        project: Option<&str>,
    ) -> bool {
        let updated = self
            .context
            .update_context_from_task(task, result, persona_id, project)
            .await;
        if !updated {
            tracing::warn!(
                "Failed to update context from task: {}...",
                truncate_str(task, 50)
            );
        }
        self.state().record_completion(CompletionEntry {
            timestamp: now_rfc3339(),
            task: task.to_string(),
            result: result.to_string(),
            persona_used: persona_id.to_string(),
            context_updated: updated,
        });
        updated
    }

    pub async fn get_context_summary(&self, project: Option<&str>) -> Option<ContextSummary> {
        self.context.get_context_summary(project).await
    }

    pub async fn suggest_task_priorities(&self, project: Option<&str>) -> Vec<String> {
        self.context.suggest_task_priorities(project).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::manager::default_personas;
    use crate::persona::store::{MemoryStore, MockPersonaStore};
    use crate::persona::types::Persona;

    fn config(auto: bool, threshold: f64) -> DispatcherConfig {
        DispatcherConfig {
            auto_generation: auto,
            confidence_threshold: threshold,
            history_limit: 10,
        }
    }

    fn dispatcher_with(store: Arc<dyn PersonaStore>, auto: bool, threshold: f64) -> Dispatcher {
        Dispatcher::new(store, ContextIntegrator::disabled(), &config(auto, threshold)).unwrap()
    }

    fn seeded(auto: bool, threshold: f64) -> (Arc<MemoryStore>, Dispatcher) {
        let store = Arc::new(MemoryStore::with_personas(default_personas()));
        let d = dispatcher_with(store.clone(), auto, threshold);
        (store, d)
    }

    #[test]
    fn test_invalid_initial_threshold() {
        let store = Arc::new(MemoryStore::new());
        let result = Dispatcher::new(store, ContextIntegrator::disabled(), &config(true, 2.0));
        assert!(matches!(result, Err(DispatchError::InvalidThreshold { .. })));
    }

    #[tokio::test]
    async fn test_selects_tech_expert_for_python_task() {
        let (_, d) = seeded(false, 0.3);
        let rec = d
            .select_persona("Review this Python code for the API design", "", None)
            .await
            .unwrap();
        assert_eq!(rec.persona_id, "tech_expert");
        assert_eq!(rec.task_category, TaskCategory::Technical);
        assert!(rec.alternative_personas.len() <= MAX_ALTERNATIVES);
        assert!(rec.reasoning.iter().any(|r| r.starts_with("Expertise match")));
    }

    #[tokio::test]
    async fn test_empty_catalog_is_error() {
        let d = dispatcher_with(Arc::new(MemoryStore::new()), true, 0.3);
        let err = d.select_persona("anything", "", None).await.unwrap_err();
        assert!(matches!(err, DispatchError::EmptyCatalog));
        assert_eq!(d.get_selection_analytics().total_selections, 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_catalog_error() {
        let mut mock = MockPersonaStore::new();
        mock.expect_get_all_personas()
            .returning(|| Err(DispatchError::Config("disk unplugged".into())));
        let d = dispatcher_with(Arc::new(mock), true, 0.3);
        let err = d.select_persona("anything", "", None).await.unwrap_err();
        assert!(matches!(err, DispatchError::Catalog(_)));
    }

    #[tokio::test]
    async fn test_generation_disabled_never_grows_catalog() {
        let (store, d) = seeded(false, 1.0);
        d.select_persona("analyze cryptocurrency market trends", "", None)
            .await
            .unwrap();
        assert_eq!(store.get_all_personas().unwrap().len(), 4);
        assert_eq!(d.list_generated_personas().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_generation_when_below_threshold() {
        let (store, d) = seeded(true, 0.9);
        let rec = d
            .select_persona("analyze cryptocurrency market trends", "", None)
            .await
            .unwrap();

        let all = store.get_all_personas().unwrap();
        assert_eq!(all.len(), 5);
        let generated: Vec<&Persona> = all.values().filter(|p| p.auto_generated).collect();
        assert_eq!(generated.len(), 1);
        assert!(generated[0]
            .generation_reason
            .as_deref()
            .is_some_and(|r| !r.is_empty()));

        let in_result = rec.persona_data.auto_generated
            || rec.alternative_personas.iter().any(|p| p.auto_generated);
        assert!(in_result);
        assert_eq!(d.get_auto_generation_status().unwrap().total_generated, 1);
    }

    #[tokio::test]
    async fn test_no_generation_at_zero_threshold() {
        let (store, d) = seeded(true, 0.0);
        d.select_persona("zzz", "", None).await.unwrap();
        assert_eq!(store.get_all_personas().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_tie_break_is_catalog_order() {
        let store = Arc::new(MemoryStore::with_personas([
            Persona::new("b", "B", "d"),
            Persona::new("a", "A", "d"),
            Persona::new("c", "C", "d"),
        ]));
        let d = dispatcher_with(store, false, 0.3);
        let rec = d.select_persona("zzz", "", None).await.unwrap();
        assert_eq!(rec.persona_id, "a");
        let alt: Vec<&str> = rec.alternative_personas.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(alt, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_selection_updates_usage_stats() {
        let (_, d) = seeded(false, 0.3);
        let r1 = d.select_persona("debug Python code", "", None).await.unwrap();
        let r2 = d.select_persona("debug Python code", "", None).await.unwrap();
        let a = d.get_selection_analytics();
        assert_eq!(a.total_selections, 2);
        let stats = &a.persona_usage_stats[&r1.persona_id];
        let mean = (r1.confidence_score + r2.confidence_score) / 2.0;
        assert!((stats.avg_confidence - mean).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_setter() {
        let (_, d) = seeded(true, 0.3);
        assert!(d.set_confidence_threshold(1.5).is_err());
        assert_eq!(d.get_auto_generation_status().unwrap().confidence_threshold, 0.3);
        d.set_confidence_threshold(0.7).unwrap();
        d.enable_auto_generation(false);
        let status = d.get_auto_generation_status().unwrap();
        assert_eq!(status.confidence_threshold, 0.7);
        assert!(!status.enabled);
    }

    #[test]
    fn test_improvement_suggestions() {
        let (_, d) = seeded(true, 0.3);
        let s = d
            .suggest_persona_improvements("market strategy for blockchain startups")
            .unwrap();
        assert_eq!(
            s[0],
            "Consider adding personas for business domain: consultant"
        );
        assert!(s[1].starts_with("Consider adding expertise areas: market, strategy, blockchain"));
    }

    #[tokio::test]
    async fn test_completion_without_context_is_logged() {
        let (_, d) = seeded(true, 0.3);
        let ok = d
            .complete_task_with_context_update("implement login", "done", "tech_expert", None)
            .await;
        assert!(!ok);
        assert_eq!(d.get_selection_analytics().completed_tasks, 1);
        assert_eq!(d.get_selection_analytics().total_selections, 0);
    }
}

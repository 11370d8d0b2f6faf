// src/core/analytics.rs — Dispatcher state: selection log, usage, feedback
//
// `DispatcherState` is owned by the dispatcher behind a single mutex. Every
// method here is synchronous and does its whole read-modify-write while the
// caller holds that lock.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::{Audience, Complexity, Domain, PersonaRecommendation, TaskCategory, TaskContext};
use crate::infra::errors::{DispatchError, Result};
use crate::util::now_rfc3339;

/// Feedback at or above this counts as a success.
const SUCCESS_FEEDBACK: u8 = 4;
/// Feedback at or below this counts as negative.
const NEGATIVE_FEEDBACK: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionLogEntry {
    pub timestamp: String,
    pub task_description: String,
    pub task_category: TaskCategory,
    pub selected_persona: String,
    pub confidence_score: f64,
    pub domain: Domain,
    pub complexity: Complexity,
    pub audience: Audience,
    pub auto_generated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub usage_count: u64,
    /// Running mean of every confidence recorded for the persona.
    pub avg_confidence: f64,
    pub task_categories: BTreeMap<TaskCategory, u64>,
}

impl UsageStats {
    fn record(&mut self, confidence: f64, category: TaskCategory) {
        self.usage_count += 1;
        let n = self.usage_count as f64;
        self.avg_confidence += (confidence - self.avg_confidence) / n;
        *self.task_categories.entry(category).or_insert(0) += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub timestamp: String,
    pub task_description: String,
    pub selected_persona: String,
    pub feedback_score: u8,
    pub feedback_comment: String,
    pub task_category: TaskCategory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_selections: u64,
    pub total_feedback: u64,
    pub feedback_scores: Vec<u8>,
    pub average_feedback: f64,
    pub success_rate: f64,
}

impl PerformanceMetrics {
    fn add_feedback(&mut self, score: u8) {
        self.total_feedback += 1;
        self.feedback_scores.push(score);
        let n = self.feedback_scores.len() as f64;
        let sum: u64 = self.feedback_scores.iter().map(|s| u64::from(*s)).sum();
        let successes = self
            .feedback_scores
            .iter()
            .filter(|s| **s >= SUCCESS_FEEDBACK)
            .count();
        self.average_feedback = sum as f64 / n;
        self.success_rate = successes as f64 / n;
    }
}

/// A task reported finished through the completion loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEntry {
    pub timestamp: String,
    pub task: String,
    pub result: String,
    pub persona_used: String,
    pub context_updated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackSummary {
    pub total_feedback: usize,
    pub average_feedback: f64,
    /// Count per score 1..=5.
    pub feedback_distribution: BTreeMap<u8, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformer {
    pub persona_id: String,
    pub average_feedback: f64,
    pub success_rate: f64,
    pub total_selections: u64,
    pub total_feedback: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub persona_performance: BTreeMap<String, PerformanceMetrics>,
    pub feedback_summary: FeedbackSummary,
    pub top_performers: Vec<TopPerformer>,
    pub improvement_suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionAnalytics {
    pub total_selections: usize,
    pub average_confidence: f64,
    pub persona_usage: BTreeMap<String, u64>,
    pub auto_generated_used: usize,
    pub task_categories: BTreeMap<TaskCategory, u64>,
    pub domains: BTreeMap<Domain, u64>,
    pub recent_selections: Vec<SelectionLogEntry>,
    pub persona_usage_stats: BTreeMap<String, UsageStats>,
    pub completed_tasks: usize,
    pub performance_metrics: PerformanceReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AutoGenerationSettings {
    pub enabled: bool,
    pub confidence_threshold: f64,
}

/// Everything the dispatcher mutates. Lives as long as the dispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherState {
    pub task_history: Vec<SelectionLogEntry>,
    pub completion_log: Vec<CompletionEntry>,
    pub persona_usage_stats: BTreeMap<String, UsageStats>,
    pub feedback_history: Vec<FeedbackEntry>,
    pub performance_metrics: BTreeMap<String, PerformanceMetrics>,
    pub auto_generation_enabled: bool,
    pub confidence_threshold: f64,
    history_limit: usize,
}

impl DispatcherState {
    pub fn new(auto_generation_enabled: bool, confidence_threshold: f64, history_limit: usize) -> Result<Self> {
        validate_threshold(confidence_threshold)?;
        Ok(Self {
            task_history: Vec::new(),
            completion_log: Vec::new(),
            persona_usage_stats: BTreeMap::new(),
            feedback_history: Vec::new(),
            performance_metrics: BTreeMap::new(),
            auto_generation_enabled,
            confidence_threshold,
            history_limit,
        })
    }

    pub fn settings(&self) -> AutoGenerationSettings {
        AutoGenerationSettings {
            enabled: self.auto_generation_enabled,
            confidence_threshold: self.confidence_threshold,
        }
    }

    /// Rejects values outside [0, 1] and keeps the previous threshold.
    pub fn set_confidence_threshold(&mut self, threshold: f64) -> Result<()> {
        validate_threshold(threshold)?;
        self.confidence_threshold = threshold;
        Ok(())
    }

    pub fn set_auto_generation(&mut self, enabled: bool) {
        self.auto_generation_enabled = enabled;
    }

    pub fn log_selection(&mut self, task: &TaskContext, rec: &PersonaRecommendation, auto_generated: bool) {
        self.task_history.push(SelectionLogEntry {
            timestamp: now_rfc3339(),
            task_description: task.task_description.clone(),
            task_category: rec.task_category,
            selected_persona: rec.persona_id.clone(),
            confidence_score: rec.confidence_score,
            domain: task.domain,
            complexity: task.complexity,
            audience: task.audience,
            auto_generated,
        });

        self.persona_usage_stats
            .entry(rec.persona_id.clone())
            .or_default()
            .record(rec.confidence_score, rec.task_category);

        self.performance_metrics
            .entry(rec.persona_id.clone())
            .or_default()
            .total_selections += 1;
    }

    pub fn record_feedback(
        &mut self,
        task_description: &str,
        persona_id: &str,
        score: u8,
        comment: &str,
        category: TaskCategory,
    ) -> Result<()> {
        if !(1..=5).contains(&score) {
            return Err(DispatchError::InvalidFeedback { score });
        }
        self.feedback_history.push(FeedbackEntry {
            timestamp: now_rfc3339(),
            task_description: task_description.to_string(),
            selected_persona: persona_id.to_string(),
            feedback_score: score,
            feedback_comment: comment.to_string(),
            task_category: category,
        });
        self.performance_metrics
            .entry(persona_id.to_string())
            .or_default()
            .add_feedback(score);
        Ok(())
    }

    pub fn record_completion(&mut self, entry: CompletionEntry) {
        self.completion_log.push(entry);
    }

    /// Aggregates over the selection log. Read-only.
    pub fn analytics(&self) -> SelectionAnalytics {
        let total = self.task_history.len();
        let mut persona_usage = BTreeMap::new();
        let mut task_categories = BTreeMap::new();
        let mut domains = BTreeMap::new();
        let mut auto_generated_used = 0;
        let mut confidence_sum = 0.0;

        for entry in &self.task_history {
            *persona_usage.entry(entry.selected_persona.clone()).or_insert(0) += 1;
            *task_categories.entry(entry.task_category).or_insert(0) += 1;
            *domains.entry(entry.domain).or_insert(0) += 1;
            if entry.auto_generated {
                auto_generated_used += 1;
            }
            confidence_sum += entry.confidence_score;
        }

        let skip = total.saturating_sub(self.history_limit);
        SelectionAnalytics {
            total_selections: total,
            average_confidence: if total == 0 { 0.0 } else { confidence_sum / total as f64 },
            persona_usage,
            auto_generated_used,
            task_categories,
            domains,
            recent_selections: self.task_history[skip..].to_vec(),
            persona_usage_stats: self.persona_usage_stats.clone(),
            completed_tasks: self.completion_log.len(),
            performance_metrics: self.performance_report(),
        }
    }

    pub fn performance_report(&self) -> PerformanceReport {
        PerformanceReport {
            persona_performance: self.performance_metrics.clone(),
            feedback_summary: self.feedback_summary(),
            top_performers: self.top_performers(),
            improvement_suggestions: self.improvement_suggestions(),
        }
    }

    fn feedback_summary(&self) -> FeedbackSummary {
        let mut distribution: BTreeMap<u8, u64> = (1..=5).map(|s| (s, 0)).collect();
        let mut sum = 0u64;
        for f in &self.feedback_history {
            *distribution.entry(f.feedback_score).or_insert(0) += 1;
            sum += u64::from(f.feedback_score);
        }
        let n = self.feedback_history.len();
        FeedbackSummary {
            total_feedback: n,
            average_feedback: if n == 0 { 0.0 } else { sum as f64 / n as f64 },
            feedback_distribution: distribution,
        }
    }

    /// Personas with at least two feedback entries, best success rate first
    /// (average feedback breaks ties). At most five.
    fn top_performers(&self) -> Vec<TopPerformer> {
        let mut performers: Vec<TopPerformer> = self
            .performance_metrics
            .iter()
            .filter(|(_, m)| m.total_feedback >= 2)
            .map(|(id, m)| TopPerformer {
                persona_id: id.clone(),
                average_feedback: m.average_feedback,
                success_rate: m.success_rate,
                total_selections: m.total_selections,
                total_feedback: m.total_feedback,
            })
            .collect();
        performers.sort_by(|a, b| {
            b.success_rate
                .partial_cmp(&a.success_rate)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    b.average_feedback
                        .partial_cmp(&a.average_feedback)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });
        performers.truncate(5);
        performers
    }

    fn improvement_suggestions(&self) -> Vec<String> {
        let mut suggestions: Vec<String> = self
            .performance_metrics
            .iter()
            .filter(|(_, m)| m.total_feedback >= 3 && m.success_rate < 0.6)
            .map(|(id, m)| {
                format!(
                    "Consider improving {id} (success rate: {:.1}%)",
                    m.success_rate * 100.0
                )
            })
            .collect();

        let mut negative_by_category: BTreeMap<TaskCategory, usize> = BTreeMap::new();
        for f in self
            .feedback_history
            .iter()
            .filter(|f| f.feedback_score <= NEGATIVE_FEEDBACK)
        {
            *negative_by_category.entry(f.task_category).or_insert(0) += 1;
        }
        suggestions.extend(
            negative_by_category
                .into_iter()
                .filter(|(_, n)| *n >= 2)
                .map(|(cat, _)| format!("Improve persona selection for {cat} tasks")),
        );
        suggestions
    }
}

fn validate_threshold(value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DispatchError::InvalidThreshold { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analyzer::TaskAnalyzer;
    use crate::persona::types::Persona;
    use pretty_assertions::assert_eq;

    fn state() -> DispatcherState {
        DispatcherState::new(true, 0.3, 10).unwrap()
    }

    fn rec(id: &str, confidence: f64, category: TaskCategory) -> PersonaRecommendation {
        PersonaRecommendation {
            persona_id: id.into(),
            persona_data: Persona::new(id, id, "d"),
            confidence_score: confidence,
            reasoning: vec![],
            alternative_personas: vec![],
            task_category: category,
            context_insights: vec![],
        }
    }

    #[test]
    fn test_threshold_rejected_keeps_previous() {
        let mut s = state();
        assert!(s.set_confidence_threshold(1.01).is_err());
        assert!(s.set_confidence_threshold(-0.1).is_err());
        assert!(s.set_confidence_threshold(f64::NAN).is_err());
        assert_eq!(s.confidence_threshold, 0.3);
        s.set_confidence_threshold(1.0).unwrap();
        assert_eq!(s.confidence_threshold, 1.0);
    }

    #[test]
    fn test_running_average() {
        let mut s = state();
        let task = TaskAnalyzer::new().analyze("debug code", "");
        let scores = [0.2, 0.9, 0.55, 0.1];
        for c in scores {
            s.log_selection(&task, &rec("p", c, TaskCategory::Technical), false);
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        let stats = &s.persona_usage_stats["p"];
        assert_eq!(stats.usage_count, 4);
        assert!((stats.avg_confidence - mean).abs() < 1e-12);
        assert_eq!(stats.task_categories[&TaskCategory::Technical], 4);
    }

    #[test]
    fn test_feedback_metrics() {
        let mut s = state();
        s.record_feedback("t", "p1", 5, "", TaskCategory::General).unwrap();
        s.record_feedback("t", "p1", 1, "", TaskCategory::General).unwrap();
        let m = &s.performance_metrics["p1"];
        assert_eq!(m.average_feedback, 3.0);
        assert_eq!(m.success_rate, 0.5);
        assert!(matches!(
            s.record_feedback("t", "p1", 0, "", TaskCategory::General),
            Err(DispatchError::InvalidFeedback { score: 0 })
        ));
        assert!(s.record_feedback("t", "p1", 6, "", TaskCategory::General).is_err());
    }

    #[test]
    fn test_analytics_empty() {
        let a = state().analytics();
        assert_eq!(a.total_selections, 0);
        assert_eq!(a.average_confidence, 0.0);
        assert!(a.recent_selections.is_empty());
        assert_eq!(a.performance_metrics.feedback_summary.feedback_distribution.len(), 5);
    }

    #[test]
    fn test_analytics_counts_and_history_limit() {
        let mut s = DispatcherState::new(true, 0.3, 2).unwrap();
        let task = TaskAnalyzer::new().analyze("debug code", "");
        s.log_selection(&task, &rec("a", 0.4, TaskCategory::Technical), false);
        s.log_selection(&task, &rec("b", 0.6, TaskCategory::Technical), true);
        s.log_selection(&task, &rec("a", 0.8, TaskCategory::Creative), false);

        let a = s.analytics();
        assert_eq!(a.total_selections, 3);
        assert!((a.average_confidence - 0.6).abs() < 1e-12);
        assert_eq!(a.persona_usage["a"], 2);
        assert_eq!(a.auto_generated_used, 1);
        assert_eq!(a.task_categories[&TaskCategory::Technical], 2);
        assert_eq!(a.domains[&Domain::Technology], 3);
        assert_eq!(a.recent_selections.len(), 2);
        assert_eq!(a.recent_selections[0].selected_persona, "b");
        // no selection in between: identical aggregates
        assert_eq!(s.analytics(), a);
    }

    #[test]
    fn test_top_performers_and_suggestions() {
        let mut s = state();
        for score in [5, 5, 4] {
            s.record_feedback("t", "good", score, "", TaskCategory::Technical).unwrap();
        }
        for score in [1, 2, 4] {
            s.record_feedback("t", "bad", score, "", TaskCategory::Creative).unwrap();
        }
        s.record_feedback("t", "once", 5, "", TaskCategory::Technical).unwrap();

        let report = s.performance_report();
        let ids: Vec<&str> = report
            .top_performers
            .iter()
            .map(|p| p.persona_id.as_str())
            .collect();
        assert_eq!(ids, vec!["good", "bad"]);
        assert_eq!(
            report.improvement_suggestions,
            vec![
                "Consider improving bad (success rate: 33.3%)".to_string(),
                "Improve persona selection for creative tasks".to_string(),
            ]
        );
        assert_eq!(report.feedback_summary.total_feedback, 7);
        assert_eq!(report.feedback_summary.feedback_distribution[&5], 3);
    }
}

// src/core/scorer.rs — Weighted persona/task match scoring

use serde::Serialize;

use super::types::{Audience, ScoredPersona, TaskCategory, TaskContext};
use crate::persona::types::Persona;
use crate::util::sequence_similarity;

pub const EXPERTISE_WEIGHT: f64 = 0.35;
pub const CATEGORY_WEIGHT: f64 = 0.25;
pub const CONTEXT_WEIGHT: f64 = 0.20;
pub const STYLE_WEIGHT: f64 = 0.15;
pub const TRAIT_WEIGHT: f64 = 0.05;

/// Multiplier applied to personas the project context recommends.
pub const CONTEXT_BOOST: f64 = 1.5;

/// Category sub-score for a persona with no category.
const UNCATEGORIZED_SCORE: f64 = 0.5;

/// Style keywords preferred for each audience bucket.
fn preferred_styles(audience: Audience) -> &'static [&'static str] {
    match audience {
        Audience::Technical => &["professional", "technical", "analytical"],
        Audience::Business => &["strategic", "analytical", "professional"],
        Audience::General => &["patient", "explanatory", "engaging"],
        Audience::Expert => &["technical", "analytical", "professional"],
    }
}

/// The five sub-scores behind one persona's match score, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub expertise: f64,
    pub category: f64,
    pub context: f64,
    pub style: f64,
    pub traits: f64,
}

impl ScoreBreakdown {
    /// Weighted sum, clamped to 1.0.
    pub fn total(&self) -> f64 {
        let raw = self.expertise * EXPERTISE_WEIGHT
            + self.category * CATEGORY_WEIGHT
            + self.context * CONTEXT_WEIGHT
            + self.style * STYLE_WEIGHT
            + self.traits * TRAIT_WEIGHT;
        raw.clamp(0.0, 1.0)
    }

    /// Human-readable contributing factors (only the non-zero ones).
    pub fn reasoning(&self) -> Vec<String> {
        let factors = [
            ("Expertise match", self.expertise),
            ("Category match", self.category),
            ("Context alignment", self.context),
            ("Style match", self.style),
            ("Trait match", self.traits),
        ];
        factors
            .iter()
            .filter(|(_, v)| *v > 0.0)
            .map(|(label, v)| format!("{label}: {v:.2}"))
            .collect()
    }
}

/// Scores catalog personas against an analyzed task.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonaScorer;

impl PersonaScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn breakdown(
        &self,
        persona: &Persona,
        task: &TaskContext,
        category: TaskCategory,
    ) -> ScoreBreakdown {
        let text = task.full_text();
        ScoreBreakdown {
            expertise: fraction_present(&persona.expertise, &text),
            category: category_score(persona.category, category),
            context: context_score(&persona.context, &text),
            style: style_score(&persona.communication_style, task.audience),
            traits: fraction_present(&persona.personality_traits, &text),
        }
    }

    /// Score in [0, 1] plus the reasoning lines that produced it.
    pub fn score(
        &self,
        persona: &Persona,
        task: &TaskContext,
        category: TaskCategory,
    ) -> (f64, Vec<String>) {
        let b = self.breakdown(persona, task, category);
        (b.total(), b.reasoning())
    }

    pub fn score_persona(
        &self,
        persona_id: &str,
        persona: &Persona,
        task: &TaskContext,
        category: TaskCategory,
    ) -> ScoredPersona {
        let (score, reasoning) = self.score(persona, task, category);
        ScoredPersona {
            persona_id: persona_id.to_string(),
            persona: persona.clone(),
            score,
            reasoning,
        }
    }
}

/// `min(1.0, 1.5 × score)` with an annotation. Never lowers a score.
pub fn apply_context_boost(scored: &mut ScoredPersona, relevance: f64) {
    scored.score = (scored.score * CONTEXT_BOOST).min(1.0);
    scored
        .reasoning
        .push(format!("(Context-boosted: {relevance:.2})"));
}

/// Fraction of `terms` that occur (case-insensitively) in `text`.
fn fraction_present(terms: &[String], text: &str) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }
    let hits = terms
        .iter()
        .filter(|t| !t.is_empty() && text.contains(&t.to_lowercase()))
        .count();
    (hits as f64 / terms.len() as f64).min(1.0)
}

fn category_score(persona: Option<TaskCategory>, task: TaskCategory) -> f64 {
    match persona {
        None => UNCATEGORIZED_SCORE,
        Some(c) if c == task => 1.0,
        Some(_) => 0.0,
    }
}

fn context_score(persona_context: &str, text: &str) -> f64 {
    if persona_context.trim().is_empty() {
        return 0.0;
    }
    sequence_similarity(persona_context, text)
}

fn style_score(style: &str, audience: Audience) -> f64 {
    let style = style.to_lowercase();
    if style.is_empty() {
        return 0.0;
    }
    if preferred_styles(audience)
        .iter()
        .any(|pref| style.contains(pref))
    {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analyzer::TaskAnalyzer;

    fn tech_expert() -> Persona {
        Persona::new("tech_expert", "Tech Expert", "Software engineer")
            .with_expertise(["Python", "Debugging"])
            .with_style("Technical and precise")
            .with_context("Use for programming and debugging tasks")
            .with_traits(["analytical", "precise"])
            .with_category(TaskCategory::Technical)
    }

    #[test]
    fn test_expertise_fraction() {
        let ctx = TaskAnalyzer::new().analyze("debug Python code", "");
        let b = PersonaScorer::new().breakdown(&tech_expert(), &ctx, TaskCategory::Technical);
        // "python" present, "debugging" is not a substring of "debug python code"
        assert!((b.expertise - 0.5).abs() < 1e-9);
        assert!((b.category - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_scores() {
        assert_eq!(category_score(None, TaskCategory::Design), 0.5);
        assert_eq!(
            category_score(Some(TaskCategory::Design), TaskCategory::Design),
            1.0
        );
        assert_eq!(
            category_score(Some(TaskCategory::Creative), TaskCategory::Design),
            0.0
        );
    }

    #[test]
    fn test_style_by_audience() {
        assert_eq!(style_score("Technical and precise", Audience::Technical), 1.0);
        assert_eq!(style_score("Technical and precise", Audience::General), 0.0);
        assert_eq!(style_score("Patient, explanatory", Audience::General), 1.0);
        assert_eq!(style_score("", Audience::Expert), 0.0);
    }

    #[test]
    fn test_score_bounded() {
        let ctx = TaskAnalyzer::new().analyze(
            "use for programming and debugging tasks python debugging analytical precise technical developer",
            "",
        );
        let (score, reasoning) =
            PersonaScorer::new().score(&tech_expert(), &ctx, TaskCategory::Technical);
        assert!((0.0..=1.0).contains(&score));
        assert!(!reasoning.is_empty());
    }

    #[test]
    fn test_empty_persona_scores_only_uncategorized_default() {
        let ctx = TaskAnalyzer::new().analyze("anything", "");
        let p = Persona::new("x", "X", "x");
        let (score, reasoning) = PersonaScorer::new().score(&p, &ctx, TaskCategory::General);
        assert!((score - 0.5 * CATEGORY_WEIGHT).abs() < 1e-9);
        assert_eq!(reasoning, vec!["Category match: 0.50".to_string()]);
    }

    #[test]
    fn test_boost_is_min_one_of_one_and_a_half() {
        let mut s = ScoredPersona {
            persona_id: "a".into(),
            persona: Persona::new("a", "A", "a"),
            score: 0.4,
            reasoning: vec![],
        };
        apply_context_boost(&mut s, 0.7);
        assert!((s.score - 0.6).abs() < 1e-9);
        assert_eq!(s.reasoning.last().map(String::as_str), Some("(Context-boosted: 0.70)"));

        s.score = 0.9;
        apply_context_boost(&mut s, 0.0);
        assert_eq!(s.score, 1.0);
    }
}

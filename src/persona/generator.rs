// src/persona/generator.rs — Template-based persona synthesis
//
// Used when no catalog persona clears the confidence threshold. A template is
// picked for the task's domain and customized with the task's keywords,
// audience, complexity and urgency.

use chrono::{DateTime, Utc};

use super::templates::{domain_templates, PersonaTemplate, GENERIC_TEMPLATES};
use super::types::Persona;
use crate::core::types::{Audience, Complexity, Domain, TaskCategory, TaskContext, Urgency};
use crate::util::{extract_task_keywords, sanitize_id, title_case, truncate_str};

const MAX_KEYWORDS: usize = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct PersonaGenerator;

impl PersonaGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Build a new persona for `task`. `best_score` is the score of the best
    /// existing persona and ends up in `generation_reason`.
    pub fn generate(
        &self,
        task: &TaskContext,
        category: TaskCategory,
        best_score: f64,
    ) -> Option<Persona> {
        self.generate_at(task, category, best_score, Utc::now())
    }

    pub fn generate_at(
        &self,
        task: &TaskContext,
        category: TaskCategory,
        best_score: f64,
        now: DateTime<Utc>,
    ) -> Option<Persona> {
        let keywords = extract_task_keywords(&task.task_description, MAX_KEYWORDS);
        let template = self.select_template(task.domain, category, &keywords)?;

        let name = customize_name(template.name, &keywords, task.domain);
        let id = format!("{}_{}", sanitize_id(&name), now.format("%Y%m%d_%H%M%S"));
        let timestamp = now.to_rfc3339();

        let persona = Persona {
            id,
            name,
            description: customize_description(template.description, task.domain),
            expertise: expand_expertise(template.base_expertise, &keywords, task.domain),
            communication_style: audience_style(task.audience).to_string(),
            context: customize_context(template.context, task.complexity, task.urgency),
            personality_traits: template
                .personality_traits
                .iter()
                .map(|t| t.to_string())
                .collect(),
            category: Some(category),
            auto_generated: true,
            generation_reason: Some(format!(
                "Low confidence ({best_score:.2}) for task: {}...",
                truncate_str(&task.task_description, 50)
            )),
            original_task: Some(task.task_description.clone()),
            task_category: Some(category),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };

        tracing::info!(
            "Generated persona '{}' for domain '{}'",
            persona.name,
            task.domain.as_str()
        );
        Some(persona)
    }

    /// Best domain template by [`template_score`]; generic fallback when the
    /// domain has none or none scores above zero.
    pub fn select_template(
        &self,
        domain: Domain,
        category: TaskCategory,
        keywords: &[String],
    ) -> Option<&'static PersonaTemplate> {
        let mut best: Option<(&'static PersonaTemplate, f64)> = None;
        for template in domain_templates(domain) {
            let score = template_score(template, keywords, category);
            if score > best.map_or(0.0, |(_, s)| s) {
                best = Some((template, score));
            }
        }
        if let Some((template, _)) = best {
            return Some(template);
        }

        GENERIC_TEMPLATES
            .iter()
            .find(|t| t.category == category)
            .or_else(|| GENERIC_TEMPLATES.first())
    }

    /// Review hints for a generated persona.
    pub fn suggest_improvements(&self, persona: &Persona, task: &TaskContext) -> Vec<String> {
        let mut suggestions = Vec::new();
        if persona.expertise.len() < 3 {
            suggestions.push("Consider adding more specific expertise areas".to_string());
        }
        if persona.description.chars().count() < 50 {
            suggestions
                .push("Consider expanding the description with more specific details".to_string());
        }
        if persona.context.chars().count() < 30 {
            suggestions.push(
                "Consider adding more specific context about when to use this persona".to_string(),
            );
        }
        let domain_hint = match task.domain {
            Domain::Technology => Some("Consider adding specific programming languages or technologies"),
            Domain::Science => Some("Consider adding specific research methodologies or fields"),
            Domain::Business => Some("Consider adding specific business functions or industries"),
            Domain::Creative => Some("Consider adding specific creative mediums or styles"),
            _ => None,
        };
        suggestions.extend(domain_hint.map(String::from));
        suggestions
    }
}

/// +0.5 for a category match, +0.2 per keyword found in an expertise term,
/// +0.3 per keyword found in the name; capped at 1.0.
pub fn template_score(template: &PersonaTemplate, keywords: &[String], category: TaskCategory) -> f64 {
    let mut score = 0.0;
    if template.category == category {
        score += 0.5;
    }
    for kw in keywords {
        let kw = kw.to_lowercase();
        for exp in template.base_expertise {
            if exp.to_lowercase().contains(&kw) {
                score += 0.2;
            }
        }
        if template.name.to_lowercase().contains(&kw) {
            score += 0.3;
        }
    }
    f64::min(score, 1.0)
}

fn customize_name(base: &str, keywords: &[String], domain: Domain) -> String {
    let has_any = |words: &[&str]| keywords.iter().any(|k| words.contains(&k.as_str()));
    let prefix = match domain {
        Domain::Technology if has_any(&["ai", "machine", "learning"]) => Some("AI"),
        Domain::Science if has_any(&["medical", "health", "clinical"]) => Some("Medical"),
        Domain::Business if has_any(&["financial", "investment", "trading"]) => Some("Financial"),
        Domain::Creative if has_any(&["digital", "online", "web"]) => Some("Digital"),
        _ => None,
    };
    match prefix {
        Some(p) => format!("{p} {base}"),
        None => base.to_string(),
    }
}

fn customize_description(base: &str, domain: Domain) -> String {
    let clause = match domain {
        Domain::Technology => "with expertise in modern software development and emerging technologies",
        Domain::Science => "with strong research methodology and analytical capabilities",
        Domain::Business => "with strategic thinking and data-driven decision making",
        Domain::Creative => "with innovative approaches and creative problem-solving skills",
        Domain::Healthcare => "with clinical expertise and patient-centered approach",
        Domain::Legal => "with regulatory knowledge and compliance expertise",
        Domain::Finance => "with financial acumen and risk management skills",
        Domain::Education | Domain::General => return base.to_string(),
    };
    format!("{base} {clause}")
}

fn domain_expertise(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Technology => &["Programming", "System Design", "Problem Solving"],
        Domain::Science => &["Research", "Analysis", "Methodology"],
        Domain::Business => &["Strategy", "Analysis", "Planning"],
        Domain::Creative => &["Creative Thinking", "Innovation", "Design"],
        Domain::Healthcare => &["Medical Knowledge", "Patient Care", "Clinical Skills"],
        Domain::Legal => &["Legal Analysis", "Compliance", "Regulatory Knowledge"],
        Domain::Finance => &["Financial Analysis", "Risk Management", "Investment"],
        Domain::Education | Domain::General => &[],
    }
}

/// Template expertise ∪ domain expertise ∪ top-3 task keywords (title-cased),
/// first occurrence kept.
fn expand_expertise(base: &[&str], keywords: &[String], domain: Domain) -> Vec<String> {
    let candidates = base
        .iter()
        .chain(domain_expertise(domain))
        .map(|s| s.to_string())
        .chain(
            keywords
                .iter()
                .take(3)
                .filter(|k| k.len() > 3)
                .map(|k| title_case(k)),
        );

    let mut expertise: Vec<String> = Vec::new();
    for item in candidates {
        if !expertise.contains(&item) {
            expertise.push(item);
        }
    }
    expertise
}

fn audience_style(audience: Audience) -> &'static str {
    match audience {
        Audience::Technical => "Technical and precise",
        Audience::Business => "Professional and strategic",
        Audience::General => "Clear and accessible",
        Audience::Expert => "Advanced and detailed",
    }
}

fn customize_context(base: &str, complexity: Complexity, urgency: Urgency) -> String {
    let complexity = match complexity {
        Complexity::High => "complex and advanced",
        Complexity::Medium => "moderate complexity",
        Complexity::Low => "straightforward and simple",
    };
    let urgency = match urgency {
        Urgency::High => "urgent and time-sensitive",
        Urgency::Normal => "standard timeline",
        Urgency::Low => "flexible timeline",
    };
    format!("{base} for {complexity} tasks with {urgency} requirements")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analyzer::TaskAnalyzer;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn test_generates_business_strategist_for_crypto_market_task() {
        let task = TaskAnalyzer::new().analyze("analyze cryptocurrency market trends", "");
        let p = PersonaGenerator::new()
            .generate_at(&task, TaskCategory::Business, 0.12, fixed_now())
            .unwrap();

        assert_eq!(p.name, "Business Strategist");
        assert_eq!(p.id, "business_strategist_20240305_140709");
        assert!(p.auto_generated);
        assert_eq!(p.category, Some(TaskCategory::Business));
        assert_eq!(
            p.generation_reason.as_deref(),
            Some("Low confidence (0.12) for task: analyze cryptocurrency market trends...")
        );
        assert!(p.expertise.contains(&"Cryptocurrency".to_string()));
        assert!(p.expertise.contains(&"Strategy".to_string()));
        assert_eq!(p.communication_style, "Clear and accessible");
        assert!(p
            .context
            .ends_with("for moderate complexity tasks with standard timeline requirements"));
    }

    #[test]
    fn test_name_prefix() {
        let kws = vec!["machine".to_string(), "learning".to_string()];
        assert_eq!(
            customize_name("Software Engineer", &kws, Domain::Technology),
            "AI Software Engineer"
        );
        assert_eq!(
            customize_name("Software Engineer", &kws, Domain::Business),
            "Software Engineer"
        );
    }

    #[test]
    fn test_template_score_capped() {
        let t = &domain_templates(Domain::Technology)[2]; // Data Engineer
        let kws: Vec<String> = ["data", "pipelines", "engineering", "big"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(template_score(t, &kws, TaskCategory::Technical), 1.0);
        assert_eq!(template_score(t, &[], TaskCategory::Creative), 0.0);
    }

    #[test]
    fn test_unknown_domain_falls_back_to_generic() {
        let g = PersonaGenerator::new();
        let t = g.select_template(Domain::Education, TaskCategory::Educational, &[]).unwrap();
        assert_eq!(t.name, "Domain Specialist");
        let t = g.select_template(Domain::General, TaskCategory::General, &[]).unwrap();
        assert_eq!(t.category, TaskCategory::General);
    }

    #[test]
    fn test_zero_scoring_domain_falls_back() {
        // No keyword overlap and no category match among legal templates
        let t = PersonaGenerator::new()
            .select_template(Domain::Legal, TaskCategory::Creative, &["zzz".to_string()])
            .unwrap();
        assert_eq!(t.name, "Domain Specialist");
    }

    #[test]
    fn test_expertise_dedup_preserves_order() {
        let kws = vec!["analysis".to_string()];
        let e = expand_expertise(&["Analysis", "Planning"], &kws, Domain::Business);
        assert_eq!(e, vec!["Analysis", "Planning", "Strategy"]);
    }

    #[test]
    fn test_suggest_improvements() {
        let task = TaskAnalyzer::new().analyze("write code", "");
        let p = Persona::new("x", "X", "short").with_expertise(["One"]);
        let s = PersonaGenerator::new().suggest_improvements(&p, &task);
        assert_eq!(s.len(), 4);
        assert!(s[3].contains("programming languages"));
    }
}

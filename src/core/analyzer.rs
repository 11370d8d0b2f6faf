// src/core/analyzer.rs — Keyword-table task analysis
//
// Every dimension is scored independently against a fixed keyword table by
// counting keyword substrings in the lower-cased task + context text. The
// label with the strictly highest count wins; ties go to the group listed
// first; no hits at all falls back to the dimension's default.

use super::types::{Audience, Complexity, Domain, OutputFormat, TaskContext, Urgency};
use crate::util::{best_label, combined_text};

const DOMAIN_KEYWORDS: &[(Domain, &[&str])] = &[
    (Domain::Technology, &["tech", "software", "programming", "code", "system"]),
    (Domain::Business, &["business", "market", "strategy", "process", "management"]),
    (Domain::Creative, &["creative", "art", "design", "content", "story"]),
    (
        Domain::Education,
        &[
            "education", "teaching", "learning", "training", "how to", "tutorial", "guide",
            "instruct", "explain", "demonstrate",
        ],
    ),
    (Domain::Science, &["science", "research", "analysis", "data", "experiment"]),
    (Domain::Healthcare, &["health", "medical", "patient", "clinical", "diagnosis"]),
    (Domain::Finance, &["finance", "investment", "money", "budget", "financial"]),
    (Domain::Legal, &["legal", "law", "contract", "compliance", "regulation"]),
];

const COMPLEXITY_KEYWORDS: &[(Complexity, &[&str])] = &[
    (
        Complexity::High,
        &["complex", "advanced", "sophisticated", "intricate", "detailed", "comprehensive"],
    ),
    (Complexity::Low, &["simple", "basic", "easy", "straightforward", "quick"]),
];

const URGENCY_KEYWORDS: &[(Urgency, &[&str])] = &[
    (
        Urgency::High,
        &["urgent", "asap", "emergency", "critical", "immediate", "quickly"],
    ),
    (
        Urgency::Low,
        &["when convenient", "no rush", "take your time", "leisurely"],
    ),
];

const AUDIENCE_KEYWORDS: &[(Audience, &[&str])] = &[
    (
        Audience::Technical,
        &["developer", "engineer", "technical", "programmer", "architect"],
    ),
    (
        Audience::Business,
        &["executive", "manager", "business", "stakeholder", "client"],
    ),
    (Audience::Expert, &["expert", "specialist", "professional", "advanced"]),
    (Audience::General, &["user", "customer", "general", "public", "beginner"]),
];

const OUTPUT_FORMAT_KEYWORDS: &[(OutputFormat, &[&str])] = &[
    (
        OutputFormat::Code,
        &["code", "script", "program", "function", "class", "implementation"],
    ),
    (
        OutputFormat::Analysis,
        &["analysis", "report", "insights", "findings", "evaluation"],
    ),
    (
        OutputFormat::Creative,
        &["story", "narrative", "creative", "artistic", "imaginative"],
    ),
    (
        OutputFormat::Documentation,
        &["documentation", "guide", "manual", "tutorial", "instructions"],
    ),
];

/// Turns raw task text into a [`TaskContext`]. Pure; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskAnalyzer;

impl TaskAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, task_description: &str, context: &str) -> TaskContext {
        let text = combined_text(task_description, context);

        TaskContext {
            task_description: task_description.to_string(),
            user_context: context.to_string(),
            domain: best_label(&text, DOMAIN_KEYWORDS).unwrap_or_default(),
            complexity: best_label(&text, COMPLEXITY_KEYWORDS).unwrap_or_default(),
            urgency: best_label(&text, URGENCY_KEYWORDS).unwrap_or_default(),
            audience: best_label(&text, AUDIENCE_KEYWORDS).unwrap_or_default(),
            output_format: best_label(&text, OUTPUT_FORMAT_KEYWORDS).unwrap_or_default(),
        }
    }
}

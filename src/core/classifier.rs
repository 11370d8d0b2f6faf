// src/core/classifier.rs — TaskContext → TaskCategory

use super::types::{TaskCategory, TaskContext};
use crate::util::best_label;

/// Curated keyword lists per category, in tie-break order.
const CATEGORY_KEYWORDS: &[(TaskCategory, &[&str])] = &[
    (
        TaskCategory::Technical,
        &[
            "debug", "code", "programming", "software", "technical", "implementation",
            "algorithm", "system", "architecture", "development", "engineering", "python",
            "javascript", "api", "database", "server", "deployment",
        ],
    ),
    (
        TaskCategory::Creative,
        &[
            "write", "story", "creative", "narrative", "content", "marketing", "copy", "brand",
            "imaginative", "artistic", "expressive", "engaging", "storytelling",
            "creative writing", "content creation",
        ],
    ),
    (
        TaskCategory::Business,
        &[
            "business", "analysis", "strategy", "market", "process", "optimization",
            "data analysis", "insights", "planning", "consulting", "management",
            "business case", "roi", "efficiency",
        ],
    ),
    (
        TaskCategory::Educational,
        &[
            "teach", "explain", "educate", "learn", "training", "curriculum", "instructional",
            "pedagogy", "tutorial", "guide", "mentor", "educational", "learning", "teaching",
            "instruction", "how to", "step by step", "walkthrough", "demonstrate", "show",
            "instruct", "coach", "help", "assist", "support", "clarify", "break down",
            "simplify", "make easy", "understand", "comprehend", "grasp", "follow", "practice",
            "exercise", "workshop", "lesson", "course", "class", "seminar", "presentation",
            "demo", "example",
        ],
    ),
    (
        TaskCategory::Design,
        &[
            "design", "ui", "ux", "visual", "graphic", "aesthetic", "user experience",
            "interface", "branding", "layout", "prototype", "wireframe", "design system",
            "visual design",
        ],
    ),
    (
        TaskCategory::Scientific,
        &[
            "research", "scientific", "methodology", "evidence", "analysis", "experiment",
            "hypothesis", "data", "statistics", "peer review", "scientific method", "empirical",
            "study",
        ],
    ),
    (
        TaskCategory::Consulting,
        &[
            "consult", "advise", "strategy", "problem solving", "organizational",
            "change management", "business consulting", "advisory", "solution",
            "recommendation", "best practices",
        ],
    ),
    (
        TaskCategory::Mentoring,
        &[
            "mentor", "coach", "guide", "support", "development", "career", "leadership",
            "personal development", "growth", "advice", "mentoring", "coaching", "guidance",
        ],
    ),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskClassifier;

impl TaskClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Highest keyword count wins, first-registered category on ties,
    /// `General` when nothing matches.
    pub fn classify(&self, task: &TaskContext) -> TaskCategory {
        best_label(&task.full_text(), CATEGORY_KEYWORDS).unwrap_or(TaskCategory::General)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analyzer::TaskAnalyzer;

    fn classify(task: &str) -> TaskCategory {
        let ctx = TaskAnalyzer::new().analyze(task, "");
        TaskClassifier::new().classify(&ctx)
    }

    #[test]
    fn test_technical() {
        assert_eq!(classify("debug Python code"), TaskCategory::Technical);
    }

    #[test]
    fn test_creative() {
        assert_eq!(
            classify("write an engaging story for our brand"),
            TaskCategory::Creative
        );
    }

    #[test]
    fn test_design() {
        assert_eq!(
            classify("wireframe the layout of a new interface"),
            TaskCategory::Design
        );
    }

    #[test]
    fn test_no_hits_is_general() {
        assert_eq!(classify("zzz qqq"), TaskCategory::General);
        assert_eq!(classify(""), TaskCategory::General);
    }

    #[test]
    fn test_pure_function_of_context() {
        let ctx = TaskAnalyzer::new().analyze("analyze cryptocurrency market trends", "");
        let c = TaskClassifier::new();
        assert_eq!(c.classify(&ctx), c.classify(&ctx.clone()));
        assert_eq!(c.classify(&ctx), TaskCategory::Business);
    }

    #[test]
    fn test_every_table_keyword_is_lowercase() {
        for (_, keywords) in CATEGORY_KEYWORDS {
            for kw in *keywords {
                assert_eq!(*kw, kw.to_lowercase());
            }
        }
    }
}

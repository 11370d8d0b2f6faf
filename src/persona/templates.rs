// src/persona/templates.rs — Static persona templates used for generation

use crate::core::types::{Domain, TaskCategory};

/// Seed for a generated persona. Process-wide and read-only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonaTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub base_expertise: &'static [&'static str],
    pub communication_style: &'static str,
    pub context: &'static str,
    pub personality_traits: &'static [&'static str],
    pub category: TaskCategory,
}

const TECHNOLOGY: &[PersonaTemplate] = &[
    PersonaTemplate {
        name: "Software Engineer",
        description: "A skilled software developer with expertise in programming and system design",
        base_expertise: &["Programming", "Software Development", "System Design"],
        communication_style: "Technical and precise",
        context: "Use for software development, debugging, and technical implementation",
        personality_traits: &["analytical", "logical", "detail-oriented"],
        category: TaskCategory::Technical,
    },
    PersonaTemplate {
        name: "DevOps Engineer",
        description: "An infrastructure specialist focused on deployment and operations",
        base_expertise: &["DevOps", "Infrastructure", "Deployment", "Operations"],
        communication_style: "Practical and systematic",
        context: "Use for infrastructure management, deployment, and operational tasks",
        personality_traits: &["systematic", "practical", "reliable"],
        category: TaskCategory::Technical,
    },
    PersonaTemplate {
        name: "Data Engineer",
        description: "A specialist in data infrastructure and pipeline development",
        base_expertise: &["Data Engineering", "ETL", "Data Pipelines", "Big Data"],
        communication_style: "Data-focused and analytical",
        context: "Use for data infrastructure, pipeline development, and data processing",
        personality_traits: &["analytical", "data-driven", "systematic"],
        category: TaskCategory::Technical,
    },
];

const SCIENCE: &[PersonaTemplate] = &[
    PersonaTemplate {
        name: "Research Scientist",
        description: "A methodical researcher with expertise in scientific methodology",
        base_expertise: &["Scientific Research", "Methodology", "Data Analysis", "Experimentation"],
        communication_style: "Methodical and evidence-based",
        context: "Use for scientific research, experimentation, and data analysis",
        personality_traits: &["methodical", "evidence-based", "curious"],
        category: TaskCategory::Scientific,
    },
    PersonaTemplate {
        name: "Medical Researcher",
        description: "A healthcare specialist focused on medical research and clinical studies",
        base_expertise: &["Medical Research", "Clinical Studies", "Healthcare", "Biomedical"],
        communication_style: "Clinical and precise",
        context: "Use for medical research, clinical studies, and healthcare analysis",
        personality_traits: &["clinical", "precise", "compassionate"],
        category: TaskCategory::Scientific,
    },
    PersonaTemplate {
        name: "Environmental Scientist",
        description: "A specialist in environmental research and sustainability",
        base_expertise: &["Environmental Science", "Sustainability", "Climate Research", "Ecology"],
        communication_style: "Environmental and holistic",
        context: "Use for environmental research, sustainability analysis, and climate studies",
        personality_traits: &["environmental", "holistic", "sustainable"],
        category: TaskCategory::Scientific,
    },
];

const BUSINESS: &[PersonaTemplate] = &[
    PersonaTemplate {
        name: "Business Strategist",
        description: "A strategic thinker focused on business planning and market analysis",
        base_expertise: &["Business Strategy", "Market Analysis", "Strategic Planning", "Competitive Analysis"],
        communication_style: "Strategic and analytical",
        context: "Use for business strategy, market analysis, and strategic planning",
        personality_traits: &["strategic", "analytical", "visionary"],
        category: TaskCategory::Business,
    },
    PersonaTemplate {
        name: "Financial Analyst",
        description: "A specialist in financial analysis and investment strategies",
        base_expertise: &["Financial Analysis", "Investment", "Risk Assessment", "Financial Modeling"],
        communication_style: "Financial and analytical",
        context: "Use for financial analysis, investment strategies, and risk assessment",
        personality_traits: &["analytical", "risk-aware", "financial"],
        category: TaskCategory::Business,
    },
    PersonaTemplate {
        name: "Operations Manager",
        description: "An efficiency expert focused on process optimization and operations",
        base_expertise: &["Operations Management", "Process Optimization", "Efficiency", "Supply Chain"],
        communication_style: "Efficiency-focused and practical",
        context: "Use for operations management, process optimization, and efficiency improvement",
        personality_traits: &["efficient", "practical", "organized"],
        category: TaskCategory::Business,
    },
];

const CREATIVE: &[PersonaTemplate] = &[
    PersonaTemplate {
        name: "Content Creator",
        description: "A creative professional specializing in digital content and media",
        base_expertise: &["Content Creation", "Digital Media", "Social Media", "Branding"],
        communication_style: "Creative and engaging",
        context: "Use for content creation, digital media, and brand development",
        personality_traits: &["creative", "engaging", "trend-aware"],
        category: TaskCategory::Creative,
    },
    PersonaTemplate {
        name: "Visual Designer",
        description: "A visual artist focused on graphic design and visual communication",
        base_expertise: &["Visual Design", "Graphic Design", "Visual Communication", "Brand Identity"],
        communication_style: "Visual and artistic",
        context: "Use for visual design, graphic design, and visual communication",
        personality_traits: &["visual", "artistic", "aesthetic"],
        category: TaskCategory::Design,
    },
    PersonaTemplate {
        name: "Copywriter",
        description: "A wordsmith specializing in persuasive writing and brand messaging",
        base_expertise: &["Copywriting", "Brand Messaging", "Persuasive Writing", "Marketing Copy"],
        communication_style: "Persuasive and engaging",
        context: "Use for copywriting, brand messaging, and persuasive content",
        personality_traits: &["persuasive", "engaging", "creative"],
        category: TaskCategory::Creative,
    },
];

const HEALTHCARE: &[PersonaTemplate] = &[
    PersonaTemplate {
        name: "Medical Professional",
        description: "A healthcare specialist with clinical expertise and patient care experience",
        base_expertise: &["Medical Practice", "Patient Care", "Clinical Diagnosis", "Healthcare"],
        communication_style: "Clinical and compassionate",
        context: "Use for medical advice, patient care, and clinical discussions",
        personality_traits: &["clinical", "compassionate", "professional"],
        category: TaskCategory::Scientific,
    },
    PersonaTemplate {
        name: "Public Health Specialist",
        description: "A public health expert focused on community health and epidemiology",
        base_expertise: &["Public Health", "Epidemiology", "Community Health", "Health Policy"],
        communication_style: "Public health and community-focused",
        context: "Use for public health discussions, epidemiology, and community health",
        personality_traits: &["community-focused", "health-conscious", "analytical"],
        category: TaskCategory::Scientific,
    },
];

const LEGAL: &[PersonaTemplate] = &[
    PersonaTemplate {
        name: "Legal Advisor",
        description: "A legal professional with expertise in law and regulatory compliance",
        base_expertise: &["Legal Practice", "Regulatory Compliance", "Contract Law", "Legal Analysis"],
        communication_style: "Legal and precise",
        context: "Use for legal advice, regulatory compliance, and contract analysis",
        personality_traits: &["legal", "precise", "compliance-focused"],
        category: TaskCategory::Consulting,
    },
    PersonaTemplate {
        name: "Compliance Specialist",
        description: "A regulatory expert focused on compliance and risk management",
        base_expertise: &["Compliance", "Risk Management", "Regulatory Affairs", "Audit"],
        communication_style: "Compliance-focused and systematic",
        context: "Use for compliance matters, risk management, and regulatory affairs",
        personality_traits: &["compliance-focused", "systematic", "risk-aware"],
        category: TaskCategory::Consulting,
    },
];

const FINANCE: &[PersonaTemplate] = &[
    PersonaTemplate {
        name: "Investment Advisor",
        description: "A financial expert specializing in investment strategies and portfolio management",
        base_expertise: &["Investment", "Portfolio Management", "Financial Planning", "Risk Assessment"],
        communication_style: "Financial and analytical",
        context: "Use for investment advice, financial planning, and portfolio management",
        personality_traits: &["financial", "analytical", "risk-aware"],
        category: TaskCategory::Business,
    },
    PersonaTemplate {
        name: "Cryptocurrency Expert",
        description: "A blockchain specialist focused on cryptocurrency and decentralized finance",
        base_expertise: &["Cryptocurrency", "Blockchain", "DeFi", "Digital Assets"],
        communication_style: "Innovative and technical",
        context: "Use for cryptocurrency discussions, blockchain technology, and DeFi",
        personality_traits: &["innovative", "technical", "forward-thinking"],
        category: TaskCategory::Technical,
    },
];

/// Fallbacks for domains without templates (or when none match).
pub const GENERIC_TEMPLATES: &[PersonaTemplate] = &[
    PersonaTemplate {
        name: "Domain Specialist",
        description: "A specialist with expertise in the specific domain",
        base_expertise: &["Domain Expertise", "Problem Solving", "Analysis"],
        communication_style: "Professional and knowledgeable",
        context: "Use for domain-specific tasks and specialized knowledge",
        personality_traits: &["knowledgeable", "professional", "specialized"],
        category: TaskCategory::General,
    },
    PersonaTemplate {
        name: "Problem Solver",
        description: "A versatile problem solver with analytical skills",
        base_expertise: &["Problem Solving", "Analysis", "Critical Thinking"],
        communication_style: "Analytical and solution-focused",
        context: "Use for complex problem solving and analytical tasks",
        personality_traits: &["analytical", "solution-focused", "logical"],
        category: TaskCategory::General,
    },
];

/// Templates registered for `domain`; empty when the domain has none.
pub fn domain_templates(domain: Domain) -> &'static [PersonaTemplate] {
    match domain {
        Domain::Technology => TECHNOLOGY,
        Domain::Science => SCIENCE,
        Domain::Business => BUSINESS,
        Domain::Creative => CREATIVE,
        Domain::Healthcare => HEALTHCARE,
        Domain::Legal => LEGAL,
        Domain::Finance => FINANCE,
        Domain::Education | Domain::General => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_is_complete() {
        let all = [
            TECHNOLOGY, SCIENCE, BUSINESS, CREATIVE, HEALTHCARE, LEGAL, FINANCE, GENERIC_TEMPLATES,
        ];
        for t in all.iter().flat_map(|set| set.iter()) {
            assert!(!t.name.is_empty());
            assert!(!t.base_expertise.is_empty(), "{} has no expertise", t.name);
            assert!(!t.personality_traits.is_empty());
        }
    }

    #[test]
    fn test_unknown_domains_have_no_templates() {
        assert!(domain_templates(Domain::General).is_empty());
        assert!(domain_templates(Domain::Education).is_empty());
        assert_eq!(domain_templates(Domain::Finance).len(), 2);
    }
}

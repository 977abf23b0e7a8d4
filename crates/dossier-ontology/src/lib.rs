//! The fixed, closed vocabulary of skills and personality traits.
//!
//! Skills follow the Critical Core Skills hierarchy (three domains), traits
//! are the Big Five. Extraction output naming anything outside these lists
//! is invalid and gets filtered by the validator. Pure lookup, no mutable
//! state.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Skill domains and their member skills.
pub const SKILL_HIERARCHY: &[(&str, &[&str])] = &[
    (
        "Thinking Critically",
        &[
            "Creative Thinking",
            "Decision Making",
            "Problem Solving",
            "Sense Making",
            "Transdisciplinary Thinking",
        ],
    ),
    (
        "Interacting with Others",
        &[
            "Building Inclusivity",
            "Collaboration",
            "Communication",
            "Customer Orientation",
            "Developing People",
            "Influence",
        ],
    ),
    (
        "Staying Relevant",
        &[
            "Adaptability",
            "Digital Fluency",
            "Global Perspective",
            "Learning Agility",
            "Self Management",
        ],
    ),
];

/// Big Five personality traits.
pub const TRAITS: &[&str] = &[
    "Openness",
    "Conscientiousness",
    "Extraversion",
    "Agreeableness",
    "Neuroticism",
];

static SKILL_DOMAINS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (domain, skills) in SKILL_HIERARCHY {
        for skill in *skills {
            map.insert(*skill, *domain);
        }
    }
    map
});

/// Whether a skill name is in the ontology. Exact match only.
pub fn is_valid_skill(name: &str) -> bool {
    SKILL_DOMAINS.contains_key(name)
}

/// Whether a trait name is in the ontology. Exact match only.
pub fn is_valid_trait(name: &str) -> bool {
    TRAITS.contains(&name)
}

/// The parent domain for a skill, if the skill exists.
pub fn skill_domain(name: &str) -> Option<&'static str> {
    SKILL_DOMAINS.get(name).copied()
}

/// All domain names, in hierarchy order.
pub fn domains() -> impl Iterator<Item = &'static str> {
    SKILL_HIERARCHY.iter().map(|(domain, _)| *domain)
}

/// Whether a domain name is in the ontology.
pub fn is_valid_domain(name: &str) -> bool {
    SKILL_HIERARCHY.iter().any(|(domain, _)| *domain == name)
}

/// System instructions for the classification oracle. Embeds the full skill
/// hierarchy and trait list so the oracle maps strictly onto the registry,
/// and tells it to skip ambiguous content rather than force a label.
pub fn extraction_instructions() -> String {
    let hierarchy: serde_json::Value = SKILL_HIERARCHY
        .iter()
        .map(|(domain, skills)| {
            (
                domain.to_string(),
                serde_json::Value::from(skills.to_vec()),
            )
        })
        .collect::<serde_json::Map<String, serde_json::Value>>()
        .into();

    format!(
        r#"You are an expert interview assessor. Your goal is to extract structured data from the candidate's responses.

RULES:
1. Identify if the candidate demonstrates any of the following SKILLS: {hierarchy}
2. Identify if the candidate exhibits any of the following PERSONALITY TRAITS: {traits:?}
3. CRITICAL: every observation must carry the exact quote from the candidate as its evidence.
4. Do NOT invent new skill names. Map strictly to the provided lists.
5. Rate trait intensity as Low, Moderate, or High based on the strength of evidence.
6. If unclear, do not force a classification. Skip ambiguous content.

OUTPUT FORMAT:
Return a JSON object of the form {{"observations": [...]}} where each observation has:
- skill: the skill name (from the hierarchy) or null
- skill_domain: the parent domain of the skill or null
- trait: the personality trait or null
- trait_intensity: Low/Moderate/High or null
- evidence: the exact quote supporting this classification"#,
        hierarchy = serde_json::to_string_pretty(&hierarchy).unwrap_or_default(),
        traits = TRAITS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_skill_resolves_to_its_domain() {
        assert_eq!(skill_domain("Collaboration"), Some("Interacting with Others"));
        assert_eq!(skill_domain("Problem Solving"), Some("Thinking Critically"));
        assert_eq!(skill_domain("Adaptability"), Some("Staying Relevant"));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(!is_valid_skill("Rust Programming"));
        assert!(!is_valid_trait("Bravery"));
        assert_eq!(skill_domain("Rust Programming"), None);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(is_valid_skill("Communication"));
        assert!(!is_valid_skill("communication"));
        assert!(is_valid_trait("Openness"));
        assert!(!is_valid_trait("openness"));
    }

    #[test]
    fn skill_count_matches_hierarchy() {
        let total: usize = SKILL_HIERARCHY.iter().map(|(_, s)| s.len()).sum();
        assert_eq!(total, 16);
        assert_eq!(domains().count(), 3);
        assert_eq!(TRAITS.len(), 5);
    }

    #[test]
    fn instructions_embed_the_full_vocabulary() {
        let instructions = extraction_instructions();
        for (domain, skills) in SKILL_HIERARCHY {
            assert!(instructions.contains(domain));
            for skill in *skills {
                assert!(instructions.contains(skill));
            }
        }
        for t in TRAITS {
            assert!(instructions.contains(t));
        }
        assert!(instructions.contains("observations"));
    }

    #[test]
    fn domain_names_are_valid() {
        assert!(is_valid_domain("Thinking Critically"));
        assert!(!is_valid_domain("Being Excellent"));
    }
}

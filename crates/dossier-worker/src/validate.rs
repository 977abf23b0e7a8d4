//! Vocabulary validation of raw oracle output.

use dossier_common::{Intensity, Observation, RawObservation, SkillRef, TraitRef};

/// Longest evidence fallback taken from the source turn when the oracle
/// omits the quote.
const EVIDENCE_FALLBACK_CHARS: usize = 200;

/// Filter a raw candidate against the ontology. Total function: never
/// fails, only drops what the registry does not recognize.
///
/// The registry is the source of truth for the skill's domain; an
/// oracle-supplied domain is ignored in favor of the registry lookup. If
/// both the skill and the trait are dropped, the observation carries no
/// actionable signal and is discarded entirely.
pub fn validate(raw: RawObservation, source_text: &str) -> Option<Observation> {
    let skill = raw.skill.as_deref().and_then(|name| {
        dossier_ontology::skill_domain(name).map(|domain| SkillRef {
            name: name.to_string(),
            domain: domain.to_string(),
        })
    });

    let trait_indication = raw
        .trait_name
        .as_deref()
        .filter(|name| dossier_ontology::is_valid_trait(name))
        .map(|name| TraitRef {
            name: name.to_string(),
            intensity: raw.trait_intensity.as_deref().and_then(Intensity::parse),
        });

    if skill.is_none() && trait_indication.is_none() {
        return None;
    }

    let evidence = raw
        .evidence
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| source_text.chars().take(EVIDENCE_FALLBACK_CHARS).collect());

    Some(Observation {
        skill,
        trait_indication,
        evidence,
    })
}

//! Observation types: raw oracle output and its validated form.

use serde::{Deserialize, Serialize};

/// Strength of a trait indication, as rated by the classification oracle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    #[default]
    Moderate,
    High,
}

impl Intensity {
    /// Loose parse of oracle-supplied intensity strings. Unknown ratings
    /// map to `None` so the writer falls back to the default.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "moderate" => Some(Self::Moderate),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

/// One candidate observation as returned by the oracle. Untrusted: names
/// may fall outside the registry, evidence may be missing, any field may
/// be absent entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawObservation {
    #[serde(default)]
    pub skill: Option<String>,

    #[serde(default)]
    pub skill_domain: Option<String>,

    #[serde(default, rename = "trait")]
    pub trait_name: Option<String>,

    #[serde(default)]
    pub trait_intensity: Option<String>,

    #[serde(default)]
    pub evidence: Option<String>,
}

/// A validated skill reference: name plus its registry domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRef {
    pub name: String,
    pub domain: String,
}

/// A validated trait reference with the oracle's intensity rating, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitRef {
    pub name: String,
    pub intensity: Option<Intensity>,
}

/// An observation that survived vocabulary validation. Invariant: at least
/// one of `skill` / `trait_indication` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub skill: Option<SkillRef>,

    pub trait_indication: Option<TraitRef>,

    /// Quoted evidence text, preserved verbatim from the oracle.
    pub evidence: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_parse_is_case_insensitive() {
        assert_eq!(Intensity::parse("high"), Some(Intensity::High));
        assert_eq!(Intensity::parse("HIGH"), Some(Intensity::High));
        assert_eq!(Intensity::parse(" Moderate "), Some(Intensity::Moderate));
        assert_eq!(Intensity::parse("low"), Some(Intensity::Low));
        assert_eq!(Intensity::parse("extreme"), None);
        assert_eq!(Intensity::parse(""), None);
    }

    #[test]
    fn intensity_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&Intensity::High).unwrap(), "\"High\"");
        assert_eq!(serde_json::to_string(&Intensity::Low).unwrap(), "\"Low\"");
    }

    #[test]
    fn intensity_default_is_moderate() {
        assert_eq!(Intensity::default(), Intensity::Moderate);
    }

    #[test]
    fn raw_observation_accepts_trait_key() {
        let json = r#"{
            "skill": "Collaboration",
            "trait": "Conscientiousness",
            "trait_intensity": "High",
            "evidence": "coordinated the team during the outage"
        }"#;
        let raw: RawObservation = serde_json::from_str(json).unwrap();
        assert_eq!(raw.skill.as_deref(), Some("Collaboration"));
        assert_eq!(raw.trait_name.as_deref(), Some("Conscientiousness"));
        assert_eq!(raw.trait_intensity.as_deref(), Some("High"));
        assert!(raw.skill_domain.is_none());
    }

    #[test]
    fn raw_observation_tolerates_missing_fields() {
        let raw: RawObservation = serde_json::from_str("{}").unwrap();
        assert!(raw.skill.is_none());
        assert!(raw.trait_name.is_none());
        assert!(raw.evidence.is_none());
    }
}

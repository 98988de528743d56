//! Phase Classifier - maps ability text to a single game phase.
//!
//! Classification runs in three steps:
//! 1. **Normalize**: strip emphasis markup, collapse whitespace, lower-case
//! 2. **Noise**: any noise phrase short-circuits to Always Active
//! 3. **Rules**: the first matching row of the ordered table wins
//!
//! Text that matches nothing is Always Active. The table order is the
//! tie-break between overlapping phrases, e.g. "start of your command phase"
//! must be tested before the more general "command phase" rows.

use catalog_rules::{ClassifierConfig, Phase, PhaseRule};

/// Why the classifier chose a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A noise phrase matched (index into the noise list).
    Noise(usize),
    /// A table row matched (index into the rule table).
    Rule(usize),
    /// Nothing matched.
    Fallback,
}

/// A phase together with the reason it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub phase: Phase,
    pub verdict: Verdict,
}

/// Deterministic keyword classifier over an ordered rule table.
#[derive(Debug, Clone)]
pub struct PhaseClassifier {
    emphasis_markers: Vec<String>,
    noise_phrases: Vec<String>,
    rules: Vec<PhaseRule>,
}

impl Default for PhaseClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl PhaseClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            emphasis_markers: config.emphasis_markers.clone(),
            noise_phrases: config.noise_phrases.iter().map(|p| p.to_lowercase()).collect(),
            rules: config.rules.iter().map(PhaseRule::lowercased).collect(),
        }
    }

    /// The phase an ability description belongs to.
    pub fn classify(&self, description: &str) -> Phase {
        self.classify_detailed(description).phase
    }

    /// Like [`PhaseClassifier::classify`], also reporting which row decided.
    pub fn classify_detailed(&self, description: &str) -> Classification {
        let text = self.normalize(description);

        if let Some(position) = self.noise_phrases.iter().position(|p| text.contains(p.as_str())) {
            return Classification {
                phase: Phase::AlwaysActive,
                verdict: Verdict::Noise(position),
            };
        }

        match self.rules.iter().position(|rule| rule.matches(&text)) {
            Some(position) => Classification {
                phase: self.rules[position].phase,
                verdict: Verdict::Rule(position),
            },
            None => Classification {
                phase: Phase::AlwaysActive,
                verdict: Verdict::Fallback,
            },
        }
    }

    /// Strip emphasis markup, collapse every run of whitespace (including
    /// non-breaking spaces and newlines) to one space, and lower-case.
    pub fn normalize(&self, text: &str) -> String {
        let mut stripped = text.to_string();
        for marker in &self.emphasis_markers {
            if !marker.is_empty() {
                stripped = stripped.replace(marker.as_str(), "");
            }
        }
        stripped
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn rules(&self) -> &[PhaseRule] {
        &self.rules
    }
}

/// Classify with the built-in table.
pub fn classify(description: &str) -> Phase {
    PhaseClassifier::default().classify(description)
}

//! Technology-generation classification of site-name suffixes.
//!
//! Suffix letters are classified by fixed character tables: each letter feeds
//! one generation bucket (or marks it), independent of its position. The
//! tables are plain data in [`TechRules`] so deployments can swap them.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Generation {
    #[serde(rename = "2G")]
    G2,
    #[serde(rename = "4G")]
    G4,
    #[serde(rename = "5G")]
    G5,
}

impl Generation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::G2 => "2G",
            Self::G4 => "4G",
            Self::G5 => "5G",
        }
    }
}

/// Radio sub-band family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Band {
    Fdd,
    Tdd,
    /// Massive MIMO
    Mm,
    /// Non-massive MIMO
    Nmm,
}

impl Band {
    pub fn generation(&self) -> Generation {
        match self {
            Self::Fdd | Self::Tdd => Generation::G4,
            Self::Mm | Self::Nmm => Generation::G5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fdd => "FDD",
            Self::Tdd => "TDD",
            Self::Mm => "MM",
            Self::Nmm => "NMM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharAction {
    /// Append the letter to the generation bucket.
    Accumulate,
    /// Replace the bucket with the letter itself.
    Mark,
}

#[derive(Debug, Clone)]
pub struct CharRule {
    pub chars: String,
    pub generation: Generation,
    pub action: CharAction,
}

#[derive(Debug, Clone)]
pub struct BandRule {
    pub chars: String,
    pub band: Band,
}

#[derive(Debug, Clone)]
pub struct TechRules {
    pub char_rules: Vec<CharRule>,
    /// Multi-letter tokens that, when they make up the entire suffix, flag 2G.
    pub legacy_tokens: Vec<String>,
    /// Value written to the 2G bucket for legacy-only or implied 2G.
    pub legacy_marker: String,
    pub band_rules: Vec<BandRule>,
}

impl Default for TechRules {
    fn default() -> Self {
        let rule = |chars: &str, generation, action| CharRule {
            chars: chars.into(),
            generation,
            action,
        };
        let band = |chars: &str, band| BandRule {
            chars: chars.into(),
            band,
        };
        Self {
            char_rules: vec![
                rule("MNPRT", Generation::G5, CharAction::Accumulate),
                rule("FHLKWYVB", Generation::G4, CharAction::Accumulate),
                rule("X", Generation::G2, CharAction::Mark),
            ],
            legacy_tokens: vec!["ID".into(), "AS".into()],
            legacy_marker: "YES".into(),
            band_rules: vec![
                band("LFHW", Band::Fdd),
                band("KYVB", Band::Tdd),
                band("MP", Band::Mm),
                band("NRT", Band::Nmm),
            ],
        }
    }
}

/// Per-generation output of [`TechRules::classify`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TechGenerations {
    pub g2: String,
    pub g4: String,
    pub g5: String,
}

impl TechGenerations {
    fn bucket_mut(&mut self, generation: Generation) -> &mut String {
        match generation {
            Generation::G2 => &mut self.g2,
            Generation::G4 => &mut self.g4,
            Generation::G5 => &mut self.g5,
        }
    }
}

impl TechRules {
    /// Regex fragment matching a run of suffix tokens and rule letters,
    /// e.g. `(?:ID|AS|[BFHKLMNPRTVWXY])*`.
    pub fn suffix_pattern(&self) -> String {
        let letters: BTreeSet<char> = self
            .char_rules
            .iter()
            .flat_map(|r| r.chars.chars())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let mut alternatives: Vec<String> =
            self.legacy_tokens.iter().map(|t| regex::escape(&t.to_uppercase())).collect();
        if !letters.is_empty() {
            let class: String = letters.iter().map(|c| regex::escape(&c.to_string())).collect();
            alternatives.push(format!("[{class}]"));
        }

        if alternatives.is_empty() {
            String::new()
        } else {
            format!("(?:{})*", alternatives.join("|"))
        }
    }

    pub fn classify(&self, suffix: &str) -> TechGenerations {
        let suffix = suffix.trim().to_uppercase();
        let mut out = TechGenerations::default();

        if self.is_legacy_only(&suffix) {
            out.g2 = self.legacy_marker.clone();
        }

        for c in suffix.chars() {
            for rule in self.char_rules.iter().filter(|r| r.chars.contains(c)) {
                let bucket = out.bucket_mut(rule.generation);
                match rule.action {
                    CharAction::Accumulate => bucket.push(c),
                    CharAction::Mark => *bucket = c.to_string(),
                }
            }
        }

        // Runs after the full scan: higher generations imply 2G coexists.
        if out.g2.is_empty() && (!out.g4.is_empty() || !out.g5.is_empty()) {
            out.g2 = self.legacy_marker.clone();
        }

        out
    }

    /// Whether `suffix` is a non-empty repetition of legacy tokens only.
    fn is_legacy_only(&self, suffix: &str) -> bool {
        if suffix.is_empty() {
            return false;
        }
        let mut rest = suffix;
        while !rest.is_empty() {
            match self
                .legacy_tokens
                .iter()
                .find(|t| !t.is_empty() && rest.starts_with(t.as_str()))
            {
                Some(token) => rest = &rest[token.len()..],
                None => return false,
            }
        }
        true
    }

    /// Sub-bands signalled by the letters of one suffix.
    pub fn bands(&self, suffix: &str) -> BTreeSet<Band> {
        let suffix = suffix.to_uppercase();
        self.band_rules
            .iter()
            .filter(|rule| suffix.chars().any(|c| rule.chars.contains(c)))
            .map(|rule| rule.band)
            .collect()
    }
}

/// Sub-bands seen across a group of site names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BandRollup {
    pub bands: BTreeSet<Band>,
}

impl BandRollup {
    pub fn from_suffixes<'a, I>(rules: &TechRules, suffixes: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut bands = BTreeSet::new();
        for suffix in suffixes {
            bands.extend(rules.bands(suffix));
        }
        Self { bands }
    }

    /// Display label such as `4G FDD/TDD`, or `None` when the generation is absent.
    pub fn label(&self, generation: Generation) -> Option<String> {
        let parts: Vec<&str> = self
            .bands
            .iter()
            .filter(|b| b.generation() == generation)
            .map(Band::label)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(format!("{} {}", generation.label(), parts.join("/")))
        }
    }
}

impl fmt::Display for BandRollup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = [Generation::G4, Generation::G5]
            .iter()
            .filter_map(|g| self.label(*g))
            .collect();
        f.write_str(&labels.join(", "))
    }
}

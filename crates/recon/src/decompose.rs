//! Composite site-name decomposition.
//!
//! Site names concatenate owner code, place, city/province code and a
//! technology suffix with no delimiter, e.g. `TCAGMATINADDS2LT`. They are
//! taken apart backward from the closed code vocabularies: an ordered table
//! of peel rules, each trying its codes longest-first so that a code which is
//! a prefix of a longer code never shadows it.

use regex::Regex;
use serde::Serialize;

use crate::error::ReconError;
use crate::geo::GeoDictionary;
use crate::techgen::{BandRollup, TechRules};

/// Placeholder for an empty place.
pub const EMPTY_PLACE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    Province,
    City,
    SiteCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Code followed only by digits and technology letters up to the end.
    End,
    /// Code at the very start.
    Start,
}

#[derive(Debug, Clone)]
struct Candidate {
    code: String,
    value: String,
    /// Compiled for `Anchor::End` rules only.
    pattern: Option<Regex>,
}

/// One step of the peel table.
#[derive(Debug, Clone)]
pub struct PeelRule {
    pub field: LocationField,
    pub anchor: Anchor,
    candidates: Vec<Candidate>,
}

#[derive(Debug)]
struct Peeled {
    remainder: String,
    value: String,
    tech: String,
}

impl PeelRule {
    /// Build a rule over `(code, value)` pairs; candidates are ordered
    /// longest code first, ties broken alphabetically.
    pub fn new<I>(
        field: LocationField,
        anchor: Anchor,
        entries: I,
        suffix_pattern: &str,
    ) -> Result<Self, ReconError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut candidates = Vec::new();
        for (code, value) in entries {
            if code.is_empty() {
                continue;
            }
            let pattern = match anchor {
                Anchor::End => {
                    let re = format!(
                        "(?s)^(.*){}([0-9]*)({})$",
                        regex::escape(&code),
                        suffix_pattern
                    );
                    Some(Regex::new(&re).map_err(|e| {
                        ReconError::DictionaryValidation(format!("code '{code}': {e}"))
                    })?)
                }
                Anchor::Start => None,
            };
            candidates.push(Candidate { code, value, pattern });
        }
        candidates.sort_by(|a, b| b.code.len().cmp(&a.code.len()).then_with(|| a.code.cmp(&b.code)));
        Ok(Self { field, anchor, candidates })
    }

    /// Codes in the order they are tried.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|c| c.code.as_str())
    }

    fn peel(&self, input: &str) -> Option<Peeled> {
        for cand in &self.candidates {
            match (&self.anchor, &cand.pattern) {
                (Anchor::End, Some(re)) => {
                    if let Some(caps) = re.captures(input) {
                        let remainder = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                        let tech = caps.get(3).map(|m| m.as_str()).unwrap_or("");
                        return Some(Peeled {
                            remainder: remainder.to_string(),
                            value: cand.value.clone(),
                            tech: tech.to_string(),
                        });
                    }
                }
                (Anchor::Start, _) => {
                    if let Some(rest) = input.strip_prefix(cand.code.as_str()) {
                        return Some(Peeled {
                            remainder: rest.to_string(),
                            value: cand.value.clone(),
                            tech: String::new(),
                        });
                    }
                }
                (Anchor::End, None) => {}
            }
        }
        None
    }
}

/// Location fields recovered from a site name. Misses are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    pub site_code: String,
    pub place: String,
    pub city: String,
    pub province: String,
    pub region: String,
    /// Technology letters stripped along the way (digits excluded). When no
    /// peel strips any, the letters after the name's final digit run.
    pub tech_suffix: String,
}

impl Location {
    fn set(&mut self, field: LocationField, value: String) {
        match field {
            LocationField::Province => self.province = value,
            LocationField::City => self.city = value,
            LocationField::SiteCode => self.site_code = value,
        }
    }
}

/// Decomposer bound to one dictionary and one set of technology rules.
pub struct Decomposer<'d> {
    dict: &'d GeoDictionary,
    tech: &'d TechRules,
    rules: Vec<PeelRule>,
    trailing: Regex,
}

impl<'d> Decomposer<'d> {
    pub fn new(dict: &'d GeoDictionary, tech: &'d TechRules) -> Result<Self, ReconError> {
        let suffix = tech.suffix_pattern();
        let code_pairs = |table: &std::collections::BTreeMap<String, String>| {
            table
                .iter()
                .map(|(code, name)| (code.clone(), name.clone()))
                .collect::<Vec<_>>()
        };

        let rules = vec![
            PeelRule::new(LocationField::Province, Anchor::End, code_pairs(dict.provinces()), &suffix)?,
            PeelRule::new(LocationField::City, Anchor::End, code_pairs(dict.cities()), &suffix)?,
            PeelRule::new(
                LocationField::SiteCode,
                Anchor::Start,
                dict.site_codes().iter().map(|c| (c.clone(), c.clone())),
                &suffix,
            )?,
        ];

        let trailing = Regex::new(&format!("([0-9]+)({suffix})$"))
            .map_err(|e| ReconError::DictionaryValidation(e.to_string()))?;

        Ok(Self { dict, tech, rules, trailing })
    }

    pub fn rules(&self) -> &[PeelRule] {
        &self.rules
    }

    pub fn tech_rules(&self) -> &TechRules {
        self.tech
    }

    pub fn decompose(&self, name: &str) -> Location {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| !matches!(*c, '\r' | '\n'))
            .collect::<String>()
            .to_uppercase();
        let mut rest = normalized.clone();
        let mut loc = Location::default();

        for rule in &self.rules {
            if let Some(peeled) = rule.peel(&rest) {
                rest = peeled.remainder;
                loc.set(rule.field, peeled.value);
                // Peeling runs from the end, so earlier suffixes sit further right.
                loc.tech_suffix = format!("{}{}", peeled.tech, loc.tech_suffix);
            }
        }

        loc.place = if rest.is_empty() { EMPTY_PLACE.to_string() } else { rest };

        if loc.city.is_empty() && loc.place != EMPTY_PLACE {
            self.backfill_barangay(&mut loc);
        }

        if loc.tech_suffix.is_empty() {
            loc.tech_suffix = self.split_trailing(&normalized).1;
        }

        if loc.province.is_empty() && !loc.city.is_empty() {
            if let Some(province) = self.dict.province_of_city(&loc.city) {
                loc.province = province.to_string();
            }
        }

        if !loc.province.is_empty() {
            if let Some(region) = self.dict.region_of_province(&loc.province) {
                loc.region = region.to_string();
            }
        }

        loc
    }

    /// Adopt the city of a known barangay. The suffix-stripped place is tried
    /// first, then the place as-is.
    fn backfill_barangay(&self, loc: &mut Location) {
        let (cleaned, tech) = self.split_trailing(&loc.place);

        if !cleaned.is_empty() {
            if let Some(city) = self.dict.city_of_barangay(&cleaned) {
                loc.city = city.to_string();
                loc.tech_suffix = format!("{tech}{}", loc.tech_suffix);
                loc.place = cleaned;
                return;
            }
        }

        if let Some(city) = self.dict.city_of_barangay(&loc.place) {
            loc.city = city.to_string();
        }
    }

    /// Split `text` into (head, technology letters) at its last digit run.
    /// Letters not preceded by a digit are part of the head.
    fn split_trailing(&self, text: &str) -> (String, String) {
        match self.trailing.captures(text) {
            Some(caps) => {
                let start = caps.get(0).map(|m| m.start()).unwrap_or(text.len());
                let tech = caps.get(2).map(|m| m.as_str()).unwrap_or("");
                (text[..start].to_string(), tech.to_string())
            }
            None => (text.to_string(), String::new()),
        }
    }

    /// Sub-bands across a pipe-delimited list of names, read from the same
    /// suffix `decompose` reports.
    pub fn rollup_bands(&self, names: &str) -> BandRollup {
        let suffixes: Vec<String> = names
            .split('|')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| self.decompose(n).tech_suffix)
            .collect();
        BandRollup::from_suffixes(self.tech, suffixes.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::techgen::Generation;

    fn builtin() -> GeoDictionary {
        GeoDictionary::builtin().unwrap()
    }

    #[test]
    fn province_then_city() {
        let dict = builtin();
        let rules = TechRules::default();
        let d = Decomposer::new(&dict, &rules).unwrap();
        let loc = d.decompose("PANABODDN2ID");
        assert_eq!(loc.province, "Davao del Norte");
        assert_eq!(loc.city, "Panabo City");
        assert_eq!(loc.site_code, "");
        assert_eq!(loc.place, "-");
        assert_eq!(loc.region, "Region XI");
        assert_eq!(loc.tech_suffix, "ID");
    }

    #[test]
    fn site_code_place_and_province() {
        let dict = builtin();
        let rules = TechRules::default();
        let d = Decomposer::new(&dict, &rules).unwrap();
        let loc = d.decompose("tcagMatinaDDS2LT");
        assert_eq!(loc.site_code, "TCAG");
        assert_eq!(loc.province, "Davao del Sur");
        assert_eq!(loc.tech_suffix, "LT");
        // No city code in the name: MATINA is a Davao City barangay.
        assert_eq!(loc.place, "MATINA");
        assert_eq!(loc.city, "Davao City");
        assert_eq!(loc.region, "Region XI");
    }

    #[test]
    fn longest_code_wins() {
        let dict = GeoDictionary::from_toml(
            r#"
site_codes = ["TC", "TCAG"]
[provinces]
DVO = "Davao Oriental"
DVOC = "Davao Occidental"
"#,
        )
        .unwrap();
        let rules = TechRules::default();
        let d = Decomposer::new(&dict, &rules).unwrap();
        let codes: Vec<&str> = d.rules()[0].codes().collect();
        assert_eq!(codes, vec!["DVOC", "DVO"]);

        let loc = d.decompose("TCAGMALITADVOC");
        assert_eq!(loc.province, "Davao Occidental");
        assert_eq!(loc.site_code, "TCAG");
        assert_eq!(loc.place, "MALITA");
    }

    #[test]
    fn city_backfills_province_and_region() {
        let dict = builtin();
        let rules = TechRules::default();
        let d = Decomposer::new(&dict, &rules).unwrap();
        let loc = d.decompose("GAIPOBLACIONTAGUM1L");
        assert_eq!(loc.site_code, "GAI");
        assert_eq!(loc.city, "Tagum City");
        assert_eq!(loc.province, "Davao del Norte");
        assert_eq!(loc.region, "Region XI");
        assert_eq!(loc.place, "POBLACION");
        assert_eq!(loc.tech_suffix, "L");
    }

    #[test]
    fn barangay_backfill_strips_suffix() {
        let dict = builtin();
        let rules = TechRules::default();
        let d = Decomposer::new(&dict, &rules).unwrap();
        let loc = d.decompose("APOKON3LK");
        assert_eq!(loc.city, "Tagum City");
        assert_eq!(loc.place, "APOKON");
        assert_eq!(loc.tech_suffix, "LK");
        assert_eq!(loc.province, "Davao del Norte");
    }

    #[test]
    fn unknown_name_degrades_to_place() {
        let dict = builtin();
        let rules = TechRules::default();
        let d = Decomposer::new(&dict, &rules).unwrap();
        let loc = d.decompose("somewhere");
        assert_eq!(loc.place, "SOMEWHERE");
        assert_eq!(loc.city, "");
        assert_eq!(loc.province, "");
        assert_eq!(loc.region, "");
        assert_eq!(loc.site_code, "");
    }

    #[test]
    fn empty_name() {
        let dict = builtin();
        let rules = TechRules::default();
        let d = Decomposer::new(&dict, &rules).unwrap();
        let loc = d.decompose("   ");
        assert_eq!(loc.place, "-");
        assert_eq!(loc.tech_suffix, "");
    }

    #[test]
    fn rollup_over_pipe_list() {
        let dict = builtin();
        let rules = TechRules::default();
        let d = Decomposer::new(&dict, &rules).unwrap();
        let rollup = d.rollup_bands("PANABODDN1L | PANABODDN1K|PANABODDN1N");
        assert_eq!(rollup.label(Generation::G4).as_deref(), Some("4G FDD/TDD"));
        assert_eq!(rollup.label(Generation::G5).as_deref(), Some("5G NMM"));
    }

    #[test]
    fn place_ending_in_band_letters_has_no_bands() {
        let dict = builtin();
        let rules = TechRules::default();
        let d = Decomposer::new(&dict, &rules).unwrap();
        for name in ["GAIPOBLACION", "TCAGBUHANGIN"] {
            assert_eq!(d.rollup_bands(name).to_string(), "", "{name}");
            let tech = rules.classify(&d.decompose(name).tech_suffix);
            assert_eq!((tech.g2.as_str(), tech.g4.as_str(), tech.g5.as_str()), ("", "", ""));
        }
    }

    #[test]
    fn unplaced_name_keeps_trailing_suffix() {
        let dict = builtin();
        let rules = TechRules::default();
        let d = Decomposer::new(&dict, &rules).unwrap();
        let loc = d.decompose("somewhere1lk");
        assert_eq!(loc.place, "SOMEWHERE1LK");
        assert_eq!(loc.city, "");
        assert_eq!(loc.tech_suffix, "LK");
        assert_eq!(d.rollup_bands("somewhere1lk").to_string(), "4G FDD/TDD");
    }

    #[test]
    fn embedded_line_break_is_ignored() {
        let dict = builtin();
        let rules = TechRules::default();
        let d = Decomposer::new(&dict, &rules).unwrap();
        let loc = d.decompose("PANABO\r\nDDN2ID");
        assert_eq!(loc.province, "Davao del Norte");
        assert_eq!(loc.city, "Panabo City");
        assert_eq!(loc.tech_suffix, "ID");
    }
}

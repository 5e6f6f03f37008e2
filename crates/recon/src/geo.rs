//! Geographic reference data: site-owner codes, province/city codes and the
//! lookup tables used to back-fill missing location fields.
//!
//! A dictionary is immutable once loaded and is shared by reference with the
//! decomposer, so one instance can serve any number of concurrent runs.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::error::ReconError;

const BUILTIN_MINDANAO: &str = include_str!("../data/mindanao.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    pub name: String,
    pub provinces: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CityBarangays {
    pub city: String,
    pub names: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DictionaryFile {
    #[serde(default)]
    site_codes: Vec<String>,
    #[serde(default)]
    provinces: BTreeMap<String, String>,
    #[serde(default)]
    cities: BTreeMap<String, String>,
    #[serde(default)]
    city_provinces: HashMap<String, String>,
    #[serde(default)]
    regions: Vec<Region>,
    #[serde(default)]
    barangays: Vec<CityBarangays>,
}

#[derive(Debug, Clone)]
pub struct GeoDictionary {
    site_codes: Vec<String>,
    provinces: BTreeMap<String, String>,
    cities: BTreeMap<String, String>,
    city_provinces: HashMap<String, String>,
    regions: Vec<Region>,
    /// Normalized barangay name -> owning city. First city listed wins.
    barangay_index: HashMap<String, String>,
}

impl GeoDictionary {
    /// The dictionary shipped with the crate.
    pub fn builtin() -> Result<Self, ReconError> {
        Self::from_toml(BUILTIN_MINDANAO)
    }

    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let file: DictionaryFile =
            toml::from_str(input).map_err(|e| ReconError::DictionaryParse(e.to_string()))?;

        let site_codes = file
            .site_codes
            .iter()
            .map(|c| normalize_code("site_codes", c))
            .collect::<Result<Vec<_>, _>>()?;
        let provinces = normalize_code_table("provinces", file.provinces)?;
        let cities = normalize_code_table("cities", file.cities)?;

        let mut barangay_index = HashMap::new();
        for entry in &file.barangays {
            for name in &entry.names {
                let key = barangay_key(name);
                if key.is_empty() {
                    continue;
                }
                barangay_index.entry(key).or_insert_with(|| entry.city.clone());
            }
        }

        let dict = Self {
            site_codes,
            provinces,
            cities,
            city_provinces: file.city_provinces,
            regions: file.regions,
            barangay_index,
        };

        log::debug!(
            "geo dictionary: {} site code(s), {} province code(s), {} city code(s), {} region(s), {} barangay(s)",
            dict.site_codes.len(),
            dict.provinces.len(),
            dict.cities.len(),
            dict.regions.len(),
            dict.barangay_index.len(),
        );

        Ok(dict)
    }

    pub fn site_codes(&self) -> &[String] {
        &self.site_codes
    }

    /// Province code -> full province name.
    pub fn provinces(&self) -> &BTreeMap<String, String> {
        &self.provinces
    }

    /// City code -> full city name.
    pub fn cities(&self) -> &BTreeMap<String, String> {
        &self.cities
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Province owning a city (by full city name).
    pub fn province_of_city(&self, city: &str) -> Option<&str> {
        self.city_provinces.get(city).map(String::as_str)
    }

    /// First region listing `province`.
    pub fn region_of_province(&self, province: &str) -> Option<&str> {
        self.regions
            .iter()
            .find(|r| r.provinces.iter().any(|p| p == province))
            .map(|r| r.name.as_str())
    }

    /// City owning a barangay. Comparison ignores case, spaces and punctuation.
    pub fn city_of_barangay(&self, place: &str) -> Option<&str> {
        let key = barangay_key(place);
        if key.is_empty() {
            return None;
        }
        self.barangay_index.get(&key).map(String::as_str)
    }
}

fn normalize_code(table: &str, code: &str) -> Result<String, ReconError> {
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return Err(ReconError::DictionaryValidation(format!("{table}: blank code")));
    }
    Ok(code)
}

fn normalize_code_table(
    table: &str,
    raw: BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, ReconError> {
    let mut out = BTreeMap::new();
    for (code, name) in raw {
        let code = normalize_code(table, &code)?;
        if out.insert(code.clone(), name).is_some() {
            return Err(ReconError::DictionaryValidation(format!(
                "{table}: duplicate code '{code}'"
            )));
        }
    }
    Ok(out)
}

/// Site names carry no separators, so barangays are compared on their
/// uppercase alphanumeric characters only.
pub(crate) fn barangay_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}

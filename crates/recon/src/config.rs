use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Attach location and technology fields to every result.
    #[serde(default = "default_true")]
    pub enrich: bool,
    #[serde(default)]
    pub order: ResultOrder,
    #[serde(default)]
    pub status_labels: StatusLabels,
    #[serde(default)]
    pub columns: ColumnAliases,
    #[serde(default)]
    pub dictionary: Option<DictionaryRef>,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            enrich: true,
            order: ResultOrder::default(),
            status_labels: StatusLabels::default(),
            columns: ColumnAliases::default(),
            dictionary: None,
        }
    }
}

fn default_name() -> String {
    "nms-udm".into()
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Ordering + labels
// ---------------------------------------------------------------------------

/// Output ordering of the result sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrder {
    /// Source insertion order, then target-only entries in target order.
    #[default]
    Input,
    /// Region, province, city, place, identifier.
    Location,
}

/// Which status vocabulary external outputs use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLabels {
    /// `NEW`, `REMOVED`, `MISMATCH`, `UNCHANGED`
    #[default]
    Short,
    /// `NEW SITE`, `REMOVED SITE`, `NAME MISMATCH`, `UNCHANGED`
    Legacy,
}

// ---------------------------------------------------------------------------
// Column aliases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnAliases {
    #[serde(default = "default_id_aliases")]
    pub id: Vec<String>,
    #[serde(default = "default_name_aliases")]
    pub name: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            id: default_id_aliases(),
            name: default_name_aliases(),
        }
    }
}

fn default_id_aliases() -> Vec<String> {
    ["PLA_ID", "SITE ID", "NE ID"].iter().map(|s| s.to_string()).collect()
}

fn default_name_aliases() -> Vec<String> {
    ["TECH NAME", "BTS NAME", "BTS_NAME", "SITE NAME"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl ColumnAliases {
    fn normalize(&mut self) {
        for alias in self.id.iter_mut().chain(self.name.iter_mut()) {
            *alias = alias.trim().to_uppercase();
        }
    }
}

/// Location of an external geo dictionary file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DictionaryRef {
    pub path: String,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let mut config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.columns.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.columns.id.is_empty() {
            return Err(ReconError::ConfigValidation(
                "columns.id must list at least one alias".into(),
            ));
        }

        if let Some(blank) = self
            .columns
            .id
            .iter()
            .chain(self.columns.name.iter())
            .position(|a| a.trim().is_empty())
        {
            return Err(ReconError::ConfigValidation(format!(
                "column alias #{} is blank",
                blank + 1
            )));
        }

        if let Some(ref dict) = self.dictionary {
            if dict.path.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "dictionary.path must not be empty".into(),
                ));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ReconConfig::from_toml("").unwrap();
        assert_eq!(config.name, "nms-udm");
        assert!(config.enrich);
        assert_eq!(config.order, ResultOrder::Input);
        assert_eq!(config.status_labels, StatusLabels::Short);
        assert_eq!(config.columns, ColumnAliases::default());
        assert!(config.dictionary.is_none());
    }

    #[test]
    fn parse_full_config() {
        let input = r#"
name = "weekly-mindanao"
enrich = false
order = "location"
status_labels = "legacy"

[columns]
id = [" pla_id ", "Cell Site"]
name = ["site name"]

[dictionary]
path = "geo.toml"
"#;
        let config = ReconConfig::from_toml(input).unwrap();
        assert_eq!(config.name, "weekly-mindanao");
        assert!(!config.enrich);
        assert_eq!(config.order, ResultOrder::Location);
        assert_eq!(config.status_labels, StatusLabels::Legacy);
        assert_eq!(config.columns.id, vec!["PLA_ID", "CELL SITE"]);
        assert_eq!(config.columns.name, vec!["SITE NAME"]);
        assert_eq!(config.dictionary.unwrap().path, "geo.toml");
    }

    #[test]
    fn reject_empty_id_aliases() {
        let err = ReconConfig::from_toml("[columns]\nid = []\n").unwrap_err();
        assert!(err.to_string().contains("columns.id"));
    }

    #[test]
    fn reject_blank_alias() {
        let err = ReconConfig::from_toml("[columns]\nid = [\"PLA_ID\", \"  \"]\n").unwrap_err();
        assert!(err.to_string().contains("blank"));
    }

    #[test]
    fn reject_unknown_order() {
        let err = ReconConfig::from_toml("order = \"alphabetical\"\n");
        assert!(err.is_err(), "typo in order should fail deserialization");
    }
}

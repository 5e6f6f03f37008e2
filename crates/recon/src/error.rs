use std::fmt;

use crate::table::Side;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// Malformed CSV, or fewer than two rows (header + at least one data row).
    Parse { side: Side, message: String },
    /// No header matched any identifier alias.
    MissingKeyColumn { side: Side, aliases: Vec<String> },
    /// TOML parse / deserialization error in a recon config.
    ConfigParse(String),
    /// Config validation error (empty alias list, blank alias, ...).
    ConfigValidation(String),
    /// TOML parse / deserialization error in a geo dictionary.
    DictionaryParse(String),
    /// Dictionary validation error (blank code, unknown province reference, ...).
    DictionaryValidation(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { side, message } => write!(f, "{side} file: {message}"),
            Self::MissingKeyColumn { side, aliases } => {
                write!(
                    f,
                    "{side} file: could not find identifier column (expected one of: {})",
                    aliases.join(", ")
                )
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::DictionaryParse(msg) => write!(f, "dictionary parse error: {msg}"),
            Self::DictionaryValidation(msg) => write!(f, "dictionary validation error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_column_lists_aliases() {
        let err = ReconError::MissingKeyColumn {
            side: Side::Target,
            aliases: vec!["PLA_ID".into(), "SITE ID".into()],
        };
        assert_eq!(
            err.to_string(),
            "UDM file: could not find identifier column (expected one of: PLA_ID, SITE ID)"
        );
    }

    #[test]
    fn parse_error_names_side() {
        let err = ReconError::Parse {
            side: Side::Source,
            message: "file is empty".into(),
        };
        assert_eq!(err.to_string(), "NMS file: file is empty");
    }
}

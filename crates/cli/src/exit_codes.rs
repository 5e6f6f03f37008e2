//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success (every site unchanged)           |
//! | 1       | compare          | Differences found (like `diff(1)`)       |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 5-9     | compare          | Input and configuration failures         |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use netsite_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed, no differences.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, unreadable or unwritable file.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Compare (1, 5-9)
// =============================================================================

/// At least one NEW, REMOVED or MISMATCH site.
/// Like `diff(1)`, exit 1 means "inventories differ."
pub const EXIT_COMPARE_DIFFS: u8 = 1;

/// Input CSV is malformed or has no data rows.
pub const EXIT_COMPARE_PARSE: u8 = 5;

/// No identifier column in one of the inputs.
pub const EXIT_COMPARE_MISSING_KEY: u8 = 6;

/// Config or geo dictionary failed to parse or validate.
pub const EXIT_COMPARE_INVALID_CONFIG: u8 = 7;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::Parse { .. } => EXIT_COMPARE_PARSE,
        ReconError::MissingKeyColumn { .. } => EXIT_COMPARE_MISSING_KEY,
        ReconError::ConfigParse(_)
        | ReconError::ConfigValidation(_)
        | ReconError::DictionaryParse(_)
        | ReconError::DictionaryValidation(_) => EXIT_COMPARE_INVALID_CONFIG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netsite_recon::Side;

    #[test]
    fn engine_errors_map_to_registry() {
        let parse = ReconError::Parse { side: Side::Source, message: "empty".into() };
        assert_eq!(recon_exit_code(&parse), EXIT_COMPARE_PARSE);

        let missing = ReconError::MissingKeyColumn { side: Side::Target, aliases: vec![] };
        assert_eq!(recon_exit_code(&missing), EXIT_COMPARE_MISSING_KEY);

        let dict = ReconError::DictionaryParse("bad".into());
        assert_eq!(recon_exit_code(&dict), EXIT_COMPARE_INVALID_CONFIG);
    }
}

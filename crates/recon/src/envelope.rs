//! Success/failure envelope returned to integrations that cannot handle a
//! `Result` directly.

use serde::Serialize;

use crate::config::ReconConfig;
use crate::decompose::Decomposer;
use crate::engine::run;
use crate::model::ComparisonResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<ComparisonResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn ok(data: Vec<ComparisonResult>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            count: None,
            error: Some(message.into()),
        }
    }
}

/// Run a comparison and wrap the outcome. Never returns an error.
pub fn process_comparison(
    source_text: &str,
    target_text: &str,
    config: &ReconConfig,
    decomposer: &Decomposer<'_>,
) -> Envelope {
    match run(source_text, target_text, config, decomposer) {
        Ok(report) => Envelope::ok(report.results),
        Err(e) => {
            log::debug!("comparison failed: {e}");
            Envelope::failure(e.to_string())
        }
    }
}

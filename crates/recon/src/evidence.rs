use crate::model::{ComparisonResult, ReconSummary, SiteStatus};

/// Per-status counts over a result sequence. Index-level counts (distinct ids,
/// duplicates, blank ids) are filled in by the engine.
pub fn compute_summary(results: &[ComparisonResult]) -> ReconSummary {
    let mut summary = ReconSummary {
        total: results.len(),
        ..ReconSummary::default()
    };

    for r in results {
        match r.status {
            SiteStatus::New => summary.new += 1,
            SiteStatus::Removed => summary.removed += 1,
            SiteStatus::Mismatch => summary.mismatch += 1,
            SiteStatus::Unchanged => summary.unchanged += 1,
        }
    }

    summary
}

//! Display helpers over a finished result sequence: filtering and the
//! location ordering used by reports.

use crate::model::{ComparisonResult, SiteStatus};

/// Status filter plus free-text search. An empty filter keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultFilter {
    pub status: Option<SiteStatus>,
    pub search: Option<String>,
}

impl ResultFilter {
    pub fn matches(&self, result: &ComparisonResult) -> bool {
        if let Some(status) = self.status {
            if result.status != status {
                return false;
            }
        }

        let needle = match self.search.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_lowercase(),
            _ => return true,
        };

        let mut fields: Vec<&str> = vec![result.identifier.as_str()];
        fields.extend(result.source_name.as_deref());
        fields.extend(result.target_name.as_deref());
        if let Some(e) = &result.enrichment {
            fields.extend([
                e.region.as_str(),
                e.province.as_str(),
                e.city.as_str(),
                e.place.as_str(),
            ]);
        }

        fields.iter().any(|f| f.to_lowercase().contains(&needle))
    }

    pub fn apply<'a>(&self, results: &'a [ComparisonResult]) -> Vec<&'a ComparisonResult> {
        results.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Stable sort by region, province, city, place, then identifier. Results
/// without enrichment sort as if every location field were empty.
pub fn sort_by_location(results: &mut [ComparisonResult]) {
    results.sort_by(|a, b| location_key(a).cmp(&location_key(b)));
}

fn location_key(r: &ComparisonResult) -> (&str, &str, &str, &str, &str) {
    match &r.enrichment {
        Some(e) => (
            e.region.as_str(),
            e.province.as_str(),
            e.city.as_str(),
            e.place.as_str(),
            r.identifier.as_str(),
        ),
        None => ("", "", "", "", r.identifier.as_str()),
    }
}

use std::collections::HashMap;

use serde::Serialize;

use crate::config::StatusLabels;
use crate::table::Side;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One keyed data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRecord {
    /// Trimmed, case preserved.
    pub identifier: String,
    /// Composite name as it appears in the row (empty without a name column).
    pub raw_name: String,
    pub source_row: Vec<String>,
}

/// Identifier -> record for one table, in first-seen order.
///
/// A repeated identifier replaces the earlier record but keeps its position.
#[derive(Debug, Clone, Default)]
pub struct SiteIndex {
    records: Vec<SiteRecord>,
    positions: HashMap<String, usize>,
    pub duplicates: usize,
    pub blank_ids: usize,
}

impl SiteIndex {
    pub fn insert(&mut self, record: SiteRecord) {
        match self.positions.get(&record.identifier) {
            Some(&pos) => {
                self.duplicates += 1;
                self.records[pos] = record;
            }
            None => {
                self.positions.insert(record.identifier.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&SiteRecord> {
        self.positions.get(identifier).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.positions.contains_key(identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SiteStatus {
    New,
    Removed,
    Mismatch,
    Unchanged,
}

impl SiteStatus {
    pub const ALL: [SiteStatus; 4] = [Self::New, Self::Removed, Self::Mismatch, Self::Unchanged];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Removed => "REMOVED",
            Self::Mismatch => "MISMATCH",
            Self::Unchanged => "UNCHANGED",
        }
    }

    /// Labels used by older reporting integrations.
    pub fn legacy_label(&self) -> &'static str {
        match self {
            Self::New => "NEW SITE",
            Self::Removed => "REMOVED SITE",
            Self::Mismatch => "NAME MISMATCH",
            Self::Unchanged => "UNCHANGED",
        }
    }

    pub fn label(&self, labels: StatusLabels) -> &'static str {
        match labels {
            StatusLabels::Short => self.as_str(),
            StatusLabels::Legacy => self.legacy_label(),
        }
    }

    /// Accepts either vocabulary, case-insensitively.
    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim().to_uppercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == needle || s.legacy_label() == needle)
    }

    pub fn remark(&self) -> &'static str {
        match self {
            Self::New => "Found in NMS only",
            Self::Removed => "Found in UDM only",
            Self::Mismatch => "Suffix/Prefix Update Detected",
            Self::Unchanged => "Names match",
        }
    }
}

impl std::fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location and technology fields derived from a site name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Enrichment {
    pub site_code: String,
    pub region: String,
    pub province: String,
    pub city: String,
    pub place: String,
    pub tech_gen2: String,
    pub tech_gen4: String,
    pub tech_gen5: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub status: SiteStatus,
    pub identifier: String,
    /// NMS-side name; `None` when the identifier is target-only.
    pub source_name: Option<String>,
    /// UDM-side name; `None` when the identifier is source-only.
    pub target_name: Option<String>,
    pub remarks: String,
    #[serde(flatten)]
    pub enrichment: Option<Enrichment>,
}

impl ComparisonResult {
    /// The name enrichment is derived from: NMS side when present, else UDM.
    pub fn primary_name(&self) -> &str {
        self.source_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.target_name.as_deref())
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total: usize,
    pub new: usize,
    pub removed: usize,
    pub mismatch: usize,
    pub unchanged: usize,
    pub source_ids: usize,
    pub target_ids: usize,
    pub source_duplicates: usize,
    pub target_duplicates: usize,
    pub source_blank_ids: usize,
    pub target_blank_ids: usize,
}

impl ReconSummary {
    pub fn count(&self, status: SiteStatus) -> usize {
        match status {
            SiteStatus::New => self.new,
            SiteStatus::Removed => self.removed,
            SiteStatus::Mismatch => self.mismatch,
            SiteStatus::Unchanged => self.unchanged,
        }
    }

    pub fn has_discrepancies(&self) -> bool {
        self.new + self.removed + self.mismatch > 0
    }

    pub(crate) fn record_index(&mut self, side: Side, index: &SiteIndex) {
        match side {
            Side::Source => {
                self.source_ids = index.len();
                self.source_duplicates = index.duplicates;
                self.source_blank_ids = index.blank_ids;
            }
            Side::Target => {
                self.target_ids = index.len();
                self.target_duplicates = index.duplicates;
                self.target_blank_ids = index.blank_ids;
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub results: Vec<ComparisonResult>,
}

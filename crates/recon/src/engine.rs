use crate::config::{ColumnAliases, ReconConfig, ResultOrder};
use crate::decompose::Decomposer;
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::header::{resolve_columns, ColumnIndex};
use crate::model::{
    ComparisonResult, Enrichment, ReconMeta, ReconReport, SiteIndex, SiteRecord, SiteStatus,
};
use crate::table::{parse_table, RawTable, Side};
use crate::view::sort_by_location;

/// Parse both comma-separated documents and run the full comparison.
pub fn run(
    source_text: &str,
    target_text: &str,
    config: &ReconConfig,
    decomposer: &Decomposer<'_>,
) -> Result<ReconReport, ReconError> {
    let source = parse_table(Side::Source, source_text)?;
    let target = parse_table(Side::Target, target_text)?;
    run_tables(&source, &target, config, decomposer)
}

/// Reconcile two parsed tables, then enrich, order and summarize the results.
pub fn run_tables(
    source: &RawTable,
    target: &RawTable,
    config: &ReconConfig,
    decomposer: &Decomposer<'_>,
) -> Result<ReconReport, ReconError> {
    let (source_index, target_index) = index_both(source, target, &config.columns)?;
    let mut results = classify(&source_index, &target_index);

    if config.enrich {
        enrich(&mut results, decomposer);
    }
    if config.order == ResultOrder::Location {
        sort_by_location(&mut results);
    }

    let mut summary = compute_summary(&results);
    summary.record_index(Side::Source, &source_index);
    summary.record_index(Side::Target, &target_index);

    log::debug!(
        "reconciled {} identifier(s): {} new, {} removed, {} mismatch, {} unchanged",
        summary.total,
        summary.new,
        summary.removed,
        summary.mismatch,
        summary.unchanged,
    );

    Ok(ReconReport {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        results,
    })
}

/// Classify every identifier in the union of both tables.
///
/// Source order first, then target-only identifiers in target order. No
/// enrichment is attached.
pub fn reconcile(
    source: &RawTable,
    target: &RawTable,
    config: &ReconConfig,
) -> Result<Vec<ComparisonResult>, ReconError> {
    let (source_index, target_index) = index_both(source, target, &config.columns)?;
    Ok(classify(&source_index, &target_index))
}

fn index_both(
    source: &RawTable,
    target: &RawTable,
    aliases: &ColumnAliases,
) -> Result<(SiteIndex, SiteIndex), ReconError> {
    // Both key columns must resolve before any row is indexed.
    let source_cols = resolve_columns(Side::Source, source, aliases)?;
    let target_cols = resolve_columns(Side::Target, target, aliases)?;
    Ok((
        build_index(Side::Source, source, source_cols),
        build_index(Side::Target, target, target_cols),
    ))
}

/// Key every data row by its trimmed identifier. Blank identifiers are skipped.
pub fn build_index(side: Side, table: &RawTable, columns: ColumnIndex) -> SiteIndex {
    let mut index = SiteIndex::default();

    for row in table.data_rows() {
        let identifier = RawTable::cell(row, columns.id).trim();
        if identifier.is_empty() {
            index.blank_ids += 1;
            continue;
        }
        let raw_name = columns
            .name
            .map(|col| RawTable::cell(row, col).to_string())
            .unwrap_or_default();

        index.insert(SiteRecord {
            identifier: identifier.to_string(),
            raw_name,
            source_row: row.clone(),
        });
    }

    if index.duplicates > 0 {
        log::warn!(
            "{side}: {} duplicate identifier row(s) collapsed, last row wins",
            index.duplicates
        );
    }
    if index.blank_ids > 0 {
        log::warn!("{side}: skipped {} row(s) with a blank identifier", index.blank_ids);
    }
    log::debug!("{side}: indexed {} distinct identifier(s)", index.len());

    index
}

fn classify(source: &SiteIndex, target: &SiteIndex) -> Vec<ComparisonResult> {
    let mut results = Vec::with_capacity(source.len() + target.len());

    for record in source.iter() {
        let status = match target.get(&record.identifier) {
            None => SiteStatus::New,
            Some(other) if names_equal(&record.raw_name, &other.raw_name) => SiteStatus::Unchanged,
            Some(_) => SiteStatus::Mismatch,
        };
        results.push(ComparisonResult {
            status,
            identifier: record.identifier.clone(),
            source_name: Some(record.raw_name.clone()),
            target_name: target.get(&record.identifier).map(|r| r.raw_name.clone()),
            remarks: status.remark().to_string(),
            enrichment: None,
        });
    }

    for record in target.iter().filter(|r| !source.contains(&r.identifier)) {
        results.push(ComparisonResult {
            status: SiteStatus::Removed,
            identifier: record.identifier.clone(),
            source_name: None,
            target_name: Some(record.raw_name.clone()),
            remarks: SiteStatus::Removed.remark().to_string(),
            enrichment: None,
        });
    }

    results
}

/// Trimmed, case-insensitive comparison.
fn names_equal(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Attach decomposition and technology buckets derived from each result's
/// primary name.
pub fn enrich(results: &mut [ComparisonResult], decomposer: &Decomposer<'_>) {
    for result in results.iter_mut() {
        let location = decomposer.decompose(result.primary_name());
        let tech = decomposer.tech_rules().classify(&location.tech_suffix);
        result.enrichment = Some(Enrichment {
            site_code: location.site_code,
            region: location.region,
            province: location.province,
            city: location.city,
            place: location.place,
            tech_gen2: tech.g2,
            tech_gen4: tech.g4,
            tech_gen5: tech.g5,
        });
    }
}

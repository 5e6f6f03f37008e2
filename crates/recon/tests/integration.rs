use std::path::PathBuf;

use netsite_recon::config::{ResultOrder, StatusLabels};
use netsite_recon::model::SiteStatus;
use netsite_recon::table::{parse_table, Side};
use netsite_recon::{
    process_comparison, reconcile, run, Decomposer, GeoDictionary, ReconConfig, ReconError,
    ReconReport, TechRules,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

fn load_and_run(config: &ReconConfig) -> ReconReport {
    let dict = GeoDictionary::builtin().unwrap();
    let rules = TechRules::default();
    let decomposer = Decomposer::new(&dict, &rules).unwrap();
    run(&fixture("nms.csv"), &fixture("udm.csv"), config, &decomposer).unwrap()
}

fn ids_and_statuses(report: &ReconReport) -> Vec<(String, SiteStatus)> {
    report
        .results
        .iter()
        .map(|r| (r.identifier.clone(), r.status))
        .collect()
}

// -------------------------------------------------------------------------
// Fixture runs
// -------------------------------------------------------------------------

#[test]
fn fixture_input_order() {
    let report = load_and_run(&ReconConfig::default());

    assert_eq!(
        ids_and_statuses(&report),
        vec![
            ("P100".to_string(), SiteStatus::Unchanged),
            ("P200".to_string(), SiteStatus::Mismatch),
            ("P300".to_string(), SiteStatus::New),
            ("P400".to_string(), SiteStatus::Removed),
        ]
    );

    let s = &report.summary;
    assert_eq!(s.total, 4);
    assert_eq!(s.source_ids, 3);
    assert_eq!(s.target_ids, 3);
    assert_eq!(s.source_blank_ids, 1);
    assert_eq!(s.target_duplicates, 1);
    assert_eq!(s.new + s.unchanged + s.mismatch, s.source_ids);
    assert_eq!(s.removed + s.unchanged + s.mismatch, s.target_ids);
}

#[test]
fn fixture_enrichment() {
    let report = load_and_run(&ReconConfig::default());

    let mismatch = &report.results[1];
    assert_eq!(mismatch.source_name.as_deref(), Some("TCAGMATINADDS2LT"));
    assert_eq!(mismatch.target_name.as_deref(), Some("TCAGMATINADDS2L"));
    let e = mismatch.enrichment.as_ref().unwrap();
    assert_eq!(e.site_code, "TCAG");
    assert_eq!(e.place, "MATINA");
    assert_eq!(e.city, "Davao City");
    assert_eq!(e.province, "Davao del Sur");
    assert_eq!(e.region, "Region XI");
    assert_eq!(e.tech_gen4, "L");
    assert_eq!(e.tech_gen5, "T");
    assert_eq!(e.tech_gen2, "YES");

    let removed = &report.results[3];
    assert_eq!(removed.source_name, None);
    assert_eq!(removed.remarks, "Found in UDM only");
    assert_eq!(removed.enrichment.as_ref().unwrap().city, "Tagum City");
}

#[test]
fn fixture_config_location_order() {
    let config = ReconConfig::from_toml(&fixture("site-recon.toml")).unwrap();
    assert_eq!(config.order, ResultOrder::Location);
    assert_eq!(config.status_labels, StatusLabels::Legacy);

    let report = load_and_run(&config);
    let order: Vec<&str> = report.results.iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(order, vec!["P100", "P400", "P300", "P200"]);
    assert_eq!(report.meta.config_name, "weekly-mindanao");
    assert_eq!(
        report.results[3].status.label(config.status_labels),
        "NAME MISMATCH"
    );
}

// -------------------------------------------------------------------------
// Behavioral scenarios
// -------------------------------------------------------------------------

#[test]
fn scenario_unchanged_new_removed() {
    let source = parse_table(Side::Source, "PLA_ID,NAME\nS1,Alpha\nS2,Beta\n").unwrap();
    let target = parse_table(Side::Target, "PLA_ID,NAME\nS1,Alpha\nS3,Gamma\n").unwrap();
    let results = reconcile(&source, &target, &ReconConfig::default()).unwrap();

    let got: Vec<(&str, SiteStatus)> =
        results.iter().map(|r| (r.identifier.as_str(), r.status)).collect();
    assert_eq!(
        got,
        vec![
            ("S1", SiteStatus::Unchanged),
            ("S2", SiteStatus::New),
            ("S3", SiteStatus::Removed),
        ]
    );
}

#[test]
fn header_only_inputs_abort() {
    let dict = GeoDictionary::builtin().unwrap();
    let rules = TechRules::default();
    let decomposer = Decomposer::new(&dict, &rules).unwrap();

    let err = run("PLA_ID,SITE NAME\n", "PLA_ID,SITE NAME\n", &ReconConfig::default(), &decomposer)
        .unwrap_err();
    assert!(matches!(err, ReconError::Parse { .. }));

    let envelope =
        process_comparison("PLA_ID,SITE NAME\n", "PLA_ID,SITE NAME\n", &ReconConfig::default(), &decomposer);
    assert!(!envelope.success);
    assert!(envelope.data.is_none());
    assert!(envelope.error.unwrap().contains("NMS file"));
}

#[test]
fn mixed_case_header_resolves() {
    let source = parse_table(Side::Source, "Site Id ,Site Name\nS1,Alpha\n").unwrap();
    let target = parse_table(Side::Target, "ne id,bts_name\nS1,ALPHA\n").unwrap();
    let results = reconcile(&source, &target, &ReconConfig::default()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, SiteStatus::Unchanged);
}

#[test]
fn missing_key_column_names_the_side() {
    let source = parse_table(Side::Source, "CELL,SITE NAME\nS1,Alpha\n").unwrap();
    let target = parse_table(Side::Target, "PLA_ID,SITE NAME\nS1,Alpha\n").unwrap();
    let err = reconcile(&source, &target, &ReconConfig::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "NMS file: could not find identifier column (expected one of: PLA_ID, SITE ID, NE ID)"
    );
}

#[test]
fn envelope_success_counts_results() {
    let dict = GeoDictionary::builtin().unwrap();
    let rules = TechRules::default();
    let decomposer = Decomposer::new(&dict, &rules).unwrap();

    let envelope = process_comparison(
        &fixture("nms.csv"),
        &fixture("udm.csv"),
        &ReconConfig::default(),
        &decomposer,
    );
    assert!(envelope.success);
    assert_eq!(envelope.count, Some(4));

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["data"][0]["identifier"], "P100");
    assert_eq!(json["data"][0]["city"], "Panabo City");
    assert_eq!(json["data"][2]["remarks"], "Found in NMS only");
}

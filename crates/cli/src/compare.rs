//! `netsite compare` and `netsite validate`.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use netsite_io::{import_table, read_file_as_utf8, read_reader_as_utf8, ExportOptions, ExportScope};
use netsite_recon::config::{ResultOrder, StatusLabels};
use netsite_recon::model::{ReconReport, SiteStatus};
use netsite_recon::{
    run_tables, Decomposer, Envelope, GeoDictionary, RawTable, ReconConfig, ReconError,
    ResultFilter, Side, TechRules,
};

use crate::exit_codes::EXIT_COMPARE_DIFFS;
use crate::CliError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Report with meta, summary and results
    Json,
    /// `{"success": .., "data": [..], "count": N}`; always exits 0
    Envelope,
    /// Fixed-column site report
    Csv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Input,
    Location,
}

#[derive(Args)]
pub struct CompareArgs {
    /// NMS export (source side), or - for stdin
    nms: PathBuf,

    /// UDM export (target side), or - for stdin
    udm: PathBuf,

    /// Comparison config TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Geo dictionary TOML (overrides the config's [dictionary])
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Only output sites with this status (NEW, REMOVED, MISMATCH, UNCHANGED or the legacy labels)
    #[arg(long)]
    status: Option<String>,

    /// Case-insensitive text search over identifier, names and location
    #[arg(long)]
    search: Option<String>,

    /// Result ordering (overrides the config)
    #[arg(long, value_enum)]
    order: Option<OrderArg>,

    /// Skip location and technology enrichment
    #[arg(long)]
    no_enrich: bool,

    /// Write output to file (a directory gets the default report name)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

pub fn cmd_compare(args: CompareArgs) -> Result<(), CliError> {
    let rules = TechRules::default();
    let as_envelope = args.format == OutputFormat::Envelope;

    let prepared = match prepare(&args) {
        Ok(prepared) => prepared,
        Err(e) if as_envelope => return emit_envelope(Envelope::failure(e.message), &args),
        Err(e) => return Err(e),
    };
    let outcome = Decomposer::new(&prepared.dict, &rules)
        .and_then(|decomposer| {
            let report = compare_filtered(&prepared, &decomposer)?;
            Ok((decomposer, report))
        })
        .map_err(CliError::recon);

    if as_envelope {
        let envelope = match outcome {
            Ok((_, report)) => Envelope::ok(report.results),
            Err(e) => Envelope::failure(e.message),
        };
        return emit_envelope(envelope, &args);
    }
    let (decomposer, report) = outcome?;

    match args.format {
        OutputFormat::Csv => write_csv(&report, &prepared, &decomposer, args.output.as_deref())?,
        _ => {
            let json_str = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
            emit(&json_str, args.output.as_deref())?;
        }
    }

    print_summary(&report);

    if report.summary.has_discrepancies() {
        return Err(CliError {
            code: EXIT_COMPARE_DIFFS,
            message: "differences found".into(),
            hint: None,
        });
    }
    Ok(())
}

/// Inputs and settings for one comparison, fully loaded.
struct Prepared {
    config: ReconConfig,
    dict: GeoDictionary,
    filter: ResultFilter,
    nms: RawTable,
    udm: RawTable,
}

fn prepare(args: &CompareArgs) -> Result<Prepared, CliError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(order) = args.order {
        config.order = match order {
            OrderArg::Input => ResultOrder::Input,
            OrderArg::Location => ResultOrder::Location,
        };
    }
    if args.no_enrich {
        config.enrich = false;
    }

    let filter = ResultFilter {
        status: args.status.as_deref().map(parse_status).transpose()?,
        search: args.search.clone(),
    };

    let dict = load_dictionary(args.dictionary.as_deref(), args.config.as_deref(), &config)?;

    if args.nms == Path::new("-") && args.udm == Path::new("-") {
        return Err(CliError::args("only one input can be read from stdin"));
    }
    let nms_text = read_input(&args.nms)?;
    let udm_text = read_input(&args.udm)?;

    let nms = import_table(Side::Source, &nms_text).map_err(CliError::recon)?;
    let udm = import_table(Side::Target, &udm_text).map_err(CliError::recon)?;

    Ok(Prepared { config, dict, filter, nms, udm })
}

/// Full run with the status/search filter applied to the results.
/// The summary keeps the unfiltered counts.
fn compare_filtered(
    prepared: &Prepared,
    decomposer: &Decomposer<'_>,
) -> Result<ReconReport, ReconError> {
    let mut report = run_tables(&prepared.nms, &prepared.udm, &prepared.config, decomposer)?;
    report.results.retain(|r| prepared.filter.matches(r));
    Ok(report)
}

fn emit_envelope(envelope: Envelope, args: &CompareArgs) -> Result<(), CliError> {
    let json_str = serde_json::to_string(&envelope)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
    emit(&json_str, args.output.as_deref())
}

fn parse_status(input: &str) -> Result<SiteStatus, CliError> {
    SiteStatus::parse(input).ok_or_else(|| {
        CliError::args(format!("unknown status {input:?}"))
            .with_hint("use NEW, REMOVED, MISMATCH or UNCHANGED")
    })
}

fn read_input(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        read_reader_as_utf8(std::io::stdin().lock()).map_err(CliError::io)
    } else {
        read_file_as_utf8(path).map_err(CliError::io)
    }
}

fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    match path {
        Some(path) => {
            let config_str = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
            ReconConfig::from_toml(&config_str).map_err(CliError::recon)
        }
        None => Ok(ReconConfig::default()),
    }
}

/// `--dictionary`, else the config's `[dictionary] path` (relative to the
/// config file), else the built-in dictionary.
pub fn load_dictionary(
    flag: Option<&Path>,
    config_path: Option<&Path>,
    config: &ReconConfig,
) -> Result<GeoDictionary, CliError> {
    let path = match (flag, &config.dictionary) {
        (Some(p), _) => Some(p.to_path_buf()),
        (None, Some(dict)) => {
            let base = config_path
                .and_then(Path::parent)
                .unwrap_or_else(|| Path::new("."));
            Some(base.join(&dict.path))
        }
        (None, None) => None,
    };

    match path {
        Some(path) => {
            log::debug!("loading geo dictionary from {}", path.display());
            let text = std::fs::read_to_string(&path)
                .map_err(|e| CliError::io(format!("cannot read dictionary {}: {e}", path.display())))?;
            GeoDictionary::from_toml(&text).map_err(CliError::recon)
        }
        None => GeoDictionary::builtin().map_err(CliError::recon),
    }
}

fn write_csv(
    report: &ReconReport,
    prepared: &Prepared,
    decomposer: &Decomposer<'_>,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let labels = prepared.config.status_labels;
    let scope = match prepared.filter.status {
        Some(status) => ExportScope::Status(status),
        None => ExportScope::All,
    };
    let opts = ExportOptions { scope, labels, decomposer };

    match output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(scope.default_file_name(labels))
            } else {
                path.to_path_buf()
            };
            let n = netsite_io::export(&report.results, &path, &opts).map_err(CliError::io)?;
            eprintln!("wrote {} ({} row(s))", path.display(), n);
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            netsite_io::write_report(&report.results, &mut handle, &opts).map_err(CliError::io)?;
        }
    }
    Ok(())
}

fn emit(text: &str, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn print_summary(report: &ReconReport) {
    let s = &report.summary;
    eprintln!(
        "compare '{}': {} site(s), {} new, {} removed, {} mismatch, {} unchanged",
        report.meta.config_name, s.total, s.new, s.removed, s.mismatch, s.unchanged,
    );
    if s.source_duplicates + s.target_duplicates > 0 {
        eprintln!(
            "duplicates collapsed: {} NMS, {} UDM (last row wins)",
            s.source_duplicates, s.target_duplicates,
        );
    }
    if s.source_blank_ids + s.target_blank_ids > 0 {
        eprintln!(
            "blank identifiers skipped: {} NMS, {} UDM",
            s.source_blank_ids, s.target_blank_ids,
        );
    }
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;
    let dict = load_dictionary(None, Some(&config_path), &config)?;

    let labels = match config.status_labels {
        StatusLabels::Short => "short",
        StatusLabels::Legacy => "legacy",
    };
    let order = match config.order {
        ResultOrder::Input => "input",
        ResultOrder::Location => "location",
    };
    eprintln!(
        "valid: config '{}' ({} id alias(es), {} name alias(es), order {}, {} labels, {} province code(s), {} city code(s))",
        config.name,
        config.columns.id.len(),
        config.columns.name.len(),
        order,
        labels,
        dict.provinces().len(),
        dict.cities().len(),
    );
    Ok(())
}

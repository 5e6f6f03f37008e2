// CSV export of comparison results

use std::io::Write;
use std::path::Path;

use netsite_recon::config::StatusLabels;
use netsite_recon::decompose::Decomposer;
use netsite_recon::model::{ComparisonResult, SiteStatus};
use netsite_recon::techgen::Generation;

pub const EXPORT_HEADERS: [&str; 15] = [
    "PLA_ID",
    "Status",
    "Site Code",
    "Region",
    "Province",
    "Municipality",
    "Barangay",
    "2G",
    "4G",
    "5G",
    "4G Bands",
    "5G Bands",
    "NMS Name",
    "UDM Name",
    "Remarks",
];

/// Which results an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    All,
    Status(SiteStatus),
}

impl ExportScope {
    pub fn includes(&self, result: &ComparisonResult) -> bool {
        match self {
            Self::All => true,
            Self::Status(s) => result.status == *s,
        }
    }

    /// `network_report_All_Sites.csv` or `network_report_<STATUS>.csv`.
    pub fn default_file_name(&self, labels: StatusLabels) -> String {
        match self {
            Self::All => "network_report_All_Sites.csv".to_string(),
            Self::Status(s) => format!("network_report_{}.csv", s.label(labels).replace(' ', "_")),
        }
    }
}

/// Options shared by every export call.
pub struct ExportOptions<'a, 'd> {
    pub scope: ExportScope,
    pub labels: StatusLabels,
    /// Used for the band columns.
    pub decomposer: &'a Decomposer<'d>,
}

pub fn export(results: &[ComparisonResult], path: &Path, opts: &ExportOptions) -> Result<usize, String> {
    let file = std::fs::File::create(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    let written = write_report(results, &mut writer, opts)?;
    writer.flush().map_err(|e| e.to_string())?;
    Ok(written)
}

/// Write the header and every in-scope result. Returns the number of data rows.
pub fn write_report<W: Write>(
    results: &[ComparisonResult],
    out: &mut W,
    opts: &ExportOptions,
) -> Result<usize, String> {
    let header: Vec<Field> = EXPORT_HEADERS.iter().map(|h| Field::Plain(h)).collect();
    write_line(out, &header)?;

    let mut written = 0;
    for result in results.iter().filter(|r| opts.scope.includes(r)) {
        let e = result.enrichment.clone().unwrap_or_default();
        let nms = result.source_name.as_deref().unwrap_or("");
        let udm = result.target_name.as_deref().unwrap_or("");

        let joined = [nms, udm]
            .iter()
            .filter(|n| !n.trim().is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("|");
        let rollup = opts.decomposer.rollup_bands(&joined);
        let bands_4g = rollup.label(Generation::G4).unwrap_or_default();
        let bands_5g = rollup.label(Generation::G5).unwrap_or_default();

        let row = [
            Field::Plain(&result.identifier),
            Field::Plain(result.status.label(opts.labels)),
            Field::Plain(&e.site_code),
            Field::Plain(&e.region),
            Field::Plain(&e.province),
            Field::Plain(&e.city),
            Field::Text(&e.place),
            Field::Plain(&e.tech_gen2),
            Field::Plain(&e.tech_gen4),
            Field::Plain(&e.tech_gen5),
            Field::Plain(&bands_4g),
            Field::Plain(&bands_5g),
            Field::Text(nms),
            Field::Text(udm),
            Field::Text(&result.remarks),
        ];
        write_line(out, &row)?;
        written += 1;
    }

    log::debug!("export: wrote {written} row(s)");
    Ok(written)
}

/// Free text is always quoted; other fields only when they need it.
enum Field<'a> {
    Plain(&'a str),
    Text(&'a str),
}

impl Field<'_> {
    fn render(&self) -> String {
        match self {
            Self::Plain(s) if !needs_quotes(s) => s.to_string(),
            Self::Plain(s) | Self::Text(s) => format!("\"{}\"", s.replace('"', "\"\"")),
        }
    }
}

fn needs_quotes(s: &str) -> bool {
    s.contains([',', '"', '\n', '\r'])
}

fn write_line<W: Write>(out: &mut W, fields: &[Field]) -> Result<(), String> {
    let line: Vec<String> = fields.iter().map(Field::render).collect();
    writeln!(out, "{}", line.join(",")).map_err(|e| e.to_string())
}

//! `netsite decompose`: inspect how site names are broken down.

use std::path::PathBuf;

use netsite_recon::{Decomposer, Location, ReconConfig, TechGenerations, TechRules};
use serde::Serialize;

use crate::compare::load_dictionary;
use crate::CliError;

#[derive(Serialize)]
struct Decomposed<'a> {
    name: &'a str,
    #[serde(flatten)]
    location: Location,
    #[serde(flatten)]
    tech: TechGenerations,
    bands: String,
}

pub fn cmd_decompose(
    names: Vec<String>,
    dictionary: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let dict = load_dictionary(dictionary.as_deref(), None, &ReconConfig::default())?;
    let rules = TechRules::default();
    let decomposer = Decomposer::new(&dict, &rules).map_err(CliError::recon)?;

    let rows: Vec<Decomposed> = names
        .iter()
        .map(|name| {
            let location = decomposer.decompose(name);
            let tech = rules.classify(&location.tech_suffix);
            let bands = decomposer.rollup_bands(name).to_string();
            Decomposed { name, location, tech, bands }
        })
        .collect();

    if json {
        let json_str = serde_json::to_string_pretty(&rows)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
        return Ok(());
    }

    for row in &rows {
        let loc = &row.location;
        println!("{}", row.name);
        println!("  site code: {}", loc.site_code);
        println!("  place:     {}", loc.place);
        println!("  city:      {}", loc.city);
        println!("  province:  {}", loc.province);
        println!("  region:    {}", loc.region);
        println!(
            "  tech:      {} (2G {:?}, 4G {:?}, 5G {:?})",
            loc.tech_suffix, row.tech.g2, row.tech.g4, row.tech.g5
        );
        if !row.bands.is_empty() {
            println!("  bands:     {}", row.bands);
        }
    }
    Ok(())
}

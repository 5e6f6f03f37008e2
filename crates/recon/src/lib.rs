//! `netsite-recon`: NMS/UDM site inventory reconciliation engine.
//!
//! Pure engine crate: receives CSV text, returns classified and enriched
//! results. No CLI or file IO dependencies.

pub mod config;
pub mod decompose;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod evidence;
pub mod geo;
pub mod header;
pub mod model;
pub mod table;
pub mod techgen;
pub mod view;

pub use config::ReconConfig;
pub use decompose::{Decomposer, Location};
pub use engine::{reconcile, run, run_tables};
pub use envelope::{process_comparison, Envelope};
pub use error::ReconError;
pub use geo::GeoDictionary;
pub use model::{ComparisonResult, ReconReport, ReconSummary, SiteStatus};
pub use table::{parse_table, RawTable, Side};
pub use techgen::{BandRollup, TechGenerations, TechRules};
pub use view::ResultFilter;

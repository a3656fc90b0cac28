//! Aggregation of network-simulation result exports.
//!
//! This module reads per-iteration PDR and delay files, folds them into
//! per-node series and pivots those into a per-topology summary table.

pub mod types;
pub mod stats;
pub mod ingest;
pub mod table;
pub mod report;

pub use types::*;
pub use stats::{mean_confidence_interval, normal_quantile, StatsError};
pub use ingest::{ingest_topology, read_samples, IngestError};
pub use table::build_table;
pub use report::{generate_json_report, read_table_csv, write_table_csv};

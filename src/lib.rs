//! # SimSummary - Result aggregation for network simulation batches
//!
//! This library turns the per-iteration result exports of a batch of network
//! simulation runs into one summary table per topology: for every node, the
//! mean and confidence-interval half-width of its packet delivery ratio and
//! delay under each routing protocol.
//!
//! ## Architecture
//!
//! - `config`: Run configuration (topologies, protocols, iterations, confidence)
//! - `config_loader`: YAML loading and command-line overrides
//! - `analysis`: Ingestion, statistics, table assembly and report output
//! - `orchestrator`: Per-topology pipeline driver
//!
//! ## Input layout
//!
//! ```text
//! <data_dir>/<topology>/pdr_results_<protocol>_<iteration>.csv    value: col 1, node: col 2
//! <data_dir>/<topology>/delay_results_<protocol>_<iteration>.csv  value: col 2, node: col 3
//! ```
//!
//! Files are semicolon separated without a header. Iterations are numbered
//! from 1.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use simsummary::{config::SummaryConfig, orchestrator};
//!
//! let config = SummaryConfig {
//!     data_dir: "runs".into(),
//!     iterations: 10,
//!     ..SummaryConfig::default()
//! };
//!
//! // Writes results_sim-3-.csv into the current directory
//! let report = orchestrator::run_summary(&config)?;
//! println!("{} tables", report.tables.len());
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Pipeline functions return `color_eyre::eyre::Result` with file and line
//! context. Domain errors (`StatsError`, `IngestError`, `ValidationError`) are
//! `thiserror` enums that can be recovered with `downcast_ref`.

pub mod config;
pub mod config_loader;
pub mod analysis;
pub mod orchestrator;

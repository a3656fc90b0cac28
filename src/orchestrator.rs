//! Summary orchestrator.
//!
//! Drives the pipeline for every configured topology: ingestion of the
//! per-iteration exports, table assembly and the CSV summary.

use color_eyre::eyre::{Context, Result};

use crate::analysis::{self, ReportMetadata, ResultTable, SummaryReport};
use crate::config::SummaryConfig;

/// Ingest and pivot one topology without writing anything
pub fn summarize_topology(config: &SummaryConfig, topology: &str) -> Result<ResultTable> {
    let data = analysis::ingest_topology(config, topology)?;
    let table = analysis::build_table(&data, config.confidence)
        .with_context(|| format!("Failed to summarize topology {}", topology))?;
    Ok(table)
}

/// Summarize every topology and write one `results_<topology>-.csv` each
pub fn run_summary(config: &SummaryConfig) -> Result<SummaryReport> {
    log::info!(
        "Summarizing {} topologies x {} protocols over {} iterations ({} mode)",
        config.topologies.len(),
        config.protocols.len(),
        config.iterations,
        config.mode
    );

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", config.output_dir.display())
    })?;

    let mut tables = Vec::with_capacity(config.topologies.len());
    for topology in &config.topologies {
        let table = summarize_topology(config, topology)?;
        analysis::write_table_csv(&table, &config.output_path(topology))?;
        tables.push(table);
    }

    Ok(SummaryReport {
        metadata: ReportMetadata {
            generated_at: chrono::Utc::now().to_rfc3339(),
            data_dir: config.data_dir.display().to_string(),
            iterations: config.iterations,
            confidence: config.confidence,
            mode: config.mode,
        },
        tables,
    })
}

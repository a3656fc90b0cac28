//! Output of summary tables: CSV files, JSON report and a stdout summary.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{eyre, Context, Result};

use super::types::*;

/// Summary table as read back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        value.to_string()
    }
}

/// Write a summary table as comma-separated values with a header row
pub fn write_table_csv(table: &ResultTable, output_path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(output_path)
        .with_context(|| format!("Failed to create summary file {}", output_path.display()))?;

    writer
        .write_record(table.header())
        .with_context(|| format!("Failed to write header to {}", output_path.display()))?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(1 + 2 * row.cells.len());
        record.push(row.node.to_string());
        for cell in &row.cells {
            record.push(format_value(cell.mean));
            record.push(format_value(cell.half_width));
        }
        writer.write_record(&record).with_context(|| {
            format!("Failed to write node {} to {}", row.node, output_path.display())
        })?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", output_path.display()))?;

    log::info!(
        "Summary for {} written to {} ({} nodes)",
        table.topology,
        output_path.display(),
        table.rows.len()
    );
    Ok(())
}

/// Read a summary table written by [`write_table_csv`]
pub fn read_table_csv(path: &Path) -> Result<CsvTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open summary file {}", path.display()))?;

    let header: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("Failed to read row {} of {}", idx + 1, path.display()))?;
        let values = record
            .iter()
            .map(|field| {
                field
                    .parse::<f64>()
                    .map_err(|_| eyre!("row {}: '{}' is not a number", idx + 1, field))
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(values);
    }

    Ok(CsvTable { header, rows })
}

/// Generate JSON report
pub fn generate_json_report(report: &SummaryReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Print a summary to stdout
pub fn print_summary(report: &SummaryReport) {
    println!("\n=== SIMULATION RESULT SUMMARY ===\n");
    println!("Data directory: {}", report.metadata.data_dir);
    println!("Iterations: {}", report.metadata.iterations);
    println!(
        "Confidence: {:.0}% ({})",
        report.metadata.confidence * 100.0,
        report.metadata.mode
    );

    for table in &report.tables {
        println!("\nTopology {}:", table.topology);
        println!("  Nodes: {}", table.rows.len());
        for (idx, column) in table.columns.iter().enumerate() {
            let means: Vec<f64> = table
                .rows
                .iter()
                .map(|r| r.cells[idx].mean)
                .filter(|m| !m.is_nan())
                .collect();
            if means.is_empty() {
                println!("  {}: no data", column.title());
            } else {
                let avg = means.iter().sum::<f64>() / means.len() as f64;
                println!(
                    "  {}: {} nodes, average of node means {:.2}",
                    column.title(),
                    means.len(),
                    avg
                );
            }
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ResultTable {
        ResultTable {
            topology: "sim-3".to_string(),
            columns: vec![
                ColumnSpec { metric: Metric::Delay, protocol: "UNICAST".to_string() },
                ColumnSpec { metric: Metric::Pdr, protocol: "UNICAST".to_string() },
            ],
            rows: vec![
                TableRow {
                    node: 1,
                    cells: vec![
                        ConfidenceInterval { mean: 10.0, half_width: 9.8 },
                        ConfidenceInterval { mean: 15.5, half_width: 0.0 },
                    ],
                },
                TableRow {
                    node: 4,
                    cells: vec![
                        ConfidenceInterval { mean: 30.25, half_width: 1.5 },
                        ConfidenceInterval::MISSING,
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_written_table_reads_back_with_same_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results_sim-3-.csv");
        let table = sample_table();

        write_table_csv(&table, &path).unwrap();
        let read = read_table_csv(&path).unwrap();

        assert_eq!(read.header, table.header());
        assert_eq!(read.rows.len(), 2);
        assert!(read.rows.iter().all(|r| r.len() == 1 + 2 * table.columns.len()));
        assert_eq!(read.rows[0], vec![1.0, 10.0, 9.8, 15.5, 0.0]);
        assert_eq!(read.rows[1][0], 4.0);
        assert!(read.rows[1][3].is_nan());
        assert!(read.rows[1][4].is_nan());
    }

    #[test]
    fn test_header_is_plain_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        write_table_csv(&sample_table(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let first_line = content.lines().next().unwrap();
        assert_eq!(first_line, "hops,Delay_UNICAST,CI,PDR_UNICAST,CI");
        assert!(content.contains("4,30.25,1.5,NaN,NaN"));
    }

    #[test]
    fn test_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = SummaryReport {
            metadata: ReportMetadata {
                generated_at: "2026-01-01T00:00:00+00:00".to_string(),
                data_dir: "runs".to_string(),
                iterations: 2,
                confidence: 0.95,
                mode: AggregationMode::PerNode,
            },
            tables: vec![sample_table()],
        };

        generate_json_report(&report, &path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["metadata"]["mode"], "per_node");
        assert_eq!(json["tables"][0]["topology"], "sim-3");
        assert_eq!(json["tables"][0]["columns"][1]["metric"], "PDR");
        assert_eq!(json["tables"][0]["rows"][0]["cells"][0]["mean"], 10.0);
        assert!(json["tables"][0]["rows"][1]["cells"][1]["mean"].is_null());
    }
}

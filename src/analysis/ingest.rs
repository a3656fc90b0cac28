//! Ingestion of per-iteration simulation exports.
//!
//! Each export is a headerless, semicolon-separated file with one row per
//! delivered packet. The value and node id columns depend on the metric.

use std::collections::BTreeMap;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use super::stats::mean_confidence_interval;
use super::types::*;
use crate::config::SummaryConfig;

/// Row layout problems in an export file
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("line {line}: expected at least {expected} columns, found {found}")]
    MissingColumn { line: u64, expected: usize, found: usize },

    #[error("line {line}, column {column}: '{value}' is not an integer")]
    InvalidInteger { line: u64, column: usize, value: String },
}

fn parse_field(record: &csv::StringRecord, column: usize, line: u64) -> Result<i64, IngestError> {
    let field = record.get(column).ok_or(IngestError::MissingColumn {
        line,
        expected: column + 1,
        found: record.len(),
    })?;
    field.parse::<i64>().map_err(|_| IngestError::InvalidInteger {
        line,
        column,
        value: field.to_string(),
    })
}

/// Read all samples of one export file in row order
pub fn read_samples(path: &Path, metric: Metric) -> Result<Vec<Sample>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open result file: {}", path.display()))?;

    let mut samples = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("Failed to read row {} of {}", idx + 1, path.display()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(idx as u64 + 1);

        let value = parse_field(&record, metric.value_column(), line)
            .with_context(|| format!("Malformed row in {}", path.display()))?;
        let node = parse_field(&record, metric.node_column(), line)
            .with_context(|| format!("Malformed row in {}", path.display()))?;
        let node = NodeId::try_from(node)
            .map_err(|_| IngestError::InvalidInteger {
                line,
                column: metric.node_column(),
                value: node.to_string(),
            })
            .with_context(|| format!("Negative node id in {}", path.display()))?;

        samples.push(Sample { node, value });
    }

    Ok(samples)
}

/// Group one file's samples by node, keeping row order within each node
pub fn group_by_node(samples: &[Sample]) -> BTreeMap<NodeId, Vec<f64>> {
    let mut groups: BTreeMap<NodeId, Vec<f64>> = BTreeMap::new();
    for sample in samples {
        groups.entry(sample.node).or_default().push(sample.value as f64);
    }
    groups
}

/// Append one file's contribution to the protocol series
pub fn fold_samples(samples: &[Sample], mode: AggregationMode, series: &mut ProtocolSeries) {
    match mode {
        AggregationMode::PerNode => {
            for (node, values) in group_by_node(samples) {
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                series.entry(node).or_default().push(mean);
            }
        }
        AggregationMode::LegacyCumulative => {
            // node -> (sum, count) of the rows read so far
            let mut running: BTreeMap<NodeId, (f64, usize)> = BTreeMap::new();
            for sample in samples {
                let entry = running.entry(sample.node).or_insert((0.0, 0));
                entry.0 += sample.value as f64;
                entry.1 += 1;

                for (node, (sum, count)) in &running {
                    series.entry(*node).or_default().push(sum / *count as f64);
                }
            }
        }
    }
}

/// Read one export file and fold it into `series`
pub fn ingest_file(
    path: &Path,
    metric: Metric,
    mode: AggregationMode,
    confidence: f64,
    series: &mut ProtocolSeries,
) -> Result<usize> {
    let samples = read_samples(path, metric)?;

    if log::log_enabled!(log::Level::Debug) {
        for (node, values) in group_by_node(&samples) {
            match mean_confidence_interval(&values, confidence) {
                Ok(ci) => log::debug!(
                    "{} node {}: mean = {} confidence interval = {}",
                    metric,
                    node,
                    ci.mean,
                    ci.half_width
                ),
                Err(e) => log::debug!("{} node {}: {}", metric, node, e),
            }
        }
    }

    fold_samples(&samples, mode, series);
    Ok(samples.len())
}

/// Ingest every protocol and iteration of one topology
pub fn ingest_topology(config: &SummaryConfig, topology: &str) -> Result<TopologyData> {
    let topology_dir = config.data_dir.join(topology);
    let mut data = TopologyData::new(topology);

    for protocol in &config.protocols {
        // register both metrics up front so column order is stable even for empty files
        data.protocol_series_mut(Metric::Delay, protocol);
        data.protocol_series_mut(Metric::Pdr, protocol);

        for iteration in 1..=config.iterations {
            for (metric, label) in [(Metric::Pdr, "PDRs"), (Metric::Delay, "delays")] {
                log::info!(
                    "Calculating {} for: {}-{}-iteration-{}",
                    label,
                    protocol,
                    topology,
                    iteration
                );
                let path = topology_dir.join(metric.file_name(protocol, iteration));
                let rows = ingest_file(
                    &path,
                    metric,
                    config.mode,
                    config.confidence,
                    data.protocol_series_mut(metric, protocol),
                )?;
                log::debug!("Read {} rows from {}", rows, path.display());
            }
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn samples(pairs: &[(NodeId, i64)]) -> Vec<Sample> {
        pairs.iter().map(|&(node, value)| Sample { node, value }).collect()
    }

    #[test]
    fn test_read_pdr_layout() {
        let file = write_file("a;10;1\nb;20;1\nc;5;2;extra\n");
        let read = read_samples(file.path(), Metric::Pdr).unwrap();
        assert_eq!(read, samples(&[(1, 10), (1, 20), (2, 5)]));
    }

    #[test]
    fn test_read_delay_layout_with_whitespace() {
        let file = write_file("x;y; 5 ;1\nx;y;15; 1\n\nx;y;7;3\n");
        let read = read_samples(file.path(), Metric::Delay).unwrap();
        assert_eq!(read, samples(&[(1, 5), (1, 15), (3, 7)]));
    }

    #[test]
    fn test_read_rejects_non_integer() {
        let file = write_file("a;10;1\nb;ten;1\n");
        let err = read_samples(file.path(), Metric::Pdr).unwrap_err();
        let root = err.downcast_ref::<IngestError>().unwrap();
        assert_eq!(
            root,
            &IngestError::InvalidInteger { line: 2, column: 1, value: "ten".to_string() }
        );
    }

    #[test]
    fn test_read_rejects_short_row() {
        let file = write_file("a;10\n");
        let err = read_samples(file.path(), Metric::Pdr).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<IngestError>(),
            Some(IngestError::MissingColumn { line: 1, expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_samples(&dir.path().join("nope.csv"), Metric::Pdr).unwrap_err();
        assert!(format!("{err}").contains("nope.csv"));
    }

    #[test]
    fn test_per_node_fold_appends_file_mean() {
        let mut series = ProtocolSeries::new();
        fold_samples(&samples(&[(1, 10), (1, 20)]), AggregationMode::PerNode, &mut series);
        assert_eq!(series[&1], vec![15.0]);
    }

    #[test]
    fn test_legacy_fold_appends_running_means() {
        let mut series = ProtocolSeries::new();
        fold_samples(
            &samples(&[(1, 10), (1, 20)]),
            AggregationMode::LegacyCumulative,
            &mut series,
        );
        assert_eq!(series[&1], vec![10.0, 15.0]);
    }

    #[test]
    fn test_legacy_fold_repeats_every_seen_node() {
        let mut series = ProtocolSeries::new();
        fold_samples(
            &samples(&[(1, 10), (2, 4), (1, 20)]),
            AggregationMode::LegacyCumulative,
            &mut series,
        );
        // node 1 is appended after each of the three rows, node 2 after the last two
        assert_eq!(series[&1], vec![10.0, 10.0, 15.0]);
        assert_eq!(series[&2], vec![4.0, 4.0]);
    }

    #[test]
    fn test_fold_accumulates_across_files() {
        let mut series = ProtocolSeries::new();
        fold_samples(&samples(&[(2, 100)]), AggregationMode::PerNode, &mut series);
        fold_samples(&samples(&[(2, 100)]), AggregationMode::PerNode, &mut series);
        assert_eq!(series[&2], vec![100.0, 100.0]);
    }

    #[test]
    fn test_empty_file_contributes_nothing() {
        let file = write_file("");
        let mut series = ProtocolSeries::new();
        let rows = ingest_file(
            file.path(),
            Metric::Delay,
            AggregationMode::PerNode,
            0.95,
            &mut series,
        )
        .unwrap();
        assert_eq!(rows, 0);
        assert!(series.is_empty());
    }
}

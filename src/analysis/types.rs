//! Core data types for simulation result aggregation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Node identifier as written by the simulation exporter
pub type NodeId = u64;

/// Measured quantity exported per iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    Delay,
    #[serde(rename = "PDR")]
    Pdr,
}

impl Metric {
    /// Column order of the summary table
    pub const ALL: [Metric; 2] = [Metric::Delay, Metric::Pdr];

    /// Prefix of the per-iteration export file
    pub fn file_prefix(self) -> &'static str {
        match self {
            Metric::Delay => "delay_results",
            Metric::Pdr => "pdr_results",
        }
    }

    /// Zero-based column holding the measured value
    pub fn value_column(self) -> usize {
        match self {
            Metric::Delay => 2,
            Metric::Pdr => 1,
        }
    }

    /// Zero-based column holding the node id
    pub fn node_column(self) -> usize {
        match self {
            Metric::Delay => 3,
            Metric::Pdr => 2,
        }
    }

    /// File name for one protocol and iteration, e.g. `pdr_results_UNICAST_3.csv`
    pub fn file_name(self, protocol: &str, iteration: u32) -> String {
        format!("{}_{}_{}.csv", self.file_prefix(), protocol, iteration)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Delay => write!(f, "Delay"),
            Metric::Pdr => write!(f, "PDR"),
        }
    }
}

/// How per-file samples are folded into a node's series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// One entry per node per file: the mean of that node's samples in the file
    #[default]
    PerNode,
    /// After every row, one running-mean entry for every node seen so far in the file
    LegacyCumulative,
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationMode::PerNode => write!(f, "per-node"),
            AggregationMode::LegacyCumulative => write!(f, "legacy-cumulative"),
        }
    }
}

/// A single observed value from one input row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub node: NodeId,
    pub value: i64,
}

/// Mean and half-width of a two-sided confidence interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub half_width: f64,
}

impl ConfidenceInterval {
    /// Placeholder for a node that has no series for a column
    pub const MISSING: ConfidenceInterval = ConfidenceInterval {
        mean: f64::NAN,
        half_width: f64::NAN,
    };

    pub fn lower(&self) -> f64 {
        self.mean - self.half_width
    }

    pub fn upper(&self) -> f64 {
        self.mean + self.half_width
    }
}

/// Values accumulated for one node, one metric and one protocol across iterations
pub type NodeSeries = Vec<f64>;

/// Series of every node for one metric and one protocol
pub type ProtocolSeries = BTreeMap<NodeId, NodeSeries>;

/// All series gathered for one topology.
///
/// Protocols keep the order in which they were ingested.
#[derive(Debug, Clone, Default)]
pub struct TopologyData {
    pub topology: String,
    pub series: BTreeMap<Metric, Vec<(String, ProtocolSeries)>>,
}

impl TopologyData {
    pub fn new(topology: impl Into<String>) -> Self {
        Self {
            topology: topology.into(),
            series: BTreeMap::new(),
        }
    }

    /// Series for a metric and protocol, created empty on first access
    pub fn protocol_series_mut(&mut self, metric: Metric, protocol: &str) -> &mut ProtocolSeries {
        let entries = self.series.entry(metric).or_default();
        let idx = match entries.iter().position(|(p, _)| p == protocol) {
            Some(idx) => idx,
            None => {
                entries.push((protocol.to_string(), ProtocolSeries::new()));
                entries.len() - 1
            }
        };
        &mut entries[idx].1
    }

    pub fn protocol_series(&self, metric: Metric, protocol: &str) -> Option<&ProtocolSeries> {
        self.series
            .get(&metric)?
            .iter()
            .find(|(p, _)| p == protocol)
            .map(|(_, s)| s)
    }

    /// (metric, protocol) pairs in table column order
    pub fn columns(&self) -> Vec<(Metric, String)> {
        Metric::ALL
            .iter()
            .filter_map(|m| self.series.get(m).map(|entries| (*m, entries)))
            .flat_map(|(m, entries)| entries.iter().map(move |(p, _)| (m, p.clone())))
            .collect()
    }
}

/// One (metric, protocol) column pair of the summary table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub metric: Metric,
    pub protocol: String,
}

impl ColumnSpec {
    /// Header label of the mean column, e.g. `PDR_UNICAST`
    pub fn title(&self) -> String {
        format!("{}_{}", self.metric, self.protocol)
    }
}

/// One row of the summary table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub node: NodeId,
    pub cells: Vec<ConfidenceInterval>,
}

/// Wide per-topology summary: one row per node, one interval per column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub topology: String,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<TableRow>,
}

impl ResultTable {
    /// Header row: node id column, then a mean and a `CI` label per column
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(1 + 2 * self.columns.len());
        header.push("hops".to_string());
        for column in &self.columns {
            header.push(column.title());
            header.push("CI".to_string());
        }
        header
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.rows.iter().map(|r| r.node).collect()
    }

    pub fn row(&self, node: NodeId) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.node == node)
    }

    /// Interval for a node and a column title such as `Delay_UNICAST`
    pub fn cell(&self, node: NodeId, title: &str) -> Option<ConfidenceInterval> {
        let idx = self.columns.iter().position(|c| c.title() == title)?;
        self.row(node).and_then(|r| r.cells.get(idx).copied())
    }
}

/// Summary of a full run, serialized into the JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub metadata: ReportMetadata,
    pub tables: Vec<ResultTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub data_dir: String,
    pub iterations: u32,
    pub confidence: f64,
    pub mode: AggregationMode,
}

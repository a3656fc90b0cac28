//! Pivot of per-node series into the wide summary table.

use std::collections::BTreeSet;

use super::stats::{mean_confidence_interval, StatsError};
use super::types::*;

/// Sorted union of node ids over every metric and protocol
pub fn collect_node_ids(data: &TopologyData) -> Vec<NodeId> {
    let ids: BTreeSet<NodeId> = data
        .series
        .values()
        .flat_map(|entries| entries.iter())
        .flat_map(|(_, series)| series.keys().copied())
        .collect();
    ids.into_iter().collect()
}

/// Build the summary table of one topology.
///
/// Cells are looked up by node id; a node without a series for a column gets
/// NaN for both the mean and the half-width.
pub fn build_table(data: &TopologyData, confidence: f64) -> Result<ResultTable, StatsError> {
    let columns: Vec<ColumnSpec> = data
        .columns()
        .into_iter()
        .map(|(metric, protocol)| ColumnSpec { metric, protocol })
        .collect();

    let mut rows = Vec::new();
    for node in collect_node_ids(data) {
        let mut cells = Vec::with_capacity(columns.len());
        for column in &columns {
            let series = data
                .protocol_series(column.metric, &column.protocol)
                .and_then(|s| s.get(&node))
                .filter(|s| !s.is_empty());

            let cell = match series {
                Some(series) => {
                    if series.len() == 1 {
                        log::warn!(
                            "Node {} has a single {} entry, its interval is undefined",
                            node,
                            column.title()
                        );
                    }
                    mean_confidence_interval(series, confidence)?
                }
                None => ConfidenceInterval::MISSING,
            };
            cells.push(cell);
        }
        rows.push(TableRow { node, cells });
    }

    if rows.is_empty() {
        log::warn!("No samples found for topology {}", data.topology);
    }

    Ok(ResultTable {
        topology: data.topology.clone(),
        columns,
        rows,
    })
}

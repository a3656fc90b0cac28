use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::analysis::stats::DEFAULT_CONFIDENCE;
use crate::analysis::types::AggregationMode;

/// Run configuration, loadable from YAML and overridable from the command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Directory holding one subdirectory of result files per topology
    pub data_dir: PathBuf,
    /// Directory the `results_<topology>-.csv` summaries are written to
    pub output_dir: PathBuf,
    /// Topology names, each a subdirectory of `data_dir`
    pub topologies: Vec<String>,
    /// Routing protocols, in column order
    pub protocols: Vec<String>,
    /// Number of iterations per protocol, numbered from 1
    pub iterations: u32,
    /// Confidence level of the reported intervals
    pub confidence: f64,
    /// How samples of one file are folded into the node series
    pub mode: AggregationMode,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            topologies: vec!["sim-3".to_string()],
            protocols: vec!["UNICAST".to_string()],
            iterations: 1,
            confidence: DEFAULT_CONFIDENCE,
            mode: AggregationMode::PerNode,
        }
    }
}

impl SummaryConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.iterations == 0 {
            return Err(ValidationError::InvalidIterations(
                "iteration count must be at least 1".to_string(),
            ));
        }

        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(ValidationError::InvalidConfidence(self.confidence));
        }

        if self.topologies.is_empty() {
            return Err(ValidationError::InvalidTopology(
                "at least one topology is required".to_string(),
            ));
        }
        for topology in &self.topologies {
            Self::validate_name(topology).map_err(ValidationError::InvalidTopology)?;
        }
        Self::validate_unique(&self.topologies).map_err(ValidationError::InvalidTopology)?;

        if self.protocols.is_empty() {
            return Err(ValidationError::InvalidProtocol(
                "at least one routing protocol is required".to_string(),
            ));
        }
        for protocol in &self.protocols {
            Self::validate_name(protocol).map_err(ValidationError::InvalidProtocol)?;
        }
        Self::validate_unique(&self.protocols).map_err(ValidationError::InvalidProtocol)?;

        Ok(())
    }

    /// Names end up in file paths, so they must be single path components
    fn validate_name(name: &str) -> Result<(), String> {
        if name.trim().is_empty() {
            return Err("name cannot be empty".to_string());
        }
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(format!("'{}' is not a plain name", name));
        }
        Ok(())
    }

    /// A repeated name would be ingested twice into the same series
    fn validate_unique(names: &[String]) -> Result<(), String> {
        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(name.as_str()) {
                return Err(format!("'{}' is listed more than once", name));
            }
        }
        Ok(())
    }

    /// Path of the summary written for `topology`
    pub fn output_path(&self, topology: &str) -> PathBuf {
        self.output_dir.join(format!("results_{}-.csv", topology))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid iteration count: {0}")]
    InvalidIterations(String),
    #[error("Confidence level must lie strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),
    #[error("Invalid routing protocol: {0}")]
    InvalidProtocol(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_historical_run() {
        let config = SummaryConfig::default();
        assert_eq!(config.topologies, vec!["sim-3"]);
        assert_eq!(config.protocols, vec!["UNICAST"]);
        assert_eq!(config.confidence, 0.95);
        assert_eq!(config.mode, AggregationMode::PerNode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_path() {
        let config = SummaryConfig {
            output_dir: PathBuf::from("out"),
            ..SummaryConfig::default()
        };
        assert_eq!(config.output_path("sim-3"), PathBuf::from("out/results_sim-3-.csv"));
    }

    #[test]
    fn test_validation_failures() {
        let zero = SummaryConfig { iterations: 0, ..SummaryConfig::default() };
        assert!(matches!(zero.validate(), Err(ValidationError::InvalidIterations(_))));

        let confidence = SummaryConfig { confidence: 1.5, ..SummaryConfig::default() };
        assert!(matches!(confidence.validate(), Err(ValidationError::InvalidConfidence(_))));

        let no_protocols = SummaryConfig { protocols: vec![], ..SummaryConfig::default() };
        assert!(matches!(no_protocols.validate(), Err(ValidationError::InvalidProtocol(_))));

        let traversal = SummaryConfig {
            topologies: vec!["../sim-3".to_string()],
            ..SummaryConfig::default()
        };
        assert!(matches!(traversal.validate(), Err(ValidationError::InvalidTopology(_))));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let protocols = SummaryConfig {
            protocols: vec!["UNICAST".to_string(), "UNICAST".to_string()],
            ..SummaryConfig::default()
        };
        match protocols.validate() {
            Err(ValidationError::InvalidProtocol(msg)) => assert!(msg.contains("UNICAST")),
            other => panic!("expected duplicate protocol error, got {:?}", other),
        }

        let topologies = SummaryConfig {
            topologies: vec!["sim-3".to_string(), "sim-1".to_string(), "sim-3".to_string()],
            ..SummaryConfig::default()
        };
        assert!(matches!(topologies.validate(), Err(ValidationError::InvalidTopology(_))));
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
protocols: ["BMRF_BROADCAST", "BMRF_UNICAST"]
iterations: 10
mode: legacy_cumulative
"#;
        let config: SummaryConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.protocols, vec!["BMRF_BROADCAST", "BMRF_UNICAST"]);
        assert_eq!(config.iterations, 10);
        assert_eq!(config.mode, AggregationMode::LegacyCumulative);
        assert_eq!(config.topologies, vec!["sim-3"]);
        assert!(config.validate().is_ok());
    }
}

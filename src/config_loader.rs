use crate::analysis::types::AggregationMode;
use crate::config::SummaryConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Load and parse a run configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<SummaryConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let config: SummaryConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Command-line values that take precedence over the YAML configuration
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub iterations: Option<u32>,
    pub topologies: Vec<String>,
    pub protocols: Vec<String>,
    pub confidence: Option<f64>,
    pub legacy_cumulative: bool,
}

/// Apply CLI overrides to a configuration and re-validate it
pub fn apply_cli_overrides(config: &mut SummaryConfig, overrides: &CliOverrides) -> Result<()> {
    if let Some(data_dir) = &overrides.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(output_dir) = &overrides.output_dir {
        config.output_dir = output_dir.clone();
    }
    if let Some(iterations) = overrides.iterations {
        config.iterations = iterations;
    }
    if !overrides.topologies.is_empty() {
        config.topologies = overrides.topologies.clone();
    }
    if !overrides.protocols.is_empty() {
        config.protocols = overrides.protocols.clone();
    }
    if let Some(confidence) = overrides.confidence {
        config.confidence = confidence;
    }
    if overrides.legacy_cumulative {
        config.mode = AggregationMode::LegacyCumulative;
    }

    if config.mode == AggregationMode::LegacyCumulative {
        warn!(
            "Legacy cumulative mode: every row appends a running mean for each node seen so far, \
             which inflates sample counts and narrows the reported intervals"
        );
    }

    config.validate()?;

    Ok(())
}

/// Resolve the effective configuration from an optional YAML file and CLI overrides
pub fn resolve_config(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<SummaryConfig> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => SummaryConfig::default(),
    };
    apply_cli_overrides(&mut config, overrides)?;
    Ok(config)
}

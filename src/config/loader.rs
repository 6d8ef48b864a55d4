//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::SimConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<SimConfig, ConfigError> {
    let config: SimConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SimConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_balancer::Algorithm;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.servers.len(), 3);
        assert_eq!(config.simulation.algorithm, Algorithm::RoundRobin);
        assert_eq!(config.history.routing_capacity, 100);
        assert_eq!(config.history.log_capacity, 50);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[simulation]
algorithm = "weighted-rr"

[[servers]]
weight = 3
response_time_ms = 120

[[servers]]
id = "edge"
up = false

[autoscale]
enabled = true
interval_ms = 500
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.simulation.algorithm, Algorithm::WeightedRoundRobin);
        assert_eq!(config.servers.len(), 2);
        assert_eq!(config.servers[0].weight, 3);
        assert_eq!(config.servers[1].id.as_deref(), Some("edge"));
        assert!(!config.servers[1].up);
        assert_eq!(config.servers[1].response_time_ms, 400);
        assert!(config.autoscale.enabled);
        assert_eq!(config.autoscale.interval_ms, 500);
        assert_eq!(config.autoscale.scale_up_threshold, 0.9);
    }

    #[test]
    fn test_unknown_algorithm_is_parse_error() {
        let err = parse_config("[simulation]\nalgorithm = \"fastest\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_surfaces() {
        let err = parse_config("[[servers]]\nweight = 0\n").unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/dispatch-sim.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

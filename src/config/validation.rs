//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (weights, latencies, capacities, intervals)
//! - Check autoscale thresholds are ordered
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SimConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::SimConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("at least one server must be configured")]
    EmptyPool,

    #[error("server #{index}: weight must be at least 1")]
    ZeroWeight { index: usize },

    #[error("server #{index}: response_time_ms must be at least 1")]
    ZeroResponseTime { index: usize },

    #[error("server #{index}: duplicate id `{id}`")]
    DuplicateId { index: usize, id: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("scale_down_threshold ({down}) must be below scale_up_threshold ({up})")]
    ThresholdOrder { down: f64, up: f64 },

    #[error("min_response_time_ms ({min}) must be below max_response_time_ms ({max})")]
    ResponseTimeRange { min: u64, max: u64 },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &SimConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.servers.is_empty() {
        errors.push(ValidationError::EmptyPool);
    }

    let mut seen = HashSet::new();
    for (index, server) in config.servers.iter().enumerate() {
        if server.weight == 0 {
            errors.push(ValidationError::ZeroWeight { index });
        }
        if server.response_time_ms == 0 {
            errors.push(ValidationError::ZeroResponseTime { index });
        }
        if let Some(id) = &server.id {
            if !seen.insert(id.as_str()) {
                errors.push(ValidationError::DuplicateId {
                    index,
                    id: id.clone(),
                });
            }
        }
    }

    let zero_checks = [
        ("simulation.resolution_ms", config.simulation.resolution_ms == 0),
        ("history.routing_capacity", config.history.routing_capacity == 0),
        ("history.log_capacity", config.history.log_capacity == 0),
        ("autoscale.interval_ms", config.autoscale.interval_ms == 0),
    ];
    for (field, is_zero) in zero_checks {
        if is_zero {
            errors.push(ValidationError::Zero { field });
        }
    }

    let autoscale = &config.autoscale;
    if autoscale.scale_down_threshold >= autoscale.scale_up_threshold {
        errors.push(ValidationError::ThresholdOrder {
            down: autoscale.scale_down_threshold,
            up: autoscale.scale_up_threshold,
        });
    }
    if autoscale.min_response_time_ms == 0
        || autoscale.min_response_time_ms >= autoscale.max_response_time_ms
    {
        errors.push(ValidationError::ResponseTimeRange {
            min: autoscale.min_response_time_ms,
            max: autoscale.max_response_time_ms,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde/env parsing handles syntactic)
//! - Enforce timeout-policy invariants (all deadlines > 0, endorse >= submit)
//! - Check the listener bind address parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic configuration violation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A deadline was configured as zero seconds.
    #[error("timeout for {class} must be greater than zero")]
    ZeroTimeout { class: &'static str },

    /// Endorsement must be budgeted at least as generously as submission,
    /// since it is the longer prerequisite round-trip.
    #[error("endorse timeout ({endorse_secs}s) must be >= submit timeout ({submit_secs}s)")]
    EndorseBelowSubmit { endorse_secs: u64, submit_secs: u64 },

    /// The listener bind address is not a valid socket address.
    #[error("invalid listener bind address: {value}")]
    InvalidBindAddress { value: String },

    /// A required string field is empty.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let timeouts = [
        ("evaluate", config.timeouts.evaluate_secs),
        ("endorse", config.timeouts.endorse_secs),
        ("submit", config.timeouts.submit_secs),
        ("commitStatus", config.timeouts.commit_status_secs),
    ];
    for (class, secs) in timeouts {
        if secs == 0 {
            errors.push(ValidationError::ZeroTimeout { class });
        }
    }

    if config.timeouts.endorse_secs < config.timeouts.submit_secs {
        errors.push(ValidationError::EndorseBelowSubmit {
            endorse_secs: config.timeouts.endorse_secs,
            submit_secs: config.timeouts.submit_secs,
        });
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress {
            value: config.listener.bind_address.clone(),
        });
    }

    let fields = [
        ("channel_name", config.channel_name.as_str()),
        ("chaincode_name", config.chaincode_name.as_str()),
        ("msp_id", config.msp_id.as_str()),
        ("peer_endpoint", config.peer_endpoint.as_str()),
        ("peer_host_alias", config.peer_host_alias.as_str()),
    ];
    for (field, value) in fields {
        if value.is_empty() {
            errors.push(ValidationError::EmptyField { field });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_endorse_below_submit_rejected() {
        let mut config = GatewayConfig::default();
        config.timeouts.endorse_secs = 3;
        config.timeouts.submit_secs = 5;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::EndorseBelowSubmit {
            endorse_secs: 3,
            submit_secs: 5,
        }));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = GatewayConfig::default();
        config.timeouts.evaluate_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ZeroTimeout { class: "evaluate" }));
    }

    #[test]
    fn test_all_errors_collected() {
        let mut config = GatewayConfig::default();
        config.timeouts.evaluate_secs = 0;
        config.channel_name.clear();
        config.listener.bind_address = "not-an-address".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_invalid_bind_address_rejected() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "3002".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::InvalidBindAddress { .. }
        ));
    }
}

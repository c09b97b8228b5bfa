//! Configuration loading from the process environment.
//!
//! Every field of [`GatewayConfig`] can be overridden with an environment
//! variable; anything unset falls back to the reference-network default.
//! Path defaults for key, certificate and trust root re-derive from
//! `CRYPTO_PATH` when only the root is overridden.

use std::env;
use std::path::PathBuf;

use crate::config::schema::{
    default_cert_path, default_key_path, default_tls_cert_path, GatewayConfig,
};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub struct ConfigError(pub Vec<ValidationError>);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "configuration validation failed: ")?;
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}

/// Return the value of an environment variable, or a default if unset/empty.
fn env_or_default(key: &str, default: String) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default,
    }
}

/// Like [`env_or_default`] for paths.
fn env_or_default_path(key: &str, default: PathBuf) -> PathBuf {
    match env::var(key) {
        Ok(value) if !value.is_empty() => PathBuf::from(value),
        _ => default,
    }
}

/// Parse a seconds value from the environment; keeps the default (with a
/// warning) if the variable is present but not a valid integer.
fn env_or_default_secs(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) if !value.is_empty() => match value.parse() {
            Ok(secs) => secs,
            Err(_) => {
                tracing::warn!(var = key, value = %value, "Ignoring non-numeric timeout override");
                default
            }
        },
        _ => default,
    }
}

/// Load and validate the gateway configuration from the environment.
pub fn load_from_env() -> Result<GatewayConfig, ConfigError> {
    let mut config = GatewayConfig::default();

    config.channel_name = env_or_default("CHANNEL_NAME", config.channel_name);
    config.chaincode_name = env_or_default("CHAINCODE_NAME", config.chaincode_name);
    config.msp_id = env_or_default("MSP_ID", config.msp_id);

    config.crypto_path = env_or_default_path("CRYPTO_PATH", config.crypto_path);
    config.key_path = env_or_default_path("KEY_PATH", default_key_path(&config.crypto_path));
    config.cert_path = env_or_default_path("CERT_PATH", default_cert_path(&config.crypto_path));
    config.tls_cert_path =
        env_or_default_path("TLS_CERT_PATH", default_tls_cert_path(&config.crypto_path));

    config.peer_endpoint = env_or_default("PEER_ENDPOINT", config.peer_endpoint);
    config.peer_host_alias = env_or_default("PEER_HOST_ALIAS", config.peer_host_alias);
    config.listener.bind_address = env_or_default("LISTEN_ADDRESS", config.listener.bind_address);

    config.timeouts.evaluate_secs =
        env_or_default_secs("EVALUATE_TIMEOUT_SECS", config.timeouts.evaluate_secs);
    config.timeouts.endorse_secs =
        env_or_default_secs("ENDORSE_TIMEOUT_SECS", config.timeouts.endorse_secs);
    config.timeouts.submit_secs =
        env_or_default_secs("SUBMIT_TIMEOUT_SECS", config.timeouts.submit_secs);
    config.timeouts.commit_status_secs = env_or_default_secs(
        "COMMIT_STATUS_TIMEOUT_SECS",
        config.timeouts.commit_status_secs,
    );

    validate_config(&config).map_err(ConfigError)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests use variable names unique to this module so they stay
    // independent of other tests running in parallel.

    #[test]
    fn test_empty_environment_yields_defaults() {
        let defaults = GatewayConfig::default();
        let loaded = load_from_env().unwrap();
        assert_eq!(loaded.channel_name, defaults.channel_name);
        assert_eq!(loaded.peer_endpoint, defaults.peer_endpoint);
        assert_eq!(loaded.timeouts.commit_status_secs, 60);
    }

    #[test]
    fn test_env_or_default_prefers_set_value() {
        env::set_var("LG_TEST_CHANNEL_OVERRIDE", "channel2");
        assert_eq!(
            env_or_default("LG_TEST_CHANNEL_OVERRIDE", "mychannel".to_string()),
            "channel2"
        );
        env::remove_var("LG_TEST_CHANNEL_OVERRIDE");
    }

    #[test]
    fn test_env_or_default_ignores_empty_value() {
        env::set_var("LG_TEST_EMPTY_OVERRIDE", "");
        assert_eq!(
            env_or_default("LG_TEST_EMPTY_OVERRIDE", "fallback".to_string()),
            "fallback"
        );
        env::remove_var("LG_TEST_EMPTY_OVERRIDE");
    }

    #[test]
    fn test_non_numeric_timeout_keeps_default() {
        env::set_var("LG_TEST_BAD_SECS", "soon");
        assert_eq!(env_or_default_secs("LG_TEST_BAD_SECS", 5), 5);
        env::remove_var("LG_TEST_BAD_SECS");

        env::set_var("LG_TEST_GOOD_SECS", "30");
        assert_eq!(env_or_default_secs("LG_TEST_GOOD_SECS", 5), 30);
        env::remove_var("LG_TEST_GOOD_SECS");
    }
}

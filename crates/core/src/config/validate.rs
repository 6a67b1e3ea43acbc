use super::{
    types::{Config, ProberBackend},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Probe timeout and concurrency are non-zero
/// - Cache TTL is non-zero
/// - HTTP backend has an http(s) base URL
/// - Filesystem backend has an asset root
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.prober.timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "prober.timeout_ms cannot be 0".to_string(),
        ));
    }

    if config.prober.max_concurrent_probes == 0 {
        return Err(ConfigError::ValidationError(
            "prober.max_concurrent_probes cannot be 0".to_string(),
        ));
    }

    if config.cache.ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cache.ttl_secs cannot be 0".to_string(),
        ));
    }

    match config.prober.backend {
        ProberBackend::Http => {
            let url = &config.assets.base_url;
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError(format!(
                    "assets.base_url must be an http(s) URL, got {:?}",
                    url
                )));
            }
        }
        ProberBackend::Filesystem => {
            if config.assets.root_dir.is_none() {
                return Err(ConfigError::ValidationError(
                    "prober.backend = \"filesystem\" requires assets.root_dir".to_string(),
                ));
            }
        }
    }

    Ok(())
}

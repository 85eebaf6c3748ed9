//! Service config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use reqmetrics_core::error::{MetricsError, Result};

pub use schema::{MetricsSection, ReadinessSection, ServerSection, ServiceConfig};

/// Load and validate a YAML config file. A missing file yields the defaults.
pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let cfg = ServiceConfig::default();
            cfg.validate()?;
            return Ok(cfg);
        }
        Err(e) => return Err(MetricsError::Config(format!("read config failed: {e}"))),
    };
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| MetricsError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

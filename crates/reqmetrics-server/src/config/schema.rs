use std::net::SocketAddr;

use serde::Deserialize;

use reqmetrics_core::descriptor::{is_valid_metric_name, validate_buckets};
use reqmetrics_core::error::{MetricsError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub readiness: ReadinessSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
            readiness: ReadinessSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricsError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.metrics.validate()?;
        self.readiness.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default = "default_app_version")]
    pub app_version: String,

    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            environment: default_environment(),
            app_version: default_app_version(),
            log_level: default_log_level(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if self.environment.trim().is_empty() {
            return Err(MetricsError::Config("server.environment must not be empty".into()));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            MetricsError::Config(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}
fn default_environment() -> String {
    "development".into()
}
fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").into()
}
fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Prepended to every metric name the service registers.
    #[serde(default)]
    pub prefix: String,

    #[serde(default = "default_duration_buckets")]
    pub duration_buckets: Vec<f64>,

    #[serde(default = "default_true")]
    pub process_metrics: bool,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            duration_buckets: default_duration_buckets(),
            process_metrics: true,
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if !self.prefix.is_empty() && !is_valid_metric_name(&self.prefix) {
            return Err(MetricsError::Config(format!(
                "metrics.prefix is not a valid metric name prefix: {:?}",
                self.prefix
            )));
        }
        validate_buckets(&self.duration_buckets)
            .map_err(|e| MetricsError::Config(format!("metrics.duration_buckets: {e}")))?;
        Ok(())
    }

    /// Full metric name with the configured prefix.
    pub fn name(&self, base: &str) -> String {
        format!("{}{}", self.prefix, base)
    }
}

fn default_duration_buckets() -> Vec<f64> {
    vec![0.1, 0.5, 1.0, 2.0, 5.0]
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadinessSection {
    /// Readiness fails once resident memory reaches this many bytes.
    #[serde(default = "default_max_rss_bytes")]
    pub max_rss_bytes: u64,
}

impl Default for ReadinessSection {
    fn default() -> Self {
        Self {
            max_rss_bytes: default_max_rss_bytes(),
        }
    }
}

impl ReadinessSection {
    pub fn validate(&self) -> Result<()> {
        if self.max_rss_bytes == 0 {
            return Err(MetricsError::Config("readiness.max_rss_bytes must be > 0".into()));
        }
        Ok(())
    }
}

fn default_max_rss_bytes() -> u64 {
    1_000_000_000
}

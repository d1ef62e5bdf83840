use config::{Environment, File, FileFormat};
use seqchain_vm::VmConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// Prefix of environment variables overriding config blob entries.
pub const ENV_PREFIX: &str = "SEQCHAIN";

/// Config errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("unable to load config: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid log level {0:?}")]
    InvalidLogLevel(String),
}

/// Controller configuration.
///
/// Strategy fields are optional: absent or zero values select the documented
/// defaults of the corresponding strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub(crate) node_id: String,

    /// Use manual build and gossip strategies
    pub test_mode: bool,

    pub preferred_blocks_per_second: Option<u64>,
    pub gossip_interval_ms: Option<u64>,
    pub gossip_max_size: Option<u64>,
    pub gossip_proposer_diff: Option<u64>,
    pub gossip_proposer_depth: Option<u64>,
    pub build_proposer_diff: Option<u64>,
    pub verify_timeout: Option<u64>,

    pub log_level: String,
    pub parallelism: usize,
    pub mempool_size: usize,
    pub mempool_payer_size: usize,
    pub mempool_exempt_payers: Vec<String>,
    pub streaming_backlog_size: usize,
    pub trace_enabled: bool,
}

fn default_parallelism() -> usize {
    (num_cpus::get() / 2).max(1)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_id: String::new(),
            test_mode: false,
            preferred_blocks_per_second: None,
            gossip_interval_ms: None,
            gossip_max_size: None,
            gossip_proposer_diff: None,
            gossip_proposer_depth: None,
            build_proposer_diff: None,
            verify_timeout: None,
            log_level: "info".to_string(),
            parallelism: default_parallelism(),
            mempool_size: 2_048,
            mempool_payer_size: 32,
            mempool_exempt_payers: Vec::new(),
            streaming_backlog_size: 1_024,
            trace_enabled: false,
        }
    }
}

impl Config {
    /// Parse a JSON config blob layered with `SEQCHAIN_*` environment
    /// overrides. An empty blob yields the defaults (plus any overrides).
    pub fn new(node_id: impl Into<String>, bytes: &[u8]) -> Result<Self, ConfigError> {
        let text = std::str::from_utf8(bytes)?;

        let mut builder = config::Config::builder();
        if !text.trim().is_empty() {
            builder = builder.add_source(File::from_str(text, FileFormat::Json));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("mempool_exempt_payers"),
        );

        let mut parsed: Config = builder.build()?.try_deserialize()?;
        parsed.node_id = node_id.into();
        parsed.normalize()?;
        Ok(parsed)
    }

    fn normalize(&mut self) -> Result<(), ConfigError> {
        let level = self.log_level.trim().to_ascii_lowercase();
        LevelFilter::from_str(&level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))?;
        self.log_level = level;

        let defaults = Config::default();
        if self.parallelism == 0 {
            self.parallelism = defaults.parallelism;
        }
        if self.mempool_size == 0 {
            self.mempool_size = defaults.mempool_size;
        }
        if self.mempool_payer_size == 0 {
            self.mempool_payer_size = defaults.mempool_payer_size;
        }
        if self.streaming_backlog_size == 0 {
            self.streaming_backlog_size = defaults.streaming_backlog_size;
        }
        Ok(())
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }
}

impl VmConfig for Config {
    fn log_level(&self) -> &str {
        &self.log_level
    }

    fn parallelism(&self) -> usize {
        self.parallelism
    }

    fn mempool_size(&self) -> usize {
        self.mempool_size
    }

    fn mempool_payer_size(&self) -> usize {
        self.mempool_payer_size
    }

    fn mempool_exempt_payers(&self) -> &[String] {
        &self.mempool_exempt_payers
    }

    fn streaming_backlog_size(&self) -> usize {
        self.streaming_backlog_size
    }

    fn trace_enabled(&self) -> bool {
        self.trace_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_blob_yields_defaults() {
        let config = Config::new("node-1", b"").unwrap();
        assert_eq!(config.node_id(), "node-1");
        assert!(!config.test_mode);
        assert_eq!(config.preferred_blocks_per_second, None);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.mempool_size, 2_048);
        assert!(config.parallelism >= 1);
    }

    #[test]
    fn blob_fields_are_parsed() {
        let blob = br#"{
            "test_mode": true,
            "preferred_blocks_per_second": 5,
            "gossip_interval_ms": 250,
            "log_level": "DEBUG",
            "mempool_exempt_payers": ["aa", "bb"]
        }"#;
        let config = Config::new("node-1", blob).unwrap();
        assert!(config.test_mode);
        assert_eq!(config.preferred_blocks_per_second, Some(5));
        assert_eq!(config.gossip_interval_ms, Some(250));
        assert_eq!(config.log_level, "debug");
        assert_eq!(VmConfig::mempool_exempt_payers(&config), ["aa", "bb"]);
    }

    #[test]
    fn zero_host_options_fall_back_to_defaults() {
        let config = Config::new("n", br#"{"mempool_size": 0, "parallelism": 0}"#).unwrap();
        assert_eq!(config.mempool_size, 2_048);
        assert!(config.parallelism >= 1);
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let err = Config::new("n", br#"{"log_level": "chatty"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
    }

    #[test]
    fn malformed_blob_is_rejected() {
        assert!(matches!(
            Config::new("n", b"{\"test_mode\": "),
            Err(ConfigError::Load(_))
        ));
        assert!(matches!(
            Config::new("n", &[0xff, 0xfe]),
            Err(ConfigError::Encoding(_))
        ));
    }
}

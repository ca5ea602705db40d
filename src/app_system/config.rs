use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";
pub const DEFAULT_BUFFER_SIZE: usize = 32;

/// What a commit does when the snapshot store refuses the write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersistFailurePolicy {
    /// Keep memory and store in step: a failed write aborts the operation.
    #[default]
    Abort,
    /// Log the failure and install the new cart in memory anyway.
    LogAndContinue,
}

impl FromStr for PersistFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "log" | "log-and-continue" | "log_and_continue" => Ok(Self::LogAndContinue),
            other => Err(format!("unknown persist policy: {}", other)),
        }
    }
}

/// Runtime settings for the cart system.
#[derive(Debug, Clone, PartialEq)]
pub struct CartConfig {
    pub storage_key: String,
    pub buffer_size: usize,
    pub persist_policy: PersistFailurePolicy,
    /// `None` waits on stock and catalog queries indefinitely.
    pub query_timeout: Option<Duration>,
    /// Where a [`FileStore`](crate::store::FileStore) keeps its snapshots.
    pub data_dir: Option<PathBuf>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            persist_policy: PersistFailurePolicy::Abort,
            query_timeout: None,
            data_dir: None,
        }
    }
}

impl CartConfig {
    /// Defaults overridden by `CART_*` environment variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(key) = lookup("CART_STORAGE_KEY").filter(|k| !k.is_empty()) {
            config.storage_key = key;
        }
        if let Some(size) = parse_var::<usize>(&lookup, "CART_BUFFER_SIZE") {
            if size > 0 {
                config.buffer_size = size;
            }
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "CART_QUERY_TIMEOUT_MS") {
            config.query_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(policy) = parse_var::<PersistFailurePolicy>(&lookup, "CART_PERSIST_POLICY") {
            config.persist_policy = policy;
        }
        if let Some(dir) = lookup("CART_DATA_DIR").filter(|d| !d.is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }

        config
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn with_persist_policy(mut self, policy: PersistFailurePolicy) -> Self {
        self.persist_policy = policy;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "Ignoring invalid configuration value");
            None
        }
    }
}

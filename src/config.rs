//! Configuration for txnbuf
//!
//! Centralized buffer configuration with sensible defaults.

use std::fmt;
use std::str::FromStr;

use crate::comparator::Comparator;
use crate::error::TxnBufError;

/// Main configuration for a write buffer
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Ordering Configuration
    // -------------------------------------------------------------------------
    /// Key order, fixed for the lifetime of the buffer
    pub order: Comparator,

    // -------------------------------------------------------------------------
    // Backend Configuration
    // -------------------------------------------------------------------------
    /// Which ordered structure backs the buffer
    pub backend: BackendKind,

    /// Initial capacity of the value log (in bytes), skip-log backend only
    pub log_capacity: usize,
}

/// Backing strategy for a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Balanced ordered tree (B-tree)
    #[default]
    BTree,

    /// Append-only value log indexed by a skip list
    SkipLog,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::BTree => write!(f, "btree"),
            BackendKind::SkipLog => write!(f, "skiplog"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = TxnBufError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "btree" => Ok(BackendKind::BTree),
            "skiplog" | "memdb" => Ok(BackendKind::SkipLog),
            other => Err(TxnBufError::Config(format!("unknown backend '{}'", other))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order: Comparator::Ascending,
            backend: BackendKind::BTree,
            log_capacity: 1024 * 1024, // 1 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the key order
    pub fn order(mut self, order: Comparator) -> Self {
        self.config.order = order;
        self
    }

    /// Set the backing structure
    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    /// Set the initial value log capacity (in bytes)
    pub fn log_capacity(mut self, bytes: usize) -> Self {
        self.config.log_capacity = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

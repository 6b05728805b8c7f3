//! Mapper configuration

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Receives single-line diagnostics (depth truncation)
#[derive(Clone)]
pub struct Logger(Arc<dyn Fn(&str) + Send + Sync>);

impl Logger {
    /// Logger forwarding to `sink`
    pub fn new(sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Logger(Arc::new(sink))
    }

    /// Logger that drops everything
    pub fn noop() -> Self {
        Logger::new(|_| {})
    }

    /// Emit one line
    pub fn log(&self, line: &str) {
        (self.0)(line)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::noop()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Logger")
    }
}

/// Configuration for a mapper instance
///
/// # Example
/// ```ignore
/// let config = MapperConfig::default()
///     .with_max_depth(8)
///     .with_lru_cache(256)
///     .with_logger(|line| eprintln!("{}", line));
/// let mapper = Mapper::new(config)?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Nesting depth at which recursive mapping stops (default: 32)
    pub max_depth: usize,
    /// Use the capacity-bounded cache instead of the unbounded one (default: false)
    pub use_lru_cache: bool,
    /// Capacity of the bounded cache (default: 1000)
    pub max_cache_size: usize,
    /// Diagnostic sink (default: no-op)
    ///
    /// Receives one line per refused depth entry. A sequence refused at the
    /// limit reports once per non-null element.
    #[serde(skip)]
    pub logger: Logger,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            use_lru_cache: false,
            max_cache_size: 1000,
            logger: Logger::noop(),
        }
    }
}

impl MapperConfig {
    /// Set the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Switch to the bounded cache with the given capacity
    pub fn with_lru_cache(mut self, max_cache_size: usize) -> Self {
        self.use_lru_cache = true;
        self.max_cache_size = max_cache_size;
        self
    }

    /// Route diagnostics to `sink`
    pub fn with_logger(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.logger = Logger::new(sink);
        self
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MapperConfig =
            serde_json::from_str(json).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no cache can honour
    pub fn validate(&self) -> Result<()> {
        if self.use_lru_cache && self.max_cache_size == 0 {
            return Err(Error::config("max_cache_size must be at least 1 with use_lru_cache"));
        }
        Ok(())
    }
}

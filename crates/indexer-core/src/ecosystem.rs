use std::sync::Arc;

use indexer_common::IndexerError;

use crate::config::ScannerConfig;
use crate::scanner::ScannerHandle;
use crate::store::Store;

/// A bundle of scanners targeting a particular OS family or runtime,
/// expanded into kind-partitioned scanner lists at construction.
pub trait Ecosystem: Send + Sync {
    fn name(&self) -> &str;

    /// Produces this ecosystem's scanners. Fallible: an ecosystem may need
    /// to probe its environment (available plugin binaries, feature
    /// flags) to decide which scanners it offers.
    fn scanners(&self) -> Result<Vec<ScannerHandle>, IndexerError>;
}

/// A fixed, already-built list of scanners treated as its own ecosystem.
/// The common case in tests and for callers that construct scanners
/// directly rather than through a pluggable ecosystem.
pub struct StaticEcosystem {
    name: String,
    scanners: Vec<ScannerHandle>,
}

impl StaticEcosystem {
    pub fn new(name: impl Into<String>, scanners: Vec<ScannerHandle>) -> Self {
        Self {
            name: name.into(),
            scanners,
        }
    }
}

impl Ecosystem for StaticEcosystem {
    fn name(&self) -> &str {
        &self.name
    }

    fn scanners(&self) -> Result<Vec<ScannerHandle>, IndexerError> {
        Ok(self.scanners.clone())
    }
}

/// Configuration record the core consumes, assembled by the caller.
pub struct Options {
    pub store: Arc<dyn Store>,
    pub ecosystems: Vec<Arc<dyn Ecosystem>>,
    pub scanner_config: ScannerConfig,
    pub client: Option<Arc<reqwest::Client>>,
}

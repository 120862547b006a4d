mod config;
mod ecosystem;
mod envelope;
mod scan;
mod scanner;
mod store;


pub use config::{ScannerConfig, apply_configuration};
pub use ecosystem::{Ecosystem, Options, StaticEcosystem};
pub use scan::LayerScanner;
pub use scanner::{
    ConfigFn, Configurable, DistributionScanner, FileScanner, PackageScanner, RepositoryScanner,
    RpcCapable, ScannerHandle, noop_config_fn,
};
pub use store::Store;

use std::sync::Arc;

use indexer_common::IndexerError;
use tracing::warn;

impl LayerScanner {
    /// Validates `concurrent`, expands `opts.ecosystems` into the four
    /// kind-partitioned scanner lists, runs configuration filtering on the
    /// flattened list, and seals the surviving scanners plus the
    /// concurrency limit and store handle. `concurrent` uses `i64` so
    /// callers can pass a negative value to explicitly request the host's
    /// ambient parallelism.
    pub async fn new(concurrent: i64, opts: Options) -> Result<Self, IndexerError> {
        let concurrent = normalize_concurrency(concurrent);

        let mut handles = Vec::new();
        for ecosystem in &opts.ecosystems {
            let ecosystem_scanners =
                ecosystem
                    .scanners()
                    .map_err(|err| IndexerError::EcosystemExpansion {
                        ecosystem: ecosystem.name().to_string(),
                        source: Box::new(err),
                    })?;
            handles.extend(ecosystem_scanners);
        }

        let kept = apply_configuration(handles, &opts.scanner_config, opts.client.clone()).await;

        let mut package_scanners = Vec::new();
        let mut distribution_scanners = Vec::new();
        let mut repository_scanners = Vec::new();
        let mut file_scanners = Vec::new();
        for handle in kept {
            match handle {
                ScannerHandle::Package(s) => package_scanners.push(s),
                ScannerHandle::Distribution(s) => distribution_scanners.push(s),
                ScannerHandle::Repository(s) => repository_scanners.push(s),
                ScannerHandle::File(s) => file_scanners.push(s),
            }
        }

        Ok(Self {
            store: Arc::clone(&opts.store),
            package_scanners,
            distribution_scanners,
            repository_scanners,
            file_scanners,
            concurrent,
        })
    }
}

fn normalize_concurrency(concurrent: i64) -> usize {
    if concurrent < 1 {
        let ambient = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        warn!(
            requested = concurrent,
            normalized = ambient,
            "concurrency must be >= 1; using host ambient parallelism"
        );
        ambient
    } else {
        concurrent as usize
    }
}

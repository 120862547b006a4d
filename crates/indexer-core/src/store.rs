use async_trait::async_trait;
use indexer_common::{Digest, Distribution, File, IndexerError, Layer, Package, Repository, ScannerIdentity};

/// The persistence backend: idempotence oracle plus four kind-typed index
/// operations. Implementations must be safe for concurrent use — the core
/// takes no locks over the store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns `true` iff this exact (digest, name, version) has previously
    /// completed successfully.
    async fn layer_scanned(
        &self,
        digest: &Digest,
        scanner: &ScannerIdentity,
    ) -> Result<bool, IndexerError>;

    /// Marks completion. Must be durable before any subsequent
    /// `layer_scanned` call observes `true` for the same triple.
    async fn set_layer_scanned(
        &self,
        digest: &Digest,
        scanner: &ScannerIdentity,
    ) -> Result<(), IndexerError>;

    async fn index_packages(
        &self,
        layer: &Layer,
        scanner: &ScannerIdentity,
        packages: Vec<Package>,
    ) -> Result<(), IndexerError>;

    async fn index_distributions(
        &self,
        layer: &Layer,
        scanner: &ScannerIdentity,
        distributions: Vec<Distribution>,
    ) -> Result<(), IndexerError>;

    async fn index_repositories(
        &self,
        layer: &Layer,
        scanner: &ScannerIdentity,
        repositories: Vec<Repository>,
    ) -> Result<(), IndexerError>;

    async fn index_files(
        &self,
        layer: &Layer,
        scanner: &ScannerIdentity,
        files: Vec<File>,
    ) -> Result<(), IndexerError>;
}

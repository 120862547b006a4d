use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use indexer_common::{Distribution, File, IndexerError, Layer, Package, Repository, ScannerKind};

/// A configuration-application function: the caller supplies one per
/// scanner name, and it knows how to fill in that scanner's own concrete
/// config type via `downcast_mut`. Mirrors the source's
/// `func(interface{}) error` unmarshal-into-caller-value shape.
pub type ConfigFn = Arc<dyn Fn(&mut dyn Any) -> Result<(), IndexerError> + Send + Sync>;

pub fn noop_config_fn() -> ConfigFn {
    Arc::new(|_: &mut dyn Any| Ok(()))
}

/// Optional capability: a scanner that accepts a configuration-application
/// function at setup time.
#[async_trait]
pub trait Configurable: Send + Sync {
    async fn configure(&self, apply: &ConfigFn) -> Result<(), IndexerError>;
}

/// Optional capability: a scanner that accepts a configuration-application
/// function *and* a transport client, implying network access. Strictly a
/// superset of `Configurable` — when a scanner implements both, RPC takes
/// precedence.
#[async_trait]
pub trait RpcCapable: Send + Sync {
    async fn configure_rpc(
        &self,
        apply: &ConfigFn,
        client: Arc<reqwest::Client>,
    ) -> Result<(), IndexerError>;
}

#[async_trait]
pub trait PackageScanner: Send + Sync {
    fn name(&self) -> &str;
    fn kind(&self) -> ScannerKind {
        ScannerKind::Package
    }
    fn version(&self) -> &str;
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        None
    }
    fn as_rpc(&self) -> Option<&dyn RpcCapable> {
        None
    }
    async fn scan(&self, layer: &Layer) -> Result<Vec<Package>, IndexerError>;
}

#[async_trait]
pub trait DistributionScanner: Send + Sync {
    fn name(&self) -> &str;
    fn kind(&self) -> ScannerKind {
        ScannerKind::Distribution
    }
    fn version(&self) -> &str;
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        None
    }
    fn as_rpc(&self) -> Option<&dyn RpcCapable> {
        None
    }
    async fn scan(&self, layer: &Layer) -> Result<Vec<Distribution>, IndexerError>;
}

#[async_trait]
pub trait RepositoryScanner: Send + Sync {
    fn name(&self) -> &str;
    fn kind(&self) -> ScannerKind {
        ScannerKind::Repository
    }
    fn version(&self) -> &str;
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        None
    }
    fn as_rpc(&self) -> Option<&dyn RpcCapable> {
        None
    }
    async fn scan(&self, layer: &Layer) -> Result<Vec<Repository>, IndexerError>;
}

#[async_trait]
pub trait FileScanner: Send + Sync {
    fn name(&self) -> &str;
    fn kind(&self) -> ScannerKind {
        ScannerKind::File
    }
    fn version(&self) -> &str;
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        None
    }
    fn as_rpc(&self) -> Option<&dyn RpcCapable> {
        None
    }
    async fn scan(&self, layer: &Layer) -> Result<Vec<File>, IndexerError>;
}

/// The closed sum type a scanner becomes once collected off an `Ecosystem`.
/// Replaces the source's runtime type switch over four capability
/// interfaces: matching on this enum is exhaustive, so "a scanner matching
/// none of the four kinds" is unrepresentable rather than merely checked
/// for and panicked on at runtime.
#[derive(Clone)]
pub enum ScannerHandle {
    Package(Arc<dyn PackageScanner>),
    Distribution(Arc<dyn DistributionScanner>),
    Repository(Arc<dyn RepositoryScanner>),
    File(Arc<dyn FileScanner>),
}

impl ScannerHandle {
    pub fn kind(&self) -> ScannerKind {
        match self {
            ScannerHandle::Package(_) => ScannerKind::Package,
            ScannerHandle::Distribution(_) => ScannerKind::Distribution,
            ScannerHandle::Repository(_) => ScannerKind::Repository,
            ScannerHandle::File(_) => ScannerKind::File,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ScannerHandle::Package(s) => s.name(),
            ScannerHandle::Distribution(s) => s.name(),
            ScannerHandle::Repository(s) => s.name(),
            ScannerHandle::File(s) => s.name(),
        }
    }

    pub fn version(&self) -> &str {
        match self {
            ScannerHandle::Package(s) => s.version(),
            ScannerHandle::Distribution(s) => s.version(),
            ScannerHandle::Repository(s) => s.version(),
            ScannerHandle::File(s) => s.version(),
        }
    }

    pub fn as_configurable(&self) -> Option<&dyn Configurable> {
        match self {
            ScannerHandle::Package(s) => s.as_configurable(),
            ScannerHandle::Distribution(s) => s.as_configurable(),
            ScannerHandle::Repository(s) => s.as_configurable(),
            ScannerHandle::File(s) => s.as_configurable(),
        }
    }

    pub fn as_rpc(&self) -> Option<&dyn RpcCapable> {
        match self {
            ScannerHandle::Package(s) => s.as_rpc(),
            ScannerHandle::Distribution(s) => s.as_rpc(),
            ScannerHandle::Repository(s) => s.as_rpc(),
            ScannerHandle::File(s) => s.as_rpc(),
        }
    }
}

use thiserror::Error;

/// The error taxonomy shared by `Store`, every scanner trait, and the
/// scan core itself. A single crate-wide enum keeps the `?`-propagation at
/// every trait boundary uniform instead of forcing each plugin surface to
/// invent its own error type.
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("malformed digest: {0}")]
    InvalidDigest(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("ecosystem {ecosystem} failed to expand its scanner list: {source}")]
    EcosystemExpansion {
        ecosystem: String,
        #[source]
        source: Box<IndexerError>,
    },

    #[error("configuration rejected for scanner {scanner}: {source}")]
    ConfigurationRejected {
        scanner: String,
        #[source]
        source: Box<IndexerError>,
    },

    #[error("idempotence probe failed for layer {digest} scanner {scanner}: {source}")]
    IdempotenceProbe {
        digest: String,
        scanner: String,
        #[source]
        source: Box<IndexerError>,
    },

    /// A scanner could not reach a network resource (DNS/address resolution
    /// failure and the like). The dispatcher downgrades this to an empty,
    /// successful scan rather than propagating it.
    #[error("scanner {scanner} could not reach a network resource: {source}")]
    NetworkAddress {
        scanner: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("scan failed for layer {digest} scanner {scanner}: {source}")]
    ScannerFailed {
        digest: String,
        scanner: String,
        #[source]
        source: Box<IndexerError>,
    },

    #[error("failed to mark layer {digest} scanned by {scanner}: {source}")]
    MarkScanned {
        digest: String,
        scanner: String,
        #[source]
        source: Box<IndexerError>,
    },

    #[error("failed to index findings for layer {digest} scanner {scanner}: {source}")]
    IndexFailed {
        digest: String,
        scanner: String,
        #[source]
        source: Box<IndexerError>,
    },

    #[error("scan cancelled")]
    Cancelled,

    #[error("internal store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IndexerError {
    /// True for the one error class the dispatcher treats as a successful,
    /// empty scan rather than a batch-ending failure.
    pub fn is_network_address(&self) -> bool {
        matches!(self, IndexerError::NetworkAddress { .. })
    }
}

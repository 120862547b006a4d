use indexer_common::{Distribution, File, IndexerError, Layer, Package, Repository, ScannerIdentity};
use tracing::warn;

use crate::scanner::ScannerHandle;
use crate::store::Store;

/// Captures the kind-specific product of one scan call. At most one field
/// is populated; if none is and no error was raised, the scan was a
/// successful no-op.
#[derive(Default)]
pub(crate) struct ScanEnvelope {
    packages: Option<Vec<Package>>,
    distributions: Option<Vec<Distribution>>,
    repositories: Option<Vec<Repository>>,
    files: Option<Vec<File>>,
}

/// What dispatch produced. A network-address downgrade is kept distinct
/// from `Completed(empty envelope)`: a scanner that could not reach its
/// resources short-circuits the rest of the scan protocol (no mark-scanned,
/// no store routing) rather than being treated as a completed, merely-empty
/// scan.
pub(crate) enum DispatchOutcome {
    Completed(ScanEnvelope),
    NetworkUnreachable,
}

/// Polymorphic dispatch on the scanner's capability variant. The match is
/// exhaustive over `ScannerHandle`'s four variants, so there is no code
/// path for a scanner matching none of the four kinds — that case is
/// unrepresentable rather than merely checked for at runtime.
pub(crate) async fn dispatch(
    handle: &ScannerHandle,
    layer: &Layer,
) -> Result<DispatchOutcome, IndexerError> {
    let mut envelope = ScanEnvelope::default();

    let outcome = match handle {
        ScannerHandle::Package(scanner) => scanner.scan(layer).await.map(|v| envelope.packages = Some(v)),
        ScannerHandle::Distribution(scanner) => {
            scanner.scan(layer).await.map(|v| envelope.distributions = Some(v))
        }
        ScannerHandle::Repository(scanner) => {
            scanner.scan(layer).await.map(|v| envelope.repositories = Some(v))
        }
        ScannerHandle::File(scanner) => scanner.scan(layer).await.map(|v| envelope.files = Some(v)),
    };

    match outcome {
        Ok(()) => Ok(DispatchOutcome::Completed(envelope)),
        Err(err) if err.is_network_address() => {
            warn!(
                scanner = handle.name(),
                kind = %handle.kind(),
                layer = %layer.digest(),
                "scanner could not reach a network resource; treating layer as an empty scan"
            );
            Ok(DispatchOutcome::NetworkUnreachable)
        }
        Err(err) => Err(IndexerError::ScannerFailed {
            digest: layer.digest().to_string(),
            scanner: handle.name().to_string(),
            source: Box::new(err),
        }),
    }
}

/// Routes whichever field of the envelope is populated to the
/// correspondingly typed store method. A no-op if no field is populated.
pub(crate) async fn route_to_store(
    store: &dyn Store,
    layer: &Layer,
    identity: &ScannerIdentity,
    envelope: ScanEnvelope,
) -> Result<(), IndexerError> {
    let result = if let Some(packages) = envelope.packages {
        store.index_packages(layer, identity, packages).await
    } else if let Some(distributions) = envelope.distributions {
        store.index_distributions(layer, identity, distributions).await
    } else if let Some(repositories) = envelope.repositories {
        store.index_repositories(layer, identity, repositories).await
    } else if let Some(files) = envelope.files {
        store.index_files(layer, identity, files).await
    } else {
        Ok(())
    };

    result.map_err(|err| IndexerError::IndexFailed {
        digest: layer.digest().to_string(),
        scanner: identity.name.clone(),
        source: Box::new(err),
    })
}

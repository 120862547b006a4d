use std::collections::HashSet;
use std::sync::Arc;

use indexer_common::{Digest, IndexerError, Layer, ScannerIdentity};
use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::envelope::{DispatchOutcome, dispatch, route_to_store};
use crate::scanner::ScannerHandle;
use crate::store::Store;

/// The sealed, concurrency-bounded scan core. Construct via
/// [`crate::LayerScanner::new`]; scanner lists are immutable once built.
pub struct LayerScanner {
    pub(crate) store: Arc<dyn Store>,
    pub(crate) package_scanners: Vec<Arc<dyn crate::scanner::PackageScanner>>,
    pub(crate) distribution_scanners: Vec<Arc<dyn crate::scanner::DistributionScanner>>,
    pub(crate) repository_scanners: Vec<Arc<dyn crate::scanner::RepositoryScanner>>,
    pub(crate) file_scanners: Vec<Arc<dyn crate::scanner::FileScanner>>,
    pub(crate) concurrent: usize,
}

impl LayerScanner {
    pub fn concurrent(&self) -> usize {
        self.concurrent
    }

    /// Applies every surviving scanner to every unique layer, under the
    /// configured in-flight cap, returning the first error encountered (or
    /// `Ok(())` if every work item succeeded).
    pub async fn scan(&self, manifest_digest: &Digest, layers: &[Layer]) -> Result<(), IndexerError> {
        let unique_layers = dedupe_layers(layers);
        debug!(manifest = %manifest_digest, layers = unique_layers.len(), "scan start");

        if unique_layers.is_empty() {
            debug!(manifest = %manifest_digest, "no layers to scan");
            return Ok(());
        }

        let work_items = self.build_work_items(&unique_layers);
        if work_items.is_empty() {
            debug!(manifest = %manifest_digest, "no scanners configured");
            return Ok(());
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrent));
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let mut joins = JoinSet::new();
        for (layer, handle) in work_items {
            let store = Arc::clone(&self.store);
            let semaphore = Arc::clone(&semaphore);
            let mut cancel_rx = cancel_rx.clone();
            joins.spawn(async move {
                let permit = tokio::select! {
                    biased;
                    _ = wait_cancelled(&mut cancel_rx) => return Err(IndexerError::Cancelled),
                    acquired = semaphore.acquire_owned() => acquired.map_err(|_| IndexerError::Cancelled)?,
                };
                let _permit = permit;

                tokio::select! {
                    biased;
                    _ = wait_cancelled(&mut cancel_rx) => Err(IndexerError::Cancelled),
                    result = scan_layer(store.as_ref(), &layer, &handle) => result,
                }
            });
        }

        let mut first_err: Option<IndexerError> = None;
        while let Some(joined) = joins.join_next().await {
            let outcome = match joined {
                Ok(result) => result,
                Err(join_err) => {
                    error!(error = %join_err, "scan work item panicked");
                    Err(IndexerError::InvalidArgument(format!(
                        "scan work item panicked: {join_err}"
                    )))
                }
            };
            if let Err(err) = outcome {
                let _ = cancel_tx.send(true);
                match &first_err {
                    None => first_err = Some(err),
                    Some(IndexerError::Cancelled) if !matches!(err, IndexerError::Cancelled) => {
                        first_err = Some(err);
                    }
                    Some(_) => {}
                }
            }
        }

        match first_err {
            Some(err) => {
                error!(manifest = %manifest_digest, error = %err, "scan failed");
                Err(err)
            }
            None => {
                debug!(manifest = %manifest_digest, "scan done");
                Ok(())
            }
        }
    }

    fn build_work_items(&self, layers: &[Layer]) -> Vec<(Layer, ScannerHandle)> {
        let mut items = Vec::with_capacity(
            layers.len()
                * (self.package_scanners.len()
                    + self.distribution_scanners.len()
                    + self.repository_scanners.len()
                    + self.file_scanners.len()),
        );
        for layer in layers {
            for scanner in &self.package_scanners {
                items.push((layer.clone(), ScannerHandle::Package(Arc::clone(scanner))));
            }
            for scanner in &self.distribution_scanners {
                items.push((layer.clone(), ScannerHandle::Distribution(Arc::clone(scanner))));
            }
            for scanner in &self.repository_scanners {
                items.push((layer.clone(), ScannerHandle::Repository(Arc::clone(scanner))));
            }
            for scanner in &self.file_scanners {
                items.push((layer.clone(), ScannerHandle::File(Arc::clone(scanner))));
            }
        }
        items
    }
}

async fn wait_cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

fn dedupe_layers(layers: &[Layer]) -> Vec<Layer> {
    let mut seen = HashSet::with_capacity(layers.len());
    let mut unique = Vec::with_capacity(layers.len());
    for layer in layers {
        if seen.insert(layer.digest().clone()) {
            unique.push(layer.clone());
        }
    }
    unique
}

/// Runs the four-step scan protocol for one (layer, scanner) pair:
/// idempotence check, dispatch, mark-scanned, route findings.
async fn scan_layer(
    store: &dyn Store,
    layer: &Layer,
    handle: &ScannerHandle,
) -> Result<(), IndexerError> {
    let identity = ScannerIdentity {
        name: handle.name().to_string(),
        kind: handle.kind(),
        version: handle.version().to_string(),
    };

    let already_scanned = store
        .layer_scanned(layer.digest(), &identity)
        .await
        .map_err(|err| IndexerError::IdempotenceProbe {
            digest: layer.digest().to_string(),
            scanner: identity.name.clone(),
            source: Box::new(err),
        })?;
    if already_scanned {
        debug!(layer = %layer.digest(), scanner = %identity, "layer already scanned");
        return Ok(());
    }

    let envelope = match dispatch(handle, layer).await? {
        DispatchOutcome::NetworkUnreachable => {
            debug!(layer = %layer.digest(), scanner = %identity, "scan skipped: network unreachable");
            return Ok(());
        }
        DispatchOutcome::Completed(envelope) => envelope,
    };

    store
        .set_layer_scanned(layer.digest(), &identity)
        .await
        .map_err(|err| IndexerError::MarkScanned {
            digest: layer.digest().to_string(),
            scanner: identity.name.clone(),
            source: Box::new(err),
        })?;

    route_to_store(store, layer, &identity, envelope).await?;

    debug!(layer = %layer.digest(), scanner = %identity, "scan done");
    Ok(())
}

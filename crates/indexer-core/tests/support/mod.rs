//! Shared fixtures for the integration test suite: an in-memory `Store`
//! that records every call it receives, plus scripted scanners whose
//! behavior (success / generic error / network-address error, with an
//! optional artificial delay) is configured per instance.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use indexer_common::{
    Digest, Distribution, File, IndexerError, Layer, Package, Repository, ScannerIdentity, ScannerKind,
};
use indexer_core::{DistributionScanner, FileScanner, PackageScanner, RepositoryScanner};

#[derive(Default)]
pub struct Calls {
    pub layer_scanned: Mutex<Vec<(Digest, String)>>,
    pub set_layer_scanned: Mutex<Vec<(Digest, String)>>,
    pub index_packages: Mutex<Vec<(Digest, String, usize)>>,
    pub index_distributions: Mutex<Vec<(Digest, String, usize)>>,
    pub index_repositories: Mutex<Vec<(Digest, String, usize)>>,
    pub index_files: Mutex<Vec<(Digest, String, usize)>>,
}

#[derive(Default)]
pub struct RecordingStore {
    scanned: Mutex<HashSet<(Digest, String, String)>>,
    pub calls: Calls,
}

impl RecordingStore {
    pub fn mark_pre_scanned(&self, digest: &Digest, scanner_name: &str, scanner_version: &str) {
        self.scanned.lock().unwrap().insert((
            digest.clone(),
            scanner_name.to_string(),
            scanner_version.to_string(),
        ));
    }
}

#[async_trait]
impl indexer_core::Store for RecordingStore {
    async fn layer_scanned(
        &self,
        digest: &Digest,
        scanner: &ScannerIdentity,
    ) -> Result<bool, IndexerError> {
        self.calls
            .layer_scanned
            .lock()
            .unwrap()
            .push((digest.clone(), scanner.name.clone()));
        let key = (digest.clone(), scanner.name.clone(), scanner.version.clone());
        Ok(self.scanned.lock().unwrap().contains(&key))
    }

    async fn set_layer_scanned(
        &self,
        digest: &Digest,
        scanner: &ScannerIdentity,
    ) -> Result<(), IndexerError> {
        self.calls
            .set_layer_scanned
            .lock()
            .unwrap()
            .push((digest.clone(), scanner.name.clone()));
        let key = (digest.clone(), scanner.name.clone(), scanner.version.clone());
        self.scanned.lock().unwrap().insert(key);
        Ok(())
    }

    async fn index_packages(
        &self,
        layer: &Layer,
        scanner: &ScannerIdentity,
        packages: Vec<Package>,
    ) -> Result<(), IndexerError> {
        self.calls.index_packages.lock().unwrap().push((
            layer.digest().clone(),
            scanner.name.clone(),
            packages.len(),
        ));
        Ok(())
    }

    async fn index_distributions(
        &self,
        layer: &Layer,
        scanner: &ScannerIdentity,
        distributions: Vec<Distribution>,
    ) -> Result<(), IndexerError> {
        self.calls.index_distributions.lock().unwrap().push((
            layer.digest().clone(),
            scanner.name.clone(),
            distributions.len(),
        ));
        Ok(())
    }

    async fn index_repositories(
        &self,
        layer: &Layer,
        scanner: &ScannerIdentity,
        repositories: Vec<Repository>,
    ) -> Result<(), IndexerError> {
        self.calls.index_repositories.lock().unwrap().push((
            layer.digest().clone(),
            scanner.name.clone(),
            repositories.len(),
        ));
        Ok(())
    }

    async fn index_files(
        &self,
        layer: &Layer,
        scanner: &ScannerIdentity,
        files: Vec<File>,
    ) -> Result<(), IndexerError> {
        self.calls.index_files.lock().unwrap().push((
            layer.digest().clone(),
            scanner.name.clone(),
            files.len(),
        ));
        Ok(())
    }
}

pub enum Behavior {
    Success(Vec<Package>),
    GenericError,
    NetworkAddressError,
}

/// A scripted package scanner. `behavior_for` lets a single instance react
/// differently per layer (e.g. fail only on L2), and `concurrency` tracks
/// the observed peak number of simultaneously in-flight `scan` calls.
pub struct ScriptedPackageScanner {
    pub name: String,
    pub version: String,
    pub default_behavior: Behavior,
    pub per_layer: HashMap<Digest, Behavior>,
    pub delay: Duration,
    pub concurrency: Arc<ConcurrencyTracker>,
}

#[derive(Default)]
pub struct ConcurrencyTracker {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyTracker {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let current = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScriptedPackageScanner {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: "1".to_string(),
            default_behavior: Behavior::Success(Vec::new()),
            per_layer: HashMap::new(),
            delay: Duration::ZERO,
            concurrency: Arc::new(ConcurrencyTracker::default()),
        }
    }

    pub fn succeeding(name: &str, packages: Vec<Package>) -> Self {
        Self {
            default_behavior: Behavior::Success(packages),
            ..Self::new(name)
        }
    }
}

#[async_trait]
impl PackageScanner for ScriptedPackageScanner {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    async fn scan(&self, layer: &Layer) -> Result<Vec<Package>, IndexerError> {
        self.concurrency.enter();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let behavior = self.per_layer.get(layer.digest()).unwrap_or(&self.default_behavior);
        let result = match behavior {
            Behavior::Success(packages) => Ok(packages.clone()),
            Behavior::GenericError => Err(IndexerError::InvalidArgument(format!(
                "{} failed on {}",
                self.name,
                layer.digest()
            ))),
            Behavior::NetworkAddressError => Err(IndexerError::NetworkAddress {
                scanner: self.name.clone(),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not resolve host",
                )),
            }),
        };
        self.concurrency.exit();
        result
    }
}

pub struct FixedDistributionScanner {
    pub name: String,
    pub distributions: Vec<Distribution>,
}

#[async_trait]
impl DistributionScanner for FixedDistributionScanner {
    fn name(&self) -> &str {
        &self.name
    }
    fn version(&self) -> &str {
        "1"
    }
    async fn scan(&self, _layer: &Layer) -> Result<Vec<Distribution>, IndexerError> {
        Ok(self.distributions.clone())
    }
}

pub struct FixedRepositoryScanner {
    pub name: String,
    pub repositories: Vec<Repository>,
}

#[async_trait]
impl RepositoryScanner for FixedRepositoryScanner {
    fn name(&self) -> &str {
        &self.name
    }
    fn version(&self) -> &str {
        "1"
    }
    async fn scan(&self, _layer: &Layer) -> Result<Vec<Repository>, IndexerError> {
        Ok(self.repositories.clone())
    }
}

pub struct FixedFileScanner {
    pub name: String,
    pub files: Vec<File>,
}

#[async_trait]
impl FileScanner for FixedFileScanner {
    fn name(&self) -> &str {
        &self.name
    }
    fn version(&self) -> &str {
        "1"
    }
    async fn scan(&self, _layer: &Layer) -> Result<Vec<File>, IndexerError> {
        Ok(self.files.clone())
    }
}

pub fn layer(hex: &str) -> Layer {
    Layer::new(Digest::parse(format!("sha256:{hex}")).unwrap())
}

pub fn manifest_digest() -> Digest {
    Digest::parse("sha256:manifest0000").unwrap()
}

pub fn scanner_kind_label(kind: ScannerKind) -> &'static str {
    match kind {
        ScannerKind::Package => "package",
        ScannerKind::Distribution => "distribution",
        ScannerKind::Repository => "repository",
        ScannerKind::File => "file",
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::digest::Digest;

/// An opaque, content-addressed filesystem slice of a container image.
/// Immutable for the duration of a scan call; equality of `digest` implies
/// equality of contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layer {
    digest: Digest,
}

impl Layer {
    pub fn new(digest: Digest) -> Self {
        Self { digest }
    }

    pub fn digest(&self) -> &Digest {
        &self.digest
    }
}

/// The closed set of scanner output kinds. Partitions scanners, store
/// operations, and result-envelope fields alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScannerKind {
    Package,
    Distribution,
    Repository,
    File,
}

impl fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScannerKind::Package => "package",
            ScannerKind::Distribution => "distribution",
            ScannerKind::Repository => "repository",
            ScannerKind::File => "file",
        };
        f.write_str(label)
    }
}

/// A scanner's stable identity, as known to the Store: unique by name within
/// its kind, carrying the version the Store uses to decide whether a prior
/// scan is still valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScannerIdentity {
    pub name: String,
    pub kind: ScannerKind,
    pub version: String,
}

impl fmt::Display for ScannerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.name, self.version, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    pub arch: Option<String>,
    pub source_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub name: String,
    pub version: String,
    pub did: Option<String>,
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub uri: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    Regular,
    Symlink,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub path: String,
    pub kind: FileKind,
}

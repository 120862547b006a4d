pub mod digest;
pub mod error;
pub mod types;

pub use digest::Digest;
pub use error::IndexerError;
pub use types::{
    Distribution, File, FileKind, Layer, Package, Repository, ScannerIdentity, ScannerKind,
};

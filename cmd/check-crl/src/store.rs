//! Trust-store access
//!
//! A trust directory holds `*.pem` roots and `<hash>.r0` CRLs side by side.

use crlwatch_crypto::{CertificateRecord, CrlRecord, CryptoError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const CERTIFICATE_EXTENSION: &str = ".pem";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Directory {} not found.", .0.display())]
    NotFound(PathBuf),
}

/// Source of root certificates and their CRLs
pub trait TrustStore {
    /// All candidate certificate file names, before include/exclude filtering
    fn candidates(&self) -> io::Result<Vec<String>>;

    fn load_certificate(&self, file_name: &str) -> Result<CertificateRecord, CryptoError>;

    /// `Ok(None)` when no such CRL file exists
    fn load_crl(&self, file_name: &str) -> Result<Option<CrlRecord>, CryptoError>;
}

pub struct DirectoryStore {
    base_dir: PathBuf,
}

impl DirectoryStore {
    /// Open an existing trust directory
    pub fn open(base_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_dir = base_dir.into();
        if !base_dir.is_dir() {
            return Err(StoreError::NotFound(base_dir));
        }
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl TrustStore for DirectoryStore {
    fn candidates(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let os_name = entry.file_name();
            let Some(name) = os_name.to_str().map(ToString::to_string) else {
                if os_name.to_string_lossy().ends_with(CERTIFICATE_EXTENSION) {
                    warn!(
                        dir = %self.base_dir.display(),
                        file = %os_name.to_string_lossy(),
                        "Skipping certificate with non-UTF-8 file name"
                    );
                }
                continue;
            };
            // Trust directories are mostly symlinks, so follow them
            if name.ends_with(CERTIFICATE_EXTENSION) && entry.path().is_file() {
                names.push(name);
            }
        }
        names.sort();

        debug!(dir = %self.base_dir.display(), count = names.len(), "Listed certificates");
        Ok(names)
    }

    fn load_certificate(&self, file_name: &str) -> Result<CertificateRecord, CryptoError> {
        CertificateRecord::load(self.base_dir.join(file_name))
    }

    fn load_crl(&self, file_name: &str) -> Result<Option<CrlRecord>, CryptoError> {
        match CrlRecord::load(self.base_dir.join(file_name)) {
            Ok(crl) => Ok(Some(crl)),
            Err(CryptoError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

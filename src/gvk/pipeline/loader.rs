//! Loading and scanning entry point
//!
//! `StreamLoader` runs a named [`ScanConfig`](super::ScanConfig) over source text.
//! String-based methods do the work; file-based methods read the file and
//! delegate to them.
//!
//! ```rust,ignore
//! use gvk_scan::gvk::pipeline::{StreamLoader, Strategy};
//!
//! let loader = StreamLoader::new();
//! let ids = loader.execute("both", "apiVersion: v1\nkind: Pod\n")?;
//! let ids = loader.extract_with("kind: A\n---\nkind: B\n", Strategy::Reader)?;
//! let ids = loader.load_and_execute("manifests.yaml", "decoder")?;
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use super::config::{ConfigRegistry, ScanMode};
use super::{cross_check, extract_identifiers, Strategy};
use crate::gvk::error::ExtractionError;
use crate::gvk::extract::Identifier;

/// Errors from [`StreamLoader`]
#[derive(Debug)]
pub enum LoadError {
    ConfigNotFound(String),
    Io { path: PathBuf, source: io::Error },
    Extraction(ExtractionError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::ConfigNotFound(name) => write!(f, "Config '{}' not found", name),
            LoadError::Io { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            LoadError::Extraction(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::ConfigNotFound(_) => None,
            LoadError::Io { source, .. } => Some(source),
            LoadError::Extraction(err) => Some(err),
        }
    }
}

impl From<ExtractionError> for LoadError {
    fn from(err: ExtractionError) -> Self {
        LoadError::Extraction(err)
    }
}

pub struct StreamLoader {
    registry: ConfigRegistry,
}

impl StreamLoader {
    pub fn new() -> Self {
        Self::with_registry(ConfigRegistry::with_defaults())
    }

    pub fn with_registry(registry: ConfigRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    // ===== STRING-BASED PROCESSING =====

    /// Run a named configuration on source text
    pub fn execute(&self, config_name: &str, source: &str) -> Result<Vec<Identifier>, LoadError> {
        let config = self
            .registry
            .get(config_name)
            .ok_or_else(|| LoadError::ConfigNotFound(config_name.to_string()))?;

        info!(config = %config.name, bytes = source.len(), "scanning input");
        let identifiers = match config.mode {
            ScanMode::Single(strategy) => extract_identifiers(source, strategy)?,
            ScanMode::CrossCheck => cross_check(source)?,
        };
        info!(
            config = %config.name,
            documents = identifiers.len(),
            "scan complete"
        );
        Ok(identifiers)
    }

    /// Extract with both strategies cross-checked
    pub fn extract(&self, source: &str) -> Result<Vec<Identifier>, LoadError> {
        self.execute("both", source)
    }

    pub fn extract_with(
        &self,
        source: &str,
        strategy: Strategy,
    ) -> Result<Vec<Identifier>, LoadError> {
        self.execute(strategy.name(), source)
    }

    // ===== FILE-BASED PROCESSING =====

    pub fn load_and_execute<P: AsRef<Path>>(
        &self,
        path: P,
        config_name: &str,
    ) -> Result<Vec<Identifier>, LoadError> {
        let source = read_source(path.as_ref())?;
        self.execute(config_name, &source)
    }

    pub fn load_and_extract<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Identifier>, LoadError> {
        let source = read_source(path.as_ref())?;
        self.extract(&source)
    }
}

impl Default for StreamLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_source(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

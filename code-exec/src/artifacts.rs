use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::{error::Error, types::Language};

const BINARY_NAME: &str = "temp_exec";

/// The serialized "last known source" of one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingDescriptor {
    pub language: Language,
    pub code: String,
}

/// Scratch directory holding fixed-name working files.
///
/// File names are fixed per language and shared by every dispatch, so callers
/// must not run two dispatches for the same language at once.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Open the store, creating the scratch directory if needed. The root is
    /// canonicalized so artifact paths stay valid from any working directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        let root = fs::canonicalize(&root).await?;
        debug!("Using scratch directory: {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn descriptor_path(&self, language: Language) -> PathBuf {
        self.root.join(format!("temp_code_{}.json", language.id()))
    }

    pub fn source_path(&self, extension: &str) -> PathBuf {
        self.root.join(format!("temp_code.{}", extension))
    }

    pub fn binary_path(&self) -> PathBuf {
        self.root.join(BINARY_NAME)
    }

    /// Serialize `{language, code}` into the language's descriptor file
    pub async fn stage(&self, language: Language, text: &str) -> Result<PathBuf, Error> {
        let descriptor = StagingDescriptor {
            language,
            code: text.to_string(),
        };
        let path = self.descriptor_path(language);
        fs::write(&path, serde_json::to_vec(&descriptor)?).await?;
        debug!("Staged {} source at: {}", language, path.display());
        Ok(path)
    }

    pub async fn load(&self, descriptor: &Path) -> Result<StagingDescriptor, Error> {
        let raw = fs::read(descriptor).await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Write the descriptor's code to the fixed source path for `extension`.
    /// Goes through the descriptor so it stays the single record of the source.
    pub async fn materialize_source(
        &self,
        descriptor: &Path,
        extension: &str,
    ) -> Result<PathBuf, Error> {
        let staged = self.load(descriptor).await?;
        let path = self.source_path(extension);
        fs::write(&path, staged.code).await?;
        debug!("Materialized source at: {}", path.display());
        Ok(path)
    }

    /// Best-effort removal; an absent binary is not an error
    pub async fn cleanup_binary(&self, path: &Path) {
        match fs::remove_file(path).await {
            Ok(()) => debug!("Removed binary: {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove binary {}: {}", path.display(), e),
        }
    }
}

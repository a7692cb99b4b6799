use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::manifest::Manifest;
use crate::util::write_atomic;

/// File name of the manifest inside a container directory.
pub const MANIFEST_FILE: &str = "manifest.yaml";

/// Errors raised while reading or writing a container.
/// 讀寫容器時可能發生的錯誤。
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("no manifest.yaml found in {path}")]
    MissingManifest { path: PathBuf },
    #[error("a Resource Container already exists at {path}")]
    AlreadyExists { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to serialize manifest for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A directory-backed Resource Container and its manifest.
/// 以資料夾為基礎的 Resource Container 及其 manifest。
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceContainer {
    dir: PathBuf,
    pub manifest: Manifest,
}

impl ResourceContainer {
    /// Loads the container rooted at `dir`.
    /// 載入位於 `dir` 的容器。
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, ContainerError> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(ContainerError::NotADirectory { path: dir });
        }
        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(ContainerError::MissingManifest { path: dir });
        }
        let contents =
            fs::read_to_string(&manifest_path).map_err(|source| ContainerError::Read {
                path: manifest_path.clone(),
                source,
            })?;
        let manifest: Manifest =
            serde_yaml::from_str(&contents).map_err(|source| ContainerError::Parse {
                path: manifest_path,
                source,
            })?;
        Ok(Self { dir, manifest })
    }

    /// Creates a new container at `dir`, letting `init` shape the manifest before the
    /// first write. Refuses to overwrite an existing manifest.
    /// 在 `dir` 建立新容器；`init` 可在首次寫入前調整 manifest。
    pub fn create<F>(dir: impl AsRef<Path>, init: F) -> Result<Self, ContainerError>
    where
        F: FnOnce(&mut Manifest),
    {
        let dir = dir.as_ref().to_path_buf();
        if dir.exists() && !dir.is_dir() {
            return Err(ContainerError::NotADirectory { path: dir });
        }
        if dir.join(MANIFEST_FILE).exists() {
            return Err(ContainerError::AlreadyExists { path: dir });
        }
        fs::create_dir_all(&dir).map_err(|source| ContainerError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let mut manifest = Manifest::default();
        init(&mut manifest);
        let container = Self { dir, manifest };
        container.write()?;
        Ok(container)
    }

    /// Persists the manifest back to disk.
    /// 將 manifest 寫回磁碟。
    pub fn write(&self) -> Result<(), ContainerError> {
        let path = self.manifest_path();
        let payload =
            serde_yaml::to_string(&self.manifest).map_err(|source| ContainerError::Serialize {
                path: path.clone(),
                source,
            })?;
        write_atomic(&path, payload.as_bytes())
            .map_err(|source| ContainerError::Write { path, source })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }
}

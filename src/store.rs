use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;

use crate::error::GeseError;

/// Filesystem cache: one flat directory holding every fetched file by its
/// remote basename. No locking; concurrent writers race and the last one
/// wins, but each write is atomic so readers never see a torn file.
#[derive(Debug, Clone)]
pub struct Store {
    cache_root: Utf8PathBuf,
}

impl Store {
    pub fn new() -> Result<Self, GeseError> {
        let cache_root = BaseDirs::new()
            .and_then(|dirs| {
                Utf8PathBuf::from_path_buf(
                    dirs.home_dir().join(".cache").join("gese-data-manager"),
                )
                .ok()
            })
            .ok_or_else(|| {
                GeseError::Filesystem("unable to resolve cache directory".to_string())
            })?;

        Ok(Self { cache_root })
    }

    pub fn new_with_root(cache_root: Utf8PathBuf) -> Self {
        Self { cache_root }
    }

    pub fn cache_root(&self) -> &Utf8Path {
        &self.cache_root
    }

    pub fn file_path(&self, filename: &str) -> Utf8PathBuf {
        self.cache_root.join(filename)
    }

    pub fn ensure_cache_root(&self) -> Result<(), GeseError> {
        fs::create_dir_all(self.cache_root.as_std_path())
            .map_err(|err| GeseError::Filesystem(err.to_string()))
    }

    pub fn exists(path: &Utf8Path) -> bool {
        path.as_std_path().exists()
    }

    pub fn read_bytes(path: &Utf8Path) -> Result<Vec<u8>, GeseError> {
        fs::read(path.as_std_path()).map_err(|err| {
            GeseError::Filesystem(format!("read {path}: {err}"))
        })
    }

    pub fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), GeseError> {
        let parent = path
            .parent()
            .ok_or_else(|| GeseError::Filesystem("invalid destination path".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| GeseError::Filesystem(err.to_string()))?;
        let mut temp = tempfile::Builder::new()
            .prefix("gese-dm-file")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| GeseError::Filesystem(err.to_string()))?;
        temp.write_all(content)
            .map_err(|err| GeseError::Filesystem(err.to_string()))?;
        if path.as_std_path().exists() {
            fs::remove_file(path.as_std_path())
                .map_err(|err| GeseError::Filesystem(err.to_string()))?;
        }
        temp.persist(path.as_std_path())
            .map_err(|err| GeseError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

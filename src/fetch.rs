use camino::{Utf8Path, Utf8PathBuf};

use crate::domain::{Advisory, AdvisorySink};
use crate::error::GeseError;
use crate::registry::RegistryClient;
use crate::store::Store;

/// How a resource read will be served. The three tiers, in priority order:
/// an existing local file always wins, an explicit download request persists
/// into the target directory, and otherwise the resource is read straight
/// from its URL without touching the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDecision {
    CacheHit,
    Download,
    OnlineRead,
}

pub fn decide(local_exists: bool, want_download: bool) -> FetchDecision {
    if local_exists {
        FetchDecision::CacheHit
    } else if want_download {
        FetchDecision::Download
    } else {
        FetchDecision::OnlineRead
    }
}

#[derive(Debug, Clone)]
pub struct Ensured {
    pub path: Utf8PathBuf,
    pub refreshed: bool,
}

pub struct Fetcher<'a, R: RegistryClient> {
    store: &'a Store,
    registry: &'a R,
}

impl<'a, R: RegistryClient> Fetcher<'a, R> {
    pub fn new(store: &'a Store, registry: &'a R) -> Self {
        Self { store, registry }
    }

    fn target_path(&self, filename: &str, directory: Option<&Utf8Path>) -> Utf8PathBuf {
        match directory {
            Some(dir) => dir.join(filename),
            None => self.store.file_path(filename),
        }
    }

    /// Cache-priming contract: return the local path, fetching only when the
    /// file is absent or a refresh is forced. A failed refresh falls back to
    /// the stale copy when one exists, surfaced as an advisory.
    pub fn ensure_cached(
        &self,
        url: &str,
        filename: &str,
        directory: Option<&Utf8Path>,
        force: bool,
        sink: &dyn AdvisorySink,
    ) -> Result<Ensured, GeseError> {
        let target = self.target_path(filename, directory);
        if !force && Store::exists(&target) {
            return Ok(Ensured {
                path: target,
                refreshed: false,
            });
        }

        match self.registry.fetch_bytes(url) {
            Ok(bytes) => {
                Store::write_bytes_atomic(&target, &bytes)?;
                Ok(Ensured {
                    path: target,
                    refreshed: true,
                })
            }
            Err(err) => {
                if Store::exists(&target) {
                    sink.advise(Advisory::StaleCacheFallback {
                        filename: filename.to_string(),
                        url: url.to_string(),
                    });
                    return Ok(Ensured {
                        path: target,
                        refreshed: false,
                    });
                }
                Err(err)
            }
        }
    }

    /// Three-tier load: local file, explicit download, transient online read.
    pub fn load(
        &self,
        url: &str,
        filename: &str,
        want_download: bool,
        directory: Option<&Utf8Path>,
    ) -> Result<Vec<u8>, GeseError> {
        let target = self.target_path(filename, directory);
        match decide(Store::exists(&target), want_download) {
            FetchDecision::CacheHit => Store::read_bytes(&target),
            FetchDecision::Download => {
                let bytes = self
                    .registry
                    .fetch_bytes(url)
                    .map_err(|err| unavailable(filename, &target, url, err))?;
                Store::write_bytes_atomic(&target, &bytes)?;
                Ok(bytes)
            }
            FetchDecision::OnlineRead => self
                .registry
                .fetch_bytes(url)
                .map_err(|err| unavailable(filename, &target, url, err)),
        }
    }
}

fn unavailable(filename: &str, target: &Utf8Path, url: &str, err: GeseError) -> GeseError {
    let directory = target
        .parent()
        .map(|dir| dir.to_string())
        .unwrap_or_else(|| target.to_string());
    GeseError::DataUnavailable {
        filename: filename.to_string(),
        directory,
        url: url.to_string(),
        message: err.to_string(),
    }
}

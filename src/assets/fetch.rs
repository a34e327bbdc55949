use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use serde::Deserialize;

use crate::{
    assets::locator::Locator,
    foundation::error::{LayercardError, LayercardResult},
};

/// Byte acquisition for image and background locators.
///
/// Implementations must be callable from several runs at once and must not carry state from
/// one run into another. Every failure (transport, auth, not found) is reported as
/// [`LayercardError::AssetFetch`].
pub trait AssetFetcher: Send + Sync {
    fn fetch_bytes(&self, locator: &str) -> LayercardResult<Vec<u8>>;
}

/// Options for [`LocatorFetcher`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchOpts {
    /// Base directory for relative filesystem locators.
    pub working_dir: PathBuf,
    /// Object storage region used to build virtual-hosted object URLs.
    pub region: String,
    /// Path-style object storage endpoint, e.g. `http://localhost:9000`. Overrides `region`.
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
    /// Upper bound on a single network body.
    pub max_bytes: u64,
}

impl Default for FetchOpts {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            region: "us-east-1".to_owned(),
            endpoint: None,
            timeout_secs: 30,
            max_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Default fetcher: object storage and HTTP over a blocking `ureq` agent, paths via `std::fs`.
///
/// Object storage requests are unsigned, so only publicly readable objects (or an endpoint that
/// does not require signing) are reachable. Plug in a custom [`AssetFetcher`] for private
/// buckets.
pub struct LocatorFetcher {
    opts: FetchOpts,
    agent: ureq::Agent,
}

impl std::fmt::Debug for LocatorFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocatorFetcher")
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl Default for LocatorFetcher {
    fn default() -> Self {
        Self::new(FetchOpts::default())
    }
}

impl LocatorFetcher {
    pub fn new(opts: FetchOpts) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(opts.timeout_secs.max(1))))
            .build();
        let agent: ureq::Agent = config.into();
        Self { opts, agent }
    }

    pub fn opts(&self) -> &FetchOpts {
        &self.opts
    }

    /// URL an object locator is fetched from.
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        match &self.opts.endpoint {
            Some(endpoint) => format!("{}/{bucket}/{key}", endpoint.trim_end_matches('/')),
            None => format!("https://{bucket}.s3.{}.amazonaws.com/{key}", self.opts.region),
        }
    }

    fn get(&self, url: &str) -> LayercardResult<Vec<u8>> {
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| LayercardError::asset_fetch(format!("GET '{url}': {e}")))?;

        response
            .body_mut()
            .with_config()
            .limit(self.opts.max_bytes)
            .read_to_vec()
            .map_err(|e| LayercardError::asset_fetch(format!("read body of '{url}': {e}")))
    }

    fn read_file(&self, path: &Path) -> LayercardResult<Vec<u8>> {
        std::fs::read(path)
            .with_context(|| format!("read local asset '{}'", path.display()))
            .map_err(|e| LayercardError::asset_fetch(format!("{e:#}")))
    }
}

impl AssetFetcher for LocatorFetcher {
    fn fetch_bytes(&self, locator: &str) -> LayercardResult<Vec<u8>> {
        let bytes = match Locator::parse(locator)?.resolved_against(&self.opts.working_dir) {
            Locator::Object { bucket, key } => {
                tracing::debug!(%bucket, %key, "fetching object");
                self.get(&self.object_url(&bucket, &key))?
            }
            Locator::Http(url) => {
                tracing::debug!(%url, "fetching remote asset");
                self.get(url.as_str())?
            }
            Locator::File(path) => {
                tracing::debug!(path = %path.display(), "reading local asset");
                self.read_file(&path)?
            }
        };
        tracing::debug!(locator, len = bytes.len(), "asset fetched");
        Ok(bytes)
    }
}

/// In-memory fetcher keyed by the exact locator string.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locator: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(locator.into(), bytes);
    }

    pub fn with(mut self, locator: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(locator, bytes);
        self
    }
}

impl AssetFetcher for MemoryFetcher {
    fn fetch_bytes(&self, locator: &str) -> LayercardResult<Vec<u8>> {
        self.assets
            .get(locator)
            .cloned()
            .ok_or_else(|| LayercardError::asset_fetch(format!("asset '{locator}' not found")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;

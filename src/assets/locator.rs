use std::path::{Path, PathBuf};

use crate::foundation::error::{LayercardError, LayercardResult};

/// Where an asset's bytes live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Locator {
    /// Remote object storage, `s3://bucket/key`.
    Object { bucket: String, key: String },
    /// Plain network fetch, `http://` or `https://`.
    Http(url::Url),
    /// Filesystem path. Relative paths are resolved against the fetcher's working directory.
    File(PathBuf),
}

impl Locator {
    pub fn parse(src: &str) -> LayercardResult<Self> {
        let src = src.trim();
        if src.is_empty() {
            return Err(LayercardError::asset_fetch("asset locator must be non-empty"));
        }

        if src.starts_with("s3://") {
            let uri = url::Url::parse(src).map_err(|e| {
                LayercardError::asset_fetch(format!("invalid object locator '{src}': {e}"))
            })?;
            let bucket = uri.host_str().unwrap_or_default().to_owned();
            let key = uri.path().trim_start_matches('/').to_owned();
            if bucket.is_empty() || key.is_empty() {
                return Err(LayercardError::asset_fetch(format!(
                    "object locator '{src}' must name a bucket and a key"
                )));
            }
            return Ok(Self::Object { bucket, key });
        }

        if src.starts_with("http://") || src.starts_with("https://") {
            let url = url::Url::parse(src).map_err(|e| {
                LayercardError::asset_fetch(format!("invalid url '{src}': {e}"))
            })?;
            return Ok(Self::Http(url));
        }

        if src.starts_with("file://") {
            let url = url::Url::parse(src).map_err(|e| {
                LayercardError::asset_fetch(format!("invalid file url '{src}': {e}"))
            })?;
            let path = url.to_file_path().map_err(|_| {
                LayercardError::asset_fetch(format!("file url '{src}' is not a local path"))
            })?;
            return Ok(Self::File(path));
        }

        Ok(Self::File(PathBuf::from(src)))
    }

    /// Resolve a filesystem locator against `working_dir`. Other locators are returned as-is.
    pub fn resolved_against(self, working_dir: &Path) -> Self {
        match self {
            Self::File(p) if p.is_relative() => Self::File(working_dir.join(p)),
            other => other,
        }
    }
}

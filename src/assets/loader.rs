use std::{collections::HashMap, sync::Arc};

use rayon::prelude::*;

use crate::{
    assets::fetch::AssetFetcher,
    foundation::error::{LayercardError, LayercardResult},
};

/// Run-scoped view over an [`AssetFetcher`], optionally warmed by a parallel prefetch.
///
/// Prefetching only moves byte acquisition earlier; callers still consume results one element at
/// a time in declared order, and a failed prefetch surfaces as the same per-element
/// [`LayercardError::AssetFetch`] a direct fetch would give.
pub struct AssetLoader<'a> {
    fetcher: &'a dyn AssetFetcher,
    prefetched: HashMap<String, Result<Arc<Vec<u8>>, String>>,
}

impl<'a> AssetLoader<'a> {
    pub fn new(fetcher: &'a dyn AssetFetcher) -> Self {
        Self {
            fetcher,
            prefetched: HashMap::new(),
        }
    }

    /// Fetch every distinct locator in parallel.
    pub fn prefetch<'l>(
        fetcher: &'a dyn AssetFetcher,
        locators: impl IntoIterator<Item = &'l str>,
    ) -> Self {
        let mut distinct = Vec::<&str>::new();
        for loc in locators {
            if !distinct.contains(&loc) {
                distinct.push(loc);
            }
        }
        tracing::debug!(count = distinct.len(), "prefetching assets");

        let prefetched = distinct
            .par_iter()
            .map(|loc| {
                let res = fetcher.fetch_bytes(loc).map(Arc::new).map_err(|e| match e {
                    LayercardError::AssetFetch(msg) => msg,
                    other => other.to_string(),
                });
                ((*loc).to_owned(), res)
            })
            .collect();

        Self {
            fetcher,
            prefetched,
        }
    }

    pub fn load(&self, locator: &str) -> LayercardResult<Arc<Vec<u8>>> {
        match self.prefetched.get(locator) {
            Some(Ok(bytes)) => Ok(bytes.clone()),
            Some(Err(msg)) => Err(LayercardError::asset_fetch(msg.clone())),
            None => self.fetcher.fetch_bytes(locator).map(Arc::new),
        }
    }
}

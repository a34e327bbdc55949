pub type LayercardResult<T> = Result<T, LayercardError>;

#[derive(thiserror::Error, Debug)]
pub enum LayercardError {
    /// Run configuration rejected before any work starts.
    #[error("validation error: {0}")]
    Validation(String),

    /// A single element is malformed (missing `src`, no dimensions, ...).
    #[error("element config error: {0}")]
    ElementConfig(String),

    #[error("asset fetch error: {0}")]
    AssetFetch(String),

    #[error("raster engine error: {0}")]
    RasterEngine(String),

    /// The configured background could not be acquired. Always fatal for the run.
    #[error("background load error: {0}")]
    BackgroundLoad(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayercardError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn element_config(msg: impl Into<String>) -> Self {
        Self::ElementConfig(msg.into())
    }

    pub fn asset_fetch(msg: impl Into<String>) -> Self {
        Self::AssetFetch(msg.into())
    }

    pub fn raster(msg: impl Into<String>) -> Self {
        Self::RasterEngine(msg.into())
    }

    pub fn background(msg: impl Into<String>) -> Self {
        Self::BackgroundLoad(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

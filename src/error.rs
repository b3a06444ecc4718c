// Error type for the reveal viewer.
// Every variant states *where* things went wrong. Most of these never reach a
// caller: the viewer logs them and keeps going in a degraded mode.
use std::path::PathBuf;

use thiserror::Error;

use crate::loader::AssetId;

#[derive(Debug, Error)]
pub enum ViewerError {
    /// No window title was configured, so no surface gets attached.
    #[error("root not specified")]
    MissingRoot,

    /// No background source was configured, so nothing will ever render.
    #[error("backgroundImage not specified")]
    MissingBackground,

    #[error("easy is wrong: unknown easing curve `{0}`")]
    UnknownEasing(String),

    #[error("unknown cursor keyword `{0}`")]
    UnknownCursor(String),

    #[error("invalid `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// Decoding or reading one asset failed. Final: there are no retries.
    #[error("{asset} load error ({src}): {source}")]
    AssetLoad {
        asset: AssetId,
        src: String,
        #[source]
        source: image::ImageError,
    },

    #[error("reading config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("window init error: {0}")]
    WindowInit(String),

    #[error("window update error: {0}")]
    WindowUpdate(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;

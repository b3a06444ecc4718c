//! Asset loading and readiness tracking.
//!
//! Every asset is decoded on its own thread and reported back over a channel
//! as an [`AssetEvent`]; events may arrive in any order. The viewer consumes
//! them on its own thread and feeds them through a [`LoadTracker`], which
//! decides when the scene can start rendering.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use image::RgbaImage;

use crate::error::{Result, ViewerError};
use crate::types::HiddenImageSpec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetId {
    Background,
    /// Index into the configured hidden-image list.
    Hidden(usize),
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetId::Background => f.write_str("backgroundImage"),
            AssetId::Hidden(i) => write!(f, "image number {i}"),
        }
    }
}

#[derive(Debug)]
pub enum AssetEvent {
    Loaded { asset: AssetId, image: RgbaImage },
    Failed { asset: AssetId, error: ViewerError },
}

impl AssetEvent {
    pub fn asset(&self) -> AssetId {
        match self {
            AssetEvent::Loaded { asset, .. } | AssetEvent::Failed { asset, .. } => *asset,
        }
    }
}

/// Where decoded images come from.
pub trait ImageSource: Send + Sync {
    fn load(&self, asset: AssetId, src: &str) -> Result<RgbaImage>;
}

/// Reads files from disk, resolving relative paths against `base`.
#[derive(Clone, Debug, Default)]
pub struct FsImageSource {
    base: Option<PathBuf>,
}

impl FsImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relative_to(base: impl Into<PathBuf>) -> Self {
        Self { base: Some(base.into()) }
    }

    fn resolve(&self, src: &str) -> PathBuf {
        let path = Path::new(src);
        match &self.base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ImageSource for FsImageSource {
    fn load(&self, asset: AssetId, src: &str) -> Result<RgbaImage> {
        let image = image::open(self.resolve(src)).map_err(|source| ViewerError::AssetLoad {
            asset,
            src: src.to_string(),
            source,
        })?;
        Ok(image.to_rgba8())
    }
}

/// Start loading every asset. Returns the channel the results arrive on; it
/// closes once every worker has reported.
pub fn spawn_loads(
    source: Arc<dyn ImageSource>,
    background: Option<&str>,
    hidden: &[HiddenImageSpec],
) -> Receiver<AssetEvent> {
    let (tx, rx) = mpsc::channel();

    let jobs = background
        .map(|src| (AssetId::Background, src.to_string()))
        .into_iter()
        .chain(hidden.iter().enumerate().map(|(i, h)| (AssetId::Hidden(i), h.src.clone())));

    for (asset, src) in jobs {
        let tx = tx.clone();
        let source = Arc::clone(&source);
        thread::spawn(move || {
            let event = match source.load(asset, &src) {
                Ok(image) => AssetEvent::Loaded { asset, image },
                Err(error) => AssetEvent::Failed { asset, error },
            };
            // Receiver gone means the viewer shut down; nothing to report to.
            let _ = tx.send(event);
        });
    }
    rx
}

/// Outcome of re-checking readiness after an asset event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    Pending,
    /// First time the predicate holds.
    BecameReady,
    AlreadyReady,
}

/// Counts asset outcomes. Ready once the background decoded and every hidden
/// image that did not fail has arrived.
#[derive(Clone, Debug)]
pub struct LoadTracker {
    background_ready: bool,
    expected: usize,
    loaded: usize,
    ready: bool,
}

impl LoadTracker {
    pub fn new(hidden_count: usize) -> Self {
        Self { background_ready: false, expected: hidden_count, loaded: 0, ready: false }
    }

    pub fn background_loaded(&mut self) {
        self.background_ready = true;
    }

    pub fn hidden_loaded(&mut self) {
        self.loaded += 1;
    }

    /// A failed hidden image is no longer waited for.
    pub fn hidden_failed(&mut self) {
        self.expected = self.expected.saturating_sub(1);
    }

    pub fn check(&mut self) -> Readiness {
        if self.ready {
            return Readiness::AlreadyReady;
        }
        if self.background_ready && self.loaded >= self.expected {
            self.ready = true;
            return Readiness::BecameReady;
        }
        Readiness::Pending
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }
}

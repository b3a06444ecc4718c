//! Scratch-off image reveal.
//!
//! A background image fills the surface; a set of hidden images is painted
//! only inside a circle that follows the pointer. The circle grows when the
//! pointer enters and shrinks when it leaves, animated with an easing curve.
//!
//! The pieces, leaves first:
//!
//! - [`easing`]: the curves, pure `(t, b, c, d) -> value` functions
//! - [`loader`]: decoding assets on worker threads and deciding readiness
//! - [`render`]: compositing one frame from the scene
//! - [`viewer`]: the state machine and its two timers ([`scheduler`])
//!
//! [`draw`] hosts all of it in a native window.

pub mod animation;
pub mod clock;
pub mod config;
pub mod draw;
pub mod easing;
pub mod error;
pub mod gamma;
pub mod loader;
pub mod render;
pub mod scheduler;
pub mod types;
pub mod viewer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, CursorKind, Settings};
pub use easing::Easing;
pub use error::{Result, ViewerError};
pub use loader::{spawn_loads, AssetEvent, AssetId, FsImageSource, ImageSource};
pub use types::{FrameBuffer, HiddenImageSpec, Point};
pub use viewer::{Viewer, ViewerEvent, ViewerState};

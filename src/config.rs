//! Viewer configuration, read from TOML.
//!
//! Keys follow the option names the effect has always used (`backgroundImage`,
//! `hiddenImages`, `cursorVisible`, ...). Only `backgroundImage` and
//! `hiddenImages` matter for anything to show; everything else has a default.
//! Bad values never abort: [`Config::settings`] logs them and falls back.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::easing::Easing;
use crate::error::{Result, ViewerError};
use crate::types::HiddenImageSpec;

pub const DEFAULT_RADIUS: f32 = 100.0;
pub const DEFAULT_DURATION_SECS: f64 = 0.5;
pub const DEFAULT_FPS: f64 = 30.0;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Title of the window the surface is attached to.
    pub root: Option<String>,
    pub background_image: Option<String>,
    #[serde(default)]
    pub hidden_images: Vec<HiddenImageSpec>,
    pub radius: Option<f32>,
    pub easy: Option<String>,
    /// Seconds. `0` jumps straight to the target with no animation.
    pub duration: Option<f64>,
    pub fps: Option<f64>,
    pub cursor_visible: Option<String>,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ViewerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve the numeric and named options, logging every problem found.
    pub fn settings(&self) -> Settings {
        if self.root.is_none() {
            tracing::error!("{}", ViewerError::MissingRoot);
        }
        if self.background_image.is_none() {
            tracing::error!("{}", ViewerError::MissingBackground);
        }

        let radius = match self.radius {
            Some(r) if r.is_finite() && r >= 0.0 => r,
            Some(r) => {
                log_invalid("radius", format!("{r} is not a radius, using 0"));
                0.0
            }
            None => DEFAULT_RADIUS,
        };

        let default_duration = Duration::from_secs_f64(DEFAULT_DURATION_SECS);
        let duration = match self.duration {
            None => default_duration,
            Some(d) => Duration::try_from_secs_f64(d).unwrap_or_else(|_| {
                log_invalid("duration", format!("{d}s, using {DEFAULT_DURATION_SECS}s"));
                default_duration
            }),
        };

        // The period must be representable too, which rules out vanishing rates.
        let default_period = Duration::from_secs_f64(1.0 / DEFAULT_FPS);
        let frame_period = match self.fps {
            None => default_period,
            Some(f) if f.is_finite() && f > 0.0 => Duration::try_from_secs_f64(1.0 / f).unwrap_or_else(|_| {
                log_invalid("fps", format!("{f} is too low, using {DEFAULT_FPS}"));
                default_period
            }),
            Some(f) => {
                log_invalid("fps", format!("{f}, using {DEFAULT_FPS}"));
                default_period
            }
        };

        let easing = match self.easy.as_deref() {
            None => Ok(Easing::default()),
            Some(name) => name.parse::<Easing>().map_err(|e| {
                tracing::error!("{e}");
                name.to_string()
            }),
        };

        let cursor = match self.cursor_visible.as_deref() {
            None => CursorKind::Default,
            Some(keyword) => keyword.parse().unwrap_or_else(|e: ViewerError| {
                tracing::error!("{e}");
                CursorKind::Default
            }),
        };

        Settings {
            radius,
            easing,
            duration,
            frame_period,
            cursor,
        }
    }
}

fn log_invalid(field: &'static str, reason: String) {
    tracing::error!("{}", ViewerError::InvalidValue { field, reason });
}

/// Validated numbers the viewer runs on.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Target mask radius in bitmap pixels.
    pub radius: f32,
    /// `Err(name)` keeps an unknown curve name around so each run can report it.
    pub easing: std::result::Result<Easing, String>,
    pub duration: Duration,
    /// Period shared by the redraw loop and the animation loop.
    pub frame_period: Duration,
    pub cursor: CursorKind,
}

/// CSS cursor keywords the native window can honour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorKind {
    #[default]
    Default,
    Text,
    Crosshair,
    Grab,
    Grabbing,
    EwResize,
    NsResize,
    Move,
    /// Hide the cursor over the surface.
    None,
}

impl std::str::FromStr for CursorKind {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" | "auto" => Ok(CursorKind::Default),
            "text" => Ok(CursorKind::Text),
            "crosshair" => Ok(CursorKind::Crosshair),
            "grab" => Ok(CursorKind::Grab),
            "grabbing" => Ok(CursorKind::Grabbing),
            "ew-resize" => Ok(CursorKind::EwResize),
            "ns-resize" => Ok(CursorKind::NsResize),
            "move" => Ok(CursorKind::Move),
            "none" => Ok(CursorKind::None),
            other => Err(ViewerError::UnknownCursor(other.to_string())),
        }
    }
}

// Window + pointer plumbing for the native host.
// Visual effects provided here:
// 1) A resizable window that shows the composited frame (stretched to fit).
// 2) The configured cursor over that window.
// 3) Enter/move/leave events derived from where the mouse is.

use minifb::{CursorStyle, Key, MouseMode, ScaleMode, Window, WindowOptions};

use crate::config::CursorKind;
use crate::error::ViewerError;
use crate::types::{FrameBuffer, Point};
use crate::viewer::ViewerEvent;

/// How often the window pumps input; the viewer's own timers pace the frames.
const INPUT_POLL_FPS: usize = 120;

pub struct Drawer {
    window: Window, // the on-screen surface
}

impl Drawer {
    /// Create a window sized to the bitmap.
    /// Visual: a new empty window appears with the configured title and cursor.
    pub fn new(title: &str, width: usize, height: usize, cursor: CursorKind) -> Result<Self, ViewerError> {
        let options = WindowOptions { resize: true, scale_mode: ScaleMode::Stretch, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, options).map_err(|e| ViewerError::WindowInit(e.to_string()))?;
        window.set_target_fps(INPUT_POLL_FPS);
        match cursor_style(cursor) {
            Some(style) => window.set_cursor_style(style),
            None => window.set_cursor_visibility(false),
        }
        Ok(Self { window })
    }

    /// Push a freshly rendered frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), ViewerError> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| ViewerError::WindowUpdate(e.to_string()))
    }

    /// Keep input flowing without a new frame; the window shows the last one.
    pub fn idle(&mut self) {
        self.window.update();
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current client size; differs from the bitmap size once the user resizes.
    pub fn displayed_size(&self) -> (f32, f32) {
        let (w, h) = self.window.get_size();
        (w as f32, h as f32)
    }

    /// Mouse position in window coordinates, or None while it is outside.
    pub fn pointer(&self) -> Option<Point> {
        self.window.get_mouse_pos(MouseMode::Discard).map(|(x, y)| Point::new(x, y))
    }
}

fn cursor_style(kind: CursorKind) -> Option<CursorStyle> {
    match kind {
        CursorKind::Default => Some(CursorStyle::Arrow),
        CursorKind::Text => Some(CursorStyle::Ibeam),
        CursorKind::Crosshair => Some(CursorStyle::Crosshair),
        CursorKind::Grab => Some(CursorStyle::OpenHand),
        CursorKind::Grabbing => Some(CursorStyle::ClosedHand),
        CursorKind::EwResize => Some(CursorStyle::ResizeLeftRight),
        CursorKind::NsResize => Some(CursorStyle::ResizeUpDown),
        CursorKind::Move => Some(CursorStyle::ResizeAll),
        CursorKind::None => None,
    }
}

/// Turns "where is the mouse now" samples into enter/move/leave events.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last: Option<Point>,
}

impl PointerTracker {
    pub fn update(&mut self, now: Option<Point>) -> Option<ViewerEvent> {
        let event = match (self.last, now) {
            (None, Some(at)) => Some(ViewerEvent::PointerEnter(at)),
            (Some(prev), Some(at)) if prev != at => Some(ViewerEvent::PointerMove(at)),
            (Some(prev), None) => Some(ViewerEvent::PointerLeave(prev)), // last known spot
            _ => None,
        };
        self.last = now;
        event
    }
}

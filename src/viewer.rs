//! The reveal viewer: owns the scene, the pointer, the mask radius and the two
//! periodic loops, and reacts to pointer and asset events.
//!
//! # Timing
//!
//! Two independent repeating tasks run through one [`Scheduler`]:
//!
//! - **Redraw** repaints the frame from whatever pointer position and radius
//!   are current when it fires. It runs from readiness (or pointer entry) until
//!   a shrink-to-zero finishes.
//! - **Animate** samples the single in-flight [`AnimationRun`] and writes the
//!   radius. Starting a run always cancels the previous one first, so at most
//!   one task ever writes the radius and a superseded run never completes.
//!
//! The host calls [`Viewer::handle`] for input and [`Viewer::pump`] as often as
//! it likes; `pump` fires whatever is due according to the viewer's clock.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::animation::{AnimationRun, OnComplete, Sample};
use crate::clock::Clock;
use crate::config::{Config, Settings};
use crate::error::ViewerError;
use crate::loader::{AssetEvent, AssetId, LoadTracker, Readiness};
use crate::render::{Renderer, Scene};
use crate::scheduler::{Scheduler, TaskId, TaskKind};
use crate::types::{FrameBuffer, HiddenImage, HiddenImageSpec, Point};

/// Input the viewer reacts to. Pointer positions are in the surface's
/// displayed (on-screen) coordinates.
#[derive(Debug)]
pub enum ViewerEvent {
    PointerEnter(Point),
    PointerMove(Point),
    PointerLeave(Point),
    Asset(AssetEvent),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerState {
    /// Redraw loop stopped; radius settled.
    Idle,
    /// Redraw loop running; radius animating or resting.
    Active,
}

/// Live mask: the current radius plus what it animates towards.
#[derive(Clone, Debug, PartialEq)]
struct MaskState {
    radius: f64,
    target_radius: f64,
}

struct ActiveRun {
    run: AnimationRun,
    task: TaskId,
}

pub struct Viewer<C: Clock> {
    clock: C,
    settings: Settings,
    hidden_specs: Vec<HiddenImageSpec>,

    tracker: LoadTracker,
    background: Option<RgbaImage>,
    hidden: Vec<HiddenImage>, // sorted by configured index

    canvas: Option<FrameBuffer>,
    displayed: Option<(f32, f32)>,
    renderer: Renderer,
    frames_rendered: u64,
    unpresented: bool, // a frame was drawn that pump() has not reported yet

    pointer: Point,
    mask: MaskState,

    scheduler: Scheduler,
    redraw: Option<TaskId>,
    animation: Option<ActiveRun>,
}

impl<C: Clock> Viewer<C> {
    pub fn new(config: &Config, clock: C) -> Self {
        let settings = config.settings();
        let target_radius = settings.radius as f64;
        Self {
            clock,
            tracker: LoadTracker::new(config.hidden_images.len()),
            hidden_specs: config.hidden_images.clone(),
            settings,
            background: None,
            hidden: Vec::new(),
            canvas: None,
            displayed: None,
            renderer: Renderer::new(),
            frames_rendered: 0,
            unpresented: false,
            pointer: Point::default(),
            mask: MaskState { radius: 0.0, target_radius },
            scheduler: Scheduler::new(),
            redraw: None,
            animation: None,
        }
    }

    pub fn handle(&mut self, event: ViewerEvent) {
        match event {
            ViewerEvent::PointerEnter(at) => {
                self.start_redraw();
                self.radius_to(self.mask.target_radius, None);
                self.pointer = self.to_bitmap(at);
            }
            ViewerEvent::PointerMove(at) => {
                self.pointer = self.to_bitmap(at);
            }
            ViewerEvent::PointerLeave(at) => {
                self.radius_to(0.0, Some(OnComplete::StopRedraw));
                self.pointer = self.to_bitmap(at);
            }
            ViewerEvent::Asset(event) => self.on_asset(event),
        }
    }

    /// Tell the viewer how large the surface is on screen. Until this is
    /// called the displayed size is taken to equal the bitmap size.
    pub fn set_displayed_size(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.displayed = Some((width, height));
        }
    }

    /// Fire every task due by now. Returns true when a frame was rendered since
    /// the last call, including the closing frame drawn when the loop stops.
    pub fn pump(&mut self) -> bool {
        let now = self.clock.now();
        while let Some((id, kind)) = self.scheduler.next_due(now) {
            match kind {
                TaskKind::Animate => self.animation_tick(id),
                TaskKind::Redraw => self.draw(),
            }
        }
        std::mem::take(&mut self.unpresented)
    }

    /* ---------------------------- assets ---------------------------- */

    fn on_asset(&mut self, event: AssetEvent) {
        match event {
            AssetEvent::Loaded { asset: AssetId::Background, image } => {
                tracing::debug!(width = image.width(), height = image.height(), "background loaded");
                self.background = Some(image);
                self.tracker.background_loaded();
            }
            AssetEvent::Loaded { asset: AssetId::Hidden(index), image } => {
                let Some(spec) = self.hidden_specs.get(index) else {
                    tracing::warn!(index, "ignoring image with no configured slot");
                    return;
                };
                let placement = spec.placement(image.width(), image.height());
                let image = if (placement.width, placement.height) == image.dimensions() {
                    image
                } else {
                    imageops::resize(&image, placement.width, placement.height, FilterType::Triangle)
                };
                let at = self.hidden.partition_point(|h| h.index < index);
                self.hidden.insert(at, HiddenImage { index, placement, image });
                self.tracker.hidden_loaded();
            }
            AssetEvent::Failed { asset, error } => {
                if let AssetId::Hidden(_) = asset {
                    self.tracker.hidden_failed();
                }
                tracing::error!("{error}");
            }
        }
        self.check_ready();
    }

    fn check_ready(&mut self) {
        if self.tracker.check() != Readiness::BecameReady {
            return;
        }
        let Some(bg) = &self.background else { return };
        let (w, h) = (bg.width() as usize, bg.height() as usize);
        tracing::info!(width = w, height = h, hidden = self.hidden.len(), "assets ready");
        self.canvas = Some(FrameBuffer::new(w, h));
        self.start_redraw();
    }

    /* ---------------------------- redraw loop ---------------------------- */

    fn start_redraw(&mut self) {
        if self.redraw.is_some() {
            return;
        }
        let id = self.scheduler.schedule(TaskKind::Redraw, self.settings.frame_period, self.clock.now());
        self.redraw = Some(id);
        tracing::debug!("redraw loop started");
    }

    /// Paints one last frame at the settled radius, so the surface left behind
    /// while idle matches the mask.
    fn stop_redraw(&mut self) {
        if let Some(id) = self.redraw.take() {
            self.draw();
            self.scheduler.cancel(id);
            tracing::debug!("redraw loop stopped");
        }
    }

    fn draw(&mut self) {
        let (Some(fb), Some(background)) = (self.canvas.as_mut(), self.background.as_ref()) else {
            return;
        };
        let scale = match self.displayed {
            Some((dw, _)) => fb.width as f32 / dw,
            None => 1.0,
        };
        let scene = Scene {
            background,
            hidden: &self.hidden,
            pointer: self.pointer,
            radius: self.mask.radius as f32 * scale,
        };
        self.renderer.render(fb, &scene);
        self.frames_rendered += 1;
        self.unpresented = true;
    }

    /* ---------------------------- radius animation ---------------------------- */

    /// Animate the radius from wherever it is now to `to`, replacing any run in
    /// flight.
    fn radius_to(&mut self, to: f64, on_complete: Option<OnComplete>) {
        if let Some(prev) = self.animation.take() {
            self.scheduler.cancel(prev.task);
            tracing::debug!(from = prev.run.from, to = prev.run.to, "superseded radius run");
        }

        if self.settings.duration.is_zero() {
            self.mask.radius = to;
            tracing::debug!(radius = to, "radius set without animation");
            if let Some(action) = on_complete {
                self.complete(action);
            }
            return;
        }

        let easing = match &self.settings.easing {
            Ok(easing) => *easing,
            Err(name) => {
                tracing::error!("{}", ViewerError::UnknownEasing(name.clone()));
                return;
            }
        };

        let now = self.clock.now();
        let run = AnimationRun {
            from: self.mask.radius,
            to,
            duration: self.settings.duration,
            started_at: now,
            easing,
            on_complete,
        };
        tracing::debug!(from = run.from, to, %easing, "radius run started");
        let task = self.scheduler.schedule(TaskKind::Animate, self.settings.frame_period, now);
        self.animation = Some(ActiveRun { run, task });
    }

    fn animation_tick(&mut self, id: TaskId) {
        let Some(active) = self.animation.as_ref().filter(|a| a.task == id) else {
            // Stale handle: cancel it so it stops firing.
            self.scheduler.cancel(id);
            return;
        };
        match active.run.sample(self.clock.now()) {
            Sample::Running(value) => {
                tracing::trace!(radius = value, "radius tick");
                self.mask.radius = value;
            }
            Sample::Done(value, on_complete) => {
                self.mask.radius = value;
                self.scheduler.cancel(id);
                self.animation = None;
                tracing::debug!(radius = value, "radius run complete");
                if let Some(action) = on_complete {
                    self.complete(action);
                }
            }
        }
    }

    fn complete(&mut self, action: OnComplete) {
        match action {
            OnComplete::StopRedraw => self.stop_redraw(),
        }
    }

    /* ---------------------------- coordinates ---------------------------- */

    /// Map a displayed-space position into bitmap space, scaling x and y
    /// independently by bitmap size over displayed size.
    fn to_bitmap(&self, at: Point) -> Point {
        match (&self.canvas, self.displayed) {
            (Some(fb), Some((dw, dh))) => Point::new(at.x * fb.width as f32 / dw, at.y * fb.height as f32 / dh),
            _ => at,
        }
    }

    /* ---------------------------- accessors ---------------------------- */

    pub fn state(&self) -> ViewerState {
        if self.redraw.is_some() { ViewerState::Active } else { ViewerState::Idle }
    }

    pub fn radius(&self) -> f64 {
        self.mask.radius
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn is_ready(&self) -> bool {
        self.tracker.is_ready()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn frame(&self) -> Option<&FrameBuffer> {
        self.canvas.as_ref()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Indices (in configured order) of the hidden images that will be painted.
    pub fn visible_layers(&self) -> Vec<usize> {
        self.hidden.iter().map(|h| h.index).collect()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use image::Rgba;

    fn config(duration: f64) -> Config {
        Config {
            root: Some("test".into()),
            background_image: Some("bg".into()),
            hidden_images: vec![HiddenImageSpec::new("a"), HiddenImageSpec::new("b")],
            radius: Some(50.0),
            easy: Some("linear".into()),
            duration: Some(duration),
            fps: Some(100.0),
            ..Config::default()
        }
    }

    fn loaded(asset: AssetId, w: u32, h: u32) -> ViewerEvent {
        ViewerEvent::Asset(AssetEvent::Loaded { asset, image: RgbaImage::from_pixel(w, h, Rgba([9, 9, 9, 255])) })
    }

    fn failed(asset: AssetId) -> ViewerEvent {
        ViewerEvent::Asset(AssetEvent::Failed {
            asset,
            error: ViewerError::AssetLoad {
                asset,
                src: "x".into(),
                source: image::ImageError::IoError(std::io::ErrorKind::NotFound.into()),
            },
        })
    }

    fn ready_viewer(duration: f64) -> (Viewer<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let mut v = Viewer::new(&config(duration), clock.clone());
        v.handle(loaded(AssetId::Hidden(1), 10, 10));
        v.handle(loaded(AssetId::Background, 40, 20));
        v.handle(loaded(AssetId::Hidden(0), 10, 10));
        (v, clock)
    }

    #[test]
    fn test_starts_idle() {
        let v = Viewer::new(&config(0.5), ManualClock::new());
        assert_eq!(v.state(), ViewerState::Idle);
        assert_eq!(v.radius(), 0.0);
        assert!(!v.is_ready());
        assert!(v.scheduler().is_empty());
    }

    #[test]
    fn test_readiness_sizes_canvas_and_starts_redraw() {
        let (v, _) = ready_viewer(0.5);
        assert!(v.is_ready());
        assert_eq!(v.state(), ViewerState::Active);
        let fb = v.frame().unwrap();
        assert_eq!((fb.width, fb.height), (40, 20));
        assert_eq!(v.visible_layers(), vec![0, 1]);
        assert_eq!(v.radius(), 0.0);
    }

    #[test]
    fn test_repeated_enter_keeps_one_redraw_loop() {
        let (mut v, _) = ready_viewer(0.5);
        v.handle(ViewerEvent::PointerEnter(Point::new(1.0, 1.0)));
        v.handle(ViewerEvent::PointerEnter(Point::new(1.0, 1.0)));
        assert_eq!(v.scheduler().count(TaskKind::Redraw), 1);
    }

    #[test]
    fn test_enter_with_zero_duration_jumps() {
        let (mut v, _) = ready_viewer(0.0);
        v.handle(ViewerEvent::PointerEnter(Point::new(5.0, 5.0)));
        assert_eq!(v.radius(), 50.0);
        assert_eq!(v.scheduler().count(TaskKind::Animate), 0);
    }

    #[test]
    fn test_leave_with_zero_duration_goes_idle() {
        let (mut v, _) = ready_viewer(0.0);
        v.handle(ViewerEvent::PointerEnter(Point::new(5.0, 5.0)));
        v.handle(ViewerEvent::PointerLeave(Point::new(0.0, 0.0)));
        assert_eq!(v.radius(), 0.0);
        assert_eq!(v.state(), ViewerState::Idle);
        assert!(v.scheduler().is_empty());
    }

    #[test]
    fn test_idle_frame_shows_background_only() {
        let (mut v, clock) = ready_viewer(0.0);
        for layer in &mut v.hidden {
            layer.image = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        }
        v.handle(ViewerEvent::PointerEnter(Point::new(5.0, 5.0)));
        clock.advance_ms(10);
        assert!(v.pump());
        assert_eq!(v.frame().unwrap().get(5, 5), Some(0x00_FF_00_00));

        v.handle(ViewerEvent::PointerLeave(Point::new(5.0, 5.0)));
        assert_eq!(v.state(), ViewerState::Idle);
        // The closing frame is reported by the next pump, then nothing more.
        assert!(v.pump());
        assert_eq!(v.frame().unwrap().get(5, 5), Some(0x00_09_09_09));
        assert!(v.frame().unwrap().pixels.iter().all(|p| *p == 0x00_09_09_09));
        clock.advance_ms(100);
        assert!(!v.pump());
    }

    #[test]
    fn test_grow_reaches_exact_target() {
        let (mut v, clock) = ready_viewer(0.5);
        v.handle(ViewerEvent::PointerEnter(Point::new(5.0, 5.0)));
        for _ in 0..60 {
            clock.advance_ms(10);
            v.pump();
        }
        assert_eq!(v.radius(), 50.0);
        assert!(!v.is_animating());
        assert_eq!(v.state(), ViewerState::Active);
    }

    #[test]
    fn test_superseded_run_never_completes() {
        let (mut v, clock) = ready_viewer(0.5);
        v.handle(ViewerEvent::PointerEnter(Point::new(5.0, 5.0)));
        clock.advance_ms(100);
        v.pump();
        v.handle(ViewerEvent::PointerLeave(Point::new(5.0, 5.0)));
        // Re-enter before the shrink can finish and stop the redraw loop.
        clock.advance_ms(100);
        v.pump();
        v.handle(ViewerEvent::PointerEnter(Point::new(5.0, 5.0)));
        assert_eq!(v.scheduler().count(TaskKind::Animate), 1);
        for _ in 0..100 {
            clock.advance_ms(10);
            v.pump();
            assert_eq!(v.state(), ViewerState::Active);
        }
        assert_eq!(v.radius(), 50.0);
    }

    #[test]
    fn test_unknown_easing_aborts_run() {
        let mut cfg = config(0.5);
        cfg.easy = Some("bouncy".into());
        let clock = ManualClock::new();
        let mut v = Viewer::new(&cfg, clock.clone());
        v.handle(loaded(AssetId::Background, 4, 4));
        v.handle(loaded(AssetId::Hidden(0), 1, 1));
        v.handle(loaded(AssetId::Hidden(1), 1, 1));
        v.handle(ViewerEvent::PointerEnter(Point::new(1.0, 1.0)));
        assert!(!v.is_animating());
        clock.advance_ms(1000);
        v.pump();
        assert_eq!(v.radius(), 0.0);
    }

    #[test]
    fn test_failed_hidden_is_excluded() {
        let clock = ManualClock::new();
        let mut v = Viewer::new(&config(0.5), clock);
        v.handle(loaded(AssetId::Background, 4, 4));
        v.handle(failed(AssetId::Hidden(0)));
        assert!(!v.is_ready());
        v.handle(loaded(AssetId::Hidden(1), 2, 2));
        assert!(v.is_ready());
        assert_eq!(v.visible_layers(), vec![1]);
    }

    #[test]
    fn test_failed_background_never_renders() {
        let clock = ManualClock::new();
        let mut v = Viewer::new(&config(0.5), clock.clone());
        v.handle(failed(AssetId::Background));
        v.handle(loaded(AssetId::Hidden(0), 2, 2));
        v.handle(loaded(AssetId::Hidden(1), 2, 2));
        assert!(!v.is_ready());
        v.handle(ViewerEvent::PointerEnter(Point::new(1.0, 1.0)));
        clock.advance_ms(200);
        assert!(!v.pump());
        assert!(v.frame().is_none());
        assert_eq!(v.frames_rendered(), 0);
    }

    #[test]
    fn test_hidden_image_is_resampled_to_placement() {
        let mut cfg = config(0.5);
        cfg.hidden_images[0].width = Some(6);
        cfg.hidden_images[0].height = Some(3);
        let mut v = Viewer::new(&cfg, ManualClock::new());
        v.handle(loaded(AssetId::Hidden(0), 12, 12));
        assert_eq!(v.hidden[0].image.dimensions(), (6, 3));
    }

    #[test]
    fn test_pointer_is_scaled_to_bitmap() {
        let (mut v, _) = ready_viewer(0.5);
        v.set_displayed_size(20.0, 5.0);
        v.handle(ViewerEvent::PointerMove(Point::new(10.0, 4.0)));
        assert_eq!(v.pointer(), Point::new(20.0, 16.0));
    }

    #[test]
    fn test_move_does_not_touch_animation() {
        let (mut v, _) = ready_viewer(0.5);
        v.handle(ViewerEvent::PointerMove(Point::new(3.0, 3.0)));
        assert!(!v.is_animating());
        assert_eq!(v.radius(), 0.0);
    }
}

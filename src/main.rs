// What you SEE:
// • The background image fills the window.
// • Move the mouse over it: a circle grows around the cursor and the hidden
//   images show through it. Move away: the circle shrinks and disappears.
// • ESC quits.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scratch_reveal::draw::{Drawer, PointerTracker};
use scratch_reveal::{spawn_loads, Config, FsImageSource, SystemClock, Viewer, ViewerError, ViewerEvent};

#[derive(Parser, Debug)]
#[command(name = "scratch-reveal", about = "Reveal hidden images under a circle that follows the mouse")]
struct Args {
    /// TOML file with the viewer options
    config: PathBuf,

    /// Tracing filter, overrides RUST_LOG
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<(), ViewerError> {
    let args = Args::parse();

    let filter = match &args.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scratch_reveal=info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    /* --- Config + asset loads ---
       Visual: nothing yet; images decode in the background. */
    let config = Config::load(&args.config)?;
    let base = args.config.parent().map(PathBuf::from).unwrap_or_default();
    let assets = spawn_loads(
        Arc::new(FsImageSource::relative_to(base)),
        config.background_image.as_deref(),
        &config.hidden_images,
    );

    let mut viewer = Viewer::new(&config, SystemClock::new());

    /* --- Wait for readiness ---
       A failed background means nothing can ever be shown. */
    while !viewer.is_ready() {
        match assets.recv() {
            Ok(event) => viewer.handle(ViewerEvent::Asset(event)),
            Err(_) => {
                tracing::warn!("assets finished without a usable background, nothing to show");
                return Ok(());
            }
        }
    }

    let Some(title) = config.root.as_deref() else {
        // Already reported; there is no surface to attach to.
        return Ok(());
    };
    let Some((width, height)) = viewer.frame().map(|fb| (fb.width, fb.height)) else {
        return Ok(());
    };

    /* --- Window ---
       Visual: window opens at the background's natural size. */
    let mut drawer = Drawer::new(title, width, height, viewer.settings().cursor)?;
    let mut pointer = PointerTracker::default();
    tracing::info!(width, height, "session started");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let (dw, dh) = drawer.displayed_size();
        viewer.set_displayed_size(dw, dh);

        // 1) Pointer: enter/move/leave from where the mouse is now.
        if let Some(event) = pointer.update(drawer.pointer()) {
            viewer.handle(event);
        }

        // 2) Timers: animation ticks and redraws that are due.
        // 3) Present a new frame if one was drawn, else just keep input alive.
        let drew = viewer.pump();
        match viewer.frame() {
            Some(frame) if drew => drawer.present(frame)?,
            _ => drawer.idle(),
        }
    }

    tracing::info!(frames = viewer.frames_rendered(), "session ended");
    Ok(())
}

//! Blobs No. 1 - generative blob animation synchronised to a MIDI score
//!
//! Every note of the score's synth track wipes the canvas and regrows a
//! shuffled grid of triadic blobs, one blob at a time, over the note's length.

use std::fs::OpenOptions;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::{Receiver, TryRecvError};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use blobs::assets::{self, AssetPaths, LoadEvent};
use blobs::audio::{AudioSystem, ManualClock, PlaybackClock};
use blobs::cli::Args;
use blobs::params::{RecordingConfig, RenderConfig, SketchParams};
use blobs::playback::{
    ClickOutcome, JsonLinesDataLayer, PageInfo, PlaybackController, PlaybackState,
};
use blobs::render::{Overlay, RenderSystem, Uniforms};
use blobs::sketch::Sketch;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Animation and playback
    sketch: Sketch,
    controller: PlaybackController,
    overlay: Overlay,
    audio: Option<AudioSystem>,

    // Assets arriving from the loader thread
    loader: Option<Receiver<LoadEvent>>,
    asset_paths: AssetPaths,

    // Configuration
    render_config: RenderConfig,

    // Time tracking
    start_time: Instant,
}

impl App {
    fn new(
        sketch_params: SketchParams,
        render_config: RenderConfig,
        controller: PlaybackController,
        asset_paths: AssetPaths,
    ) -> blobs::Result<Self> {
        let track = sketch_params.note_track;
        let sketch = Sketch::new(
            render_config.window_width,
            render_config.window_height,
            sketch_params,
        )?;

        Ok(Self {
            window: None,
            render_system: None,
            sketch,
            controller,
            overlay: Overlay::new(render_config.fade_ms),
            audio: None,
            loader: Some(assets::spawn_loader(asset_paths.clone(), track)),
            asset_paths,
            render_config,
            start_time: Instant::now(),
        })
    }

    fn now_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }

    /// Pick up the loader result once it arrives
    fn poll_loader(&mut self) {
        let Some(rx) = &self.loader else {
            return;
        };
        let event = match rx.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                log::error!("Asset loader exited without a result");
                self.loader = None;
                return;
            }
        };
        self.loader = None;

        let assets = match event {
            LoadEvent::Loaded(assets) => assets,
            LoadEvent::Failed(e) => {
                log::error!("Failed to load assets: {}", e);
                return;
            }
        };
        log::info!("{}", assets::describe(&assets, &self.asset_paths.audio));

        // The output stream is not Send, so it is opened here on the main thread
        match AudioSystem::new(&assets.audio) {
            Ok(audio) => self.audio = Some(audio),
            Err(e) => {
                log::error!("Failed to open audio output: {}", e);
                return;
            }
        }

        self.sketch.schedule(&assets.notes);
        self.controller.mark_ready();
        let now = self.now_ms();
        self.overlay.loading_complete(now);
    }

    /// Click or Space: play, pause or replay
    fn toggle_playback(&mut self) {
        let now = self.now_ms();
        let Some(audio) = self.audio.as_mut() else {
            return;
        };
        match self.controller.click(audio) {
            ClickOutcome::Replayed => {
                self.sketch.reset();
                self.overlay.playing(now);
            }
            ClickOutcome::Playing => self.overlay.playing(now),
            ClickOutcome::Paused | ClickOutcome::Ignored => {}
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return; // Minimised
        }
        if let Err(e) = self.sketch.resize(width, height) {
            log::error!("Failed to resize canvas: {}", e);
            return;
        }
        if let Some(render_system) = self.render_system.as_mut() {
            render_system.resize(width, height);
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.poll_loader();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title(self.render_config.title.as_str())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Initialize rendering system
        let render_system = match pollster::block_on(RenderSystem::new(Arc::clone(&window))) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("Failed to initialise rendering: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        log::info!("Window {}x{}; click or press Space to play, ESC to quit", size.width, size.height);

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.resize(size.width, size.height);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Space),
                        repeat: false,
                        ..
                    },
                ..
            } => self.toggle_playback(),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.toggle_playback(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

impl App {
    /// Render a single frame
    fn render_frame(&mut self) {
        let now_ms = self.now_ms();
        if let Some(audio) = self.audio.as_mut() {
            step(&mut self.sketch, &mut self.controller, audio, now_ms);
        }

        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };
        render_system.upload_canvas(&self.sketch.canvas().to_image());
        let uniforms = Uniforms::new(
            self.overlay.frame(now_ms),
            (now_ms / 1000.0) as f32,
            render_system.surface_size(),
        );
        render_system.update_uniforms(&uniforms);

        match render_system.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure()
            }
            Err(e) => log::error!("Render error: {:?}", e),
        }
    }
}

/// Advance the animation one frame: cues only fire while the track plays
fn step(
    sketch: &mut Sketch,
    controller: &mut PlaybackController,
    clock: &mut dyn PlaybackClock,
    now_ms: f64,
) {
    if controller.state() == PlaybackState::Playing {
        sketch.fire_cues(clock.position_s(), now_ms);
    }
    sketch.draw_due(now_ms);
    controller.poll(clock);
}

/// Headless rendition: simulated clock, one PNG per frame
fn record(
    config: &RecordingConfig,
    asset_paths: &AssetPaths,
    sketch_params: SketchParams,
    render_config: &RenderConfig,
    mut controller: PlaybackController,
) -> anyhow::Result<()> {
    let track = sketch_params.note_track;
    let assets = assets::load_assets(asset_paths, track).context("Failed to load assets")?;
    log::info!("{}", assets::describe(&assets, &asset_paths.audio));

    let duration_s = assets.audio.duration_s();
    let mut clock = ManualClock::new(duration_s);
    let mut sketch = Sketch::new(
        render_config.window_width,
        render_config.window_height,
        sketch_params,
    )?;
    sketch.schedule(&assets.notes);

    controller.mark_ready();
    controller.click(&mut clock);

    let total_frames = config.total_frames(duration_s);
    let dt = config.frame_interval_s();
    log::info!(
        "Recording {} frames @ {}fps to {}",
        total_frames,
        config.fps,
        config.frames_dir().display()
    );

    for frame in 0..total_frames {
        let now_ms = frame as f64 * dt * 1000.0;
        step(&mut sketch, &mut controller, &mut clock, now_ms);

        let path = config.frame_path(frame);
        sketch
            .canvas()
            .save_png(&path)
            .with_context(|| format!("Failed to save frame {}", path.display()))?;

        clock.tick(dt);
        if frame % config.fps as usize == 0 {
            log::info!("Recorded {}/{} frames", frame + 1, total_frames);
        }
    }

    log::info!("Recording complete: {} frames", total_frames);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let sketch_params = args.sketch_params()?;
    let render_config = args.render_config()?;
    let asset_paths = args.asset_paths();

    let page = PageInfo {
        title: render_config.title.clone(),
        location: asset_paths.midi_location(),
    };
    let mut controller = PlaybackController::new(page, args.start_signal());
    if let Some(path) = &args.analytics {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open analytics log {}", path.display()))?;
        controller = controller.with_data_layer(Box::new(JsonLinesDataLayer::new(file)));
    }

    if let Some(config) = args.create_recording_config()? {
        return record(
            &config,
            &asset_paths,
            sketch_params,
            &render_config,
            controller,
        );
    }

    log::info!("Loading {} and {}", asset_paths.audio.display(), asset_paths.midi.display());
    let mut app = App::new(sketch_params, render_config, controller, asset_paths)?;
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app).context("Event loop failed")?;
    Ok(())
}

/// Terminal-based ASCII wireframe renderer
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use wire3d_core::{Camera, GeometryModel, Loader, RotationState};

pub mod cli;
pub mod config;
pub mod display;
pub mod renderer;

pub use config::Config;
pub use display::{Display, TerminalDisplay};
pub use renderer::AsciiRenderer;

/// Load `path` if given, falling back to the unit cube on any load error
pub fn load_model_or_cube(path: Option<&Path>, loader: &Loader) -> GeometryModel {
    let Some(path) = path else {
        return GeometryModel::cube();
    };

    match loader.load(path) {
        Ok(model) => {
            info!(
                path = %path.display(),
                vertices = model.vertex_count(),
                edges = model.edge_count(),
                "loaded model"
            );
            if model.edge_count() == 0 {
                warn!("model has no edges; nothing will be drawn");
            }
            model
        }
        Err(err) => {
            warn!("{err}; using default cube");
            GeometryModel::cube()
        }
    }
}

/// Main application struct: the rotate/project/draw/present loop
pub struct TerminalApp {
    model: GeometryModel,
    rotation: RotationState,
    camera: Camera,
    renderer: AsciiRenderer,
    delta: (f32, f32),
    frame_interval: Duration,
    frame_limit: Option<u64>,
    frames_drawn: u64,
}

impl TerminalApp {
    pub fn new(model: GeometryModel, config: &Config) -> anyhow::Result<Self> {
        let camera = config.camera.clone();
        let renderer = AsciiRenderer::new(
            usize::from(camera.width),
            usize::from(camera.height),
            config.build_shading()?,
        );

        Ok(Self {
            model,
            rotation: RotationState::zero(),
            camera,
            renderer,
            delta: (config.animation.delta_x, config.animation.delta_y),
            frame_interval: Duration::from_millis(config.animation.frame_interval_ms),
            frame_limit: None,
            frames_drawn: 0,
        })
    }

    /// Stop after `limit` frames; `None` runs until the display asks to quit
    pub fn with_frame_limit(mut self, limit: Option<u64>) -> Self {
        self.frame_limit = limit;
        self
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Run the animation on `display`. The display is torn down even if a frame fails.
    pub fn run<D: Display>(&mut self, display: &mut D) -> io::Result<()> {
        display.init()?;
        let result = self.main_loop(display);
        let restored = display.teardown();
        result.and(restored)
    }

    fn main_loop<D: Display>(&mut self, display: &mut D) -> io::Result<()> {
        let mut last_sample = Instant::now();
        let mut sampled_frames = 0u32;

        loop {
            if display.poll_quit()? {
                debug!(frames = self.frames_drawn, "quit requested");
                return Ok(());
            }
            if self.frame_limit.is_some_and(|limit| self.frames_drawn >= limit) {
                return Ok(());
            }

            let rows = self.render_frame();
            display.present(&rows)?;
            self.rotation.advance(self.delta.0, self.delta.1);
            self.frames_drawn += 1;

            std::thread::sleep(self.frame_interval);

            sampled_frames += 1;
            let elapsed = last_sample.elapsed();
            if elapsed >= Duration::from_secs(1) {
                debug!(fps = f64::from(sampled_frames) / elapsed.as_secs_f64(), "frame rate");
                sampled_frames = 0;
                last_sample = Instant::now();
            }
        }
    }

    /// Draw the model at the current rotation into fresh rows
    pub fn render_frame(&mut self) -> Vec<String> {
        self.renderer.clear();
        self.renderer
            .render_model(&self.model, &self.rotation, &self.camera);
        self.renderer.rows()
    }
}

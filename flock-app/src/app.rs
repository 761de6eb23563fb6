use anyhow::Result;
use flock_core::{Bounds, Flock, FlockConfig, Vector2D};
use flock_shared::{AppSettings, Color, DrawCommand, FrameReport, InputEvent, KeyCode, Position};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::frontend::{FrameLimiter, Frontend};

/// Runs a flock: feeds it input from a frontend, steps it, and hands the
/// resulting frame back to the frontend.
pub struct FlockingApp<F: Frontend> {
    flock: Flock<Color>,
    placement_rng: SmallRng,
    settings: AppSettings,
    frontend: F,
    frame: u64,
    draw_list: Vec<DrawCommand>,
}

impl<F: Frontend> FlockingApp<F> {
    /// Builds the app and places the initial population.
    ///
    /// Placement draws from `seed`, the flock's jitter from `seed + 1`.
    pub fn new(settings: AppSettings, seed: u64, config: FlockConfig, frontend: F) -> Result<Self> {
        if settings.width == 0 || settings.height == 0 {
            anyhow::bail!(
                "Window must have a non-zero size, got {}x{}",
                settings.width,
                settings.height
            );
        }

        let mut app = Self {
            flock: Flock::with_config(seed.wrapping_add(1), config),
            placement_rng: SmallRng::seed_from_u64(seed),
            settings,
            frontend,
            frame: 0,
            draw_list: Vec::new(),
        };
        app.populate();
        app.collect_draw_list();

        Ok(app)
    }

    fn populate(&mut self) {
        let bounds = Bounds::new(self.settings.width, self.settings.height);
        self.flock.populate(
            &mut self.placement_rng,
            self.settings.flock_size,
            bounds,
            random_color,
        );
    }

    /// Replaces the whole population with a fresh random one.
    pub fn reset(&mut self) {
        self.flock.clear();
        self.populate();
        log::info!("Flock reset with {} boids", self.flock.len());
    }

    /// Applies one input event. Returns `false` when the app should stop.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::WindowClosed => {
                log::info!("Window closed");
                return false;
            }
            InputEvent::PointerMoved { x, y } => {
                self.flock.set_dest(Vector2D::new(x, y));
                log::debug!("Destination set to ({}, {})", x, y);
            }
            InputEvent::KeyPressed { code: KeyCode::R } => self.reset(),
            InputEvent::KeyPressed { code } => {
                log::debug!("Ignoring key {:?}", code);
            }
        }
        true
    }

    /// Runs one frame: input, simulation step, render.
    ///
    /// Returns `false` without stepping when the frontend asked to close.
    pub fn step(&mut self) -> Result<bool> {
        for event in self.frontend.poll_events()? {
            if !self.handle_event(&event) {
                return Ok(false);
            }
        }

        self.flock.update();
        self.collect_draw_list();
        self.frontend.render(&self.draw_list)?;
        self.frame += 1;

        Ok(true)
    }

    /// Steps until the frontend closes or `max_frames` frames have run.
    /// Returns the number of frames simulated.
    pub fn run(&mut self, max_frames: Option<u64>) -> Result<u64> {
        log::info!(
            "Starting main loop with {} boids at up to {} fps",
            self.flock.len(),
            self.settings.frame_rate
        );

        let mut limiter = FrameLimiter::new(self.settings.frame_rate);
        let start = self.frame;

        loop {
            if max_frames.is_some_and(|max| self.frame - start >= max) {
                log::info!("Frame budget reached");
                break;
            }
            if !self.step()? {
                break;
            }
            if limiter.wait() {
                log::debug!("FPS: {:.1}", limiter.fps());
            }
        }

        let frames = self.frame - start;
        log::info!("Main loop finished after {} frames", frames);
        Ok(frames)
    }

    fn collect_draw_list(&mut self) {
        self.draw_list.clear();
        self.draw_list
            .extend(self.flock.draw().map(|(position, radius, color)| DrawCommand {
                center: Position::new(position.x, position.y),
                radius,
                color: *color,
            }));
    }

    pub fn report(&self) -> FrameReport {
        let destination = self.flock.destination();
        FrameReport {
            frame: self.frame,
            destination: Position::new(destination.x, destination.y),
            boids: self.draw_list.clone(),
        }
    }

    pub fn flock(&self) -> &Flock<Color> {
        &self.flock
    }

    pub fn draw_list(&self) -> &[DrawCommand] {
        &self.draw_list
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }
}

fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    Color::new(
        rng.gen_range(0..255),
        rng.gen_range(0..255),
        rng.gen_range(0..255),
    )
}

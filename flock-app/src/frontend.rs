use anyhow::Result;
use flock_shared::{DrawCommand, InputEvent};
use std::thread;
use std::time::{Duration, Instant};

/// Display side of the application: supplies input and draws frames.
pub trait Frontend {
    /// Returns the events collected since the previous call, oldest first.
    fn poll_events(&mut self) -> Result<Vec<InputEvent>>;

    /// Draws one complete frame.
    fn render(&mut self, commands: &[DrawCommand]) -> Result<()>;
}

/// Holds the main loop to a frame-rate cap and measures the rate achieved.
pub struct FrameLimiter {
    frame_time: Option<Duration>,
    last_frame: Instant,
    frame_count: u32,
    last_fps_time: Instant,
    fps: f64,
}

impl FrameLimiter {
    /// A `frame_rate` of zero disables the cap.
    pub fn new(frame_rate: u32) -> Self {
        let frame_time = (frame_rate > 0).then(|| Duration::from_secs(1) / frame_rate);
        let now = Instant::now();
        Self {
            frame_time,
            last_frame: now,
            frame_count: 0,
            last_fps_time: now,
            fps: 0.0,
        }
    }

    /// Sleeps out the rest of the current frame.
    ///
    /// Returns `true` roughly once per second, when a fresh FPS measurement is available.
    pub fn wait(&mut self) -> bool {
        if let Some(frame_time) = self.frame_time {
            let elapsed = self.last_frame.elapsed();
            if elapsed < frame_time {
                thread::sleep(frame_time - elapsed);
            }
        }
        self.last_frame = Instant::now();

        self.frame_count += 1;
        let since = self.last_fps_time.elapsed();
        if since.as_secs() >= 1 {
            self.fps = self.frame_count as f64 / since.as_secs_f64();
            self.frame_count = 0;
            self.last_fps_time = Instant::now();
            true
        } else {
            false
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}

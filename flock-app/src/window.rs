use anyhow::{anyhow, Context, Result};
use flock_shared::{Color, DrawCommand, InputEvent, KeyCode};
use opencv::{
    core::{Mat, Point, Rect, Scalar, CV_8UC3},
    highgui, imgproc,
    prelude::*,
};
use std::sync::{Arc, Mutex};

use crate::frontend::Frontend;

const KEY_ESCAPE: i32 = 27;

/// OpenCV window showing the flock as filled circles on black.
pub struct WindowFrontend {
    title: String,
    canvas: Mat,
    width: i32,
    height: i32,
    pointer_events: Arc<Mutex<Vec<InputEvent>>>,
}

impl WindowFrontend {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let width = i32::try_from(width).context("Window width out of range")?;
        let height = i32::try_from(height).context("Window height out of range")?;

        log::info!("Opening {}x{} window", width, height);
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;

        let canvas =
            Mat::new_rows_cols_with_default(height, width, CV_8UC3, to_scalar(Color::BLACK))?;
        highgui::imshow(title, &canvas)?;

        // Mouse callbacks fire from inside wait_key, so they queue until the next poll
        let pointer_events = Arc::new(Mutex::new(Vec::new()));
        let queue = Arc::clone(&pointer_events);
        highgui::set_mouse_callback(
            title,
            Some(Box::new(move |event: i32, x: i32, y: i32, _flags: i32| {
                if event == highgui::EVENT_MOUSEMOVE {
                    if let Ok(mut queue) = queue.lock() {
                        queue.push(InputEvent::PointerMoved {
                            x: x as f32,
                            y: y as f32,
                        });
                    }
                }
            })),
        )
        .context("Failed to install mouse callback")?;

        Ok(Self {
            title: title.to_string(),
            canvas,
            width,
            height,
            pointer_events,
        })
    }

    fn is_visible(&self) -> Result<bool> {
        let visible = highgui::get_window_property(&self.title, highgui::WND_PROP_VISIBLE)?;
        Ok(visible >= 1.0)
    }
}

impl Frontend for WindowFrontend {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
        let key = highgui::wait_key(1)?;

        let pointer: Vec<InputEvent> = self
            .pointer_events
            .lock()
            .map_err(|_| anyhow!("Pointer event queue poisoned"))?
            .drain(..)
            .collect();

        Ok(frame_events(pointer, key, self.is_visible()?))
    }

    fn render(&mut self, commands: &[DrawCommand]) -> Result<()> {
        imgproc::rectangle(
            &mut self.canvas,
            Rect::new(0, 0, self.width, self.height),
            to_scalar(Color::BLACK),
            imgproc::FILLED,
            imgproc::LINE_8,
            0,
        )?;

        for command in commands {
            imgproc::circle(
                &mut self.canvas,
                Point::new(
                    command.center.x.round() as i32,
                    command.center.y.round() as i32,
                ),
                (command.radius.round() as i32).max(1),
                to_scalar(command.color),
                imgproc::FILLED,
                imgproc::LINE_AA,
                0,
            )?;
        }

        highgui::imshow(&self.title, &self.canvas)?;
        Ok(())
    }
}

impl Drop for WindowFrontend {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_window(&self.title) {
            log::warn!("Failed to close window: {}", e);
        }
    }
}

/// OpenCV scalars are BGR
fn to_scalar(color: Color) -> Scalar {
    Scalar::new(color.b as f64, color.g as f64, color.r as f64, 0.0)
}

/// Orders one poll's worth of input into the event stream.
///
/// `wait_key` dispatches every queued mouse callback before it returns the key,
/// and highgui gives no timestamps to interleave them more finely, so pointer
/// moves come first, then the key, then a close seen on the window itself.
fn frame_events(pointer: Vec<InputEvent>, key: i32, visible: bool) -> Vec<InputEvent> {
    let mut events = pointer;
    if key >= 0 {
        events.push(key_event(key & 0xFF));
    }
    if !visible {
        events.push(InputEvent::WindowClosed);
    }
    events
}

fn key_event(key: i32) -> InputEvent {
    match key {
        k if k == b'r' as i32 || k == b'R' as i32 => InputEvent::KeyPressed { code: KeyCode::R },
        k if k == b'q' as i32 || k == KEY_ESCAPE => InputEvent::WindowClosed,
        other => InputEvent::KeyPressed {
            code: KeyCode::Other(other),
        },
    }
}

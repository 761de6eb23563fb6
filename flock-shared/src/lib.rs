#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Represents a 2D position in window coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// RGB fill color of a boid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Keys the simulation distinguishes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum KeyCode {
    /// Reset the flock
    R,
    /// Any other key, by its raw frontend code
    Other(i32),
}

/// Input event handed from a frontend to the simulation, once per occurrence
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum InputEvent {
    WindowClosed,
    PointerMoved { x: f32, y: f32 },
    KeyPressed { code: KeyCode },
}

/// One filled circle to render
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DrawCommand {
    pub center: Position,
    pub radius: f32,
    pub color: Color,
}

/// Startup parameters of the application shell
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    pub width: u32,
    pub height: u32,
    pub flock_size: usize,
    /// Frame-rate cap; 0 runs unthrottled
    pub frame_rate: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            width: 1524,
            height: 1024,
            flock_size: 300,
            frame_rate: 60,
        }
    }
}

/// Pre-recorded input, one event list per frame
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventScript {
    pub frames: Vec<Vec<InputEvent>>,
}

#[cfg(feature = "std")]
impl EventScript {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Snapshot of a rendered frame, written out by headless runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub destination: Position,
    pub boids: Vec<DrawCommand>,
}

use anyhow::{Context, Result};
use flock_shared::{DrawCommand, EventScript, InputEvent};
use std::collections::VecDeque;
use std::path::Path;

use crate::frontend::Frontend;

/// Frontend without a window: replays recorded input and keeps the last frame.
pub struct ScriptedFrontend {
    pending: VecDeque<Vec<InputEvent>>,
    close_when_exhausted: bool,
    last_frame: Vec<DrawCommand>,
    frames_rendered: u64,
}

impl ScriptedFrontend {
    /// Once the script runs out the frontend keeps delivering empty frames.
    pub fn new(script: EventScript) -> Self {
        Self {
            pending: script.frames.into(),
            close_when_exhausted: false,
            last_frame: Vec::new(),
            frames_rendered: 0,
        }
    }

    /// Reads an [`EventScript`] from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event script {}", path.display()))?;
        let script = EventScript::from_json(&json)
            .with_context(|| format!("Invalid event script {}", path.display()))?;
        log::info!(
            "Loaded event script with {} frames from {}",
            script.frames.len(),
            path.display()
        );
        Ok(Self::new(script))
    }

    /// Reports `WindowClosed` after the last scripted frame.
    pub fn close_when_exhausted(mut self, close: bool) -> Self {
        self.close_when_exhausted = close;
        self
    }

    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl Frontend for ScriptedFrontend {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
        Ok(match self.pending.pop_front() {
            Some(events) => events,
            None if self.close_when_exhausted => vec![InputEvent::WindowClosed],
            None => Vec::new(),
        })
    }

    fn render(&mut self, commands: &[DrawCommand]) -> Result<()> {
        self.last_frame.clear();
        self.last_frame.extend_from_slice(commands);
        self.frames_rendered += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flock_shared::KeyCode;

    #[test]
    fn test_replays_frames_in_order() {
        let script = EventScript {
            frames: vec![
                vec![InputEvent::PointerMoved { x: 1.0, y: 2.0 }],
                vec![InputEvent::KeyPressed { code: KeyCode::R }],
            ],
        };
        let mut frontend = ScriptedFrontend::new(script);

        assert_eq!(
            frontend.poll_events().unwrap(),
            vec![InputEvent::PointerMoved { x: 1.0, y: 2.0 }]
        );
        assert_eq!(
            frontend.poll_events().unwrap(),
            vec![InputEvent::KeyPressed { code: KeyCode::R }]
        );
        assert!(frontend.poll_events().unwrap().is_empty());
    }

    #[test]
    fn test_closes_after_script_when_asked() {
        let mut frontend = ScriptedFrontend::new(EventScript::default()).close_when_exhausted(true);
        assert_eq!(
            frontend.poll_events().unwrap(),
            vec![InputEvent::WindowClosed]
        );
    }

    #[test]
    fn test_missing_script_file_is_an_error() {
        let result = ScriptedFrontend::from_path(Path::new("/nonexistent/flock-script.json"));
        let message = format!("{:#}", result.err().unwrap());
        assert!(message.contains("Failed to read event script"));
    }
}

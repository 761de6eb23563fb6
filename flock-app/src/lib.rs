pub mod app;
pub mod frontend;
pub mod headless;
pub mod window;

pub use app::FlockingApp;
pub use frontend::{FrameLimiter, Frontend};
pub use headless::ScriptedFrontend;
pub use window::WindowFrontend;

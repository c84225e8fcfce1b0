mod config;
mod error;
mod window_state;

pub use config::TitleTrackerConfig;
pub use error::{TitleTrackerError, TitleTrackerResult};
pub use window_state::{TrackedState, WindowChange, WindowId, WindowState};

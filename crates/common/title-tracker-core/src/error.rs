use crate::WindowId;
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum TitleTrackerError {
    /// Raised by host change callbacks to end tracking.
    #[error("{0}")]
    Error(String),

    #[error("Unsupported")]
    Unsupported,

    #[error("No display available")]
    NoDisplay,

    /// The window was destroyed between observing its id and using it.
    #[error("Window {0} no longer exists")]
    InvalidWindow(WindowId),

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Change channel closed")]
    ChannelClosed,

    #[error("Platform error: {message}")]
    Platform {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl TitleTrackerError {
    pub fn new<S: ToString>(err: S) -> Self {
        TitleTrackerError::Error(err.to_string())
    }

    pub fn platform<S: Into<String>>(message: S) -> Self {
        TitleTrackerError::Platform {
            message: message.into(),
            source: None,
        }
    }

    pub fn platform_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        TitleTrackerError::Platform {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error only means the target window is gone.
    #[must_use]
    pub fn is_invalid_window(&self) -> bool {
        matches!(self, TitleTrackerError::InvalidWindow(_))
    }
}

pub type TitleTrackerResult<T> = Result<T, TitleTrackerError>;

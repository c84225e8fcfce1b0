use bon::bon;

use crate::{TitleTrackerError, TitleTrackerResult};
use std::time::Duration;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
const DEFAULT_MAX_TITLE_LENGTH: u32 = 4096;
const MAX_TITLE_LENGTH_LIMIT: u32 = 65536;

fn validate_poll_interval(interval: Duration) -> TitleTrackerResult<Duration> {
    if interval.is_zero() {
        return Err(TitleTrackerError::InvalidConfig {
            reason: "poll interval cannot be zero".into(),
        });
    }
    if interval > Duration::from_secs(10) {
        return Err(TitleTrackerError::InvalidConfig {
            reason: "poll interval cannot be greater than 10 seconds".into(),
        });
    }
    Ok(interval)
}

fn validate_max_title_length(length: u32) -> TitleTrackerResult<u32> {
    if length == 0 {
        return Err(TitleTrackerError::InvalidConfig {
            reason: "max title length cannot be zero".into(),
        });
    }
    if length > MAX_TITLE_LENGTH_LIMIT {
        return Err(TitleTrackerError::InvalidConfig {
            reason: format!("max title length cannot be greater than {MAX_TITLE_LENGTH_LIMIT}"),
        });
    }
    Ok(length)
}

#[derive(Debug, Clone)]
pub struct TitleTrackerConfig {
    /// Display to connect to; `None` uses `$DISPLAY`.
    pub display: Option<String>,
    /// Sleep between polls when tracking with a stop signal.
    pub poll_interval: Duration,
    /// Upper bound, in 32-bit units, for a single window name read.
    pub max_title_length: u32,
}

impl Default for TitleTrackerConfig {
    fn default() -> Self {
        Self {
            display: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_title_length: DEFAULT_MAX_TITLE_LENGTH,
        }
    }
}

#[bon]
impl TitleTrackerConfig {
    /// Creates a new title tracker configuration using the builder pattern.
    ///
    /// # Example
    ///
    /// ```
    /// use title_tracker_core::TitleTrackerConfig;
    /// use std::time::Duration;
    ///
    /// let config = TitleTrackerConfig::builder()
    ///     .display(":1")
    ///     .poll_interval(Duration::from_millis(50))
    ///     .unwrap()
    ///     .max_title_length(1024)
    ///     .unwrap()
    ///     .build();
    /// ```
    #[builder]
    pub fn new(
        #[builder(into)] display: Option<String>,
        #[builder(
            default = DEFAULT_POLL_INTERVAL,
            with = |interval: Duration| -> Result<_, TitleTrackerError> {
                validate_poll_interval(interval)
            },
        )]
        poll_interval: Duration,
        #[builder(
            default = DEFAULT_MAX_TITLE_LENGTH,
            with = |length: u32| -> Result<_, TitleTrackerError> {
                validate_max_title_length(length)
            },
        )]
        max_title_length: u32,
    ) -> Self {
        Self {
            display,
            poll_interval,
            max_title_length,
        }
    }
}

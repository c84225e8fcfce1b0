pub mod impl_title_tracker {
    use std::sync::atomic::AtomicBool;
    use title_tracker_core::{
        TitleTrackerConfig, TitleTrackerError, TitleTrackerResult, WindowChange,
    };

    /// Only X11 is supported; every entry point fails here.
    #[derive(Debug, Clone)]
    pub struct ImplTitleTracker {}

    impl ImplTitleTracker {
        pub fn new() -> Self {
            Self {}
        }

        pub fn track_changes<F>(
            &self,
            _on_change: F,
            _config: &TitleTrackerConfig,
        ) -> TitleTrackerResult<()>
        where
            F: FnMut(WindowChange) -> TitleTrackerResult<()>,
        {
            Err(TitleTrackerError::Unsupported)
        }

        pub fn track_changes_with_stop<F>(
            &self,
            _on_change: F,
            _stop_signal: &AtomicBool,
            _config: &TitleTrackerConfig,
        ) -> TitleTrackerResult<()>
        where
            F: FnMut(WindowChange) -> TitleTrackerResult<()>,
        {
            Err(TitleTrackerError::Unsupported)
        }
    }
}

use crate::platform::impl_title_tracker::ImplTitleTracker;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc,
};
use std::thread::JoinHandle;
use title_tracker_core::{TitleTrackerConfig, TitleTrackerError, TitleTrackerResult, WindowChange};

#[derive(Debug, Clone)]
pub struct TitleTracker {
    impl_title_tracker: ImplTitleTracker,
    config: TitleTrackerConfig,
}

impl TitleTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TitleTrackerConfig::default())
    }

    #[must_use]
    pub fn with_config(config: TitleTrackerConfig) -> Self {
        Self {
            impl_title_tracker: ImplTitleTracker::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TitleTrackerConfig {
        &self.config
    }
}

impl Default for TitleTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleTracker {
    /// Reports the active window once, then calls `on_change` every time the
    /// active window or its title changes.
    ///
    /// This method blocks the calling thread indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if the display connection fails or the callback
    /// returns an error.
    pub fn track_changes<F>(&self, on_change: F) -> TitleTrackerResult<()>
    where
        F: FnMut(WindowChange) -> TitleTrackerResult<()>,
    {
        self.impl_title_tracker.track_changes(on_change, &self.config)
    }

    /// Tracks changes until `stop_signal` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the display connection fails or the callback
    /// returns an error.
    pub fn track_changes_with_stop<F>(
        &self,
        on_change: F,
        stop_signal: &AtomicBool,
    ) -> TitleTrackerResult<()>
    where
        F: FnMut(WindowChange) -> TitleTrackerResult<()>,
    {
        self.impl_title_tracker
            .track_changes_with_stop(on_change, stop_signal, &self.config)
    }

    /// Spawns a background thread that tracks changes and sends them
    /// through a channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the background thread cannot be spawned.
    pub fn subscribe_changes(&self) -> TitleTrackerResult<ChangeSubscription> {
        let (sender, receiver) = mpsc::channel();
        let stop_signal = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop_signal);

        let tracker = self.clone();

        let handle = std::thread::Builder::new()
            .name("title-tracker".into())
            .spawn(move || {
                let result = tracker.track_changes_with_stop(
                    move |change: WindowChange| -> TitleTrackerResult<()> {
                        sender
                            .send(change)
                            .map_err(|_| TitleTrackerError::ChannelClosed)
                    },
                    &thread_stop,
                );
                if let Err(e) = result {
                    tracing::info!("Title tracking thread stopped: {e}");
                }
            })
            .map_err(|e| {
                TitleTrackerError::platform_with_source("failed to spawn title tracking thread", e)
            })?;

        Ok(ChangeSubscription {
            receiver,
            stop_signal,
            handle: Some(handle),
        })
    }
}

/// A handle to a running background subscription.
///
/// The tracking thread is signalled to stop and joined when the
/// subscription is dropped.
pub struct ChangeSubscription {
    receiver: mpsc::Receiver<WindowChange>,
    stop_signal: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ChangeSubscription {
    #[must_use]
    pub fn receiver(&self) -> &mpsc::Receiver<WindowChange> {
        &self.receiver
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop_signal.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::info!("Title tracking thread panicked");
        }
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ChangeSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeSubscription")
            .field("stopped", &self.stop_signal.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

use crate::{
    active_window::observe_active_window,
    notifier::{ProcessRegistry, notify},
    title::resolve_title,
    window_server::{PropertyKind, WindowEvent, WindowServer},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use title_tracker_core::{TitleTrackerResult, TrackedState, WindowChange};

/// Owns the tracked window state and turns protocol events into change
/// notifications.
pub struct EventDispatcher<'a, S: ?Sized, R, F> {
    server: &'a S,
    registry: R,
    on_change: F,
    state: TrackedState,
}

impl<'a, S, R, F> EventDispatcher<'a, S, R, F>
where
    S: WindowServer + ?Sized,
    R: ProcessRegistry,
    F: FnMut(WindowChange) -> TitleTrackerResult<()>,
{
    pub fn new(server: &'a S, registry: R, on_change: F) -> Self {
        Self {
            server,
            registry,
            on_change,
            state: TrackedState::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &TrackedState {
        &self.state
    }

    /// Loads whatever window is active right now and reports it once,
    /// changed or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or the callback returns an error.
    pub fn prime(&mut self) -> TitleTrackerResult<()> {
        self.state.checkpoint();
        let (active, _) = observe_active_window(self.server, &mut self.state.current)?;
        resolve_title(self.server, &mut self.state.current, active)?;
        tracing::info!("Initial window: {}", self.state.current);
        self.emit()
    }

    /// Handles one event. Returns whether it produced a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or the callback returns an error.
    pub fn dispatch(&mut self, event: WindowEvent) -> TitleTrackerResult<bool> {
        let WindowEvent::PropertyChanged { property, .. } = event else {
            return Ok(false);
        };

        let changed = match property {
            PropertyKind::ActiveWindow => {
                self.state.checkpoint();
                let (active, focus_changed) =
                    observe_active_window(self.server, &mut self.state.current)?;
                // A switch only counts once the new window's title differs.
                focus_changed
                    && resolve_title(self.server, &mut self.state.current, active)?.1
            }
            PropertyKind::Name(_) => {
                self.state.checkpoint();
                let current = self.state.current.id;
                resolve_title(self.server, &mut self.state.current, current)?.1
            }
            PropertyKind::Other => false,
        };

        if changed {
            self.emit()?;
        }
        Ok(changed)
    }

    /// Primes, then blocks on events until the connection fails or the
    /// callback returns an error.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the loop.
    pub fn run(&mut self) -> TitleTrackerResult<()> {
        self.prime()?;
        loop {
            let event = self.server.wait_for_event()?;
            self.dispatch(event)?;
        }
    }

    /// Like [`run`](Self::run) but polls, sleeping `poll_interval` while the
    /// queue is empty, and returns once `stop_signal` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or the callback returns an error.
    pub fn run_with_stop(
        &mut self,
        stop_signal: &AtomicBool,
        poll_interval: Duration,
    ) -> TitleTrackerResult<()> {
        self.prime()?;
        while !stop_signal.load(Ordering::Acquire) {
            match self.server.poll_for_event()? {
                Some(event) => {
                    self.dispatch(event)?;
                }
                None => std::thread::sleep(poll_interval),
            }
        }
        tracing::info!("Stop signal received, leaving event loop");
        Ok(())
    }

    fn emit(&mut self) -> TitleTrackerResult<()> {
        notify(&self.registry, &self.state, &mut self.on_change)
    }
}

impl<S: ?Sized, R, F> std::fmt::Debug for EventDispatcher<'_, S, R, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Tracks changes on any [`WindowServer`], reporting them to `on_change`.
///
/// # Errors
///
/// Returns the error that ended the loop.
pub fn track_changes_with<S, R, F>(server: &S, registry: R, on_change: F) -> TitleTrackerResult<()>
where
    S: WindowServer + ?Sized,
    R: ProcessRegistry,
    F: FnMut(WindowChange) -> TitleTrackerResult<()>,
{
    EventDispatcher::new(server, registry, on_change).run()
}

use super::xorg_window_server::XorgWindowServer;
use crate::{EventDispatcher, SysinfoProcessRegistry};
use std::env::var_os;
use std::sync::atomic::AtomicBool;
use title_tracker_core::{TitleTrackerConfig, TitleTrackerError, TitleTrackerResult, WindowChange};

#[derive(Debug, Clone)]
pub struct ImplTitleTracker {}

impl ImplTitleTracker {
    pub fn new() -> Self {
        Self {}
    }
}

/// Checks `XDG_SESSION_TYPE` (case-insensitive) and `WAYLAND_DISPLAY`.
fn wayland_detect() -> bool {
    let is_wayland_session = var_os("XDG_SESSION_TYPE")
        .is_some_and(|v| v.to_string_lossy().eq_ignore_ascii_case("wayland"));

    let has_wayland_display = var_os("WAYLAND_DISPLAY").is_some_and(|v| !v.is_empty());

    is_wayland_session || has_wayland_display
}

/// A missing X display on a Wayland session means the platform is not
/// supported rather than misconfigured.
fn qualify_x11_error(err: TitleTrackerError) -> TitleTrackerError {
    if matches!(err, TitleTrackerError::NoDisplay) && wayland_detect() {
        TitleTrackerError::Unsupported
    } else {
        err
    }
}

fn connect(config: &TitleTrackerConfig) -> TitleTrackerResult<XorgWindowServer> {
    XorgWindowServer::connect(config).map_err(qualify_x11_error)
}

impl ImplTitleTracker {
    pub fn track_changes<F>(&self, on_change: F, config: &TitleTrackerConfig) -> TitleTrackerResult<()>
    where
        F: FnMut(WindowChange) -> TitleTrackerResult<()>,
    {
        let server = connect(config)?;
        EventDispatcher::new(&server, SysinfoProcessRegistry, on_change).run()
    }

    pub fn track_changes_with_stop<F>(
        &self,
        on_change: F,
        stop_signal: &AtomicBool,
        config: &TitleTrackerConfig,
    ) -> TitleTrackerResult<()>
    where
        F: FnMut(WindowChange) -> TitleTrackerResult<()>,
    {
        let server = connect(config)?;
        EventDispatcher::new(&server, SysinfoProcessRegistry, on_change)
            .run_with_stop(stop_signal, config.poll_interval)
    }
}

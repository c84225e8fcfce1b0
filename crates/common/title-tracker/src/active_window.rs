use crate::{
    guard::with_window,
    window_server::{WindowHandle, WindowServer},
};
use title_tracker_core::{TitleTrackerResult, WindowId, WindowState};

/// Reads the active window and, when it differs from `state.id`, moves the
/// property-change subscription from the old window to the new one.
///
/// Returns the active window id and whether it changed.
pub fn observe_active_window<S: WindowServer + ?Sized>(
    server: &S,
    state: &mut WindowState,
) -> TitleTrackerResult<(Option<WindowId>, bool)> {
    let active = server.active_window()?;
    if active == state.id {
        return Ok((active, false));
    }

    with_window(server, state.id, |old| {
        if let Some(old) = old {
            set_property_events(server, old, false);
        }
        Ok(())
    })?;

    tracing::debug!("Active window changed from {:?} to {:?}", state.id, active);
    state.id = active;

    with_window(server, active, |new| {
        if let Some(new) = new {
            set_property_events(server, new, true);
        }
        Ok(())
    })?;

    Ok((active, true))
}

fn set_property_events<S: WindowServer + ?Sized>(server: &S, window: &WindowHandle, enabled: bool) {
    if let Err(e) = server.set_property_events(window, enabled) {
        let action = if enabled { "add" } else { "remove" };
        tracing::debug!("Failed to {action} monitoring on window {}: {e}", window.id());
    }
}

use crate::{
    guard::with_window,
    window_server::{NameProperty, WindowHandle, WindowName, WindowServer},
};
use title_tracker_core::{TitleTrackerResult, WindowId, WindowState};

/// Title used when `_NET_WM_NAME` holds bytes that are not valid UTF-8.
pub const UNDECODABLE_TITLE: &str = "<could not decode characters>";
/// Title used when a window sets neither name property.
pub const UNNAMED_TITLE: &str = "<unnamed window>";

enum Observation {
    Gone,
    Unchanged,
    Changed { title: String, pid: Option<u32> },
}

/// Resolves the title of `id` and stores it in `state` when it differs from
/// the stored one. The stored pid is refreshed together with the title.
///
/// A window that is gone counts as having no title; the stored pid is left
/// alone in that case. With no active window at all (`id` is `None`) the pid
/// is cleared too, so `title` and `pid` never outlive `id`.
///
/// Returns the stored title and whether it changed.
pub fn resolve_title<S: WindowServer + ?Sized>(
    server: &S,
    state: &mut WindowState,
    id: Option<WindowId>,
) -> TitleTrackerResult<(Option<String>, bool)> {
    let Some(id) = id else {
        let changed = state.title.is_some();
        state.title = None;
        state.pid = None;
        return Ok((None, changed));
    };

    let observation = with_window(server, Some(id), |window| {
        let Some(window) = window else {
            return Ok(Observation::Gone);
        };

        let title = match read_title(server, window) {
            Ok(title) => title,
            Err(e) if e.is_invalid_window() => {
                tracing::debug!("Window {id} vanished while reading its title");
                return Ok(Observation::Gone);
            }
            Err(e) => return Err(e),
        };

        if state.title.as_deref() == Some(title.as_str()) {
            return Ok(Observation::Unchanged);
        }

        let pid = read_pid(server, window)?;
        Ok(Observation::Changed { title, pid })
    })?;

    let changed = match observation {
        Observation::Gone => state.title.take().is_some(),
        Observation::Unchanged => false,
        Observation::Changed { title, pid } => {
            tracing::debug!("Title of window {id} is now {title:?}");
            state.title = Some(title);
            state.pid = pid;
            true
        }
    };

    Ok((state.title.clone(), changed))
}

/// Decodes a name payload. Only UTF-8 can fail; legacy names are read as
/// ISO-8859-1, which maps every byte to a character.
pub fn decode_name(name: &WindowName) -> Option<String> {
    match name {
        WindowName::Utf8(bytes) => std::str::from_utf8(bytes).ok().map(str::to_owned),
        WindowName::Legacy(bytes) => Some(bytes.iter().copied().map(char::from).collect()),
    }
}

fn read_name<S: WindowServer + ?Sized>(
    server: &S,
    window: &WindowHandle,
    property: NameProperty,
) -> TitleTrackerResult<Option<WindowName>> {
    Ok(server
        .window_name(window, property)?
        .filter(|name| !name.bytes().is_empty()))
}

fn read_title<S: WindowServer + ?Sized>(
    server: &S,
    window: &WindowHandle,
) -> TitleTrackerResult<String> {
    let name = match read_name(server, window, NameProperty::Utf8)? {
        Some(name) => Some(name),
        None => read_name(server, window, NameProperty::Legacy)?,
    };

    let title = match name {
        Some(name) => match decode_name(&name) {
            Some(title) => return Ok(title),
            None => UNDECODABLE_TITLE,
        },
        None => UNNAMED_TITLE,
    };

    Ok(format!("{title} (XID: {})", window.id()))
}

fn read_pid<S: WindowServer + ?Sized>(
    server: &S,
    window: &WindowHandle,
) -> TitleTrackerResult<Option<u32>> {
    match server.window_pid(window) {
        Ok(Some(pid)) => Ok(Some(pid)),
        Ok(None) => {
            tracing::warn!("Window {} does not advertise a pid", window.id());
            Ok(None)
        }
        Err(e) if e.is_invalid_window() => {
            tracing::warn!("Window {} vanished before its pid was read", window.id());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

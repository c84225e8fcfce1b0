use crate::window_server::{WindowHandle, WindowServer};
use title_tracker_core::{TitleTrackerResult, WindowId};

/// Keeps a window open for one scope and releases it on every exit path.
struct WindowGuard<'a, S: WindowServer + ?Sized> {
    server: &'a S,
    handle: WindowHandle,
}

impl<S: WindowServer + ?Sized> Drop for WindowGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.server.release_window(&self.handle) {
            tracing::debug!("Failed to release window {}: {e}", self.handle.id());
        }
    }
}

fn acquire<S: WindowServer + ?Sized>(
    server: &S,
    id: WindowId,
) -> TitleTrackerResult<Option<WindowGuard<'_, S>>> {
    match server.open_window(id) {
        Ok(()) => Ok(Some(WindowGuard {
            server,
            handle: WindowHandle::new(id),
        })),
        Err(e) if e.is_invalid_window() => {
            tracing::debug!("Window {id} is gone, continuing without a handle");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Runs `f` with a handle for `id`, or with `None` if there is no id or the
/// window no longer exists.
///
/// The handle is released once `f` returns, whether or not it succeeded.
/// Errors other than a missing window are propagated untouched.
pub fn with_window<S, F, R>(server: &S, id: Option<WindowId>, f: F) -> TitleTrackerResult<R>
where
    S: WindowServer + ?Sized,
    F: FnOnce(Option<&WindowHandle>) -> TitleTrackerResult<R>,
{
    let guard = match id {
        Some(id) => acquire(server, id)?,
        None => None,
    };

    f(guard.as_ref().map(|guard| &guard.handle))
}

//! The slice of a windowing protocol client the tracker depends on.
//!
//! The X11 implementation lives in the platform module; tests drive the
//! tracker through in-memory implementations of [`WindowServer`].

use title_tracker_core::{TitleTrackerResult, WindowId};

/// Which of the two name properties a read targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameProperty {
    /// `_NET_WM_NAME`, always UTF-8.
    Utf8,
    /// `WM_NAME`, in whatever single-byte encoding the client chose.
    Legacy,
}

/// Raw payload of a name property, tagged with the encoding it was read as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowName {
    Utf8(Vec<u8>),
    Legacy(Vec<u8>),
}

impl WindowName {
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match self {
            WindowName::Utf8(bytes) | WindowName::Legacy(bytes) => bytes,
        }
    }
}

/// The property a property-change notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    ActiveWindow,
    Name(NameProperty),
    Other,
}

/// A protocol event after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    PropertyChanged {
        window: WindowId,
        property: PropertyKind,
    },
    Other,
}

/// A live reference to a window, only obtainable through
/// [`with_window`](crate::with_window) and only valid inside that call.
#[derive(Debug, PartialEq, Eq)]
pub struct WindowHandle {
    id: WindowId,
}

impl WindowHandle {
    pub(crate) fn new(id: WindowId) -> Self {
        Self { id }
    }

    #[must_use]
    pub fn id(&self) -> WindowId {
        self.id
    }
}

/// Connection to a window server.
///
/// Calls that touch a window which no longer exists must fail with
/// [`TitleTrackerError::InvalidWindow`](title_tracker_core::TitleTrackerError::InvalidWindow);
/// any other error is treated as a lost connection.
pub trait WindowServer {
    /// Reads the root window's active-window property.
    fn active_window(&self) -> TitleTrackerResult<Option<WindowId>>;

    /// Checks that `id` still names a live window.
    fn open_window(&self, id: WindowId) -> TitleTrackerResult<()>;

    /// Called once when the scope that opened `window` ends.
    fn release_window(&self, window: &WindowHandle) -> TitleTrackerResult<()>;

    /// Turns property-change notifications for `window` on or off.
    fn set_property_events(&self, window: &WindowHandle, enabled: bool)
    -> TitleTrackerResult<()>;

    /// Reads one of the name properties. Missing or empty values are `None`.
    fn window_name(
        &self,
        window: &WindowHandle,
        property: NameProperty,
    ) -> TitleTrackerResult<Option<WindowName>>;

    /// Reads the process id the window advertises.
    fn window_pid(&self, window: &WindowHandle) -> TitleTrackerResult<Option<u32>>;

    /// Blocks until the next event arrives.
    fn wait_for_event(&self) -> TitleTrackerResult<WindowEvent>;

    /// Returns the next queued event without blocking.
    fn poll_for_event(&self) -> TitleTrackerResult<Option<WindowEvent>>;
}

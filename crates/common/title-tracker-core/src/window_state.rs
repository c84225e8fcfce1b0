use std::fmt;

/// Raw numeric id of a window as reported by the window server.
///
/// An id is only a name: the window it refers to may be destroyed at any
/// moment, so it carries no guarantee that the window still exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u32);

impl WindowId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for WindowId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What is known about the focused window.
///
/// `title` and `pid` are only ever filled in while `id` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowState {
    /// Id of the window holding focus.
    pub id: Option<WindowId>,
    /// Display name of that window.
    pub title: Option<String>,
    /// Process id advertised by that window.
    pub pid: Option<u32>,
}

impl fmt::Display for WindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id.map(|id| id.to_string());
        let pid = self.pid.map(|pid| pid.to_string());
        write!(
            f,
            "{{id: {}, title: {}, pid: {}}}",
            id.as_deref().unwrap_or("none"),
            self.title.as_deref().unwrap_or("none"),
            pid.as_deref().unwrap_or("none"),
        )
    }
}

/// The current window state plus the snapshot taken right before it was last
/// modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedState {
    pub current: WindowState,
    pub previous: WindowState,
}

impl TrackedState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies `current` into `previous`. Called before any field of
    /// `current` is touched for a new event.
    pub fn checkpoint(&mut self) {
        self.previous.clone_from(&self.current);
    }
}

/// Payload handed to the change callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowChange {
    /// `true` when the process behind the previously tracked window is gone.
    pub closed: bool,
    /// The window state after the change.
    pub window: WindowState,
}

pub use title_tracker_core::*;

mod active_window;
mod dispatcher;
mod guard;
mod notifier;
mod title;
mod title_tracker;
mod window_server;

#[cfg(test)]
mod test_support;

pub use active_window::observe_active_window;
pub use dispatcher::{EventDispatcher, track_changes_with};
pub use guard::with_window;
pub use notifier::{ProcessRegistry, SysinfoProcessRegistry, notify, print_change};
pub use title::{UNDECODABLE_TITLE, UNNAMED_TITLE, decode_name, resolve_title};
pub use title_tracker::*;
pub use window_server::{
    NameProperty, PropertyKind, WindowEvent, WindowHandle, WindowName, WindowServer,
};

#[cfg(target_os = "linux")]
#[path = "linux/mod.rs"]
mod platform;

#[cfg(not(target_os = "linux"))]
#[path = "unsupported/mod.rs"]
mod platform;

#[cfg(target_os = "linux")]
pub use platform::xorg_window_server::XorgWindowServer;

/// Subscribe to window changes and receive them via a channel.
/// Creates a [`TitleTracker`] with the default config and subscribes to it.
pub fn subscribe_changes() -> TitleTrackerResult<ChangeSubscription> {
    let tracker = TitleTracker::new();
    tracker.subscribe_changes()
}

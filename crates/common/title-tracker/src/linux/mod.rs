pub mod impl_title_tracker;
pub mod xorg_window_server;

use crate::{NameProperty, PropertyKind, WindowEvent, WindowHandle, WindowName, WindowServer};
use title_tracker_core::{TitleTrackerConfig, TitleTrackerError, TitleTrackerResult, WindowId};
use x11rb::{
    connection::Connection,
    errors::ReplyError,
    protocol::{
        ErrorKind, Event,
        xproto::{
            Atom, AtomEnum, ChangeWindowAttributesAux, ConnectionExt, EventMask,
            GetPropertyReply, PropertyNotifyEvent, Window,
        },
    },
    rust_connection::RustConnection,
};

#[derive(Debug, Clone, Copy)]
struct X11Atoms {
    net_active_window: Atom,
    net_wm_name: Atom,
    wm_name: Atom,
    net_wm_pid: Atom,
}

impl X11Atoms {
    fn property_kind(&self, atom: Atom) -> PropertyKind {
        if atom == self.net_active_window {
            PropertyKind::ActiveWindow
        } else if atom == self.net_wm_name {
            PropertyKind::Name(NameProperty::Utf8)
        } else if atom == self.wm_name {
            PropertyKind::Name(NameProperty::Legacy)
        } else {
            PropertyKind::Other
        }
    }

    fn name_atom(&self, property: NameProperty) -> Atom {
        match property {
            NameProperty::Utf8 => self.net_wm_name,
            NameProperty::Legacy => self.wm_name,
        }
    }
}

/// [`WindowServer`] speaking X11 through `x11rb`.
pub struct XorgWindowServer {
    conn: RustConnection,
    root: Window,
    atoms: X11Atoms,
    max_title_length: u32,
}

impl XorgWindowServer {
    /// Connects to the configured display and starts listening for
    /// property changes on its root window.
    ///
    /// # Errors
    ///
    /// Returns [`TitleTrackerError::NoDisplay`] if no display can be reached,
    /// or a platform error if the initial requests fail.
    pub fn connect(config: &TitleTrackerConfig) -> TitleTrackerResult<Self> {
        let (conn, screen_num) = connect_to_x11(config.display.as_deref())?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| TitleTrackerError::platform(format!("no screen {screen_num}")))?;

        let atoms = setup_atoms(&conn)?;
        setup_root_window_monitoring(&conn, root)?;
        tracing::info!("Connected to X11, watching root window {root}");

        Ok(Self {
            conn,
            root,
            atoms,
            max_title_length: config.max_title_length,
        })
    }

    #[must_use]
    pub fn root(&self) -> WindowId {
        WindowId::new(self.root)
    }

    fn get_property(
        &self,
        window: Window,
        property: Atom,
        property_type: impl Into<Atom>,
        length: u32,
    ) -> TitleTrackerResult<GetPropertyReply> {
        self.conn
            .get_property(false, window, property, property_type, 0, length)
            .map_err(|e| TitleTrackerError::platform_with_source("failed to get window property", e))?
            .reply()
            .map_err(|e| reply_error(window, "failed to get window property reply", e))
    }

    fn classify(&self, event: Event) -> WindowEvent {
        match event {
            Event::PropertyNotify(PropertyNotifyEvent { atom, window, .. }) => {
                WindowEvent::PropertyChanged {
                    window: WindowId::new(window),
                    property: self.atoms.property_kind(atom),
                }
            }
            Event::Error(e) => {
                tracing::debug!("Ignoring X11 error event: {e:?}");
                WindowEvent::Other
            }
            _ => WindowEvent::Other,
        }
    }
}

impl std::fmt::Debug for XorgWindowServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XorgWindowServer")
            .field("root", &self.root)
            .field("atoms", &self.atoms)
            .finish_non_exhaustive()
    }
}

impl WindowServer for XorgWindowServer {
    fn active_window(&self) -> TitleTrackerResult<Option<WindowId>> {
        let reply = self.get_property(
            self.root,
            self.atoms.net_active_window,
            AtomEnum::WINDOW,
            1,
        )?;

        Ok(reply
            .value32()
            .and_then(|mut v| v.next())
            .filter(|&id| id != 0)
            .map(WindowId::new))
    }

    fn open_window(&self, id: WindowId) -> TitleTrackerResult<()> {
        self.conn
            .get_window_attributes(id.as_raw())
            .map_err(|e| {
                TitleTrackerError::platform_with_source("failed to query window attributes", e)
            })?
            .reply()
            .map_err(|e| reply_error(id.as_raw(), "failed to get window attributes reply", e))?;
        Ok(())
    }

    fn release_window(&self, _window: &WindowHandle) -> TitleTrackerResult<()> {
        self.conn
            .flush()
            .map_err(|e| TitleTrackerError::platform_with_source("failed to flush X11 connection", e))
    }

    fn set_property_events(&self, window: &WindowHandle, enabled: bool) -> TitleTrackerResult<()> {
        let event_mask = if enabled {
            EventMask::PROPERTY_CHANGE
        } else {
            EventMask::NO_EVENT
        };

        self.conn
            .change_window_attributes(
                window.id().as_raw(),
                &ChangeWindowAttributesAux::new().event_mask(event_mask),
            )
            .map_err(|e| {
                TitleTrackerError::platform_with_source("failed to change window event mask", e)
            })?;
        Ok(())
    }

    fn window_name(
        &self,
        window: &WindowHandle,
        property: NameProperty,
    ) -> TitleTrackerResult<Option<WindowName>> {
        let reply = self.get_property(
            window.id().as_raw(),
            self.atoms.name_atom(property),
            AtomEnum::ANY,
            self.max_title_length,
        )?;

        if reply.value_len == 0 {
            return Ok(None);
        }

        let mut value = reply.value;
        if reply.bytes_after > 0 {
            tracing::debug!(
                "Name of window {} cut at {} bytes, {} more not read",
                window.id(),
                value.len(),
                reply.bytes_after
            );
            if property == NameProperty::Utf8 {
                trim_incomplete_utf8(&mut value);
            }
        }

        Ok(Some(match property {
            NameProperty::Utf8 => WindowName::Utf8(value),
            NameProperty::Legacy => WindowName::Legacy(value),
        }))
    }

    fn window_pid(&self, window: &WindowHandle) -> TitleTrackerResult<Option<u32>> {
        let reply = self.get_property(
            window.id().as_raw(),
            self.atoms.net_wm_pid,
            AtomEnum::CARDINAL,
            1,
        )?;

        Ok(reply.value32().and_then(|mut v| v.next()))
    }

    fn wait_for_event(&self) -> TitleTrackerResult<WindowEvent> {
        let event = self
            .conn
            .wait_for_event()
            .map_err(|e| TitleTrackerError::platform_with_source("X11 connection lost", e))?;
        Ok(self.classify(event))
    }

    fn poll_for_event(&self) -> TitleTrackerResult<Option<WindowEvent>> {
        let event = self
            .conn
            .poll_for_event()
            .map_err(|e| TitleTrackerError::platform_with_source("X11 connection lost", e))?;
        Ok(event.map(|event| self.classify(event)))
    }
}

/// Drops a multi-byte sequence left unfinished by a length-capped read.
/// Bytes that are invalid for any other reason are kept.
fn trim_incomplete_utf8(bytes: &mut Vec<u8>) {
    let complete_len = std::str::from_utf8(bytes)
        .err()
        .filter(|e| e.error_len().is_none())
        .map(|e| e.valid_up_to());
    if let Some(len) = complete_len {
        bytes.truncate(len);
    }
}

/// A `Window` error means the window is gone; everything else is fatal.
fn reply_error(window: Window, message: &str, err: ReplyError) -> TitleTrackerError {
    match err {
        ReplyError::X11Error(ref x11) if x11.error_kind == ErrorKind::Window => {
            TitleTrackerError::InvalidWindow(WindowId::new(window))
        }
        err => TitleTrackerError::platform_with_source(message, err),
    }
}

fn connect_to_x11(display: Option<&str>) -> TitleTrackerResult<(RustConnection, usize)> {
    RustConnection::connect(display).map_err(|e| {
        let error_str = e.to_string();
        if error_str.contains("DISPLAY")
            || error_str.contains("display")
            || error_str.contains("No such file or directory")
        {
            TitleTrackerError::NoDisplay
        } else {
            TitleTrackerError::platform_with_source("failed to connect to X11", e)
        }
    })
}

fn setup_atoms<C: Connection>(conn: &C) -> TitleTrackerResult<X11Atoms> {
    Ok(X11Atoms {
        net_active_window: get_atom(conn, b"_NET_ACTIVE_WINDOW")?,
        net_wm_name: get_atom(conn, b"_NET_WM_NAME")?,
        wm_name: AtomEnum::WM_NAME.into(),
        net_wm_pid: get_atom(conn, b"_NET_WM_PID")?,
    })
}

fn get_atom<C: Connection>(conn: &C, name: &[u8]) -> TitleTrackerResult<Atom> {
    let cookie = conn
        .intern_atom(false, name)
        .map_err(|e| TitleTrackerError::platform_with_source("failed to intern atom", e))?;

    let reply = cookie
        .reply()
        .map_err(|e| TitleTrackerError::platform_with_source("failed to get atom reply", e))?;

    Ok(reply.atom)
}

fn setup_root_window_monitoring<C: Connection>(conn: &C, root: Window) -> TitleTrackerResult<()> {
    conn.change_window_attributes(
        root,
        &ChangeWindowAttributesAux::new().event_mask(EventMask::PROPERTY_CHANGE),
    )
    .map_err(|e| TitleTrackerError::platform_with_source("failed to monitor root window", e))?;

    conn.flush().map_err(|e| {
        TitleTrackerError::platform_with_source("failed to flush after root window monitoring", e)
    })?;

    Ok(())
}

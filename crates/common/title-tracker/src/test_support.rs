//! In-memory window server and process registry for unit tests.

use crate::{
    NameProperty, ProcessRegistry, PropertyKind, WindowEvent, WindowHandle, WindowName,
    WindowServer,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use title_tracker_core::{TitleTrackerError, TitleTrackerResult, WindowId};

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeWindow {
    pub utf8_name: Option<Vec<u8>>,
    pub legacy_name: Option<Vec<u8>>,
    pub pid: Option<u32>,
}

impl FakeWindow {
    pub fn named(title: &str, pid: u32) -> Self {
        Self {
            utf8_name: Some(title.as_bytes().to_vec()),
            legacy_name: None,
            pid: Some(pid),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeWindowServer {
    active: Cell<Option<u32>>,
    windows: RefCell<HashMap<u32, FakeWindow>>,
    subscribed: RefCell<HashSet<u32>>,
    events: RefCell<VecDeque<WindowEvent>>,
    released: RefCell<Vec<WindowId>>,
    open_calls: Cell<usize>,
    broken: Cell<bool>,
}

impl FakeWindowServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_window(&self, id: u32, window: FakeWindow) {
        self.windows.borrow_mut().insert(id, window);
    }

    pub fn destroy_window(&self, id: u32) {
        self.windows.borrow_mut().remove(&id);
        self.subscribed.borrow_mut().remove(&id);
    }

    pub fn rename(&self, id: u32, title: &str) {
        if let Some(window) = self.windows.borrow_mut().get_mut(&id) {
            window.utf8_name = Some(title.as_bytes().to_vec());
        }
    }

    pub fn set_active(&self, id: Option<u32>) {
        self.active.set(id);
    }

    pub fn push_event(&self, event: WindowEvent) {
        self.events.borrow_mut().push_back(event);
    }

    pub fn push_property_event(&self, window: u32, property: PropertyKind) {
        self.push_event(WindowEvent::PropertyChanged {
            window: WindowId::new(window),
            property,
        });
    }

    pub fn break_connection(&self) {
        self.broken.set(true);
    }

    pub fn is_subscribed(&self, id: u32) -> bool {
        self.subscribed.borrow().contains(&id)
    }

    pub fn released(&self) -> Vec<WindowId> {
        self.released.borrow().clone()
    }

    pub fn open_calls(&self) -> usize {
        self.open_calls.get()
    }

    fn check_connection(&self) -> TitleTrackerResult<()> {
        if self.broken.get() {
            return Err(TitleTrackerError::platform("connection closed"));
        }
        Ok(())
    }

    fn window(&self, id: WindowId) -> TitleTrackerResult<FakeWindow> {
        self.check_connection()?;
        self.windows
            .borrow()
            .get(&id.as_raw())
            .cloned()
            .ok_or(TitleTrackerError::InvalidWindow(id))
    }
}

impl WindowServer for FakeWindowServer {
    fn active_window(&self) -> TitleTrackerResult<Option<WindowId>> {
        self.check_connection()?;
        Ok(self.active.get().map(WindowId::new))
    }

    fn open_window(&self, id: WindowId) -> TitleTrackerResult<()> {
        self.open_calls.set(self.open_calls.get() + 1);
        self.window(id).map(|_| ())
    }

    fn release_window(&self, window: &WindowHandle) -> TitleTrackerResult<()> {
        self.released.borrow_mut().push(window.id());
        Ok(())
    }

    fn set_property_events(
        &self,
        window: &WindowHandle,
        enabled: bool,
    ) -> TitleTrackerResult<()> {
        self.window(window.id())?;
        let mut subscribed = self.subscribed.borrow_mut();
        if enabled {
            subscribed.insert(window.id().as_raw());
        } else {
            subscribed.remove(&window.id().as_raw());
        }
        Ok(())
    }

    fn window_name(
        &self,
        window: &WindowHandle,
        property: NameProperty,
    ) -> TitleTrackerResult<Option<WindowName>> {
        let window = self.window(window.id())?;
        Ok(match property {
            NameProperty::Utf8 => window.utf8_name.map(WindowName::Utf8),
            NameProperty::Legacy => window.legacy_name.map(WindowName::Legacy),
        })
    }

    fn window_pid(&self, window: &WindowHandle) -> TitleTrackerResult<Option<u32>> {
        Ok(self.window(window.id())?.pid)
    }

    fn wait_for_event(&self) -> TitleTrackerResult<WindowEvent> {
        self.check_connection()?;
        self.events
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| TitleTrackerError::platform("connection closed"))
    }

    fn poll_for_event(&self) -> TitleTrackerResult<Option<WindowEvent>> {
        self.check_connection()?;
        Ok(self.events.borrow_mut().pop_front())
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeProcessRegistry {
    alive: RefCell<HashSet<u32>>,
}

impl FakeProcessRegistry {
    pub fn with_alive(pids: &[u32]) -> Self {
        Self {
            alive: RefCell::new(pids.iter().copied().collect()),
        }
    }
}

impl ProcessRegistry for FakeProcessRegistry {
    fn exists(&self, pid: u32) -> bool {
        self.alive.borrow().contains(&pid)
    }
}

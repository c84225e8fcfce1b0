//! Common test utilities for title-tracker integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::env;
use title_tracker::{
    NameProperty, ProcessRegistry, PropertyKind, TitleTrackerError, TitleTrackerResult,
    WindowEvent, WindowHandle, WindowId, WindowName, WindowServer,
};

pub fn should_run_integration_tests() -> bool {
    env::var("INTEGRATION_TEST").unwrap_or_default() == "1"
}

/// A scripted window server. Each pushed step runs just before its event is
/// delivered, so tests can change the world between events.
#[derive(Default)]
pub struct ScriptedServer {
    active: Cell<Option<u32>>,
    titles: RefCell<HashMap<u32, String>>,
    pids: RefCell<HashMap<u32, u32>>,
    subscribed: RefCell<HashSet<u32>>,
    script: RefCell<VecDeque<(Box<dyn FnOnce(&ScriptedServer)>, WindowEvent)>>,
}

impl ScriptedServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_window(&self, id: u32, title: &str, pid: u32) {
        self.titles.borrow_mut().insert(id, title.to_owned());
        self.pids.borrow_mut().insert(id, pid);
    }

    pub fn destroy_window(&self, id: u32) {
        self.titles.borrow_mut().remove(&id);
        self.pids.borrow_mut().remove(&id);
        self.subscribed.borrow_mut().remove(&id);
    }

    pub fn set_title(&self, id: u32, title: &str) {
        self.titles.borrow_mut().insert(id, title.to_owned());
    }

    pub fn set_active(&self, id: Option<u32>) {
        self.active.set(id);
    }

    pub fn is_subscribed(&self, id: u32) -> bool {
        self.subscribed.borrow().contains(&id)
    }

    pub fn then<F>(&self, step: F, window: u32, property: PropertyKind)
    where
        F: FnOnce(&ScriptedServer) + 'static,
    {
        self.script.borrow_mut().push_back((
            Box::new(step),
            WindowEvent::PropertyChanged {
                window: WindowId::new(window),
                property,
            },
        ));
    }

    fn exists(&self, id: WindowId) -> TitleTrackerResult<()> {
        if self.titles.borrow().contains_key(&id.as_raw()) {
            Ok(())
        } else {
            Err(TitleTrackerError::InvalidWindow(id))
        }
    }
}

impl WindowServer for ScriptedServer {
    fn active_window(&self) -> TitleTrackerResult<Option<WindowId>> {
        Ok(self.active.get().map(WindowId::new))
    }

    fn open_window(&self, id: WindowId) -> TitleTrackerResult<()> {
        self.exists(id)
    }

    fn release_window(&self, _window: &WindowHandle) -> TitleTrackerResult<()> {
        Ok(())
    }

    fn set_property_events(&self, window: &WindowHandle, enabled: bool) -> TitleTrackerResult<()> {
        self.exists(window.id())?;
        let id = window.id().as_raw();
        if enabled {
            self.subscribed.borrow_mut().insert(id);
        } else {
            self.subscribed.borrow_mut().remove(&id);
        }
        Ok(())
    }

    fn window_name(
        &self,
        window: &WindowHandle,
        property: NameProperty,
    ) -> TitleTrackerResult<Option<WindowName>> {
        self.exists(window.id())?;
        Ok(match property {
            NameProperty::Utf8 => self
                .titles
                .borrow()
                .get(&window.id().as_raw())
                .map(|title| WindowName::Utf8(title.clone().into_bytes())),
            NameProperty::Legacy => None,
        })
    }

    fn window_pid(&self, window: &WindowHandle) -> TitleTrackerResult<Option<u32>> {
        self.exists(window.id())?;
        Ok(self.pids.borrow().get(&window.id().as_raw()).copied())
    }

    fn wait_for_event(&self) -> TitleTrackerResult<WindowEvent> {
        let next = self.script.borrow_mut().pop_front();
        match next {
            Some((step, event)) => {
                step(self);
                Ok(event)
            }
            None => Err(TitleTrackerError::platform("script finished")),
        }
    }

    fn poll_for_event(&self) -> TitleTrackerResult<Option<WindowEvent>> {
        match self.wait_for_event() {
            Ok(event) => Ok(Some(event)),
            Err(_) => Ok(None),
        }
    }
}

/// Process table where pids can be marked as exited.
#[derive(Default)]
pub struct Processes {
    alive: RefCell<HashSet<u32>>,
}

impl Processes {
    pub fn alive(pids: &[u32]) -> Self {
        Self {
            alive: RefCell::new(pids.iter().copied().collect()),
        }
    }

    pub fn exit(&self, pid: u32) {
        self.alive.borrow_mut().remove(&pid);
    }
}

impl ProcessRegistry for Processes {
    fn exists(&self, pid: u32) -> bool {
        self.alive.borrow().contains(&pid)
    }
}

use sysinfo::{Pid, ProcessesToUpdate, System};
use title_tracker_core::{TitleTrackerResult, TrackedState, WindowChange};

/// Answers whether a process is still running.
pub trait ProcessRegistry {
    fn exists(&self, pid: u32) -> bool;
}

impl<R: ProcessRegistry + ?Sized> ProcessRegistry for &R {
    fn exists(&self, pid: u32) -> bool {
        (**self).exists(pid)
    }
}

/// [`ProcessRegistry`] backed by the operating system's process table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoProcessRegistry;

impl ProcessRegistry for SysinfoProcessRegistry {
    fn exists(&self, pid: u32) -> bool {
        let mut system = System::new();
        let pid = Pid::from_u32(pid);
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        system.process(pid).is_some()
    }
}

/// Reports the current state to `on_change`, flagging whether the process
/// behind the previous state has exited.
///
/// Without a previous pid there is nothing that could have closed, so
/// `closed` is `false`.
pub fn notify<R, F>(registry: &R, state: &TrackedState, on_change: &mut F) -> TitleTrackerResult<()>
where
    R: ProcessRegistry + ?Sized,
    F: FnMut(WindowChange) -> TitleTrackerResult<()>,
{
    let closed = state
        .previous
        .pid
        .is_some_and(|pid| !registry.exists(pid));

    tracing::debug!(
        "Window change: closed={closed}, previous={}, current={}",
        state.previous,
        state.current
    );

    on_change(WindowChange {
        closed,
        window: state.current.clone(),
    })
}

/// Default change handler: prints whether the previous process closed, then
/// the new window state.
pub fn print_change(change: WindowChange) -> TitleTrackerResult<()> {
    println!("{}", change.closed);
    println!("{}", change.window);
    Ok(())
}

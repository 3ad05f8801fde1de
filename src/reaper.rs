// reaper.rs

use itertools::{Either, Itertools};
use nix::errno::Errno;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use tracing::{debug, warn};

/// Raised by the SIGCHLD handler, cleared by [`Reaper::reap`].
static CHILD_EXITED: AtomicBool = AtomicBool::new(false);
static INSTALL: Once = Once::new();

extern "C" fn on_sigchld(_signal: libc::c_int) {
    CHILD_EXITED.store(true, Ordering::SeqCst);
}

/// Installs the SIGCHLD handler. Only the first call does anything.
pub fn install() {
    INSTALL.call_once(|| {
        let action = SigAction::new(
            SigHandler::Handler(on_sigchld),
            SaFlags::SA_RESTART | SaFlags::SA_NOCLDSTOP,
            SigSet::empty(),
        );
        // The handler only touches an atomic, so it is async-signal-safe.
        if let Err(err) = unsafe { sigaction(Signal::SIGCHLD, &action) } {
            warn!(%err, "could not install SIGCHLD handler; background children are polled instead");
        }
    });
}

/// Background children the shell has launched but not yet collected.
///
/// Only pids in this list are ever waited on here, so the foreground wait in
/// the launcher never has its child's status taken from under it.
#[derive(Debug, Default)]
pub struct Reaper {
    children: Vec<Pid>,
}

impl Reaper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, pid: Pid) {
        self.children.push(pid);
    }

    pub fn outstanding(&self) -> usize {
        self.children.len()
    }

    /// True when a child has exited since the last poll.
    pub fn pending() -> bool {
        CHILD_EXITED.load(Ordering::SeqCst)
    }

    /// Collects every tracked child that has already terminated. Never blocks:
    /// children still running stay tracked. Returns how many were collected.
    pub fn reap(&mut self) -> usize {
        CHILD_EXITED.store(false, Ordering::SeqCst);
        let (done, running): (Vec<_>, Vec<_>) =
            self.children
                .drain(..)
                .partition_map(|pid| match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
                    Ok(WaitStatus::StillAlive) | Err(Errno::EINTR) => Either::Right(pid),
                    Ok(status) => Either::Left((pid, Some(status))),
                    // ECHILD: someone else already collected it.
                    Err(_) => Either::Left((pid, None)),
                });
        for (pid, status) in &done {
            debug!(pid = pid.as_raw(), ?status, "reaped background child");
        }
        self.children = running;
        done.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::unistd::{fork, ForkResult};
    use std::time::{Duration, Instant};

    fn spawn_exiting_child(delay: Duration) -> Pid {
        match unsafe { fork() }.expect("fork") {
            ForkResult::Child => {
                std::thread::sleep(delay);
                unsafe { libc::_exit(0) }
            }
            ForkResult::Parent { child } => child,
        }
    }

    #[test]
    fn reap_with_nothing_tracked_is_a_no_op() {
        let mut reaper = Reaper::new();
        assert_eq!(reaper.reap(), 0);
        assert_eq!(reaper.outstanding(), 0);
    }

    #[test]
    fn running_children_stay_tracked_and_do_not_block() {
        let mut reaper = Reaper::new();
        let pid = spawn_exiting_child(Duration::from_millis(500));
        reaper.track(pid);

        let started = Instant::now();
        assert_eq!(reaper.reap(), 0);
        assert!(started.elapsed() < Duration::from_millis(250));
        assert_eq!(reaper.outstanding(), 1);

        let _ = waitpid(pid, None);
    }

    #[test]
    fn finished_children_are_collected() {
        install();
        let mut reaper = Reaper::new();
        reaper.track(spawn_exiting_child(Duration::ZERO));
        reaper.track(spawn_exiting_child(Duration::ZERO));

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut collected = 0;
        while reaper.outstanding() > 0 && Instant::now() < deadline {
            collected += reaper.reap();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(collected, 2);
        assert_eq!(reaper.outstanding(), 0);
    }

    #[test]
    fn install_is_idempotent() {
        install();
        install();
    }
}

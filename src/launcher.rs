// launcher.rs

use crate::error::ShellError;
use crate::reaper::{self, Reaper};
use nix::errno::Errno;
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::sys::wait::waitpid;
use nix::unistd::{execvp, fork, write, ForkResult, Pid};
use std::ffi::CString;
use tracing::{debug, error};

/// A command ready to exec. Everything the child needs is allocated here,
/// before `fork`, so the child only makes async-signal-safe calls.
struct Prepared {
    program: CString,
    args: Vec<CString>,
    not_found: Vec<u8>,
    /// Foreground children take Ctrl-C; background ones keep ignoring it.
    restore_sigint: bool,
}

impl Prepared {
    /// `None` when `argv` is empty or an argument holds a NUL byte; neither
    /// can be exec'd.
    fn new(argv: &[String], raw_line: &str, background: bool) -> Option<Self> {
        let args = argv
            .iter()
            .map(|arg| CString::new(arg.as_str()).ok())
            .collect::<Option<Vec<_>>>()?;
        let program = args.first()?.clone();
        Some(Self {
            program,
            args,
            not_found: not_found_message(raw_line).into_bytes(),
            restore_sigint: !background,
        })
    }
}

pub fn not_found_message(raw_line: &str) -> String {
    format!("{raw_line}: command not found\n")
}

/// Runs `argv` and blocks until that child has terminated. Its exit status is
/// discarded.
pub fn run_foreground(argv: &[String], raw_line: &str) -> Result<(), ShellError> {
    let Some(child) = launch(argv, raw_line, false)? else {
        return Ok(());
    };
    loop {
        match waitpid(child, None) {
            Err(Errno::EINTR) => continue,
            Ok(status) => {
                debug!(pid = child.as_raw(), ?status, "foreground child finished");
                return Ok(());
            }
            Err(err) => {
                debug!(pid = child.as_raw(), %err, "foreground wait failed");
                return Ok(());
            }
        }
    }
}

/// Runs `argv` without waiting. The child is handed to `reaper`, which
/// collects it once it exits.
pub fn run_background(argv: &[String], raw_line: &str, reaper: &mut Reaper) -> Result<(), ShellError> {
    reaper::install();
    if let Some(child) = launch(argv, raw_line, true)? {
        debug!(pid = child.as_raw(), "started background child");
        reaper.track(child);
    }
    Ok(())
}

/// Ignores SIGINT in the interpreter. Foreground children put the default
/// back before exec; background children inherit the ignore.
pub fn ignore_interrupts() {
    if let Err(err) = unsafe { signal(Signal::SIGINT, SigHandler::SigIgn) } {
        debug!(%err, "could not ignore SIGINT");
    }
}

/// Forks and execs. `Ok(None)` means nothing was spawned because `argv`
/// could not be exec'd at all; the not-found message has been printed.
fn launch(argv: &[String], raw_line: &str, background: bool) -> Result<Option<Pid>, ShellError> {
    let Some(prepared) = Prepared::new(argv, raw_line, background) else {
        let _ = write(libc::STDOUT_FILENO, not_found_message(raw_line).as_bytes());
        return Ok(None);
    };
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            debug!(pid = child.as_raw(), program = argv[0].as_str(), "spawned child");
            Ok(Some(child))
        }
        Ok(ForkResult::Child) => exec_child(&prepared),
        Err(err) => {
            error!(%err, "fork failed");
            Err(ShellError::Fork(err))
        }
    }
}

fn exec_child(prepared: &Prepared) -> ! {
    if prepared.restore_sigint {
        unsafe {
            let _ = signal(Signal::SIGINT, SigHandler::SigDfl);
        }
    }
    let _ = execvp(&prepared.program, &prepared.args);
    let _ = write(libc::STDOUT_FILENO, &prepared.not_found);
    unsafe { libc::_exit(0) }
}

// dispatch.rs

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::history::RingStore;
use crate::launcher::{run_background, run_foreground};
use crate::reaper::Reaper;
use std::io::Write;

pub const HISTORY_BUILTIN: &str = "history";

/// Interpreter state: the command history, the background children, and the
/// stream the shell's own messages go to.
pub struct Shell<W: Write> {
    pub(crate) history: RingStore,
    pub(crate) reaper: Reaper,
    pub(crate) out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(config: &ShellConfig, out: W) -> Self {
        Self {
            history: RingStore::new(config.history_capacity),
            reaper: Reaper::new(),
            out,
        }
    }

    pub fn history(&self) -> &RingStore {
        &self.history
    }

    /// Routes one parsed command: the history built-in, or an external program
    /// run in the foreground or background. The line is recorded either way.
    pub fn execute(&mut self, argv: &[String], raw_line: &str, background: bool) -> Result<(), ShellError> {
        if raw_line == HISTORY_BUILTIN {
            return self.list_history();
        }
        // Children write straight to fd 1; ours has to land first.
        self.out.flush()?;
        if background {
            run_background(argv, raw_line, &mut self.reaper)?;
        } else {
            run_foreground(argv, raw_line)?;
        }
        self.history.insert(raw_line);
        Ok(())
    }

    /// Collects background children that have finished. Cheap when none have.
    pub fn reap_finished(&mut self) {
        if Reaper::pending() || self.reaper.outstanding() > 0 {
            self.reaper.reap();
        }
    }
}

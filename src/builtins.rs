// builtins.rs

use crate::dispatch::{Shell, HISTORY_BUILTIN};
use crate::error::ShellError;
use crate::parser::tokenize;
use crate::util::writeln_ignore_broken_pipe;
use std::io::Write;
use tracing::debug;

impl<W: Write> Shell<W> {
    /// `history`: records itself, then prints every entry oldest first.
    pub fn list_history(&mut self) -> Result<(), ShellError> {
        self.history.insert(HISTORY_BUILTIN);
        debug!(entries = self.history.len(), capacity = self.history.capacity(), "listing history");
        for entry in self.history.iter() {
            writeln_ignore_broken_pipe(&mut self.out, format!("       {} {}", entry.id, entry.text))?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// `!<id>`: re-parses the stored line and runs it as if freshly typed, which
    /// records it again under a new id. A missing id prints `event not found`.
    pub fn recall(&mut self, id: u64, raw_line: &str) -> Result<(), ShellError> {
        // Copied out: running it inserts into the ring and may overwrite the slot.
        let Some(text) = self.history.find_by_id(id).map(|entry| entry.text.clone()) else {
            debug!(id, "history recall miss");
            writeln_ignore_broken_pipe(&mut self.out, format!("{raw_line}: event not found"))?;
            self.out.flush()?;
            return Ok(());
        };
        debug!(id, text = text.as_str(), "history recall");
        let parsed = tokenize(&text);
        if parsed.is_empty() {
            return Ok(());
        }
        self.execute(&parsed.argv, &text, parsed.background)
    }
}

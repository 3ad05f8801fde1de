// repl.rs

use crate::config::ShellConfig;
use crate::dispatch::{Shell, HISTORY_BUILTIN};
use crate::error::ShellError;
use crate::launcher::ignore_interrupts;
use crate::parser::{parse_event_id, tokenize};
use crate::util::writeln_ignore_broken_pipe;
use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, BufRead, IsTerminal, Write};
use tracing::{debug, warn};

pub const EXIT_KEYWORD: &str = "exit";
const RECALL_SIGIL: char = '!';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Handles one input line, already stripped of its terminator.
pub fn eval_line<W: Write>(shell: &mut Shell<W>, line: &str, max_line_len: usize) -> Result<Flow, ShellError> {
    if line == EXIT_KEYWORD {
        return Ok(Flow::Exit);
    }
    if line.len() > max_line_len {
        let rejected = ShellError::LineTooLong { len: line.len(), max: max_line_len };
        warn!(len = line.len(), max = max_line_len, "discarded oversized input line");
        writeln_ignore_broken_pipe(&mut shell.out, rejected.to_string())?;
        shell.out.flush()?;
        return Ok(Flow::Continue);
    }
    if line == HISTORY_BUILTIN {
        shell.list_history()?;
        return Ok(Flow::Continue);
    }
    let parsed = tokenize(line);
    match parsed.argv.first() {
        None => {}
        Some(first) if first.starts_with(RECALL_SIGIL) => {
            shell.recall(parse_event_id(first), line)?;
        }
        Some(_) => shell.execute(&parsed.argv, line, parsed.background)?,
    }
    Ok(Flow::Continue)
}

/// Where lines come from. Line editing only makes sense on a terminal; piped
/// input is read directly so the prompt is still written before every read.
enum Input {
    Editor(DefaultEditor),
    Piped(io::StdinLock<'static>),
}

impl Input {
    fn open() -> anyhow::Result<Self> {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            let rl = DefaultEditor::new().context("failed to set up line editing")?;
            Ok(Input::Editor(rl))
        } else {
            Ok(Input::Piped(stdin.lock()))
        }
    }

    fn read_line<W: Write>(&mut self, prompt: &str, out: &mut W) -> Result<String, ReadlineError> {
        match self {
            Input::Editor(rl) => {
                let line = rl.readline(prompt)?;
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                Ok(line)
            }
            Input::Piped(reader) => read_prompted(reader, out, prompt),
        }
    }
}

/// Writes `prompt`, then reads one line without its terminator.
fn read_prompted<R: BufRead, W: Write>(reader: &mut R, out: &mut W, prompt: &str) -> Result<String, ReadlineError> {
    out.write_all(prompt.as_bytes())?;
    out.flush()?;
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(ReadlineError::Eof);
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

/// Prompts and evaluates lines until `exit` or end of input.
pub fn start_repl(config: &ShellConfig) -> anyhow::Result<()> {
    let mut input = Input::open()?;
    ignore_interrupts();
    let mut shell = Shell::new(config, io::stdout());
    loop {
        shell.reap_finished();
        match input.read_line(config.prompt, &mut shell.out) {
            Ok(line) => {
                if eval_line(&mut shell, &line, config.max_line_len)? == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                debug!("end of input");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    debug!(commands = shell.history().next_id() - 1, "leaving shell");
    Ok(())
}

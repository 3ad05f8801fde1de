// config.rs

use crate::error::ShellError;

pub const PROMPT: &str = "rashell> ";
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;
pub const DEFAULT_MAX_LINE_LEN: usize = 1000;

const HISTSIZE_VAR: &str = "RASHELL_HISTSIZE";
const MAX_LINE_VAR: &str = "RASHELL_MAX_LINE";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: &'static str,
    pub history_capacity: usize,
    pub max_line_len: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: PROMPT,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> Result<Self, ShellError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from any key/value source; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShellError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(HISTSIZE_VAR) {
            config.history_capacity = parse_positive(HISTSIZE_VAR, value)?;
        }
        if let Some(value) = lookup(MAX_LINE_VAR) {
            config.max_line_len = parse_positive(MAX_LINE_VAR, value)?;
        }
        Ok(config)
    }
}

fn parse_positive(var: &'static str, value: String) -> Result<usize, ShellError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ShellError::Config { var, value }),
    }
}

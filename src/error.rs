// error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    /// `fork(2)` itself failed. The interpreter cannot go on.
    #[error("error in forking")]
    Fork(#[source] nix::Error),

    #[error("rashell: input line of {len} bytes exceeds the {max}-byte limit")]
    LineTooLong { len: usize, max: usize },

    #[error("invalid value for {var}: {value:?} (expected a positive integer)")]
    Config { var: &'static str, value: String },

    #[error("failed to write shell output")]
    Output(#[from] std::io::Error),
}

impl ShellError {
    /// Exit status used when this error ends the interpreter.
    pub fn exit_code(&self) -> i32 {
        match self {
            ShellError::Fork(_) => -1,
            _ => 1,
        }
    }
}

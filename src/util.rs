// util.rs

use std::io::{ErrorKind, Write};

/// Writes one line. A reader that went away (`EPIPE`) is not an error for the shell.
pub fn writeln_ignore_broken_pipe<W: Write, S: AsRef<str>>(mut w: W, s: S) -> std::io::Result<()> {
    match writeln!(w, "{}", s.as_ref()) {
        Err(ref e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct ClosedPipe(ErrorKind);

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(self.0))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn appends_a_newline() {
        let mut buf = Vec::new();
        writeln_ignore_broken_pipe(&mut buf, "rashell").unwrap();
        assert_eq!(buf, b"rashell\n");
    }

    #[test]
    fn broken_pipe_is_swallowed_other_errors_are_not() {
        assert!(writeln_ignore_broken_pipe(ClosedPipe(ErrorKind::BrokenPipe), "x").is_ok());
        assert!(writeln_ignore_broken_pipe(ClosedPipe(ErrorKind::PermissionDenied), "x").is_err());
    }
}

use std::io::{BufRead, ErrorKind};

use crate::error::{ReplayError, ReplayResult};

/// Reads logical lines terminated by `"\r\n"`, `"\n"` or a bare `"\r"`.
///
/// `BufRead::lines` only knows about `"\n"` and `"\r\n"`, but replay files
/// are written by several platforms and old Mac-style `"\r"` endings show up.
pub struct LineReader<R> {
    inner: R,
    max_line_length: usize,
    line_number: usize,
    // Set when the previous line ended with '\r' and a following '\n' may
    // still be waiting in the next buffer fill.
    pending_cr: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R, max_line_length: usize) -> Self {
        Self {
            inner,
            max_line_length,
            line_number: 0,
            pending_cr: false,
        }
    }

    /// Number of the last line returned by `read_line`, 1-based.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns the next line without its terminator, or `None` at end of
    /// input when no bytes remain.
    pub fn read_line(&mut self) -> ReplayResult<Option<String>> {
        let mut line = Vec::new();
        let mut saw_any = false;

        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ReplayError::Read(e)),
            };

            if buf.is_empty() {
                self.pending_cr = false;
                if !saw_any {
                    return Ok(None);
                }
                break;
            }

            if self.pending_cr {
                self.pending_cr = false;
                if buf[0] == b'\n' {
                    self.inner.consume(1);
                    continue;
                }
            }

            saw_any = true;
            match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    let terminator = buf[pos];
                    line.extend_from_slice(&buf[..pos]);
                    let mut used = pos + 1;
                    if terminator == b'\r' {
                        match buf.get(pos + 1) {
                            Some(b'\n') => used += 1,
                            Some(_) => {}
                            None => self.pending_cr = true,
                        }
                    }
                    self.inner.consume(used);
                    self.check_length(&line)?;
                    break;
                }
                None => {
                    let len = buf.len();
                    line.extend_from_slice(buf);
                    self.inner.consume(len);
                    self.check_length(&line)?;
                }
            }
        }

        self.line_number += 1;
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }

    /// Like `read_line`, but end of input is an error naming what was expected.
    pub fn expect_line(&mut self, expected: &'static str) -> ReplayResult<String> {
        self.read_line()?
            .ok_or(ReplayError::UnexpectedEof { expected })
    }

    fn check_length(&self, line: &[u8]) -> ReplayResult<()> {
        if line.len() > self.max_line_length {
            return Err(ReplayError::LineTooLong {
                line: self.line_number + 1,
                limit: self.max_line_length,
            });
        }
        Ok(())
    }
}

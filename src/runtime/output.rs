use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// Text sink shared by the host and the natives of an engine.
///
/// Tracks whether the last write left a line open so the host can terminate it before writing
/// its own lines.
#[derive(Clone)]
pub struct Output {
    inner: Rc<RefCell<OutputInner>>,
}

struct OutputInner {
    sink: Box<dyn Write>,
    line_open: bool,
}

impl Output {
    pub fn new(sink: impl Write + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(OutputInner {
                sink: Box::new(sink),
                line_open: false,
            })),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// An in-memory sink and a handle for reading back what was written to it.
    pub fn buffer() -> (Self, OutputBuffer) {
        let buffer = OutputBuffer::default();
        (Self::new(buffer.clone()), buffer)
    }

    /// Writes `text` without a line terminator.
    pub fn write_text(&self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        let mut inner = self.inner.borrow_mut();
        inner.sink.write_all(text.as_bytes())?;
        inner.line_open = !text.ends_with('\n');
        Ok(())
    }

    /// Ends the current line if the last write left one open.
    pub fn finish_line(&self) -> io::Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.line_open {
            inner.sink.write_all(b"\n")?;
            inner.line_open = false;
        }
        Ok(())
    }

    /// Writes `text` followed by a newline.
    pub fn write_line(&self, text: &str) -> io::Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.sink.write_all(text.as_bytes())?;
        inner.sink.write_all(b"\n")?;
        inner.line_open = false;
        Ok(())
    }

    pub fn flush(&self) -> io::Result<()> {
        self.inner.borrow_mut().sink.flush()
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Output")
            .field("line_open", &self.inner.borrow().line_open)
            .finish_non_exhaustive()
    }
}

/// Shared in-memory byte buffer backing `Output::buffer`.
#[derive(Clone, Debug, Default)]
pub struct OutputBuffer(Rc<RefCell<Vec<u8>>>);

impl OutputBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_line_only_when_open() {
        let (output, buffer) = Output::buffer();
        output.finish_line().unwrap();
        assert_eq!(buffer.contents(), "");

        output.write_text("1").unwrap();
        output.write_text("520").unwrap();
        output.finish_line().unwrap();
        output.finish_line().unwrap();
        output.write_line("undefined").unwrap();
        assert_eq!(buffer.contents(), "1520\nundefined\n");
    }

    #[test]
    fn text_ending_in_newline_closes_line() {
        let (output, buffer) = Output::buffer();
        output.write_text("done\n").unwrap();
        output.finish_line().unwrap();
        assert_eq!(buffer.contents(), "done\n");
    }

    #[test]
    fn clones_share_state() {
        let (output, buffer) = Output::buffer();
        let clone = output.clone();
        clone.write_text("a").unwrap();
        output.finish_line().unwrap();
        assert_eq!(buffer.contents(), "a\n");
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_surface() {
        let output = Output::new(Closed);
        assert!(output.write_text("x").is_err());
    }
}

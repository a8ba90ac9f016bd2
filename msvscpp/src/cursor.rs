use std::io::{self, BufRead};

/// Line reader with one line of look-ahead.
///
/// [`LineCursor::peek`] fetches the next line into the pending slot without
/// consuming it, the following [`LineCursor::next_line`] hands the same line
/// out. Terminators (`\n`, `\r\n`) are stripped and bytes that are not valid
/// UTF-8 are replaced.
pub struct LineCursor<R> {
    reader: R,
    pending: Option<String>,
    line_number: usize,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: None,
            line_number: 0,
        }
    }

    /// Consumes next line. `None` at end of input.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        self.read()
    }

    /// Returns next line leaving it unconsumed
    pub fn peek(&mut self) -> io::Result<Option<&str>> {
        if self.pending.is_none() {
            self.pending = self.read()?;
        }
        Ok(self.pending.as_deref())
    }

    /// Number of the line handed out last (1 based)
    #[must_use]
    pub fn line_number(&self) -> usize {
        if self.pending.is_some() {
            self.line_number.saturating_sub(1)
        } else {
            self.line_number
        }
    }

    fn read(&mut self) -> io::Result<Option<String>> {
        let mut buffer = Vec::new();
        let read = self.reader.read_until(b'\n', &mut buffer)?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        while matches!(buffer.last(), Some(b'\n' | b'\r')) {
            buffer.pop();
        }
        Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_advance() {
        // Arrange
        let mut cursor = LineCursor::new("first\r\nsecond\n".as_bytes());

        // Act
        let peeked = cursor.peek().unwrap().map(str::to_owned);
        let peeked_again = cursor.peek().unwrap().map(str::to_owned);
        let first = cursor.next_line().unwrap();
        let second = cursor.next_line().unwrap();
        let end = cursor.next_line().unwrap();

        // Assert
        assert_eq!(Some("first".to_owned()), peeked);
        assert_eq!(peeked, peeked_again);
        assert_eq!(peeked, first);
        assert_eq!(Some("second".to_owned()), second);
        assert_eq!(None, end);
    }

    #[test]
    fn line_numbers_ignore_pending_line() {
        // Arrange
        let mut cursor = LineCursor::new("a\nb\nc".as_bytes());

        // Act
        cursor.next_line().unwrap();
        cursor.peek().unwrap();
        let after_peek = cursor.line_number();
        cursor.next_line().unwrap();
        let after_next = cursor.line_number();

        // Assert
        assert_eq!(1, after_peek);
        assert_eq!(2, after_next);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        // Arrange
        let bytes: &[u8] = b"caf\xe9\r\n";
        let mut cursor = LineCursor::new(bytes);

        // Act
        let line = cursor.next_line().unwrap();

        // Assert
        assert_eq!(Some("caf\u{fffd}".to_owned()), line);
    }
}

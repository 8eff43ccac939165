use std::{fmt::Formatter, str::Chars};

/// 1-based line number inside a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::Display, derive_more::From)]
pub struct Line(pub usize);

#[derive(Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    chars: Chars<'a>,
    line: Line,
}

impl<'a> std::fmt::Debug for Cursor<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Printing the whole source is usually too verbose, so by default
        // we only print the line and the remaining input length
        if f.alternate() {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("remaining", &self.chars.as_str())
                .field("source", &self.source)
                .finish()
        } else {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("remaining", &self.chars.as_str().len())
                .finish()
        }
    }
}

impl<'a> PartialEq for Cursor<'a> {
    fn eq(&self, other: &Self) -> bool {
        // Both are slices into the same buffer, comparing addresses avoids a byte-wise comparison
        std::ptr::eq(self.source, other.source)
            && std::ptr::eq(self.chars.as_str(), other.chars.as_str())
    }
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, chars: source.chars(), line: Line(1) }
    }

    pub fn line(&self) -> Line {
        self.line
    }

    pub fn is_at_end(&self) -> bool {
        self.chars.as_str().is_empty()
    }
}

impl<'a> From<&'a str> for Cursor<'a> {
    fn from(source: &'a str) -> Self {
        Self::new(source)
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line.0 += 1;
        }
        c
    }
}

impl<'a> Cursor<'a> {
    pub fn slice_until<'c>(&self, end: &'c Cursor<'a>) -> &'a str {
        debug_assert!(std::ptr::eq(self.source, end.source));
        &self.source[(self.source.len() - self.chars.as_str().len())
            ..(self.source.len() - end.chars.as_str().len())]
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    /// Consumes the next char only if it equals `expected`.
    pub fn consume_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Consumes chars as long as `predicate` holds, stopping in front of the first char that
    /// doesn't match (or at the end of the input).
    pub fn consume_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().map_or(false, &predicate) {
            self.next();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn slice_until() {
        let mut cursor: Cursor = "ab\ncd\n\n".into();

        cursor.next(); // 'a'

        let start = cursor.clone();

        cursor.next(); // 'b'
        cursor.next(); // '\n'
        cursor.next(); // 'c'

        assert_eq!(start.slice_until(&cursor), "b\nc");
        assert_eq!(cursor.slice_until(&cursor), "");
    }

    #[test]
    fn lines_are_counted_when_consuming_newlines() {
        let mut cursor = Cursor::new("a\n\nb");

        assert_eq!(cursor.line(), Line(1));
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_next(), Some('\n'));
        assert_eq!(cursor.next(), Some('a'));
        assert_eq!(cursor.line(), Line(1));

        // Peeking never moves the line counter
        assert_eq!(cursor.peek(), Some('\n'));
        assert_eq!(cursor.line(), Line(1));

        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.line(), Line(2));
        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.line(), Line(3));
        assert_eq!(cursor.next(), Some('b'));
        assert_eq!(cursor.line(), Line(3));

        assert!(cursor.is_at_end());
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.line(), Line(3));
    }

    #[test]
    fn consume_if_and_while() {
        let mut cursor = Cursor::new("==123.5x");

        assert!(cursor.consume_if('='));
        assert!(cursor.consume_if('='));
        assert!(!cursor.consume_if('='));

        let start = cursor.clone();
        cursor.consume_while(|c| c.is_ascii_digit());
        assert_eq!(start.slice_until(&cursor), "123");
        assert_eq!(cursor.peek(), Some('.'));
        assert_eq!(cursor.peek_next(), Some('5'));

        cursor.consume_while(|c| c != 'x');
        assert_eq!(cursor.peek(), Some('x'));

        cursor.consume_while(|_| true);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn equality_is_positional() {
        let mut a = Cursor::new("xx");
        let b = a.clone();
        assert_eq!(a, b);

        a.next();
        assert_ne!(a, b);

        let mut c = b.clone();
        c.next();
        assert_eq!(a, c);

        // Same text in another buffer is a different cursor
        let other = String::from("xx");
        assert_ne!(b, Cursor::new(&other));
    }

    #[test]
    fn slicing_a_large_source() {
        let source = "ab".repeat(500_000);
        let mut cursor = Cursor::new(&source);
        let mut slices = 0;

        loop {
            let start = cursor.clone();
            if cursor.next().is_none() {
                break;
            }
            assert_eq!(start.slice_until(&cursor).len(), 1);
            slices += 1;
        }
        assert_eq!(slices, 1_000_000);
    }

    #[test]
    fn empty_source() {
        let mut cursor: Cursor = "".into();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.peek_next(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.line(), Line(1));
    }
}

//! # Cursor
//!
//! Immutable position over a single line of BASIC source, plus the
//! combinator primitives the parser builds statements and expressions out
//! of.
//!
//! Tiny BASIC's grammar has no separate tokenization pass: the parser reads
//! characters directly off a [`Cursor`], skipping embedded whitespace and
//! folding case as it goes. A line is ASCII, so — mirroring the teacher's
//! choice to index bytes rather than `Vec<char>` — the cursor walks a byte
//! slice and treats each byte as its own character; `pos` doubles as the
//! character index.
//!
//! `Cursor` is `Copy`: every combinator takes a cursor by value and returns
//! `Some((value, next_cursor))` on success, leaving the caller's original
//! cursor untouched on failure. This is what makes backtracking trivial —
//! a failed alternative simply discards its advanced cursor.

/// An immutable `(line, index)` pair. Cheap to copy; every parse attempt
/// that fails just drops its copy and the caller retries from the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    line: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            line: line.as_bytes(),
            pos: 0,
        }
    }

    /// Byte offset of the cursor in the original line. Used by callers that
    /// need to report "trailing characters after position N".
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<char> {
        self.line.get(self.pos).map(|&b| b as char)
    }

    pub fn peek_at(&self, ahead: usize) -> Option<char> {
        self.line.get(self.pos + ahead).map(|&b| b as char)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// Advance past one character, returning the cursor positioned after it.
    pub fn advance(&self) -> Cursor<'a> {
        if self.is_at_end() {
            *self
        } else {
            Cursor {
                line: self.line,
                pos: self.pos + 1,
            }
        }
    }

    /// Skip any run of plain spaces (not all whitespace — lines are already
    /// newline-free by the time they reach the parser).
    pub fn skip_spaces(&self) -> Cursor<'a> {
        let mut c = *self;
        while c.peek() == Some(' ') {
            c = c.advance();
        }
        c
    }

    /// Everything from the cursor to the end of the line, verbatim.
    pub fn rest(&self) -> String {
        self.line[self.pos..].iter().map(|&b| b as char).collect()
    }

    /// A cursor positioned at the end of the line. Used after consuming a
    /// rest-of-line payload (`REM`) so the caller's "nothing left" check
    /// still passes.
    pub fn to_end(&self) -> Cursor<'a> {
        Cursor {
            line: self.line,
            pos: self.line.len(),
        }
    }

    /// Match a case-insensitive keyword/symbol, skipping embedded spaces
    /// *within* the literal as well as leading ones. `"GOTO"` therefore
    /// matches `" g o TO"`. Returns the cursor positioned just past the
    /// match, with no trailing-space consumption (callers that want that
    /// call [`Cursor::skip_spaces`] themselves).
    pub fn literal(&self, text: &str) -> Option<Cursor<'a>> {
        let mut c = self.skip_spaces();
        for want in text.chars() {
            c = c.skip_spaces();
            let got = c.peek()?;
            if !got.eq_ignore_ascii_case(&want) {
                return None;
            }
            c = c.advance();
        }
        Some(c)
    }

    /// First literal in `options` that matches, in order. Longer operators
    /// that share a prefix with shorter ones (`<=` vs `<`) must be listed
    /// before the shorter alternative by the caller.
    pub fn one_of_literals(&self, options: &[&str]) -> Option<(String, Cursor<'a>)> {
        for &opt in options {
            if let Some(next) = self.literal(opt) {
                return Some((opt.to_string(), next));
            }
        }
        None
    }

    /// Always succeeds; advances past `text` only if present.
    pub fn optional_literal(&self, text: &str) -> Cursor<'a> {
        self.literal(text).unwrap_or(*self)
    }

    /// One or more decimal digits (with embedded spaces skipped), combined
    /// with wrapping arithmetic so overlong literals behave like any other
    /// wrapping expression rather than panicking or erroring.
    pub fn number_literal(&self) -> Option<(i32, Cursor<'a>)> {
        let mut c = self.skip_spaces();
        let mut value: i32 = 0;
        let mut saw_digit = false;
        loop {
            let probe = c.skip_spaces();
            match probe.peek() {
                Some(ch) if ch.is_ascii_digit() => {
                    let digit = ch.to_digit(10).unwrap() as i32;
                    value = value.wrapping_mul(10).wrapping_add(digit);
                    saw_digit = true;
                    c = probe.advance();
                }
                _ => break,
            }
        }
        if saw_digit {
            Some((value, c))
        } else {
            None
        }
    }

    /// `"` followed by verbatim characters (no escapes, no embedded `"`) up
    /// to a closing `"`. Bytes between the quotes are never case-folded or
    /// space-skipped. Fails (returns `None`) if unterminated.
    pub fn string_literal(&self) -> Option<(String, Cursor<'a>)> {
        let mut c = self.skip_spaces();
        if c.peek() != Some('"') {
            return None;
        }
        c = c.advance();
        let mut s = String::new();
        loop {
            match c.peek() {
                Some('"') => return Some((s, c.advance())),
                Some(ch) => {
                    s.push(ch);
                    c = c.advance();
                }
                None => return None,
            }
        }
    }

    /// A single alphabetic character, uppercased. Tiny BASIC variable names
    /// are always exactly one letter (§3).
    pub fn variable_name(&self) -> Option<(char, Cursor<'a>)> {
        let c = self.skip_spaces();
        let ch = c.peek()?;
        if ch.is_ascii_alphabetic() {
            Some((ch.to_ascii_uppercase(), c.advance()))
        } else {
            None
        }
    }
}

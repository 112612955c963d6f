//! Line-oriented scanner for Wavefront OBJ text.
//!
//! The scanner is pull-based: every call to [`Scanner::next_token`] classifies
//! the next lexeme and advances the cursor. Apart from the cursor and the line
//! counter it keeps no state, so restarting a scan is just constructing a new
//! scanner over the same bytes.
//!
//! Tokens borrow their text from the source, which must outlive them.

/// Classification of a scanned lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input. Terminal: the scanner keeps returning it.
    Eof,
    /// A `\n` byte. Records in OBJ are line-oriented.
    NewLine,
    /// `#` up to, but not including, the end of the line.
    Comment,
    /// An unsigned decimal literal: digits, optional fraction and exponent.
    Number,
    /// A bare `-` preceding a number.
    Minus,
    /// `/` separating face vertex components.
    Slash,
    /// `v` directive.
    Position,
    /// `vt` directive.
    Texcoord,
    /// `vn` directive.
    Normal,
    /// `f` directive.
    Face,
    /// Any other word (`o`, `g`, `s`, `usemtl`, ...).
    Identifier,
    /// A byte that starts no known lexeme.
    Error,
}

impl TokenKind {
    /// Check whether this token ends the current record.
    #[inline]
    pub fn is_line_end(self) -> bool {
        matches!(self, Self::NewLine | Self::Eof)
    }

    /// Check whether this is one of the four supported directives.
    #[inline]
    pub fn is_directive(self) -> bool {
        matches!(
            self,
            Self::Position | Self::Texcoord | Self::Normal | Self::Face
        )
    }
}

/// A classified span of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token classification.
    pub kind: TokenKind,
    /// Bytes covered by the token, borrowed from the source.
    pub text: &'a [u8],
    /// Zero-based line on which the token starts.
    pub line: u32,
}

impl Token<'_> {
    /// Token text for diagnostics.
    pub fn lossy_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.text)
    }
}

/// Cursor over OBJ source bytes.
///
/// Input ends at the end of the slice or at the first NUL byte, whichever
/// comes first.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a [u8],
    start: usize,
    current: usize,
    line: u32,
}

#[inline]
fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

impl<'a> Scanner<'a> {
    /// Create a scanner positioned at the start of `source`.
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 0,
        }
    }

    /// Zero-based line of the cursor.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Byte offset of the cursor.
    pub fn offset(&self) -> usize {
        self.current
    }

    /// Scan and return the next token.
    pub fn next_token(&mut self) -> Token<'a> {
        self.skip_whitespace();
        self.start = self.current;

        if self.is_at_end() {
            return self.make_token(TokenKind::Eof);
        }

        let c = self.advance();
        match c {
            b'\n' => {
                let token = self.make_token(TokenKind::NewLine);
                self.line += 1;
                token
            }
            b'#' => {
                while !self.is_at_end() && self.peek() != b'\n' {
                    self.advance();
                }
                self.make_token(TokenKind::Comment)
            }
            b'/' => self.make_token(TokenKind::Slash),
            b'-' => self.make_token(TokenKind::Minus),
            c if c.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),
            _ => self.make_token(TokenKind::Error),
        }
    }

    #[inline]
    fn peek(&self) -> u8 {
        self.source.get(self.current).copied().unwrap_or(0)
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.peek() == 0
    }

    /// Consume one byte. Callers check [`is_at_end`](Self::is_at_end) first.
    #[inline]
    fn advance(&mut self) -> u8 {
        let c = self.peek();
        self.current += 1;
        c
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), b' ' | b'\t' | b'\r') {
            self.current += 1;
        }
    }

    fn skip_digits(&mut self) {
        while self.peek().is_ascii_digit() {
            self.current += 1;
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token<'a> {
        Token {
            kind,
            text: &self.source[self.start..self.current],
            line: self.line,
        }
    }

    fn number(&mut self) -> Token<'a> {
        self.skip_digits();

        if self.peek() == b'.' {
            self.current += 1;
            self.skip_digits();
        }

        if matches!(self.peek(), b'e' | b'E') {
            self.current += 1;
            if matches!(self.peek(), b'+' | b'-') {
                self.current += 1;
            }
            self.skip_digits();
        }

        self.make_token(TokenKind::Number)
    }

    fn identifier(&mut self) -> Token<'a> {
        while is_alpha(self.peek()) || self.peek().is_ascii_digit() {
            self.current += 1;
        }

        let kind = match &self.source[self.start..self.current] {
            b"v" => TokenKind::Position,
            b"vt" => TokenKind::Texcoord,
            b"vn" => TokenKind::Normal,
            b"f" => TokenKind::Face,
            _ => TokenKind::Identifier,
        };
        self.make_token(kind)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    /// Yields tokens up to, but not including, [`TokenKind::Eof`].
    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}

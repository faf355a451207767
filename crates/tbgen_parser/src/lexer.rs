//! Lexer for SystemVerilog source text.
//!
//! Produces [`Token`]s for the whole file, header and body alike. Whitespace of
//! any shape (tabs, runs of spaces, blank lines, CRLF) and comments are dropped.
//! Compiler directives are reported and skipped to end of line. Problems are
//! reported to the [`DiagnosticSink`] as `E100` and yield [`SvToken::Error`].

use crate::token::{lookup_keyword, SvToken, Token};
use tbgen_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use tbgen_source::{FileId, Span};

/// Lexes `source`. The result always ends with [`SvToken::Eof`].
pub fn lex(source: &str, file: FileId, sink: &DiagnosticSink) -> Vec<Token> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        file,
        sink,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    file: FileId,
    sink: &'a DiagnosticSink,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: SvToken::Eof,
                    span: Span::point(self.file, self.pos as u32),
                });
                break;
            }
            tokens.push(self.next_token());
        }
        tokens
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    fn token(&self, kind: SvToken, start: usize) -> Token {
        Token {
            kind,
            span: self.span_from(start),
        }
    }

    fn error(&self, msg: &str, span: Span) {
        self.sink
            .emit(Diagnostic::error(DiagnosticCode::LEX, msg, span));
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.at_end() && pred(self.source[self.pos]) {
            self.pos += 1;
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            self.skip_while(|b| b.is_ascii_whitespace());
            match (self.peek(), self.peek_at(1)) {
                (b'/', b'/') => self.skip_while(|b| b != b'\n'),
                (b'/', b'*') => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        if self.at_end() {
                            self.error("unterminated block comment", self.span_from(start));
                            break;
                        }
                        if self.peek() == b'*' && self.peek_at(1) == b'/' {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                (b'`', _) => {
                    let start = self.pos;
                    self.skip_while(|b| b != b'\n');
                    self.sink.emit(
                        Diagnostic::error(
                            DiagnosticCode::LEX,
                            "compiler directives are not supported",
                            self.span_from(start),
                        )
                        .with_note("the rest of the line was ignored"),
                    );
                }
                _ => return,
            }
        }
    }

    fn next_token(&mut self) -> Token {
        let start = self.pos;
        let b = self.peek();

        if is_ident_start(b) {
            self.skip_while(is_ident_char);
            let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");
            let kind = lookup_keyword(text).unwrap_or(SvToken::Identifier);
            return self.token(kind, start);
        }

        match b {
            b'\\' => self.lex_escaped_identifier(start),
            b'$' => self.lex_system_identifier(start),
            b'0'..=b'9' => self.lex_number(start),
            b'\'' => self.lex_tick(start),
            b'"' => self.lex_string(start),
            _ => self.lex_punctuation(start),
        }
    }

    fn lex_escaped_identifier(&mut self, start: usize) -> Token {
        self.pos += 1;
        self.skip_while(|b| !b.is_ascii_whitespace());
        if self.pos == start + 1 {
            self.error("empty escaped identifier", self.span_from(start));
            return self.token(SvToken::Error, start);
        }
        self.token(SvToken::EscapedIdentifier, start)
    }

    fn lex_system_identifier(&mut self, start: usize) -> Token {
        self.pos += 1;
        if !is_ident_start(self.peek()) {
            self.error("expected identifier after '$'", self.span_from(start));
            return self.token(SvToken::Error, start);
        }
        self.skip_while(is_ident_char);
        self.token(SvToken::SystemIdentifier, start)
    }

    fn lex_number(&mut self, start: usize) -> Token {
        self.skip_while(|b| b.is_ascii_digit() || b == b'_');

        // Size followed by a base: 2'b01, 8'shFF. Whitespace may separate them.
        let after_size = self.pos;
        self.skip_while(|b| b == b' ' || b == b'\t');
        if self.peek() == b'\'' && self.based_literal_follows() {
            self.eat_base_and_digits();
            return self.token(SvToken::SizedLiteral, start);
        }
        self.pos = after_size;

        let mut kind = SvToken::IntLiteral;
        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            self.pos += 1;
            self.skip_while(|b| b.is_ascii_digit() || b == b'_');
            kind = SvToken::RealLiteral;
        }
        if matches!(self.peek(), b'e' | b'E') {
            self.pos += 1;
            if matches!(self.peek(), b'+' | b'-') {
                self.pos += 1;
            }
            self.skip_while(|b| b.is_ascii_digit() || b == b'_');
            kind = SvToken::RealLiteral;
        }
        self.token(kind, start)
    }

    /// At a `'`: true if what follows is `[s]<base>`.
    fn based_literal_follows(&self) -> bool {
        let mut next = self.peek_at(1).to_ascii_lowercase();
        if next == b's' {
            next = self.peek_at(2).to_ascii_lowercase();
        }
        matches!(next, b'b' | b'o' | b'd' | b'h')
    }

    /// Consumes `'[s]<base>` and the digits after it.
    fn eat_base_and_digits(&mut self) {
        self.pos += 1;
        if self.peek().to_ascii_lowercase() == b's' {
            self.pos += 1;
        }
        let base = self.peek().to_ascii_lowercase();
        self.pos += 1;
        self.skip_while(|b| b == b' ' || b == b'\t');
        self.skip_while(|ch| {
            let ch = ch.to_ascii_lowercase();
            match base {
                b'b' => matches!(ch, b'0' | b'1' | b'x' | b'z' | b'?' | b'_'),
                b'o' => matches!(ch, b'0'..=b'7' | b'x' | b'z' | b'?' | b'_'),
                b'd' => ch.is_ascii_digit() || matches!(ch, b'x' | b'z' | b'?' | b'_'),
                _ => ch.is_ascii_hexdigit() || matches!(ch, b'x' | b'z' | b'?' | b'_'),
            }
        });
    }

    fn lex_tick(&mut self, start: usize) -> Token {
        if self.based_literal_follows() {
            self.eat_base_and_digits();
            return self.token(SvToken::SizedLiteral, start);
        }
        // Fill literals: '0 '1 'x 'z
        if matches!(
            self.peek_at(1).to_ascii_lowercase(),
            b'0' | b'1' | b'x' | b'z'
        ) && !is_ident_char(self.peek_at(2))
        {
            self.pos += 2;
            return self.token(SvToken::SizedLiteral, start);
        }
        self.pos += 1;
        self.token(SvToken::Tick, start)
    }

    fn lex_string(&mut self, start: usize) -> Token {
        self.pos += 1;
        loop {
            match self.peek() {
                b'"' => {
                    self.pos += 1;
                    return self.token(SvToken::StringLiteral, start);
                }
                b'\\' if self.pos + 1 < self.source.len() => self.pos += 2,
                b'\n' | 0 if self.at_end() || self.peek() == b'\n' => {
                    self.error("unterminated string literal", self.span_from(start));
                    return self.token(SvToken::Error, start);
                }
                _ => self.pos += 1,
            }
        }
    }

    fn lex_punctuation(&mut self, start: usize) -> Token {
        let b = self.peek();
        self.pos += 1;
        let kind = match b {
            b'(' => SvToken::LeftParen,
            b')' => SvToken::RightParen,
            b'[' => SvToken::LeftBracket,
            b']' => SvToken::RightBracket,
            b'{' => SvToken::LeftBrace,
            b'}' => SvToken::RightBrace,
            b',' => SvToken::Comma,
            b';' => SvToken::Semicolon,
            b'.' => SvToken::Dot,
            b'#' => SvToken::Hash,
            b'@' => SvToken::At,
            b':' if self.peek() == b':' => {
                self.pos += 1;
                SvToken::Operator
            }
            b':' => SvToken::Colon,
            b'=' if self.peek() == b'=' => {
                self.skip_while(|b| matches!(b, b'=' | b'?'));
                SvToken::Operator
            }
            b'=' => SvToken::Equals,
            b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'|' | b'^' | b'~' | b'!' | b'<'
            | b'>' | b'?' => {
                // Keep compound operators together so `<=` never reads as `<` `=`.
                self.skip_while(|b| matches!(b, b'=' | b'<' | b'>' | b'&' | b'|' | b'*'));
                SvToken::Operator
            }
            _ => {
                // Step over a whole UTF-8 sequence so spans stay on char boundaries.
                self.skip_while(|b| b & 0xC0 == 0x80);
                let span = self.span_from(start);
                let text = String::from_utf8_lossy(&self.source[start..self.pos]);
                self.error(&format!("unrecognized character '{text}'"), span);
                SvToken::Error
            }
        };
        self.token(kind, start)
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

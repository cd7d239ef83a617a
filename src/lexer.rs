use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

pub struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> (Vec<Spanned<Lexeme>>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.node == Lexeme::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    fn next_token(&mut self) -> Spanned<Lexeme> {
        loop {
            self.skip_whitespace_and_comments();

            if self.pos >= self.source.len() {
                return self.make_token(Lexeme::Eof, self.pos, self.pos);
            }

            let start = self.pos;
            let ch = self.source[self.pos];

            // Identifiers and keywords
            if is_ident_start(ch) {
                return self.scan_ident_or_keyword();
            }

            // Number literals, including the leading-dot form `.5`
            if ch.is_ascii_digit() || (ch == b'.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit())) {
                return self.scan_number();
            }

            // String literals
            if ch == b'\'' || ch == b'"' {
                return self.scan_string();
            }

            // Symbols
            if let Some(tok) = self.scan_symbol(start) {
                return tok;
            }
            // scan_symbol returned None → error was recorded, try again
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }

            // Line comment
            if self.pos + 1 < self.source.len()
                && self.source[self.pos] == b'/'
                && self.source[self.pos + 1] == b'/'
            {
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }

            // Block comment
            if self.pos + 1 < self.source.len()
                && self.source[self.pos] == b'/'
                && self.source[self.pos + 1] == b'*'
            {
                let start = self.pos;
                self.pos += 2;
                let mut closed = false;
                while self.pos + 1 < self.source.len() {
                    if self.source[self.pos] == b'*' && self.source[self.pos + 1] == b'/' {
                        self.pos += 2;
                        closed = true;
                        break;
                    }
                    self.pos += 1;
                }
                if !closed {
                    self.pos = self.source.len();
                    self.diagnostics.push(
                        Diagnostic::error(
                            "unterminated block comment".to_string(),
                            Span::new(start as u32, self.pos as u32),
                        )
                        .with_help("close the comment with '*/'".to_string()),
                    );
                }
                continue;
            }

            break;
        }
    }

    fn scan_ident_or_keyword(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or_default();
        let token = Lexeme::from_keyword(text).unwrap_or_else(|| Lexeme::Ident(text.to_string()));
        self.make_token(token, start, self.pos)
    }

    fn scan_number(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if self.pos < self.source.len() && self.source[self.pos] == b'.' {
            self.pos += 1;
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }
        if self.pos < self.source.len() && matches!(self.source[self.pos], b'e' | b'E') {
            self.pos += 1;
            if self.pos < self.source.len() && matches!(self.source[self.pos], b'+' | b'-') {
                self.pos += 1;
            }
            let digits_start = self.pos;
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            if self.pos == digits_start {
                self.diagnostics.push(
                    Diagnostic::error(
                        "malformed exponent in number literal".to_string(),
                        Span::new(start as u32, self.pos as u32),
                    )
                    .with_help("exponents are written like '1e3' or '2.5e-4'".to_string()),
                );
                return self.make_token(Lexeme::Number(0.0), start, self.pos);
            }
        }

        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or_default();
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => self.make_token(Lexeme::Number(n), start, self.pos),
            _ => {
                self.diagnostics.push(Diagnostic::error(
                    format!("number literal '{}' is out of range", text),
                    Span::new(start as u32, self.pos as u32),
                ));
                self.make_token(Lexeme::Number(0.0), start, self.pos)
            }
        }
    }

    fn scan_string(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        let quote = self.source[self.pos];
        self.pos += 1;

        let mut value = String::new();
        loop {
            if self.pos >= self.source.len() || self.source[self.pos] == b'\n' {
                self.diagnostics.push(
                    Diagnostic::error(
                        "unterminated string literal".to_string(),
                        Span::new(start as u32, self.pos as u32),
                    )
                    .with_help(format!(
                        "close the string with a matching {}",
                        if quote == b'\'' { "'" } else { "\"" }
                    )),
                );
                break;
            }

            let ch = self.source[self.pos];
            if ch == quote {
                self.pos += 1;
                break;
            }

            if ch == b'\\' {
                self.pos += 1;
                self.scan_escape(start, &mut value);
                continue;
            }

            // Consume one UTF-8 character
            let rest = std::str::from_utf8(&self.source[self.pos..]).unwrap_or_default();
            if let Some(c) = rest.chars().next() {
                value.push(c);
                self.pos += c.len_utf8();
            } else {
                self.pos += 1;
            }
        }

        self.make_token(Lexeme::Str(value), start, self.pos)
    }

    fn scan_escape(&mut self, string_start: usize, value: &mut String) {
        if self.pos >= self.source.len() {
            return;
        }
        let ch = self.source[self.pos];
        self.pos += 1;
        match ch {
            b'n' => value.push('\n'),
            b't' => value.push('\t'),
            b'r' => value.push('\r'),
            b'b' => value.push('\u{0008}'),
            b'f' => value.push('\u{000C}'),
            b'v' => value.push('\u{000B}'),
            b'0' => value.push('\0'),
            b'u' => {
                if let Some(c) = self.scan_hex_escape(4) {
                    value.push(c);
                } else {
                    self.diagnostics.push(
                        Diagnostic::error(
                            "invalid unicode escape in string literal".to_string(),
                            Span::new(string_start as u32, self.pos as u32),
                        )
                        .with_help("unicode escapes are written like '\\u00e9'".to_string()),
                    );
                }
            }
            b'x' => {
                if let Some(c) = self.scan_hex_escape(2) {
                    value.push(c);
                } else {
                    self.diagnostics.push(
                        Diagnostic::error(
                            "invalid hex escape in string literal".to_string(),
                            Span::new(string_start as u32, self.pos as u32),
                        )
                        .with_help("hex escapes are written like '\\x41'".to_string()),
                    );
                }
            }
            // Unknown escapes keep the escaped character, as in the host language
            other => value.push(other as char),
        }
    }

    fn scan_hex_escape(&mut self, len: usize) -> Option<char> {
        if self.pos + len > self.source.len() {
            return None;
        }
        let digits = std::str::from_utf8(&self.source[self.pos..self.pos + len]).ok()?;
        let code = u32::from_str_radix(digits, 16).ok()?;
        self.pos += len;
        char::from_u32(code)
    }

    fn scan_symbol(&mut self, start: usize) -> Option<Spanned<Lexeme>> {
        let ch = self.source[self.pos];
        self.pos += 1;

        let token = match ch {
            b'(' => Lexeme::LParen,
            b')' => Lexeme::RParen,
            b'{' => Lexeme::LBrace,
            b'}' => Lexeme::RBrace,
            b'[' => Lexeme::LBracket,
            b']' => Lexeme::RBracket,
            b',' => Lexeme::Comma,
            b':' => Lexeme::Colon,
            b';' => Lexeme::Semicolon,
            b'.' => Lexeme::Dot,
            b'?' => Lexeme::Question,
            b'+' => Lexeme::Plus,
            b'-' => Lexeme::Minus,
            b'*' => Lexeme::Star,
            b'/' => Lexeme::Slash,
            b'%' => Lexeme::Percent,
            b'=' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    if self.peek() == Some(b'=') {
                        self.pos += 1;
                        Lexeme::EqEqEq
                    } else {
                        Lexeme::EqEq
                    }
                } else if self.peek() == Some(b'>') {
                    self.pos += 1;
                    Lexeme::FatArrow
                } else {
                    Lexeme::Assign
                }
            }
            b'!' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    if self.peek() == Some(b'=') {
                        self.pos += 1;
                        Lexeme::BangEqEq
                    } else {
                        Lexeme::BangEq
                    }
                } else {
                    Lexeme::Bang
                }
            }
            b'<' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    Lexeme::Le
                } else {
                    Lexeme::Lt
                }
            }
            b'>' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    Lexeme::Ge
                } else {
                    Lexeme::Gt
                }
            }
            b'&' => {
                if self.peek() == Some(b'&') {
                    self.pos += 1;
                    Lexeme::AndAnd
                } else {
                    self.diagnostics.push(
                        Diagnostic::error(
                            "unexpected '&'; bitwise operators are not supported".to_string(),
                            Span::new(start as u32, self.pos as u32),
                        )
                        .with_help("binding expressions support the logical '&&' operator only".to_string()),
                    );
                    return None;
                }
            }
            b'|' => {
                if self.peek() == Some(b'|') {
                    self.pos += 1;
                    Lexeme::OrOr
                } else {
                    self.diagnostics.push(
                        Diagnostic::error(
                            "unexpected '|'; bitwise operators are not supported".to_string(),
                            Span::new(start as u32, self.pos as u32),
                        )
                        .with_help("binding expressions support the logical '||' operator only".to_string()),
                    );
                    return None;
                }
            }
            _ => {
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("unexpected character '{}' (U+{:04X})", ch as char, ch),
                        Span::new(start as u32, self.pos as u32),
                    )
                    .with_help(
                        "this character is not recognized as part of a binding expression"
                            .to_string(),
                    ),
                );
                return None;
            }
        };

        Some(self.make_token(token, start, self.pos))
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        if self.pos + offset < self.source.len() {
            Some(self.source[self.pos + offset])
        } else {
            None
        }
    }

    fn make_token(&self, token: Lexeme, start: usize, end: usize) -> Spanned<Lexeme> {
        Spanned::new(token, Span::new(start as u32, end as u32))
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_' || ch == b'$'
}

fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_' || ch == b'$'
}

//! Tokenizer.
//!
//! The scanner is driven by the parser one token at a time. Context
//! sensitive tokens (`/` vs. regular expressions, `>` vs. shift operators,
//! template continuations after `}`) are produced by explicit rescans.
//! Comments are recorded as trivia ranges while scanning.

use bitflags::bitflags;
use memchr::memmem;

use crate::kind::{SyntaxKind, is_identifier_part, is_identifier_start};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    Line,
    Block,
    /// `/** ... */`
    Doc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentRange {
    pub kind: CommentKind,
    pub pos: u32,
    pub end: u32,
    /// Block comment without `*/`.
    pub unterminated: bool,
}

/// A consumed token as recorded by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: SyntaxKind,
    pub pos: u32,
    pub end: u32,
    pub flags: TokenFlags,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u8 {
        const PRECEDING_LINE_BREAK = 1 << 0;
        const UNTERMINATED = 1 << 1;
        const SINGLE_QUOTE = 1 << 2;
        /// Identifier spelled with a unicode escape.
        const ESCAPED = 1 << 3;
    }
}

/// Saved scanner position for speculative parsing.
#[derive(Debug, Clone)]
pub struct ScannerState {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    token_flags: TokenFlags,
    comment_count: usize,
}

pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    token_flags: TokenFlags,
    comments: Vec<CommentRange>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut pos = 0;
        if text.starts_with("#!") {
            pos = text.find('\n').unwrap_or(text.len());
        }
        Scanner {
            text,
            pos,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            token_flags: TokenFlags::empty(),
            comments: Vec::new(),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    pub fn token_start(&self) -> u32 {
        self.token_start as u32
    }

    pub fn token_end(&self) -> u32 {
        self.pos as u32
    }

    /// Identifier text or cooked literal value of the current token.
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    pub fn current_token(&self) -> Token {
        Token {
            kind: self.token,
            pos: self.token_start as u32,
            end: self.pos as u32,
            flags: self.token_flags,
        }
    }

    pub fn save(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            comment_count: self.comments.len(),
        }
    }

    pub fn restore(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token = state.token;
        self.token_start = state.token_start;
        self.token_value = state.token_value;
        self.token_flags = state.token_flags;
        self.comments.truncate(state.comment_count);
    }

    pub fn take_comments(&mut self) -> Vec<CommentRange> {
        std::mem::take(&mut self.comments)
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_at(&self, byte_offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + byte_offset).copied()
    }

    fn skip_trivia(&mut self) {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\n' | b'\r' => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += 1;
                }
                b' ' | b'\t' | 0x0b | 0x0c => self.pos += 1,
                b'/' if bytes.get(self.pos + 1) == Some(&b'/') => {
                    let start = self.pos;
                    let rest = &bytes[self.pos..];
                    let len = memchr::memchr2(b'\n', b'\r', rest).unwrap_or(rest.len());
                    self.pos += len;
                    self.comments.push(CommentRange {
                        kind: CommentKind::Line,
                        pos: start as u32,
                        end: self.pos as u32,
                        unterminated: false,
                    });
                }
                b'/' if bytes.get(self.pos + 1) == Some(&b'*') => {
                    let start = self.pos;
                    let body = &bytes[self.pos + 2..];
                    let (end, unterminated) = match memmem::find(body, b"*/") {
                        Some(i) => (self.pos + 2 + i + 2, false),
                        None => (bytes.len(), true),
                    };
                    if memchr::memchr2(b'\n', b'\r', &bytes[start..end]).is_some() {
                        self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    }
                    let is_doc = bytes.get(start + 2) == Some(&b'*')
                        && bytes.get(start + 3) != Some(&b'/');
                    self.pos = end;
                    self.comments.push(CommentRange {
                        kind: if is_doc { CommentKind::Doc } else { CommentKind::Block },
                        pos: start as u32,
                        end: end as u32,
                        unterminated,
                    });
                }
                b if b >= 0x80 => {
                    let ch = self.peek().unwrap_or(' ');
                    if ch == '\u{2028}' || ch == '\u{2029}' {
                        self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    } else if !ch.is_whitespace() && ch != '\u{feff}' {
                        return;
                    }
                    self.pos += ch.len_utf8();
                }
                _ => return,
            }
        }
    }

    /// Advance to the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = TokenFlags::empty();
        self.token_value.clear();
        self.skip_trivia();
        self.token_start = self.pos;
        self.token = self.scan_token();
        self.token
    }

    fn scan_token(&mut self) -> SyntaxKind {
        let Some(ch) = self.peek() else {
            return SyntaxKind::EndOfFile;
        };
        let next = self.peek_at(1);
        let next2 = self.peek_at(2);
        let (kind, len) = match ch {
            '"' | '\'' => return self.scan_string(ch),
            '`' => {
                self.pos += 1;
                return self.scan_template(true);
            }
            '0'..='9' => return self.scan_number(),
            '.' if next.is_some_and(|c| c.is_ascii_digit()) => return self.scan_number(),
            '.' if next == Some(b'.') && next2 == Some(b'.') => (SyntaxKind::DotDotDot, 3),
            '.' => (SyntaxKind::Dot, 1),
            '#' => return self.scan_private_identifier(),
            '{' => (SyntaxKind::OpenBrace, 1),
            '}' => (SyntaxKind::CloseBrace, 1),
            '(' => (SyntaxKind::OpenParen, 1),
            ')' => (SyntaxKind::CloseParen, 1),
            '[' => (SyntaxKind::OpenBracket, 1),
            ']' => (SyntaxKind::CloseBracket, 1),
            ';' => (SyntaxKind::Semicolon, 1),
            ',' => (SyntaxKind::Comma, 1),
            '@' => (SyntaxKind::At, 1),
            ':' => (SyntaxKind::Colon, 1),
            '~' => (SyntaxKind::Tilde, 1),
            '?' => match (next, next2) {
                // `a?.5:b` is a conditional, not an optional chain
                (Some(b'.'), n) if !n.is_some_and(|c| c.is_ascii_digit()) => {
                    (SyntaxKind::QuestionDot, 2)
                }
                (Some(b'?'), Some(b'=')) => (SyntaxKind::QuestionQuestionEquals, 3),
                (Some(b'?'), _) => (SyntaxKind::QuestionQuestion, 2),
                _ => (SyntaxKind::Question, 1),
            },
            '<' => match (next, next2) {
                (Some(b'<'), Some(b'=')) => (SyntaxKind::LessThanLessThanEquals, 3),
                (Some(b'<'), _) => (SyntaxKind::LessThanLessThan, 2),
                (Some(b'='), _) => (SyntaxKind::LessThanEquals, 2),
                _ => (SyntaxKind::LessThan, 1),
            },
            // Always a single `>`; see `rescan_greater_token`.
            '>' => (SyntaxKind::GreaterThan, 1),
            '=' => match (next, next2) {
                (Some(b'='), Some(b'=')) => (SyntaxKind::EqualsEqualsEquals, 3),
                (Some(b'='), _) => (SyntaxKind::EqualsEquals, 2),
                (Some(b'>'), _) => (SyntaxKind::EqualsGreaterThan, 2),
                _ => (SyntaxKind::Equals, 1),
            },
            '!' => match (next, next2) {
                (Some(b'='), Some(b'=')) => (SyntaxKind::ExclamationEqualsEquals, 3),
                (Some(b'='), _) => (SyntaxKind::ExclamationEquals, 2),
                _ => (SyntaxKind::Exclamation, 1),
            },
            '+' => match next {
                Some(b'+') => (SyntaxKind::PlusPlus, 2),
                Some(b'=') => (SyntaxKind::PlusEquals, 2),
                _ => (SyntaxKind::Plus, 1),
            },
            '-' => match next {
                Some(b'-') => (SyntaxKind::MinusMinus, 2),
                Some(b'=') => (SyntaxKind::MinusEquals, 2),
                _ => (SyntaxKind::Minus, 1),
            },
            '*' => match (next, next2) {
                (Some(b'*'), Some(b'=')) => (SyntaxKind::AsteriskAsteriskEquals, 3),
                (Some(b'*'), _) => (SyntaxKind::AsteriskAsterisk, 2),
                (Some(b'='), _) => (SyntaxKind::AsteriskEquals, 2),
                _ => (SyntaxKind::Asterisk, 1),
            },
            '/' => match next {
                Some(b'=') => (SyntaxKind::SlashEquals, 2),
                _ => (SyntaxKind::Slash, 1),
            },
            '%' => match next {
                Some(b'=') => (SyntaxKind::PercentEquals, 2),
                _ => (SyntaxKind::Percent, 1),
            },
            '&' => match (next, next2) {
                (Some(b'&'), Some(b'=')) => (SyntaxKind::AmpersandAmpersandEquals, 3),
                (Some(b'&'), _) => (SyntaxKind::AmpersandAmpersand, 2),
                (Some(b'='), _) => (SyntaxKind::AmpersandEquals, 2),
                _ => (SyntaxKind::Ampersand, 1),
            },
            '|' => match (next, next2) {
                (Some(b'|'), Some(b'=')) => (SyntaxKind::BarBarEquals, 3),
                (Some(b'|'), _) => (SyntaxKind::BarBar, 2),
                (Some(b'='), _) => (SyntaxKind::BarEquals, 2),
                _ => (SyntaxKind::Bar, 1),
            },
            '^' => match next {
                Some(b'=') => (SyntaxKind::CaretEquals, 2),
                _ => (SyntaxKind::Caret, 1),
            },
            '\\' if next == Some(b'u') => return self.scan_identifier(),
            c if is_identifier_start(c) => return self.scan_identifier(),
            c => {
                self.pos += c.len_utf8();
                return SyntaxKind::Unknown;
            }
        };
        self.pos += len;
        kind
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        while let Some(ch) = self.peek() {
            if ch == '\\' && self.peek_at(1) == Some(b'u') {
                self.pos += 2;
                match self.scan_unicode_escape_digits() {
                    Some(decoded) => {
                        self.token_flags |= TokenFlags::ESCAPED;
                        self.token_value.push(decoded);
                    }
                    None => break,
                }
            } else if is_identifier_part(ch) {
                self.token_value.push(ch);
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        if self.token_value.is_empty() {
            return SyntaxKind::Unknown;
        }
        SyntaxKind::Identifier
    }

    fn scan_private_identifier(&mut self) -> SyntaxKind {
        self.pos += 1;
        self.token_value.push('#');
        while let Some(ch) = self.peek() {
            if !is_identifier_part(ch) {
                break;
            }
            self.token_value.push(ch);
            self.pos += ch.len_utf8();
        }
        SyntaxKind::PrivateIdentifier
    }

    /// Digits after `\u`: either `XXXX` or `{X...}`.
    fn scan_unicode_escape_digits(&mut self) -> Option<char> {
        let rest = &self.text[self.pos..];
        let (digits, consumed) = if let Some(braced) = rest.strip_prefix('{') {
            let close = braced.find('}')?;
            (&braced[..close], close + 2)
        } else {
            (rest.get(..4)?, 4)
        };
        let value = u32::from_str_radix(digits, 16).ok()?;
        let decoded = char::from_u32(value)?;
        self.pos += consumed;
        Some(decoded)
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let bytes = self.text.as_bytes();
        let start = self.pos;
        let radix_prefix = bytes[start] == b'0'
            && matches!(bytes.get(start + 1), Some(b'x' | b'X' | b'b' | b'B' | b'o' | b'O'));
        if radix_prefix {
            self.pos += 2;
            while self
                .peek_at(0)
                .is_some_and(|b| b.is_ascii_hexdigit() || b == b'_')
            {
                self.pos += 1;
            }
        } else {
            let digits = |s: &mut Self| {
                while s.peek_at(0).is_some_and(|b| b.is_ascii_digit() || b == b'_') {
                    s.pos += 1;
                }
            };
            digits(self);
            if self.peek_at(0) == Some(b'.') {
                self.pos += 1;
                digits(self);
            }
            if matches!(self.peek_at(0), Some(b'e' | b'E')) {
                let mut look = 1;
                if matches!(self.peek_at(1), Some(b'+' | b'-')) {
                    look = 2;
                }
                if self.peek_at(look).is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += look;
                    digits(self);
                }
            }
        }
        let raw: String = self.text[start..self.pos].chars().filter(|&c| c != '_').collect();
        if self.peek_at(0) == Some(b'n') {
            self.pos += 1;
            self.token_value = raw + "n";
            return SyntaxKind::BigIntLiteral;
        }
        self.token_value = raw;
        SyntaxKind::NumericLiteral
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        if quote == '\'' {
            self.token_flags |= TokenFlags::SINGLE_QUOTE;
        }
        self.pos += 1;
        loop {
            let Some(ch) = self.peek() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == '\n' || ch == '\r' {
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            }
            if ch == '\\' {
                self.scan_escape();
                continue;
            }
            self.token_value.push(ch);
            self.pos += ch.len_utf8();
        }
        SyntaxKind::StringLiteral
    }

    fn scan_escape(&mut self) {
        self.pos += 1;
        let Some(ch) = self.peek() else {
            return;
        };
        self.pos += ch.len_utf8();
        let cooked = match ch {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' if !self.peek_at(0).is_some_and(|b| b.is_ascii_digit()) => '\0',
            'x' => {
                let decoded = self
                    .text
                    .get(self.pos..self.pos + 2)
                    .and_then(|h| u32::from_str_radix(h, 16).ok())
                    .and_then(char::from_u32);
                match decoded {
                    Some(c) => {
                        self.pos += 2;
                        c
                    }
                    None => 'x',
                }
            }
            'u' => match self.scan_unicode_escape_digits() {
                Some(c) => c,
                None => 'u',
            },
            // Line continuation
            '\r' => {
                if self.peek_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
                return;
            }
            '\n' | '\u{2028}' | '\u{2029}' => return,
            other => other,
        };
        self.token_value.push(cooked);
    }

    /// Scan template characters after a '`' or a '}' continuation.
    fn scan_template(&mut self, is_start: bool) -> SyntaxKind {
        loop {
            let Some(ch) = self.peek() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                return if is_start {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            };
            match ch {
                '`' => {
                    self.pos += 1;
                    return if is_start {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                '$' if self.peek_at(1) == Some(b'{') => {
                    self.pos += 2;
                    return if is_start {
                        SyntaxKind::TemplateHead
                    } else {
                        SyntaxKind::TemplateMiddle
                    };
                }
                '\\' => self.scan_escape(),
                _ => {
                    if ch == '\n' || ch == '\r' {
                        self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    }
                    self.token_value.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }
    }

    /// Reinterpret the current `}` as the continuation of a template.
    pub fn rescan_template_continuation(&mut self) -> SyntaxKind {
        self.pos = self.token_start + 1;
        self.token_value.clear();
        self.token = self.scan_template(false);
        self.token
    }

    /// Reinterpret the current `/` or `/=` as a regular expression literal.
    pub fn rescan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(self.token, SyntaxKind::Slash | SyntaxKind::SlashEquals) {
            return self.token;
        }
        let bytes = self.text.as_bytes();
        let mut p = self.token_start + 1;
        let mut in_class = false;
        loop {
            let Some(&b) = bytes.get(p) else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            };
            match b {
                b'\n' | b'\r' => {
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    break;
                }
                b'\\' => p += 2,
                b'[' => {
                    in_class = true;
                    p += 1;
                }
                b']' => {
                    in_class = false;
                    p += 1;
                }
                b'/' if !in_class => {
                    p += 1;
                    while bytes.get(p).is_some_and(|b| b.is_ascii_alphabetic()) {
                        p += 1;
                    }
                    break;
                }
                _ => p += 1,
            }
        }
        self.pos = p.min(bytes.len());
        self.token_value = self.text[self.token_start..self.pos].to_string();
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }

    /// Combine the current `>` with directly following `>`/`=` characters.
    pub fn rescan_greater_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::GreaterThan {
            return self.token;
        }
        let (kind, len) = match (self.peek_at(0), self.peek_at(1), self.peek_at(2)) {
            (Some(b'>'), Some(b'>'), Some(b'=')) => {
                (SyntaxKind::GreaterThanGreaterThanGreaterThanEquals, 3)
            }
            (Some(b'>'), Some(b'>'), _) => (SyntaxKind::GreaterThanGreaterThanGreaterThan, 2),
            (Some(b'>'), Some(b'='), _) => (SyntaxKind::GreaterThanGreaterThanEquals, 2),
            (Some(b'>'), _, _) => (SyntaxKind::GreaterThanGreaterThan, 1),
            (Some(b'='), _, _) => (SyntaxKind::GreaterThanEquals, 1),
            _ => (SyntaxKind::GreaterThan, 0),
        };
        self.pos += len;
        self.token = kind;
        kind
    }
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod scanner_tests;

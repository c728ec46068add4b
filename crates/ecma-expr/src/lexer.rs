//! On-demand ECMAScript tokenizer.
//!
//! The lexer is pulled one token at a time. Comments are buffered as they are skipped and must
//! be drained with [`Lexer::take_comments`] after every call, including failed ones, so callers
//! observe them in source order before the token that follows them.

use core::mem;

use crate::error::SyntaxError;
use crate::position::{Span, is_line_terminator};
use crate::token::{RawComment, RawToken, RawTokenKind, keyword};

/// Longest spellings first so that prefix matching picks the maximal punctuator.
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==", "!=",
    "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "%=", "&=", "|=", "^=", "/=",
    "**", "<<", ">>", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-", "*", "%", "&",
    "|", "^", "!", "~", "?", ":", "=", ".", "/",
];

const REGEX_FLAGS: &str = "dgimsuyv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemplateMode {
    Off,
    /// The next token is a template chunk, possibly empty.
    Chunk,
    /// The next token is `${` or the closing backquote.
    AfterChunk,
}

pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    ecma_version: u32,
    regex_allowed: bool,
    /// One entry per open brace; `true` marks a template substitution.
    braces: Vec<bool>,
    template: TemplateMode,
    comments: Vec<RawComment>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, offset: usize, ecma_version: u32) -> Self {
        Self {
            source,
            pos: offset.min(source.len()),
            ecma_version,
            regex_allowed: true,
            braces: Vec::new(),
            template: TemplateMode::Off,
            comments: Vec::new(),
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Comments skipped since the last call.
    pub fn take_comments(&mut self) -> Vec<RawComment> {
        mem::take(&mut self.comments)
    }

    /// Reads the next token.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] for malformed token text.
    pub fn next_token(&mut self) -> Result<RawToken, SyntaxError> {
        let token = match self.template {
            TemplateMode::Chunk => self.read_template_chunk()?,
            TemplateMode::AfterChunk => self.read_template_delimiter()?,
            TemplateMode::Off => {
                self.skip_space()?;
                self.read_token()?
            }
        };
        self.regex_allowed = regex_allowed_after(&token.kind);
        Ok(token)
    }

    fn rest(&self) -> &'src str {
        self.source.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn finish(&self, kind: RawTokenKind, start: usize) -> RawToken {
        RawToken {
            kind,
            span: Span::new(start, self.pos),
        }
    }

    fn skip_space(&mut self) -> Result<(), SyntaxError> {
        while let Some(c) = self.peek() {
            if c == '/' {
                match self.peek_at(1) {
                    Some('/') => self.skip_line_comment(),
                    Some('*') => self.skip_block_comment()?,
                    _ => return Ok(()),
                }
            } else if is_whitespace(c) {
                self.pos += c.len_utf8();
            } else {
                return Ok(());
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        let start = self.pos;
        let body = self.source.get(start + 2..).unwrap_or_default();
        let len = body.find(is_line_terminator).unwrap_or(body.len());
        self.pos = start + 2 + len;
        self.comments.push(RawComment {
            block: false,
            text: body[..len].to_string(),
            span: Span::new(start, self.pos),
        });
    }

    fn skip_block_comment(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        let body = self.source.get(start + 2..).unwrap_or_default();
        let Some(len) = body.find("*/") else {
            return Err(SyntaxError::new(start, "Unterminated comment"));
        };
        self.pos = start + 2 + len + 2;
        self.comments.push(RawComment {
            block: true,
            text: body[..len].to_string(),
            span: Span::new(start, self.pos),
        });
        Ok(())
    }

    fn read_token(&mut self) -> Result<RawToken, SyntaxError> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(self.finish(RawTokenKind::Eof, start));
        };
        if is_id_start(c) || c == '\\' {
            return self.read_word();
        }
        match c {
            '0'..='9' => self.read_number(false),
            '.' if self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) => self.read_number(true),
            '"' | '\'' => self.read_string(c),
            '`' => self.read_back_quote(c),
            '/' if self.regex_allowed => self.read_regex(),
            _ => self.read_punct(c),
        }
    }

    fn punct_available(&self, punct: &str) -> bool {
        match punct {
            "?." => {
                self.ecma_version >= 2020
                    && !self.peek_at(2).is_some_and(|c| c.is_ascii_digit())
            }
            "??" => self.ecma_version >= 2020,
            "??=" | "&&=" | "||=" => self.ecma_version >= 2021,
            "**" | "**=" => self.ecma_version >= 2016,
            "=>" | "..." => self.ecma_version >= 2015,
            _ => true,
        }
    }

    fn read_punct(&mut self, c: char) -> Result<RawToken, SyntaxError> {
        let start = self.pos;
        let rest = self.rest();
        let Some(punct) = PUNCTUATORS
            .iter()
            .copied()
            .find(|p| rest.starts_with(p) && self.punct_available(p))
        else {
            return Err(SyntaxError::new(
                start,
                format!("Unexpected character '{c}'"),
            ));
        };
        self.pos += punct.len();
        match punct {
            "{" => self.braces.push(false),
            "}" => {
                if self.braces.pop() == Some(true) {
                    self.template = TemplateMode::Chunk;
                }
            }
            _ => {}
        }
        Ok(self.finish(RawTokenKind::Punct(punct), start))
    }

    fn read_word(&mut self) -> Result<RawToken, SyntaxError> {
        let start = self.pos;
        let (name, escaped) = self.read_word_chars()?;
        if let Some(word) = keyword(&name) {
            if escaped {
                return Err(SyntaxError::new(
                    start,
                    format!("Escape sequence in keyword {name}"),
                ));
            }
            return Ok(self.finish(RawTokenKind::Keyword(word), start));
        }
        Ok(self.finish(RawTokenKind::Name { name, escaped }, start))
    }

    fn read_word_chars(&mut self) -> Result<(String, bool), SyntaxError> {
        let mut name = String::new();
        let mut escaped = false;
        while let Some(c) = self.peek() {
            let first = name.is_empty();
            if c == '\\' {
                let escape_start = self.pos;
                self.pos += 1;
                if self.peek() != Some('u') {
                    return Err(SyntaxError::new(
                        self.pos,
                        "Expecting Unicode escape sequence \\uXXXX",
                    ));
                }
                self.pos += 1;
                let code = self.read_code_point()?;
                let decoded = char::from_u32(code).filter(|&ch| {
                    if first {
                        is_id_start(ch)
                    } else {
                        is_id_continue(ch)
                    }
                });
                let Some(ch) = decoded else {
                    return Err(SyntaxError::new(escape_start, "Invalid Unicode escape"));
                };
                name.push(ch);
                escaped = true;
            } else if (first && is_id_start(c)) || (!first && is_id_continue(c)) {
                name.push(c);
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        Ok((name, escaped))
    }

    fn read_back_quote(&mut self, c: char) -> Result<RawToken, SyntaxError> {
        let start = self.pos;
        if self.ecma_version < 2015 {
            return Err(SyntaxError::new(
                start,
                format!("Unexpected character '{c}'"),
            ));
        }
        self.pos += 1;
        self.template = TemplateMode::Chunk;
        Ok(self.finish(RawTokenKind::BackQuote, start))
    }

    fn read_template_delimiter(&mut self) -> Result<RawToken, SyntaxError> {
        let start = self.pos;
        if self.rest().starts_with("${") {
            self.pos += 2;
            self.braces.push(true);
            self.template = TemplateMode::Off;
            return Ok(self.finish(RawTokenKind::DollarBraceL, start));
        }
        self.pos += 1;
        self.template = TemplateMode::Off;
        Ok(self.finish(RawTokenKind::BackQuote, start))
    }

    fn read_template_chunk(&mut self) -> Result<RawToken, SyntaxError> {
        let start = self.pos;
        let mut raw = String::new();
        let mut cooked = Some(String::new());
        loop {
            let Some(c) = self.peek() else {
                return Err(SyntaxError::new(start, "Unterminated template"));
            };
            if c == '`' || self.rest().starts_with("${") {
                break;
            }
            match c {
                '\\' => {
                    let escape_start = self.pos;
                    self.pos += 1;
                    let value = self.read_escape(true);
                    raw.push_str(&normalize_newlines(&self.source[escape_start..self.pos]));
                    match (value, cooked.as_mut()) {
                        (Ok(text), Some(out)) => out.push_str(&text),
                        (Err(_), _) => cooked = None,
                        (Ok(_), None) => {}
                    }
                }
                '\r' => {
                    self.pos += 1;
                    if self.peek() == Some('\n') {
                        self.pos += 1;
                    }
                    raw.push('\n');
                    if let Some(out) = cooked.as_mut() {
                        out.push('\n');
                    }
                }
                _ => {
                    self.pos += c.len_utf8();
                    raw.push(c);
                    if let Some(out) = cooked.as_mut() {
                        out.push(c);
                    }
                }
            }
        }
        self.template = TemplateMode::AfterChunk;
        Ok(self.finish(RawTokenKind::Template { raw, cooked }, start))
    }

    fn read_string(&mut self, quote: char) -> Result<RawToken, SyntaxError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(SyntaxError::new(start, "Unterminated string constant"));
            };
            if c == quote {
                self.pos += 1;
                break;
            }
            match c {
                '\\' => {
                    self.pos += 1;
                    value.push_str(&self.read_escape(false)?);
                }
                '\n' | '\r' => {
                    return Err(SyntaxError::new(start, "Unterminated string constant"));
                }
                _ => {
                    value.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        Ok(self.finish(RawTokenKind::String(value), start))
    }

    /// Decodes one escape sequence; the backslash is already consumed.
    fn read_escape(&mut self, in_template: bool) -> Result<String, SyntaxError> {
        let Some(c) = self.peek() else {
            return Ok(String::new());
        };
        let escape_start = self.pos - 1;
        self.pos += c.len_utf8();
        let decoded = match c {
            'n' => "\n".to_string(),
            'r' => "\r".to_string(),
            't' => "\t".to_string(),
            'b' => "\u{8}".to_string(),
            'v' => "\u{b}".to_string(),
            'f' => "\u{c}".to_string(),
            'x' => code_point_string(self.read_hex(2)?),
            'u' => self.read_unicode_escape()?,
            '\r' => {
                if self.peek() == Some('\n') {
                    self.pos += 1;
                }
                String::new()
            }
            '\n' | '\u{2028}' | '\u{2029}' => String::new(),
            '8' | '9' if in_template => {
                return Err(SyntaxError::new(
                    escape_start,
                    "Invalid escape sequence in template string",
                ));
            }
            '0'..='7' => self.read_octal_escape(c, escape_start, in_template)?,
            _ => c.to_string(),
        };
        Ok(decoded)
    }

    fn read_octal_escape(
        &mut self,
        first: char,
        escape_start: usize,
        in_template: bool,
    ) -> Result<String, SyntaxError> {
        let digits_start = self.pos - 1;
        let digits: String = self
            .source
            .get(digits_start..)
            .unwrap_or_default()
            .chars()
            .take(3)
            .take_while(|c| ('0'..='7').contains(c))
            .collect();
        let mut digits = digits.as_str();
        let mut value = u32::from_str_radix(digits, 8).unwrap_or(0);
        if value > 255 {
            digits = &digits[..digits.len() - 1];
            value = u32::from_str_radix(digits, 8).unwrap_or(0);
        }
        self.pos = digits_start + digits.len();
        let next = self.peek();
        let is_plain_nul = first == '0' && digits == "0" && !matches!(next, Some('8' | '9'));
        if in_template && !is_plain_nul {
            return Err(SyntaxError::new(
                escape_start,
                "Octal literal in template string",
            ));
        }
        Ok(code_point_string(value))
    }

    fn read_hex(&mut self, len: usize) -> Result<u32, SyntaxError> {
        let start = self.pos;
        let digits = self.rest().get(..len).unwrap_or_default();
        if digits.len() != len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SyntaxError::new(start, "Bad character escape sequence"));
        }
        self.pos += len;
        u32::from_str_radix(digits, 16)
            .map_err(|_| SyntaxError::new(start, "Bad character escape sequence"))
    }

    /// Reads the payload of `\u`, either `XXXX` or `{X...}`.
    fn read_code_point(&mut self) -> Result<u32, SyntaxError> {
        if self.peek() != Some('{') {
            return self.read_hex(4);
        }
        let start = self.pos;
        if self.ecma_version < 2015 {
            return Err(SyntaxError::new(start, "Bad character escape sequence"));
        }
        self.pos += 1;
        let body = self.rest();
        let len = body.find('}').unwrap_or(0);
        let digits = &body[..len];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SyntaxError::new(self.pos, "Bad character escape sequence"));
        }
        let code = u32::from_str_radix(digits, 16).unwrap_or(u32::MAX);
        if code > 0x0010_FFFF {
            return Err(SyntaxError::new(start, "Code point out of bounds"));
        }
        self.pos += len + 1;
        Ok(code)
    }

    /// `\u` escape in a string or template, joining surrogate pairs.
    fn read_unicode_escape(&mut self) -> Result<String, SyntaxError> {
        let code = self.read_code_point()?;
        if (0xD800..0xDC00).contains(&code) && self.rest().starts_with("\\u") {
            let save = self.pos;
            self.pos += 2;
            if let Ok(low @ 0xDC00..=0xDFFF) = self.read_code_point() {
                let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                return Ok(code_point_string(combined));
            }
            self.pos = save;
        }
        Ok(code_point_string(code))
    }

    fn read_number(&mut self, starts_with_dot: bool) -> Result<RawToken, SyntaxError> {
        let start = self.pos;
        if !starts_with_dot && let Some(radix) = self.radix_prefix() {
            return self.read_radix_number(radix);
        }
        let maybe_legacy_octal = !starts_with_dot && self.peek() == Some('0');
        if !starts_with_dot && self.read_digits(10, maybe_legacy_octal)? == 0 {
            return Err(SyntaxError::new(start, "Invalid number"));
        }
        let int_text = &self.source[start..self.pos];
        let octal = maybe_legacy_octal && int_text.len() >= 2 && !int_text.contains(['8', '9']);
        if !octal && !starts_with_dot && self.peek() == Some('n') && self.ecma_version >= 2020 {
            let digits = int_text.replace('_', "");
            self.pos += 1;
            self.check_after_number()?;
            return Ok(self.finish(RawTokenKind::BigInt(digits), start));
        }
        if !octal && self.peek() == Some('.') {
            self.pos += 1;
            self.read_digits(10, false)?;
        }
        if !octal && matches!(self.peek(), Some('e' | 'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some('+' | '-')) {
                self.pos += 1;
            }
            if self.read_digits(10, false)? == 0 {
                return Err(SyntaxError::new(start, "Invalid number"));
            }
        }
        self.check_after_number()?;
        let text = &self.source[start..self.pos];
        let value = if octal {
            parse_radix(&text[1..], 8)
        } else {
            parse_decimal(text)
        };
        Ok(self.finish(RawTokenKind::Num(value), start))
    }

    fn radix_prefix(&self) -> Option<u32> {
        if self.peek() != Some('0') {
            return None;
        }
        match self.peek_at(1) {
            Some('x' | 'X') => Some(16),
            Some('o' | 'O') if self.ecma_version >= 2015 => Some(8),
            Some('b' | 'B') if self.ecma_version >= 2015 => Some(2),
            _ => None,
        }
    }

    fn read_radix_number(&mut self, radix: u32) -> Result<RawToken, SyntaxError> {
        let start = self.pos;
        self.pos += 2;
        if self.read_digits(radix, false)? == 0 {
            return Err(SyntaxError::new(
                start + 2,
                format!("Expected number in radix {radix}"),
            ));
        }
        let text = self.source[start..self.pos].replace('_', "");
        if self.peek() == Some('n') && self.ecma_version >= 2020 {
            self.pos += 1;
            self.check_after_number()?;
            return Ok(self.finish(RawTokenKind::BigInt(text), start));
        }
        self.check_after_number()?;
        let value = parse_radix(&text[2..], radix);
        Ok(self.finish(RawTokenKind::Num(value), start))
    }

    /// Consumes a digit run with optional separators, returning how many digits it held.
    fn read_digits(&mut self, radix: u32, maybe_legacy_octal: bool) -> Result<usize, SyntaxError> {
        let allow_separators = self.ecma_version >= 2021;
        let legacy_octal = maybe_legacy_octal && self.peek() == Some('0');
        let mut count = 0;
        let mut last_was_separator = false;
        let mut first = true;
        while let Some(c) = self.peek() {
            if allow_separators && c == '_' {
                if legacy_octal {
                    return Err(SyntaxError::new(
                        self.pos,
                        "Numeric separator is not allowed in legacy octal like numbers",
                    ));
                }
                if last_was_separator {
                    return Err(SyntaxError::new(
                        self.pos,
                        "Numeric separator must be exactly one underscore",
                    ));
                }
                if first {
                    return Err(SyntaxError::new(
                        self.pos,
                        "Numeric separator is not allowed at the first of digits",
                    ));
                }
                last_was_separator = true;
            } else if c.to_digit(radix).is_some() {
                last_was_separator = false;
                count += 1;
            } else {
                break;
            }
            first = false;
            self.pos += 1;
        }
        if last_was_separator {
            return Err(SyntaxError::new(
                self.pos - 1,
                "Numeric separator is not allowed at the last of digits",
            ));
        }
        Ok(count)
    }

    fn check_after_number(&self) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(c) if is_id_start(c) || c == '\\' => Err(SyntaxError::new(
                self.pos,
                "Identifier directly after number",
            )),
            _ => Ok(()),
        }
    }

    fn read_regex(&mut self) -> Result<RawToken, SyntaxError> {
        let start = self.pos;
        self.pos += 1;
        let mut escaped = false;
        let mut in_class = false;
        loop {
            let Some(c) = self.peek() else {
                return Err(SyntaxError::new(start, "Unterminated regular expression"));
            };
            if is_line_terminator(c) {
                return Err(SyntaxError::new(start, "Unterminated regular expression"));
            }
            self.pos += c.len_utf8();
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '[' => in_class = true,
                ']' if in_class => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        let pattern = self.source[start + 1..self.pos - 1].to_string();
        let flags_start = self.pos;
        while self.peek().is_some_and(is_id_continue) {
            self.pos += self.peek().map_or(1, char::len_utf8);
        }
        let flags = self.source[flags_start..self.pos].to_string();
        if !valid_regex_flags(&flags) {
            return Err(SyntaxError::new(start, "Invalid regular expression flag"));
        }
        Ok(self.finish(RawTokenKind::Regex { pattern, flags }, start))
    }
}

fn valid_regex_flags(flags: &str) -> bool {
    let mut seen = String::new();
    for flag in flags.chars() {
        if !REGEX_FLAGS.contains(flag) || seen.contains(flag) {
            return false;
        }
        seen.push(flag);
    }
    !(seen.contains('u') && seen.contains('v'))
}

fn regex_allowed_after(kind: &RawTokenKind) -> bool {
    match kind {
        RawTokenKind::Keyword(word) => !matches!(*word, "this" | "super" | "true" | "false" | "null"),
        RawTokenKind::Punct(punct) => !matches!(*punct, ")" | "]" | "}" | "++" | "--"),
        RawTokenKind::DollarBraceL | RawTokenKind::Eof => true,
        RawTokenKind::Name { .. }
        | RawTokenKind::String(_)
        | RawTokenKind::Num(_)
        | RawTokenKind::BigInt(_)
        | RawTokenKind::Regex { .. }
        | RawTokenKind::BackQuote
        | RawTokenKind::Template { .. } => false,
    }
}

fn is_whitespace(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

fn is_id_continue(c: char) -> bool {
    is_id_start(c) || c.is_alphanumeric() || c == '\u{200c}' || c == '\u{200d}'
}

/// Lone surrogates have no `char`, so they cook to U+FFFD.
fn code_point_string(code: u32) -> String {
    char::from_u32(code)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
        .to_string()
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, digit| acc * f64::from(radix) + f64::from(digit))
}

fn parse_decimal(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let (mantissa, exponent) = match cleaned.find(['e', 'E']) {
        Some(index) => cleaned.split_at(index),
        None => (cleaned.as_str(), ""),
    };
    let mut normalized = String::with_capacity(cleaned.len() + 2);
    if mantissa.starts_with('.') {
        normalized.push('0');
    }
    normalized.push_str(mantissa);
    if mantissa.ends_with('.') {
        normalized.push('0');
    }
    normalized.push_str(exponent);
    normalized.parse().unwrap_or(f64::NAN)
}

//! The Cangjie scanner.
//!
//! Converts source text into tokens on demand. How the next bytes are read
//! depends on the top frame of a mode stack: in `Normal` frames tokens are
//! separated by trivia, inside string frames text runs become content
//! tokens and `${` opens a hole that pushes a fresh `Normal` frame. The
//! matching `}` pops back to the string.

use crate::char_codes::*;
use crate::error::LexError;
use crate::token::TokenInfo;
use cangjie_ast::syntax_kind::SyntaxKind;
use cangjie_ast::types::TokenFlags;
use cangjie_core::text::TextSpan;
use cangjie_diagnostics::DiagnosticCollection;

/// One frame of the lexer mode stack.
///
/// Raw strings get no frame: they cannot hold interpolation holes, so
/// `scan_raw_string` reads one whole, checking the closing fence width
/// against the opening one as it goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerMode {
    /// Ordinary tokens. `brace_depth` counts `{` opened inside this frame so
    /// the `}` that closes an interpolation hole can be told apart.
    Normal { brace_depth: u32 },
    /// Body of a `"..."` or `'...'` string.
    LineString { quote: u8 },
    /// Body of a `"""..."""` or `'''...'''` string.
    MultiLineString { quote: u8 },
}

/// Saved scanner state for lookahead and speculative parsing.
#[derive(Debug, Clone)]
pub struct ScannerState {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_suffix: Option<&'static str>,
    token_flags: TokenFlags,
    modes: Vec<LexerMode>,
    diagnostic_count: usize,
}

/// The scanner converts Cangjie source text into tokens.
pub struct Scanner<'src> {
    text: &'src str,
    bytes: &'src [u8],
    /// Current position in the text.
    pos: usize,
    /// Start of the current token (after leading trivia).
    token_start: usize,
    token: SyntaxKind,
    /// Cooked payload of the current token.
    token_value: String,
    token_suffix: Option<&'static str>,
    token_flags: TokenFlags,
    modes: Vec<LexerMode>,
    diagnostics: DiagnosticCollection,
}

impl<'src> Scanner<'src> {
    /// Create a new scanner for the given source text.
    pub fn new(text: &'src str) -> Self {
        let mut scanner = Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_suffix: None,
            token_flags: TokenFlags::NONE,
            modes: vec![LexerMode::Normal { brace_depth: 0 }],
            diagnostics: DiagnosticCollection::new(),
        };
        if text.starts_with('\u{feff}') {
            scanner.pos = '\u{feff}'.len_utf8();
        }
        scanner
    }

    /// The source text being scanned.
    pub fn text(&self) -> &'src str {
        self.text
    }

    /// Look ahead: save state, call f, restore state and return the result.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Width suffix of the current numeric literal, e.g. `u8` or `f32`.
    #[inline]
    pub fn token_suffix(&self) -> Option<&'static str> {
        self.token_suffix
    }

    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// End of the current token.
    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn token_span(&self) -> TextSpan {
        TextSpan::from_bounds(self.token_start as u32, self.pos as u32)
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    /// Mark the current token with extra flags, e.g. the trivia of skipped
    /// invalid characters before it.
    pub fn add_token_flags(&mut self, flags: TokenFlags) {
        self.token_flags |= flags;
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    /// Whether whitespace or a comment separates this token from the
    /// previous one.
    #[inline]
    pub fn has_preceding_trivia(&self) -> bool {
        self.token_flags
            .intersects(TokenFlags::PRECEDING_TRIVIA | TokenFlags::PRECEDING_LINE_BREAK)
    }

    /// Number of frames on the mode stack; 1 at top level.
    pub fn mode_depth(&self) -> usize {
        self.modes.len()
    }

    pub fn current_mode(&self) -> LexerMode {
        self.modes
            .last()
            .copied()
            .unwrap_or(LexerMode::Normal { brace_depth: 0 })
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn token_info(&self) -> TokenInfo {
        TokenInfo {
            kind: self.token,
            span: self.token_span(),
            value: self.token_value.clone(),
            suffix: self.token_suffix,
            flags: self.token_flags,
        }
    }

    /// Save the full scanner state, including the mode stack and the
    /// number of diagnostics reported so far.
    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_suffix: self.token_suffix,
            token_flags: self.token_flags,
            modes: self.modes.clone(),
            diagnostic_count: self.diagnostics.len(),
        }
    }

    /// Restore a saved state. Diagnostics reported after the save are
    /// discarded with it.
    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.token_suffix = state.token_suffix;
        self.token_flags = state.token_flags;
        self.modes = state.modes;
        self.diagnostics.truncate(state.diagnostic_count);
    }

    /// Reset the scanner to a position in normal mode.
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.bytes.len());
        self.token_start = self.pos;
        self.token = SyntaxKind::Unknown;
        self.token_value.clear();
        self.token_suffix = None;
        self.token_flags = TokenFlags::NONE;
        self.modes.truncate(1);
        self.modes[0] = LexerMode::Normal { brace_depth: 0 };
    }

    // ========================================================================
    // Character access
    // ========================================================================

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    #[inline]
    fn current_byte(&self) -> Option<u8> {
        self.byte_at(0)
    }

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text.get(self.pos..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn error(&mut self, error: LexError, start: usize, end: usize) {
        let span = TextSpan::from_bounds(start as u32, end as u32);
        self.diagnostics.add(error.into_diagnostic(span));
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    fn skip_trivia(&mut self) {
        while let Some(b) = self.current_byte() {
            match b {
                LINE_FEED | CARRIAGE_RETURN => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += 1;
                }
                _ if is_white_space_single_line(b) => {
                    self.token_flags |= TokenFlags::PRECEDING_TRIVIA;
                    self.pos += 1;
                }
                b'/' if self.byte_at(1) == Some(b'/') => {
                    self.token_flags |= TokenFlags::PRECEDING_TRIVIA;
                    self.pos = match memchr::memchr(LINE_FEED, &self.bytes[self.pos..]) {
                        Some(offset) => self.pos + offset,
                        None => self.bytes.len(),
                    };
                }
                b'/' if self.byte_at(1) == Some(b'*') => {
                    self.token_flags |= TokenFlags::PRECEDING_TRIVIA;
                    self.skip_block_comment();
                }
                _ => return,
            }
        }
    }

    /// Skip a possibly nested `/* ... */` comment.
    fn skip_block_comment(&mut self) {
        let start = self.pos;
        self.pos += 2;
        let mut depth = 1u32;
        while let Some(offset) = memchr::memchr3(b'*', b'/', LINE_FEED, &self.bytes[self.pos..]) {
            self.pos += offset;
            match (self.bytes[self.pos], self.byte_at(1)) {
                (LINE_FEED, _) => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += 1;
                }
                (b'*', Some(b'/')) => {
                    self.pos += 2;
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                (b'/', Some(b'*')) => {
                    self.pos += 2;
                    depth += 1;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.bytes.len();
        self.error(LexError::UnterminatedComment, start, start + 2);
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();
        self.token_suffix = None;

        self.token = match self.current_mode() {
            LexerMode::LineString { quote } => {
                self.token_start = self.pos;
                self.scan_string_body(quote, false)
            }
            LexerMode::MultiLineString { quote } => {
                self.token_start = self.pos;
                self.scan_string_body(quote, true)
            }
            LexerMode::Normal { .. } => {
                self.skip_trivia();
                self.token_start = self.pos;
                if self.is_eof() {
                    self.finish_at_eof()
                } else {
                    self.scan_normal()
                }
            }
        };
        self.token
    }

    fn finish_at_eof(&mut self) -> SyntaxKind {
        if self.modes.len() > 1 {
            let end = self.bytes.len();
            self.error(LexError::UnterminatedInterpolation, end, end);
            self.modes.truncate(1);
        }
        SyntaxKind::EndOfFileToken
    }

    fn scan_normal(&mut self) -> SyntaxKind {
        let b = self.bytes[self.pos];
        match b {
            b'(' => self.single(SyntaxKind::OpenParenToken),
            b')' => self.single(SyntaxKind::CloseParenToken),
            b'[' => self.single(SyntaxKind::OpenBracketToken),
            b']' => self.single(SyntaxKind::CloseBracketToken),
            b';' => self.single(SyntaxKind::SemicolonToken),
            b',' => self.single(SyntaxKind::CommaToken),
            b':' => self.single(SyntaxKind::ColonToken),
            b'@' => self.single(SyntaxKind::AtToken),
            b'\\' => self.single(SyntaxKind::BackslashToken),
            b'{' => {
                if let Some(LexerMode::Normal { brace_depth }) = self.modes.last_mut() {
                    *brace_depth += 1;
                }
                self.single(SyntaxKind::OpenBraceToken)
            }
            b'}' => self.scan_close_brace(),
            b'.' => self.scan_dot(),
            b'?' => self.one_of(&[("??", SyntaxKind::QuestionQuestionToken)], SyntaxKind::QuestionToken),
            b'<' => self.one_of(
                &[
                    ("<<=", SyntaxKind::LessThanLessThanEqualsToken),
                    ("<<", SyntaxKind::LessThanLessThanToken),
                    ("<=", SyntaxKind::LessThanEqualsToken),
                    ("<-", SyntaxKind::LessThanMinusToken),
                    ("<:", SyntaxKind::LessThanColonToken),
                ],
                SyntaxKind::LessThanToken,
            ),
            // Nested generic lists close with `>>`; the parser rescans in
            // operator position.
            b'>' => self.single(SyntaxKind::GreaterThanToken),
            b'=' => self.one_of(
                &[
                    ("==", SyntaxKind::EqualsEqualsToken),
                    ("=>", SyntaxKind::EqualsGreaterThanToken),
                ],
                SyntaxKind::EqualsToken,
            ),
            b'!' => self.one_of(&[("!=", SyntaxKind::ExclamationEqualsToken)], SyntaxKind::ExclamationToken),
            b'+' => self.one_of(
                &[("++", SyntaxKind::PlusPlusToken), ("+=", SyntaxKind::PlusEqualsToken)],
                SyntaxKind::PlusToken,
            ),
            b'-' => self.one_of(
                &[
                    ("--", SyntaxKind::MinusMinusToken),
                    ("-=", SyntaxKind::MinusEqualsToken),
                    ("->", SyntaxKind::MinusGreaterThanToken),
                ],
                SyntaxKind::MinusToken,
            ),
            b'*' => self.one_of(
                &[
                    ("**=", SyntaxKind::AsteriskAsteriskEqualsToken),
                    ("**", SyntaxKind::AsteriskAsteriskToken),
                    ("*=", SyntaxKind::AsteriskEqualsToken),
                ],
                SyntaxKind::AsteriskToken,
            ),
            b'/' => self.one_of(&[("/=", SyntaxKind::SlashEqualsToken)], SyntaxKind::SlashToken),
            b'%' => self.one_of(&[("%=", SyntaxKind::PercentEqualsToken)], SyntaxKind::PercentToken),
            b'&' => self.one_of(
                &[
                    ("&&=", SyntaxKind::AmpersandAmpersandEqualsToken),
                    ("&&", SyntaxKind::AmpersandAmpersandToken),
                    ("&=", SyntaxKind::AmpersandEqualsToken),
                ],
                SyntaxKind::AmpersandToken,
            ),
            b'|' => self.one_of(
                &[
                    ("||=", SyntaxKind::BarBarEqualsToken),
                    ("||", SyntaxKind::BarBarToken),
                    ("|=", SyntaxKind::BarEqualsToken),
                    ("|>", SyntaxKind::BarGreaterThanToken),
                ],
                SyntaxKind::BarToken,
            ),
            b'^' => self.one_of(&[("^=", SyntaxKind::CaretEqualsToken)], SyntaxKind::CaretToken),
            b'~' => self.one_of(&[("~>", SyntaxKind::TildeGreaterThanToken)], SyntaxKind::TildeToken),
            b'$' => self.scan_dollar(),
            HASH => self.scan_hash(),
            DOUBLE_QUOTE | SINGLE_QUOTE => self.scan_string_start(b),
            BACKTICK => self.scan_raw_identifier(),
            b'0'..=b'9' => self.scan_number(),
            b'r' if matches!(self.byte_at(1), Some(DOUBLE_QUOTE | SINGLE_QUOTE)) => {
                self.scan_char_literal(SyntaxKind::RuneLiteral)
            }
            b'b' if self.byte_at(1) == Some(SINGLE_QUOTE) => self.scan_char_literal(SyntaxKind::ByteLiteral),
            b'b' if self.byte_at(1) == Some(DOUBLE_QUOTE) => self.scan_byte_string(),
            _ => match self.current_char() {
                Some(ch) if is_identifier_start(ch) => self.scan_identifier(),
                Some(ch) => {
                    let start = self.pos;
                    self.pos += ch.len_utf8();
                    self.error(LexError::InvalidCharacter(ch), start, self.pos);
                    SyntaxKind::Unknown
                }
                None => {
                    self.pos += 1;
                    SyntaxKind::Unknown
                }
            },
        }
    }

    #[inline]
    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    /// Match the longest of `candidates` at the current position, falling
    /// back to the one-byte `default`.
    fn one_of(&mut self, candidates: &[(&str, SyntaxKind)], default: SyntaxKind) -> SyntaxKind {
        let rest = &self.bytes[self.pos..];
        for (text, kind) in candidates {
            if rest.starts_with(text.as_bytes()) {
                self.pos += text.len();
                return *kind;
            }
        }
        self.pos += 1;
        default
    }

    fn scan_close_brace(&mut self) -> SyntaxKind {
        let in_hole = self.modes.len() > 1;
        match self.modes.last_mut() {
            Some(LexerMode::Normal { brace_depth: 0 }) if in_hole => {
                self.modes.pop();
                self.pos += 1;
                SyntaxKind::InterpolationEnd
            }
            Some(LexerMode::Normal { brace_depth }) => {
                *brace_depth = brace_depth.saturating_sub(1);
                self.single(SyntaxKind::CloseBraceToken)
            }
            _ => self.single(SyntaxKind::CloseBraceToken),
        }
    }

    fn scan_dot(&mut self) -> SyntaxKind {
        let follows_operand = self.pos > 0
            && matches!(self.bytes[self.pos - 1], b')' | b']' | b'_' | b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9');
        if !follows_operand && self.byte_at(1).map_or(false, is_digit) {
            let start = self.pos;
            self.pos += 1;
            self.scan_digits_where(is_digit);
            self.scan_exponent();
            return self.finish_number(start, true);
        }
        self.one_of(
            &[
                ("...", SyntaxKind::DotDotDotToken),
                ("..=", SyntaxKind::DotDotEqualsToken),
                ("..", SyntaxKind::DotDotToken),
            ],
            SyntaxKind::DotToken,
        )
    }

    /// Rescan `>` as `>=`, `>>` or `>>=` when the following bytes touch it.
    pub fn rescan_greater_than_token(&mut self) -> SyntaxKind {
        if self.token == SyntaxKind::GreaterThanToken {
            match (self.current_byte(), self.byte_at(1)) {
                (Some(b'>'), Some(b'=')) => {
                    self.pos += 2;
                    self.token = SyntaxKind::GreaterThanGreaterThanEqualsToken;
                }
                (Some(b'>'), _) => {
                    self.pos += 1;
                    self.token = SyntaxKind::GreaterThanGreaterThanToken;
                }
                (Some(b'='), next) if next != Some(b'=') && next != Some(b'>') => {
                    self.pos += 1;
                    self.token = SyntaxKind::GreaterThanEqualsToken;
                }
                _ => {}
            }
        }
        self.token
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    fn scan_identifier_text(&mut self) -> &'src str {
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        let text = self.text;
        &text[start..self.pos]
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let text = self.scan_identifier_text();
        if text == "_" {
            return SyntaxKind::UnderscoreToken;
        }
        if let Some(keyword) = SyntaxKind::from_keyword(text) {
            return keyword;
        }
        self.token_value.push_str(text);
        SyntaxKind::Identifier
    }

    fn scan_raw_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        let starts_ok = self.current_char().map_or(false, is_identifier_start);
        let text = if starts_ok { self.scan_identifier_text() } else { "" };
        if text.is_empty() || self.current_byte() != Some(BACKTICK) {
            self.error(LexError::UnterminatedRawIdentifier, start, self.pos);
            self.token_value.push_str(text);
            return SyntaxKind::RawIdentifier;
        }
        self.pos += 1;
        self.token_value.push_str(text);
        SyntaxKind::RawIdentifier
    }

    fn scan_dollar(&mut self) -> SyntaxKind {
        self.pos += 1;
        match self.current_char() {
            Some(ch) if is_identifier_start(ch) => {
                let text = self.scan_identifier_text();
                self.token_value.push_str(text);
                SyntaxKind::DollarIdentifier
            }
            _ => SyntaxKind::DollarToken,
        }
    }

    // ========================================================================
    // Numbers
    // ========================================================================

    /// Consume digits accepted by `pred` and `_` separators. Returns the
    /// number of real digits consumed.
    fn scan_digits_where(&mut self, pred: fn(u8) -> bool) -> usize {
        let mut count = 0;
        while let Some(b) = self.current_byte() {
            if pred(b) {
                count += 1;
            } else if b != UNDERSCORE {
                break;
            }
            self.pos += 1;
        }
        count
    }

    /// Consume `[eE][+-]?digits` if present.
    fn scan_exponent(&mut self) -> bool {
        if !matches!(self.current_byte(), Some(b'e' | b'E')) {
            return false;
        }
        let digit_at = if matches!(self.byte_at(1), Some(b'+' | b'-')) { 2 } else { 1 };
        if !self.byte_at(digit_at).map_or(false, is_digit) {
            return false;
        }
        self.pos += digit_at;
        self.scan_digits_where(is_digit);
        true
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let mut is_float = false;
        let base = match (self.bytes[self.pos], self.byte_at(1)) {
            (b'0', Some(b'x' | b'X')) => Some((TokenFlags::HEX_SPECIFIER, is_hex_digit as fn(u8) -> bool)),
            (b'0', Some(b'b' | b'B')) => Some((TokenFlags::BINARY_SPECIFIER, is_binary_digit as fn(u8) -> bool)),
            (b'0', Some(b'o' | b'O')) => Some((TokenFlags::OCTAL_SPECIFIER, is_octal_digit as fn(u8) -> bool)),
            _ => None,
        };

        match base {
            Some((flag, pred)) => {
                self.pos += 2;
                self.token_flags |= flag;
                let count = self.scan_digits_where(pred);
                if flag == TokenFlags::HEX_SPECIFIER {
                    is_float = self.scan_hex_float_tail();
                }
                if count == 0 && !is_float {
                    self.error(LexError::DigitExpected, start, self.pos);
                }
                if flag != TokenFlags::HEX_SPECIFIER && self.current_byte().map_or(false, is_digit) {
                    let bad = self.pos;
                    self.scan_digits_where(is_digit);
                    self.error(LexError::DigitExpected, bad, self.pos);
                }
            }
            None => {
                self.scan_digits_where(is_digit);
                if self.current_byte() == Some(b'.') && self.byte_at(1).map_or(false, is_digit) {
                    self.pos += 1;
                    self.scan_digits_where(is_digit);
                    is_float = true;
                }
                is_float |= self.scan_exponent();
            }
        }
        self.finish_number(start, is_float)
    }

    /// Hex float tail `[.hexdigits] p[+-]digits`. A fraction without an
    /// exponent is left alone so `0x1.a` stays a member access.
    fn scan_hex_float_tail(&mut self) -> bool {
        let save = self.pos;
        if self.current_byte() == Some(b'.') && self.byte_at(1).map_or(false, is_hex_digit) {
            self.pos += 1;
            self.scan_digits_where(is_hex_digit);
        }
        if matches!(self.current_byte(), Some(b'p' | b'P')) {
            let digit_at = if matches!(self.byte_at(1), Some(b'+' | b'-')) { 2 } else { 1 };
            if self.byte_at(digit_at).map_or(false, is_digit) {
                self.pos += digit_at;
                self.scan_digits_where(is_digit);
                return true;
            }
        }
        self.pos = save;
        false
    }

    fn finish_number(&mut self, start: usize, is_float: bool) -> SyntaxKind {
        self.token_value = self.text[start..self.pos].replace('_', "");
        let kind = if is_float {
            SyntaxKind::FloatLiteral
        } else {
            SyntaxKind::IntegerLiteral
        };
        if !self.current_char().map_or(false, is_identifier_start) {
            return kind;
        }
        let suffix_start = self.pos;
        let word = self.scan_identifier_text();
        let allowed: &[&'static str] = if is_float { &FLOAT_SUFFIXES } else { &INTEGER_SUFFIXES };
        match allowed.iter().find(|s| **s == word) {
            Some(suffix) => {
                self.token_suffix = Some(*suffix);
                self.token_flags |= TokenFlags::HAS_SUFFIX;
            }
            None => self.error(LexError::InvalidSuffix(word.to_string()), suffix_start, self.pos),
        }
        kind
    }

    // ========================================================================
    // Escapes
    // ========================================================================

    /// Scan an escape sequence starting at `\`. Returns the character it
    /// denotes, or None after reporting an error.
    fn scan_escape(&mut self, allow_dollar: bool, max_hex_digits: u32) -> Option<char> {
        let start = self.pos;
        self.pos += 1;
        match self.current_byte() {
            Some(b'u') => {
                self.pos += 1;
                if self.current_byte() != Some(b'{') {
                    self.error(LexError::InvalidUnicodeEscape(max_hex_digits), start, self.pos);
                    return self.invalid_escape();
                }
                self.pos += 1;
                let digits_start = self.pos;
                while self.current_byte().map_or(false, is_hex_digit) {
                    self.pos += 1;
                }
                let digits = &self.text[digits_start..self.pos];
                let closed = self.current_byte() == Some(b'}');
                if closed {
                    self.pos += 1;
                }
                if !closed || digits.is_empty() || digits.len() as u32 > max_hex_digits {
                    self.error(LexError::InvalidUnicodeEscape(max_hex_digits), start, self.pos);
                    return self.invalid_escape();
                }
                let value = u32::from_str_radix(digits, 16).unwrap_or(u32::MAX);
                match char::from_u32(value) {
                    Some(ch) => Some(ch),
                    None => {
                        self.error(LexError::InvalidCodePoint(value), start, self.pos);
                        self.invalid_escape()
                    }
                }
            }
            Some(b) => match simple_escape(b, allow_dollar) {
                Some(ch) => {
                    self.pos += 1;
                    Some(ch)
                }
                None => {
                    let ch = self.current_char().unwrap_or('\u{fffd}');
                    self.pos += ch.len_utf8();
                    self.error(LexError::InvalidEscape(ch), start, self.pos);
                    self.invalid_escape()
                }
            },
            None => None,
        }
    }

    fn invalid_escape(&mut self) -> Option<char> {
        self.token_flags |= TokenFlags::CONTAINS_INVALID_ESCAPE;
        None
    }

    // ========================================================================
    // Strings
    // ========================================================================

    fn scan_string_start(&mut self, quote: u8) -> SyntaxKind {
        if self.byte_at(1) == Some(quote) && self.byte_at(2) == Some(quote) {
            self.pos += 3;
            self.modes.push(LexerMode::MultiLineString { quote });
            SyntaxKind::MultiLineStringStart
        } else {
            self.pos += 1;
            self.modes.push(LexerMode::LineString { quote });
            SyntaxKind::StringStart
        }
    }

    fn at_string_close(&self, quote: u8, multi_line: bool) -> bool {
        if multi_line {
            self.bytes[self.pos..].starts_with(&[quote, quote, quote])
        } else {
            self.current_byte() == Some(quote)
        }
    }

    fn scan_string_body(&mut self, quote: u8, multi_line: bool) -> SyntaxKind {
        let Some(b) = self.current_byte() else {
            self.error(LexError::UnterminatedString, self.pos, self.pos);
            self.token_flags |= TokenFlags::UNTERMINATED;
            self.modes.pop();
            return SyntaxKind::StringEnd;
        };
        if self.at_string_close(quote, multi_line) {
            self.pos += if multi_line { 3 } else { 1 };
            self.modes.pop();
            return SyntaxKind::StringEnd;
        }
        if b == DOLLAR_SIGN && self.byte_at(1) == Some(b'{') {
            self.pos += 2;
            self.modes.push(LexerMode::Normal { brace_depth: 0 });
            return SyntaxKind::InterpolationStart;
        }
        if !multi_line && is_line_break(b) {
            self.error(LexError::UnterminatedString, self.pos, self.pos);
            self.token_flags |= TokenFlags::UNTERMINATED;
            self.modes.pop();
            return SyntaxKind::StringEnd;
        }

        while let Some(b) = self.current_byte() {
            if self.at_string_close(quote, multi_line)
                || (b == DOLLAR_SIGN && self.byte_at(1) == Some(b'{'))
                || (!multi_line && is_line_break(b))
            {
                break;
            }
            if b == BACKSLASH {
                if let Some(ch) = self.scan_escape(true, 8) {
                    self.token_value.push(ch);
                }
                continue;
            }
            let rest = &self.bytes[self.pos..];
            let run = memchr::memchr3(quote, BACKSLASH, DOLLAR_SIGN, rest).unwrap_or(rest.len());
            let run = if multi_line {
                run
            } else {
                memchr::memchr2(LINE_FEED, CARRIAGE_RETURN, &rest[..run]).unwrap_or(run)
            };
            if run == 0 {
                // A lone `$` or a quote that does not close a multi-line string.
                let ch = self.current_char().unwrap_or('$');
                self.token_value.push(ch);
                self.pos += ch.len_utf8();
            } else {
                self.token_value.push_str(&self.text[self.pos..self.pos + run]);
                self.pos += run;
            }
        }
        SyntaxKind::StringContent
    }

    /// `r'c'`, `r"c"` and `b'c'`.
    fn scan_char_literal(&mut self, kind: SyntaxKind) -> SyntaxKind {
        let start = self.pos;
        let is_byte = kind == SyntaxKind::ByteLiteral;
        let quote = self.bytes[self.pos + 1];
        self.pos += 2;

        let value = match self.current_byte() {
            None | Some(LINE_FEED | CARRIAGE_RETURN) => {
                self.error(LexError::UnterminatedCharLiteral, start, self.pos);
                self.token_flags |= TokenFlags::UNTERMINATED;
                return kind;
            }
            Some(b) if b == quote => {
                self.pos += 1;
                self.error(LexError::CharLiteralLength, start, self.pos);
                return kind;
            }
            Some(BACKSLASH) => {
                if is_byte {
                    self.scan_escape(false, 2)
                } else {
                    self.scan_escape(true, 8)
                }
            }
            Some(_) => {
                let ch = self.current_char().unwrap_or('\u{fffd}');
                self.pos += ch.len_utf8();
                if is_byte && !ch.is_ascii() {
                    self.error(LexError::NonAsciiByte, self.pos - ch.len_utf8(), self.pos);
                }
                Some(ch)
            }
        };
        if let Some(ch) = value {
            self.token_value.push(ch);
        }

        if self.current_byte() == Some(quote) {
            self.pos += 1;
            return kind;
        }
        // More than one character: skip to the closing quote on this line.
        let rest = &self.bytes[self.pos..];
        let line_end = memchr::memchr2(LINE_FEED, CARRIAGE_RETURN, rest).unwrap_or(rest.len());
        match memchr::memchr(quote, &rest[..line_end]) {
            Some(offset) => {
                self.pos += offset + 1;
                self.error(LexError::CharLiteralLength, start, self.pos);
            }
            None => {
                self.pos += line_end;
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(LexError::UnterminatedCharLiteral, start, self.pos);
            }
        }
        kind
    }

    /// `b"..."`: ASCII text and byte escapes, no interpolation.
    fn scan_byte_string(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 2;
        loop {
            match self.current_byte() {
                None | Some(LINE_FEED | CARRIAGE_RETURN) => {
                    self.error(LexError::UnterminatedString, start, self.pos);
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    break;
                }
                Some(DOUBLE_QUOTE) => {
                    self.pos += 1;
                    break;
                }
                Some(BACKSLASH) => {
                    if let Some(ch) = self.scan_escape(false, 2) {
                        self.token_value.push(ch);
                    }
                }
                Some(b) if b.is_ascii() => {
                    self.token_value.push(b as char);
                    self.pos += 1;
                }
                Some(_) => {
                    let ch = self.current_char().unwrap_or('\u{fffd}');
                    let char_start = self.pos;
                    self.pos += ch.len_utf8();
                    self.error(LexError::NonAsciiByte, char_start, self.pos);
                }
            }
        }
        SyntaxKind::ByteStringLiteral
    }

    /// `#` tokens and `#...#"..."#...#` raw strings.
    fn scan_hash(&mut self) -> SyntaxKind {
        let fence = self.bytes[self.pos..].iter().take_while(|b| **b == HASH).count();
        match self.byte_at(fence) {
            Some(quote @ (DOUBLE_QUOTE | SINGLE_QUOTE)) => self.scan_raw_string(fence, quote),
            _ => self.single(SyntaxKind::HashToken),
        }
    }

    /// Scan a raw string whose opening fence is `fence` hashes followed by
    /// `quote`. Only a closing quote followed by at least `fence` hashes
    /// ends it; a shorter closer is remembered for the error report.
    fn scan_raw_string(&mut self, fence: usize, quote: u8) -> SyntaxKind {
        let start = self.pos;
        let body_start = start + fence + 1;
        if quote == SINGLE_QUOTE {
            self.token_flags |= TokenFlags::SINGLE_QUOTE;
        }
        let mut search = body_start;
        let mut short_closer: Option<(usize, usize)> = None;
        while let Some(offset) = memchr::memchr(quote, &self.bytes[search..]) {
            let at = search + offset;
            let hashes = self.bytes[at + 1..].iter().take_while(|b| **b == HASH).count();
            if hashes >= fence {
                self.token_value.push_str(&self.text[body_start..at]);
                self.pos = at + 1 + fence;
                return SyntaxKind::RawStringLiteral;
            }
            if hashes > 0 && short_closer.is_none() {
                short_closer = Some((at, hashes));
            }
            search = at + 1;
        }

        self.token_value.push_str(&self.text[body_start..]);
        self.pos = self.bytes.len();
        self.token_flags |= TokenFlags::UNTERMINATED;
        match short_closer {
            Some((at, found)) => self.error(
                LexError::RawStringFenceMismatch {
                    expected: fence as u32,
                    found: found as u32,
                },
                at,
                at + 1 + found,
            ),
            None => self.error(
                LexError::UnterminatedRawString {
                    quote: quote as char,
                    fence: fence as u32,
                },
                start,
                body_start,
            ),
        }
        SyntaxKind::RawStringLiteral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        let mut scanner = Scanner::new(source);
        let mut out = Vec::new();
        loop {
            let kind = scanner.scan();
            if kind == SyntaxKind::EndOfFileToken {
                return out;
            }
            out.push(kind);
        }
    }

    #[test]
    fn test_scan_simple_tokens() {
        assert_eq!(
            kinds("( ) { } [ ] ; , :"),
            vec![
                SyntaxKind::OpenParenToken,
                SyntaxKind::CloseParenToken,
                SyntaxKind::OpenBraceToken,
                SyntaxKind::CloseBraceToken,
                SyntaxKind::OpenBracketToken,
                SyntaxKind::CloseBracketToken,
                SyntaxKind::SemicolonToken,
                SyntaxKind::CommaToken,
                SyntaxKind::ColonToken,
            ]
        );
    }

    #[test]
    fn test_greater_than_is_scanned_alone() {
        assert_eq!(
            kinds(">>="),
            vec![SyntaxKind::GreaterThanToken, SyntaxKind::GreaterThanToken, SyntaxKind::EqualsToken]
        );
    }

    #[test]
    fn test_rescan_greater_than() {
        let mut scanner = Scanner::new("a >>= b");
        scanner.scan();
        assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
        assert_eq!(scanner.rescan_greater_than_token(), SyntaxKind::GreaterThanGreaterThanEqualsToken);
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);

        let mut scanner = Scanner::new("a > = b");
        scanner.scan();
        scanner.scan();
        assert_eq!(scanner.rescan_greater_than_token(), SyntaxKind::GreaterThanToken);
    }

    #[test]
    fn test_underscore_and_keywords() {
        assert_eq!(
            kinds("_ _x match"),
            vec![SyntaxKind::UnderscoreToken, SyntaxKind::Identifier, SyntaxKind::MatchKeyword]
        );
    }

    #[test]
    fn test_nested_block_comment() {
        let mut scanner = Scanner::new("/* a /* b */ c */ x");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "x");
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn test_line_break_flag() {
        let mut scanner = Scanner::new("a\n  b c");
        scanner.scan();
        assert!(!scanner.has_preceding_line_break());
        scanner.scan();
        assert!(scanner.has_preceding_line_break());
        scanner.scan();
        assert!(!scanner.has_preceding_line_break());
        assert!(scanner.has_preceding_trivia());
    }

    #[test]
    fn test_restore_state_drops_diagnostics() {
        let mut scanner = Scanner::new("a \"unterminated");
        scanner.scan();
        let state = scanner.save_state();
        scanner.scan();
        scanner.scan();
        scanner.scan();
        assert!(!scanner.diagnostics().is_empty());
        scanner.restore_state(state);
        assert!(scanner.diagnostics().is_empty());
        assert_eq!(scanner.mode_depth(), 1);
    }

    #[test]
    fn test_look_ahead_restores_position() {
        let mut scanner = Scanner::new("f<T>(x)");
        scanner.scan();
        let next = scanner.look_ahead(|s| {
            s.scan();
            s.scan()
        });
        assert_eq!(next, SyntaxKind::Identifier);
        assert_eq!(scanner.token(), SyntaxKind::Identifier);
        assert_eq!(scanner.scan(), SyntaxKind::LessThanToken);
    }
}

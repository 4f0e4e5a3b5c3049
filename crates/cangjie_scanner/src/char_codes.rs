//! Character classes used by the scanner.

use unicode_xid::UnicodeXID;

pub const LINE_FEED: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const DOUBLE_QUOTE: u8 = b'"';
pub const SINGLE_QUOTE: u8 = b'\'';
pub const BACKSLASH: u8 = b'\\';
pub const DOLLAR_SIGN: u8 = b'$';
pub const HASH: u8 = b'#';
pub const BACKTICK: u8 = b'`';
pub const UNDERSCORE: u8 = b'_';

/// Integer width suffixes, longest first so `i16` wins over a shorter match.
pub const INTEGER_SUFFIXES: [&str; 8] = ["i16", "i32", "i64", "u16", "u32", "u64", "i8", "u8"];
pub const FLOAT_SUFFIXES: [&str; 3] = ["f16", "f32", "f64"];

#[inline]
pub fn is_line_break(b: u8) -> bool {
    b == LINE_FEED || b == CARRIAGE_RETURN
}

/// Space, tab and form feed. Line breaks are tracked separately.
#[inline]
pub fn is_white_space_single_line(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | 0x0C)
}

#[inline]
pub fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline]
pub fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

#[inline]
pub fn is_octal_digit(b: u8) -> bool {
    (b'0'..=b'7').contains(&b)
}

#[inline]
pub fn is_binary_digit(b: u8) -> bool {
    b == b'0' || b == b'1'
}

pub fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic() || (!ch.is_ascii() && ch.is_xid_start())
}

pub fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric() || (!ch.is_ascii() && ch.is_xid_continue())
}

/// The character a simple escape `\c` stands for. `\$` is accepted only
/// when `allow_dollar` is set (string bodies, not byte literals).
pub fn simple_escape(c: u8, allow_dollar: bool) -> Option<char> {
    let ch = match c {
        b't' => '\t',
        b'b' => '\u{8}',
        b'r' => '\r',
        b'n' => '\n',
        b'\'' => '\'',
        b'"' => '"',
        b'\\' => '\\',
        b'f' => '\u{c}',
        b'v' => '\u{b}',
        b'0' => '\0',
        b'$' if allow_dollar => '$',
        _ => return None,
    };
    Some(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_classes() {
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('变'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_part('1'));
        assert!(!is_identifier_part('-'));
    }

    #[test]
    fn dollar_escape_only_in_strings() {
        assert_eq!(simple_escape(b'$', true), Some('$'));
        assert_eq!(simple_escape(b'$', false), None);
        assert_eq!(simple_escape(b'q', true), None);
    }
}

//! Flag types shared by the scanner, parser and tree.

use std::fmt;

bitflags::bitflags! {
    /// Facts the scanner records about a token beyond its kind.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u16 {
        const NONE                  = 0;
        /// A line break occurs between the previous token and this one.
        const PRECEDING_LINE_BREAK  = 1 << 0;
        /// Whitespace or a comment occurs directly before this token.
        const PRECEDING_TRIVIA      = 1 << 1;
        const UNTERMINATED          = 1 << 2;
        const CONTAINS_INVALID_ESCAPE = 1 << 3;
        const HEX_SPECIFIER         = 1 << 4;
        const BINARY_SPECIFIER      = 1 << 5;
        const OCTAL_SPECIFIER       = 1 << 6;
        /// Integer or float literal with a width suffix (`u8`, `f32`, ...).
        const HAS_SUFFIX            = 1 << 7;
        /// Raw string delimited by `'` instead of `"`.
        const SINGLE_QUOTE          = 1 << 8;

        const NUMERIC_BASE = Self::HEX_SPECIFIER.bits()
            | Self::BINARY_SPECIFIER.bits()
            | Self::OCTAL_SPECIFIER.bits();
    }
}

bitflags::bitflags! {
    /// Declaration modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const NONE      = 0;
        const PUBLIC    = 1 << 0;
        const PRIVATE   = 1 << 1;
        const PROTECTED = 1 << 2;
        const INTERNAL  = 1 << 3;
        const OPEN      = 1 << 4;
        const ABSTRACT  = 1 << 5;
        const SEALED    = 1 << 6;
        const OVERRIDE  = 1 << 7;
        const REDEF     = 1 << 8;
        const MUT       = 1 << 9;
        const STATIC    = 1 << 10;
        const CONST     = 1 << 11;
        const UNSAFE    = 1 << 12;
        const FOREIGN   = 1 << 13;
        const OPERATOR  = 1 << 14;

        const ACCESSIBILITY = Self::PUBLIC.bits()
            | Self::PRIVATE.bits()
            | Self::PROTECTED.bits()
            | Self::INTERNAL.bits();
    }
}

impl Modifiers {
    /// Map a contextual modifier word to its flag. Keyword modifiers
    /// (`static`, `const`, `unsafe`, `foreign`, `operator`) are matched by
    /// the parser on their token kind instead.
    pub fn from_word(word: &str) -> Option<Modifiers> {
        let m = match word {
            "public" => Modifiers::PUBLIC,
            "private" => Modifiers::PRIVATE,
            "protected" => Modifiers::PROTECTED,
            "internal" => Modifiers::INTERNAL,
            "open" => Modifiers::OPEN,
            "abstract" => Modifiers::ABSTRACT,
            "sealed" => Modifiers::SEALED,
            "override" => Modifiers::OVERRIDE,
            "redef" => Modifiers::REDEF,
            "mut" => Modifiers::MUT,
            _ => return None,
        };
        Some(m)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Modifiers::PUBLIC, "public"),
            (Modifiers::PRIVATE, "private"),
            (Modifiers::PROTECTED, "protected"),
            (Modifiers::INTERNAL, "internal"),
            (Modifiers::OPEN, "open"),
            (Modifiers::ABSTRACT, "abstract"),
            (Modifiers::SEALED, "sealed"),
            (Modifiers::OVERRIDE, "override"),
            (Modifiers::REDEF, "redef"),
            (Modifiers::MUT, "mut"),
            (Modifiers::STATIC, "static"),
            (Modifiers::CONST, "const"),
            (Modifiers::UNSAFE, "unsafe"),
            (Modifiers::FOREIGN, "foreign"),
            (Modifiers::OPERATOR, "operator"),
        ];
        let mut first = true;
        for (flag, name) in names {
            if self.contains(flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_words() {
        assert_eq!(Modifiers::from_word("open"), Some(Modifiers::OPEN));
        assert_eq!(Modifiers::from_word("static"), None);
        assert!(Modifiers::ACCESSIBILITY.contains(Modifiers::INTERNAL));
    }

    #[test]
    fn modifiers_display_in_canonical_order() {
        let m = Modifiers::OVERRIDE | Modifiers::PUBLIC | Modifiers::STATIC;
        assert_eq!(m.to_string(), "public override static");
        assert_eq!(Modifiers::NONE.to_string(), "");
    }
}

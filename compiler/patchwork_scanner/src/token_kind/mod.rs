//! External token kinds and the host's valid-token mask.
//!
//! The discriminants are the host grammar's external symbol indices: the
//! grammar declares its externals in exactly this order, and the host hands
//! the scanner a `bool` per index saying which ones it can accept right now.

use std::fmt;

use bitflags::bitflags;

/// Token kinds produced by the prompt scanner.
///
/// `#[repr(u8)]` with discriminants equal to the host symbol index.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `{` opening a prompt region.
    RegionStart = 0,
    /// `}` closing the innermost prompt region.
    RegionEnd = 1,
    /// Literal prompt content.
    RegionText = 2,
    /// `$'c'`: one literal character.
    Escape = 3,
    /// `${` opening an embedded expression.
    InterpolationStart = 4,
    /// `}` closing an embedded expression.
    InterpolationEnd = 5,
    /// `do` introducing a nested block at the start of a prompt line.
    NestedBlockKeyword = 6,
    /// A run of line breaks ending a statement outside any region.
    StatementTerminator = 7,
}

impl TokenKind {
    /// Number of external token kinds.
    pub const COUNT: usize = 8;

    /// Every kind, in host symbol order.
    pub const ALL: [TokenKind; Self::COUNT] = [
        TokenKind::RegionStart,
        TokenKind::RegionEnd,
        TokenKind::RegionText,
        TokenKind::Escape,
        TokenKind::InterpolationStart,
        TokenKind::InterpolationEnd,
        TokenKind::NestedBlockKeyword,
        TokenKind::StatementTerminator,
    ];

    /// Host symbol index of this kind.
    #[inline]
    pub const fn symbol(self) -> usize {
        self as usize
    }

    /// Look up a kind by host symbol index.
    pub fn from_symbol(symbol: usize) -> Option<Self> {
        Self::ALL.get(symbol).copied()
    }

    /// Name of the external symbol in the grammar.
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::RegionStart => "prompt_start",
            TokenKind::RegionEnd => "prompt_end",
            TokenKind::RegionText => "prompt_text",
            TokenKind::Escape => "prompt_escape",
            TokenKind::InterpolationStart => "prompt_interpolation_start",
            TokenKind::InterpolationEnd => "prompt_interpolation_end",
            TokenKind::NestedBlockKeyword => "prompt_do",
            TokenKind::StatementTerminator => "statement_terminator",
        }
    }

    /// Fixed source text of the token, if every occurrence is spelled the same.
    ///
    /// Text, escapes, terminators and the keyword (which carries the line's
    /// indentation) vary and return `None`.
    pub const fn lexeme(self) -> Option<&'static str> {
        match self {
            TokenKind::RegionStart => Some("{"),
            TokenKind::RegionEnd | TokenKind::InterpolationEnd => Some("}"),
            TokenKind::InterpolationStart => Some("${"),
            TokenKind::RegionText
            | TokenKind::Escape
            | TokenKind::NestedBlockKeyword
            | TokenKind::StatementTerminator => None,
        }
    }

    /// Single-kind mask.
    #[inline]
    pub const fn mask(self) -> ValidTokens {
        ValidTokens::from_bits_retain(1 << self as u8)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Set of token kinds the host grammar accepts at the current position.
    ///
    /// Bit `n` corresponds to the [`TokenKind`] whose symbol index is `n`.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ValidTokens: u8 {
        const REGION_START = 1 << 0;
        const REGION_END = 1 << 1;
        const REGION_TEXT = 1 << 2;
        const ESCAPE = 1 << 3;
        const INTERPOLATION_START = 1 << 4;
        const INTERPOLATION_END = 1 << 5;
        const NESTED_BLOCK_KEYWORD = 1 << 6;
        const STATEMENT_TERMINATOR = 1 << 7;

        /// Kinds the grammar accepts between statements.
        const OUTSIDE_REGION = Self::REGION_START.bits() | Self::STATEMENT_TERMINATOR.bits();
        /// Kinds the grammar accepts inside prompt content.
        const INSIDE_REGION = Self::REGION_END.bits()
            | Self::REGION_TEXT.bits()
            | Self::ESCAPE.bits()
            | Self::INTERPOLATION_START.bits()
            | Self::NESTED_BLOCK_KEYWORD.bits();
    }
}

impl ValidTokens {
    /// Build a mask from the host's per-symbol `bool` array.
    ///
    /// Entries past [`TokenKind::COUNT`] are ignored; missing entries count
    /// as not valid.
    pub fn from_symbols(valid_symbols: &[bool]) -> Self {
        let mut mask = Self::empty();
        for (kind, &valid) in TokenKind::ALL.iter().zip(valid_symbols) {
            if valid {
                mask |= kind.mask();
            }
        }
        mask
    }

    /// Returns `true` if the host accepts `kind` here.
    #[inline]
    pub const fn allows(self, kind: TokenKind) -> bool {
        self.contains(kind.mask())
    }
}

impl From<TokenKind> for ValidTokens {
    fn from(kind: TokenKind) -> Self {
        kind.mask()
    }
}

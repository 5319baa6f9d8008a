//! Reference host driver.
//!
//! Drives a [`Scanner`] over a whole document the way the Patchwork grammar
//! would: it derives the valid-token mask from the scanner state, and when
//! the scanner declines it lexes a run of host text itself. Every byte of
//! the source ends up in exactly one [`Token`].
//!
//! The driver knows nothing about the host grammar beyond braces, so host
//! text is reported as opaque [`TokenTag::Host`] runs.

use std::fmt;

use memchr::{memchr2, memchr3};
use tracing::trace;

use crate::lexer::{Span, StrLexer};
use crate::scanner::Scanner;
use crate::state::Snapshot;
use crate::token_kind::{TokenKind, ValidTokens};

/// What produced a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenTag {
    /// Emitted by the prompt scanner.
    External(TokenKind),
    /// Host-grammar text the scanner declined.
    Host,
    /// Whitespace the scanner skipped before an external token.
    Skipped,
}

impl fmt::Display for TokenTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenTag::External(kind) => write!(f, "{kind}"),
            TokenTag::Host => f.write_str("host"),
            TokenTag::Skipped => f.write_str("skipped"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub tag: TokenTag,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(tag: TokenTag, span: Span) -> Self {
        Self { tag, span }
    }

    /// The external kind, if the scanner produced this token.
    pub fn kind(&self) -> Option<TokenKind> {
        match self.tag {
            TokenTag::External(kind) => Some(kind),
            TokenTag::Host | TokenTag::Skipped => None,
        }
    }
}

/// Iterator over the tokens of a document.
pub struct Tokenizer<'a> {
    lexer: StrLexer<'a>,
    scanner: Scanner,
    /// Unbalanced `{` in the host expression of the innermost interpolation.
    expression_braces: u32,
    /// External token held back while its skipped whitespace is yielded.
    queued: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: StrLexer::new(source),
            scanner: Scanner::new(),
            expression_braces: 0,
            queued: None,
        }
    }

    /// Restart at byte `offset` with the scanner state from `snapshot`.
    ///
    /// `offset` and `snapshot` must come from [`offset()`](Self::offset) and
    /// [`snapshot()`](Self::snapshot) of an earlier run over the same text,
    /// taken outside any brace nesting of a host expression.
    pub fn resume(source: &'a str, offset: u32, snapshot: &[u8]) -> Self {
        Self {
            lexer: StrLexer::at(source, offset),
            scanner: Scanner::from_snapshot(snapshot),
            expression_braces: 0,
            queued: None,
        }
    }

    /// End of the last token read from the source.
    ///
    /// A token still held back behind its skipped whitespace has already been
    /// read.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.lexer.origin()
    }

    /// Scanner state at [`offset()`](Self::offset).
    pub fn snapshot(&self) -> Snapshot {
        self.scanner.snapshot()
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Unbalanced braces of the current host expression.
    pub fn expression_braces(&self) -> u32 {
        self.expression_braces
    }

    /// Token kinds the grammar accepts in the current state.
    pub fn valid_tokens(&self) -> ValidTokens {
        let state = self.scanner.state();
        if state.interpolation_depth() > 0 {
            if self.expression_braces == 0 {
                ValidTokens::INTERPOLATION_END
            } else {
                ValidTokens::empty()
            }
        } else if !state.in_region() {
            ValidTokens::OUTSIDE_REGION
        } else if state.nested_block_pending() {
            ValidTokens::REGION_START | ValidTokens::REGION_TEXT
        } else {
            ValidTokens::INSIDE_REGION
        }
    }

    pub fn next_token(&mut self) -> Option<Token> {
        if let Some(token) = self.queued.take() {
            return Some(token);
        }
        if self.lexer.rest().is_empty() {
            return None;
        }

        let valid = self.valid_tokens();
        if !valid.is_empty() {
            if let Some(kind) = self.scanner.scan(&mut self.lexer, valid) {
                let skipped = self.lexer.skipped();
                let token = Token::new(TokenTag::External(kind), self.lexer.accept());
                if skipped.is_empty() {
                    return Some(token);
                }
                self.queued = Some(token);
                return Some(Token::new(TokenTag::Skipped, skipped));
            }
            self.lexer.reject();
        }

        let len = self.host_run_len();
        let span = self.lexer.consume_host(len);
        trace!(%span, "host text");
        Some(Token::new(TokenTag::Host, span))
    }

    /// Length of the host text run at the current position; at least one
    /// character.
    fn host_run_len(&mut self) -> u32 {
        let rest = self.lexer.rest().as_bytes();
        let state = self.scanner.state();

        let len = if state.interpolation_depth() > 0 {
            match memchr2(b'{', b'}', rest) {
                Some(0) => {
                    if rest.first() == Some(&b'{') {
                        self.expression_braces = self.expression_braces.saturating_add(1);
                    } else {
                        self.expression_braces = self.expression_braces.saturating_sub(1);
                    }
                    1
                }
                Some(n) => n,
                None => rest.len(),
            }
        } else if !state.in_region() {
            match memchr3(b'{', b'\n', b'\r', rest) {
                Some(0) => 1,
                Some(n) => n,
                None => rest.len(),
            }
        } else {
            1
        };

        u32::try_from(len).unwrap_or(u32::MAX)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Tokenize a whole document.
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).collect()
}

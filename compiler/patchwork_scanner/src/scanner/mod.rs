//! Context-sensitive prompt scanner.
//!
//! The host calls [`Scanner::scan`] once per token with a cursor and the set
//! of token kinds its grammar accepts. The scanner walks [`DISPATCH_ORDER`]
//! and returns the first kind whose classifier accepts the input, or `None`
//! so the host can try its own rules at the same position.
//!
//! # Design
//!
//! Each classifier is a small consumer of the cursor paired with a state
//! precondition. The order is the disambiguation contract:
//!
//! - interpolation end precedes region end, so the `}` of `${x}` never
//!   closes the surrounding region;
//! - interpolation start precedes escape, and both precede region text,
//!   which stops in front of `$`;
//! - the nested-block keyword precedes region text, which would otherwise
//!   swallow `do` as content.
//!
//! With one character of lookahead a classifier may consume characters and
//! still decline (`$x` is neither `${` nor `$'c'`). The host discards a
//! declined attempt as a whole, but later classifiers in the same attempt
//! continue from where the cursor stands. [`ScanCursor`] remembers those
//! characters so the escape can reuse a `$` consumed by the interpolation
//! classifier and region text can count their braces.

use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::lexer::Lexer;
use crate::region_stack::INITIAL_DEPTH;
use crate::state::{ScannerState, Snapshot};
use crate::token_kind::{TokenKind, ValidTokens};

/// Order in which classifiers are tried.
pub const DISPATCH_ORDER: [TokenKind; TokenKind::COUNT] = [
    TokenKind::RegionStart,
    TokenKind::InterpolationEnd,
    TokenKind::RegionEnd,
    TokenKind::InterpolationStart,
    TokenKind::Escape,
    TokenKind::StatementTerminator,
    TokenKind::NestedBlockKeyword,
    TokenKind::RegionText,
];

/// One dispatch table entry.
struct Classifier {
    kind: TokenKind,
    /// State precondition, checked before the cursor is touched.
    applies: fn(&ScannerState) -> bool,
    /// Consume a token and report its kind; `None` declines.
    scan: fn(&mut ScannerState, &mut ScanCursor<'_>) -> Option<TokenKind>,
}

static DISPATCH: [Classifier; TokenKind::COUNT] = [
    Classifier {
        kind: TokenKind::RegionStart,
        applies: region_start_allowed,
        scan: region_start,
    },
    Classifier {
        kind: TokenKind::InterpolationEnd,
        applies: in_interpolation,
        scan: interpolation_end,
    },
    Classifier {
        kind: TokenKind::RegionEnd,
        applies: region_can_close,
        scan: region_end,
    },
    Classifier {
        kind: TokenKind::InterpolationStart,
        applies: ScannerState::in_region,
        scan: interpolation_start,
    },
    Classifier {
        kind: TokenKind::Escape,
        applies: ScannerState::in_region,
        scan: escape,
    },
    Classifier {
        kind: TokenKind::StatementTerminator,
        applies: outside_region,
        scan: statement_terminator,
    },
    Classifier {
        kind: TokenKind::NestedBlockKeyword,
        applies: keyword_allowed,
        scan: nested_block_keyword,
    },
    Classifier {
        kind: TokenKind::RegionText,
        applies: ScannerState::in_region,
        scan: region_text,
    },
];

/// The prompt scanner for one parse session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scanner {
    state: ScannerState,
}

impl Scanner {
    /// Create a scanner in the reset state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner resuming from a snapshot.
    pub fn from_snapshot(snapshot: &[u8]) -> Self {
        Self {
            state: ScannerState::from_snapshot(snapshot),
        }
    }

    #[inline]
    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    /// Forget all regions and interpolations.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// See [`ScannerState::serialize`].
    pub fn serialize(&self, buffer: &mut [u8]) -> usize {
        self.state.serialize(buffer)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// See [`ScannerState::deserialize`].
    pub fn deserialize(&mut self, buffer: &[u8]) {
        self.state.deserialize(buffer);
    }

    /// Scan one token.
    ///
    /// Returns the kind of the token the cursor now covers, or `None` if no
    /// kind in `valid` matches here. On `None` the state is unchanged and the
    /// host must discard the cursor's advances.
    pub fn scan(&mut self, lexer: &mut dyn Lexer, valid: ValidTokens) -> Option<TokenKind> {
        let mut cursor = ScanCursor::new(lexer);
        for classifier in &DISPATCH {
            if !valid.allows(classifier.kind) || !(classifier.applies)(&self.state) {
                continue;
            }
            if let Some(kind) = (classifier.scan)(&mut self.state, &mut cursor) {
                self.state
                    .set_nested_block_pending(kind == TokenKind::NestedBlockKeyword);
                trace!(
                    %kind,
                    regions = self.state.regions().len(),
                    interpolations = self.state.interpolation_depth(),
                    "scanned token"
                );
                return Some(kind);
            }
        }
        trace!(?valid, "no external token");
        None
    }
}

// ─── Cursor ────────────────────────────────────────────────────

/// Characters consumed by a declined classifier that a later one may inherit.
const PREFIX_LEN: usize = 4;

/// Host cursor plus a record of what this attempt consumed.
pub(crate) struct ScanCursor<'l> {
    lexer: &'l mut dyn Lexer,
    consumed: u32,
    /// First [`PREFIX_LEN`] characters consumed, in order.
    prefix: [char; PREFIX_LEN],
}

impl<'l> ScanCursor<'l> {
    fn new(lexer: &'l mut dyn Lexer) -> Self {
        Self {
            lexer,
            consumed: 0,
            prefix: ['\0'; PREFIX_LEN],
        }
    }

    #[inline]
    fn current(&self) -> char {
        self.lexer.lookahead()
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.lexer.eof()
    }

    /// Consume the current character into the token.
    fn advance(&mut self) {
        if self.is_eof() {
            return;
        }
        if let Some(slot) = self.prefix.get_mut(self.consumed as usize) {
            *slot = self.lexer.lookahead();
        }
        self.consumed = self.consumed.saturating_add(1);
        self.lexer.advance(false);
    }

    /// Consume the current character as insignificant whitespace.
    #[inline]
    fn skip(&mut self) {
        self.lexer.advance(true);
    }

    #[inline]
    fn mark_end(&mut self) {
        self.lexer.mark_end();
    }

    #[inline]
    fn has_consumed(&self) -> bool {
        self.consumed > 0
    }

    /// Characters consumed by declined classifiers, up to [`PREFIX_LEN`].
    fn prefix(&self) -> SmallVec<[char; PREFIX_LEN]> {
        let len = (self.consumed as usize).min(PREFIX_LEN);
        SmallVec::from_slice(&self.prefix[..len])
    }

    /// Match `ch` as the token's first character.
    ///
    /// Succeeds when `ch` is current and nothing was consumed yet, or when
    /// `ch` is the single character an earlier classifier already consumed.
    fn eat_leading(&mut self, ch: char) -> bool {
        match self.consumed {
            0 if self.current() == ch => {
                self.advance();
                true
            }
            1 => self.prefix[0] == ch,
            _ => false,
        }
    }
}

// ─── Preconditions ─────────────────────────────────────────────

fn region_start_allowed(state: &ScannerState) -> bool {
    !state.in_region() || state.nested_block_pending()
}

fn in_interpolation(state: &ScannerState) -> bool {
    state.interpolation_depth() > 0
}

fn region_can_close(state: &ScannerState) -> bool {
    state.regions().can_close()
}

fn outside_region(state: &ScannerState) -> bool {
    !state.in_region()
}

fn keyword_allowed(state: &ScannerState) -> bool {
    state.in_region() && state.at_line_start()
}

// ─── Delimiters ────────────────────────────────────────────────

fn region_start(state: &mut ScannerState, cursor: &mut ScanCursor<'_>) -> Option<TokenKind> {
    while matches!(cursor.current(), ' ' | '\t' | '\x0c') {
        cursor.skip();
    }
    if cursor.current() != '{' {
        return None;
    }
    if let Err(err) = state.open_region() {
        warn!(%err, "refusing to open prompt region");
        return None;
    }
    cursor.advance();
    cursor.mark_end();
    Some(TokenKind::RegionStart)
}

fn interpolation_end(
    state: &mut ScannerState,
    cursor: &mut ScanCursor<'_>,
) -> Option<TokenKind> {
    if cursor.current() != '}' || !state.leave_interpolation() {
        return None;
    }
    cursor.advance();
    cursor.mark_end();
    state.set_line_start(false);
    Some(TokenKind::InterpolationEnd)
}

fn region_end(state: &mut ScannerState, cursor: &mut ScanCursor<'_>) -> Option<TokenKind> {
    if cursor.current() != '}' {
        return None;
    }
    state.close_region();
    cursor.advance();
    cursor.mark_end();
    state.set_line_start(false);
    Some(TokenKind::RegionEnd)
}

fn interpolation_start(
    state: &mut ScannerState,
    cursor: &mut ScanCursor<'_>,
) -> Option<TokenKind> {
    if !cursor.eat_leading('$') || cursor.current() != '{' {
        return None;
    }
    if !state.enter_interpolation() {
        warn!(
            depth = state.interpolation_depth(),
            "interpolation nesting saturated"
        );
        return None;
    }
    cursor.advance();
    cursor.mark_end();
    state.set_line_start(false);
    Some(TokenKind::InterpolationStart)
}

/// `$'c'` for any single character `c`.
fn escape(state: &mut ScannerState, cursor: &mut ScanCursor<'_>) -> Option<TokenKind> {
    if !cursor.eat_leading('$') || cursor.current() != '\'' {
        return None;
    }
    cursor.advance();
    if cursor.is_eof() {
        return None;
    }
    cursor.advance();
    if cursor.current() != '\'' {
        return None;
    }
    cursor.advance();
    cursor.mark_end();
    state.set_line_start(false);
    Some(TokenKind::Escape)
}

fn statement_terminator(
    _state: &mut ScannerState,
    cursor: &mut ScanCursor<'_>,
) -> Option<TokenKind> {
    let mut saw_newline = false;
    loop {
        match cursor.current() {
            '\r' => {
                cursor.advance();
                if cursor.current() == '\n' {
                    cursor.advance();
                }
            }
            '\n' => cursor.advance(),
            _ => break,
        }
        saw_newline = true;
    }
    if !saw_newline {
        return None;
    }
    cursor.mark_end();
    Some(TokenKind::StatementTerminator)
}

// ─── Nested-block keyword ──────────────────────────────────────

/// `do` at the start of a prompt line, followed by `{`.
///
/// The token covers the line's indentation and the keyword; blanks between
/// `do` and `{` are left for the region-start classifier to skip. A line
/// that turns out not to be a keyword is emitted as region text instead.
fn nested_block_keyword(
    state: &mut ScannerState,
    cursor: &mut ScanCursor<'_>,
) -> Option<TokenKind> {
    if cursor.has_consumed() {
        return None;
    }
    cursor.mark_end();

    let mut indented = false;
    while is_horizontal_space(cursor.current()) {
        cursor.advance();
        cursor.mark_end();
        indented = true;
    }

    if cursor.current() != 'd' {
        return if indented {
            rest_of_line(state, cursor)
        } else {
            None
        };
    }
    cursor.advance();
    cursor.mark_end();

    if cursor.current() != 'o' {
        return rest_of_line(state, cursor);
    }
    cursor.advance();
    cursor.mark_end();

    if is_ident_continue(cursor.current()) {
        return rest_of_line(state, cursor);
    }

    // Lookahead only: the keyword token ends after `do`.
    while is_horizontal_space(cursor.current()) {
        cursor.advance();
    }
    if cursor.current() != '{' {
        return rest_of_line(state, cursor);
    }

    state.set_line_start(false);
    Some(TokenKind::NestedBlockKeyword)
}

/// Emit the remainder of a line whose start was consumed as a keyword
/// candidate.
fn rest_of_line(state: &mut ScannerState, cursor: &mut ScanCursor<'_>) -> Option<TokenKind> {
    state.set_line_start(false);
    region_text(state, cursor)
}

// ─── Region text ───────────────────────────────────────────────

fn region_text(state: &mut ScannerState, cursor: &mut ScanCursor<'_>) -> Option<TokenKind> {
    accumulate_text(state, cursor).then_some(TokenKind::RegionText)
}

/// Accumulate literal prompt content up to and including one line break.
///
/// Stops in front of `$` (unless it would be the token's first character)
/// and in front of a `}` that would close the region. Inner braces adjust
/// the region's counter. Characters consumed by declined classifiers earlier in
/// the attempt are part of the token and are counted first; a line break
/// among them ends the token just as a fresh one would.
fn accumulate_text(state: &mut ScannerState, cursor: &mut ScanCursor<'_>) -> bool {
    let Some(mut depth) = state.regions().top() else {
        return false;
    };

    // A classifier stops at the first character it cannot use, so an inherited
    // line break is the last character consumed.
    for ch in cursor.prefix() {
        match ch {
            '{' => depth = depth.saturating_add(1),
            '}' if depth > INITIAL_DEPTH => depth -= 1,
            '\n' | '\r' => {
                if ch == '\r' && cursor.current() == '\n' {
                    cursor.advance();
                }
                cursor.mark_end();
                state.set_line_start(true);
                state.regions_mut().set_top(depth);
                return true;
            }
            ' ' | '\t' => {}
            _ => state.set_line_start(false),
        }
    }

    let mut has_content = cursor.has_consumed();
    while !cursor.is_eof() {
        match cursor.current() {
            '\r' => {
                cursor.advance();
                if cursor.current() == '\n' {
                    cursor.advance();
                }
                cursor.mark_end();
                has_content = true;
                state.set_line_start(true);
                break;
            }
            '\n' => {
                cursor.advance();
                cursor.mark_end();
                has_content = true;
                state.set_line_start(true);
                break;
            }
            ' ' | '\t' => {
                cursor.advance();
                cursor.mark_end();
                has_content = true;
            }
            '$' if has_content => break,
            '}' if depth == INITIAL_DEPTH => break,
            ch => {
                match ch {
                    '{' => depth = depth.saturating_add(1),
                    '}' => depth -= 1,
                    _ => {}
                }
                cursor.advance();
                cursor.mark_end();
                has_content = true;
                state.set_line_start(false);
            }
        }
    }

    state.regions_mut().set_top(depth);
    has_content
}

#[inline]
fn is_horizontal_space(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Characters that may continue an identifier, so `document` or `do_it`
/// are not the keyword.
#[inline]
fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests;

use super::*;
use crate::lexer::StrLexer;
use crate::region_stack::REGION_CAPACITY;
use crate::state::StateFlags;
use pretty_assertions::assert_eq;

const OUTSIDE: ValidTokens = ValidTokens::OUTSIDE_REGION;
const INSIDE: ValidTokens = ValidTokens::INSIDE_REGION;

/// A scanner driven over a string, one host token at a time.
struct Session<'a> {
    lexer: StrLexer<'a>,
    scanner: Scanner,
}

impl<'a> Session<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lexer: StrLexer::new(source),
            scanner: Scanner::new(),
        }
    }

    fn resume(source: &'a str, offset: u32, snapshot: &[u8]) -> Self {
        Self {
            lexer: StrLexer::at(source, offset),
            scanner: Scanner::from_snapshot(snapshot),
        }
    }

    fn next(&mut self, valid: ValidTokens) -> Option<(TokenKind, &'a str)> {
        if let Some(kind) = self.scanner.scan(&mut self.lexer, valid) {
            let span = self.lexer.accept();
            Some((kind, self.lexer.slice(span)))
        } else {
            self.lexer.reject();
            None
        }
    }

    /// Consume `len` bytes the host grammar lexes itself.
    fn host(&mut self, len: u32) -> &'a str {
        let span = self.lexer.consume_host(len);
        self.lexer.slice(span)
    }

    fn state(&self) -> &ScannerState {
        self.scanner.state()
    }
}

fn tok(kind: TokenKind, text: &str) -> Option<(TokenKind, &str)> {
    Some((kind, text))
}

// === Dispatch ===

#[test]
fn dispatch_table_follows_dispatch_order() {
    let kinds: Vec<TokenKind> = DISPATCH.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, DISPATCH_ORDER.to_vec());
}

#[test]
fn dispatch_order_covers_every_kind_once() {
    for kind in TokenKind::ALL {
        assert_eq!(
            DISPATCH_ORDER.iter().filter(|&&k| k == kind).count(),
            1,
            "{kind}"
        );
    }
}

#[test]
fn empty_mask_declines_without_touching_state() {
    let mut s = Session::new("{");
    assert_eq!(s.next(ValidTokens::empty()), None);
    assert_eq!(s.state(), &ScannerState::new());
    assert_eq!(s.lexer.pos(), 0);
}

#[test]
fn scanner_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Scanner>();
}

// === Regions ===

#[test]
fn simple_region() {
    let mut s = Session::new("{hello}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert!(s.state().in_region());
    assert!(s.state().at_line_start());
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "hello"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
    assert!(!s.state().in_region());
}

#[test]
fn region_start_skips_leading_blanks() {
    let mut s = Session::new(" \t\x0c{");
    assert_eq!(s.scanner.scan(&mut s.lexer, OUTSIDE), Some(TokenKind::RegionStart));
    assert_eq!(s.lexer.skipped(), crate::lexer::Span::new(0, 3));
    assert_eq!(s.lexer.accept(), crate::lexer::Span::new(3, 4));
}

#[test]
fn region_start_needs_brace() {
    let mut s = Session::new("  x");
    assert_eq!(s.next(OUTSIDE), None);
    assert!(!s.state().in_region());
}

#[test]
fn open_region_does_not_start_another_without_keyword() {
    let mut s = Session::new("{{");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    let text = s.next(ValidTokens::REGION_START | ValidTokens::REGION_TEXT);
    assert_eq!(text, tok(TokenKind::RegionText, "{"));
    assert_eq!(s.state().regions().len(), 1);
    assert_eq!(s.state().regions().top(), Some(2));
}

#[test]
fn inner_braces_are_text() {
    let mut s = Session::new("{a {b} c}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "a {b} c"));
    assert_eq!(s.state().regions().top(), Some(1));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
}

#[test]
fn unbalanced_inner_brace_keeps_region_open() {
    let mut s = Session::new("{a { b");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "a { b"));
    assert_eq!(s.state().regions().top(), Some(2));
    assert_eq!(s.next(INSIDE), None, "nothing left at end of input");
}

#[test]
fn closing_brace_of_inner_text_is_content() {
    let mut s = Session::resume("}}", 0, &[1, 0, 0, 2, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "}"));
    assert_eq!(s.state().regions().top(), Some(1));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
}

#[test]
fn region_end_not_offered_outside_regions() {
    let mut s = Session::new("}");
    assert_eq!(s.next(ValidTokens::all()), None);
}

#[test]
fn region_past_capacity_is_rejected() {
    let mut snapshot = vec![64, 0, StateFlags::NESTED_BLOCK_PENDING.bits()];
    snapshot.extend(std::iter::repeat([1, 0]).take(REGION_CAPACITY).flatten());
    let mut s = Session::resume("{", 0, &snapshot);

    let token = s.next(ValidTokens::REGION_START | ValidTokens::REGION_TEXT);
    assert_eq!(token, tok(TokenKind::RegionText, "{"));
    assert_eq!(s.state().regions().len(), REGION_CAPACITY);
    assert_eq!(s.state().regions().top(), Some(2));
}

#[test]
fn region_past_capacity_declines_when_text_is_not_valid() {
    let mut snapshot = vec![64, 0, StateFlags::NESTED_BLOCK_PENDING.bits()];
    snapshot.extend(std::iter::repeat([1, 0]).take(REGION_CAPACITY).flatten());
    let mut s = Session::resume("{", 0, &snapshot);
    assert_eq!(s.next(ValidTokens::REGION_START), None);
    assert_eq!(s.state().regions().len(), REGION_CAPACITY);
}

// === Text ===

#[test]
fn text_ends_after_each_line_break() {
    let mut s = Session::new("{one\ntwo\r\nthree\rfour}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "one\n"));
    assert!(s.state().at_line_start());
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "two\r\n"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "three\r"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "four"));
    assert!(!s.state().at_line_start());
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
}

#[test]
fn blank_lines_are_separate_tokens() {
    let mut s = Session::new("{\n\n}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "\n"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "\n"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
}

#[test]
fn statement_terminator_is_text_inside_region() {
    let mut s = Session::new("{\n}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    let valid = ValidTokens::STATEMENT_TERMINATOR | ValidTokens::REGION_TEXT;
    assert_eq!(s.next(valid), tok(TokenKind::RegionText, "\n"));
}

#[test]
fn interior_nul_is_content() {
    let mut s = Session::new("{a\0b}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "a\0b"));
}

#[test]
fn multibyte_text() {
    let mut s = Session::new("{héllo → wörld}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "héllo → wörld"));
}

#[test]
fn empty_text_declines() {
    let mut s = Session::resume("", 0, &[1, 0, 0, 1, 0]);
    assert_eq!(s.next(INSIDE), None);
    assert_eq!(s.state().regions().len(), 1);
}

// === Dollar sequences ===

#[test]
fn text_stops_before_dollar() {
    let mut s = Session::new("{a ${x} b}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "a "));
    assert_eq!(s.next(INSIDE), tok(TokenKind::InterpolationStart, "${"));
    assert_eq!(s.state().interpolation_depth(), 1);
    assert_eq!(s.host(1), "x");
    assert_eq!(
        s.next(ValidTokens::INTERPOLATION_END),
        tok(TokenKind::InterpolationEnd, "}")
    );
    assert_eq!(s.state().interpolation_depth(), 0);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, " b"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
}

#[test]
fn interpolation_end_wins_over_region_end() {
    let mut s = Session::new("{${x}}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::InterpolationStart, "${"));
    assert_eq!(s.host(1), "x");
    assert_eq!(
        s.next(ValidTokens::all()),
        tok(TokenKind::InterpolationEnd, "}")
    );
    assert!(s.state().in_region());
    assert_eq!(s.next(ValidTokens::all()), tok(TokenKind::RegionEnd, "}"));
}

#[test]
fn escape_is_one_token() {
    let mut s = Session::new("{$'{'}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::Escape, "$'{'"));
    assert_eq!(s.state().regions().top(), Some(1), "escaped brace is not counted");
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
}

#[test]
fn escape_of_multibyte_character() {
    let mut s = Session::resume("$'é'", 0, &[1, 0, 0, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::Escape, "$'é'"));
}

#[test]
fn incomplete_escape_at_end_declines() {
    let mut s = Session::resume("$'", 0, &[1, 0, 0, 1, 0]);
    assert_eq!(s.next(ValidTokens::ESCAPE), None);
}

#[test]
fn lone_dollar_is_text() {
    let mut s = Session::new("{cost: $5}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "cost: "));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "$5"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
}

#[test]
fn dollar_before_closing_brace() {
    let mut s = Session::new("{$}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "$"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
}

#[test]
fn consecutive_dollars_make_progress() {
    let mut s = Session::resume("$$${", 0, &[1, 0, 0, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "$"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "$"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::InterpolationStart, "${"));
}

#[test]
fn failed_escape_braces_are_counted() {
    let mut s = Session::new("{$'{x}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "$'{x}"));
    assert_eq!(s.state().regions().top(), Some(1));
    assert!(s.state().in_region());
}

#[test]
fn bare_dollar_declines_cleanly_without_text() {
    let mut s = Session::resume("$x", 0, &[1, 0, 0, 1, 0]);
    let before = s.state().clone();
    assert_eq!(
        s.next(ValidTokens::INTERPOLATION_START | ValidTokens::ESCAPE),
        None
    );
    assert_eq!(s.state(), &before);
    assert_eq!(s.lexer.pos(), 0);
}

#[test]
fn saturated_interpolation_counter_degrades_to_text() {
    let mut s = Session::resume("${x", 0, &[1, u8::MAX, 0, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "${x"));
    assert_eq!(s.state().interpolation_depth(), u8::MAX);
}

#[test]
fn interpolation_end_needs_open_interpolation() {
    let mut s = Session::resume("}", 0, &[1, 0, 0, 1, 0]);
    assert_eq!(s.next(ValidTokens::INTERPOLATION_END), None);
    assert_eq!(s.next(ValidTokens::all()), tok(TokenKind::RegionEnd, "}"));
}

// === Statement terminator ===

#[test]
fn terminator_consumes_run_of_line_breaks() {
    let mut s = Session::new("\n\r\n\r\n{");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::StatementTerminator, "\n\r\n\r\n"));
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
}

#[test]
fn terminator_accepts_lone_carriage_return() {
    let mut s = Session::new("\r");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::StatementTerminator, "\r"));
}

#[test]
fn terminator_needs_line_break() {
    let mut s = Session::new("x\n");
    assert_eq!(s.next(OUTSIDE), None);
    let mut s = Session::new("");
    assert_eq!(s.next(OUTSIDE), None);
}

#[test]
fn terminator_does_not_skip_blanks() {
    let mut s = Session::new("  \n");
    assert_eq!(s.next(ValidTokens::STATEMENT_TERMINATOR), None);
}

// === Nested-block keyword ===

#[test]
fn nested_block() {
    let source = "{\n  do {\n  x\n  }\n}";
    let mut s = Session::new(source);
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "\n"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::NestedBlockKeyword, "  do"));
    assert!(s.state().nested_block_pending());
    assert!(!s.state().at_line_start());

    assert_eq!(
        s.next(ValidTokens::REGION_START),
        tok(TokenKind::RegionStart, "{")
    );
    assert_eq!(s.state().regions().len(), 2);
    assert!(!s.state().nested_block_pending());

    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "\n"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "  x\n"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "  "));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
    assert_eq!(s.state().regions().len(), 1);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "\n"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
    assert!(!s.state().in_region());
}

#[test]
fn keyword_at_region_start() {
    let mut s = Session::new("{do {}}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::NestedBlockKeyword, "do"));
    assert_eq!(
        s.next(ValidTokens::REGION_START),
        tok(TokenKind::RegionStart, "{")
    );
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
}

#[test]
fn keyword_with_tab_before_brace() {
    let mut s = Session::resume("do\t{", 0, &[1, 0, 1, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::NestedBlockKeyword, "do"));
    assert_eq!(
        s.next(ValidTokens::REGION_START),
        tok(TokenKind::RegionStart, "{")
    );
}

#[test]
fn pending_flag_clears_after_next_token() {
    let mut s = Session::resume("do {", 0, &[1, 0, 1, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::NestedBlockKeyword, "do"));
    // The host may still ask for text; the blank and the brace come back.
    assert_eq!(s.next(ValidTokens::REGION_TEXT), tok(TokenKind::RegionText, " {"));
    assert!(!s.state().nested_block_pending());
}

#[test]
fn identifier_starting_with_do_is_text() {
    let mut s = Session::resume("document {x}", 0, &[1, 0, 1, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "document {x}"));
    assert!(!s.state().nested_block_pending());
    let mut s = Session::resume("do_it\n", 0, &[1, 0, 1, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "do_it\n"));
    assert!(s.state().at_line_start());
}

#[test]
fn keyword_without_brace_is_text() {
    let mut s = Session::resume("do it\n", 0, &[1, 0, 1, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "do it\n"));
    assert!(!s.state().nested_block_pending());

    let mut s = Session::resume("do}", 0, &[1, 0, 1, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "do"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));

    let mut s = Session::resume("do", 0, &[1, 0, 1, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "do"));
}

#[test]
fn rest_of_line_stops_at_interpolation() {
    let mut s = Session::resume("  d ${x}", 0, &[1, 0, 1, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "  d "));
    assert!(!s.state().at_line_start());
    assert_eq!(s.next(INSIDE), tok(TokenKind::InterpolationStart, "${"));
}

#[test]
fn indented_line_is_text() {
    let mut s = Session::resume("  hello\n", 0, &[1, 0, 1, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "  hello\n"));
    assert!(s.state().at_line_start());
    assert!(!s.state().nested_block_pending());
}

#[test]
fn text_after_keyword_candidate_does_not_allow_region_start() {
    let mut s = Session::resume("  hi\n{x}", 0, &[1, 0, 1, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "  hi\n"));
    assert!(!s.state().nested_block_pending());
    assert_eq!(
        s.next(INSIDE | ValidTokens::REGION_START),
        tok(TokenKind::RegionText, "{x}")
    );
    assert_eq!(s.state().regions().len(), 1);
}

#[test]
fn region_end_clears_line_start() {
    let mut s = Session::resume("} do {", 0, &[2, 0, 1, 1, 0, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
    assert!(!s.state().at_line_start());
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, " do {"));
    assert_eq!(s.state().regions().top(), Some(2));

    let mut s = Session::resume("}\ndo {", 0, &[2, 0, 1, 1, 0, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "\n"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::NestedBlockKeyword, "do"));
}

#[test]
fn line_break_of_failed_escape_ends_text() {
    let mut s = Session::resume("$'\ndo {x}\n", 0, &[1, 0, 0, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "$'\n"));
    assert!(s.state().at_line_start());
    assert_eq!(s.state().regions().top(), Some(1));
    assert_eq!(s.next(INSIDE), tok(TokenKind::NestedBlockKeyword, "do"));
    assert_eq!(
        s.next(ValidTokens::REGION_START),
        tok(TokenKind::RegionStart, "{")
    );
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "x"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "\n"));
}

#[test]
fn crlf_of_failed_escape_stays_together() {
    let mut s = Session::resume("$'\r\ndo {", 0, &[1, 0, 0, 1, 0]);
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "$'\r\n"));
    assert!(s.state().at_line_start());
    assert_eq!(s.next(INSIDE), tok(TokenKind::NestedBlockKeyword, "do"));
}

#[test]
fn keyword_only_at_line_start() {
    let mut s = Session::new("{x do {y}}");
    assert_eq!(s.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionText, "x do {y}"));
    assert_eq!(s.next(INSIDE), tok(TokenKind::RegionEnd, "}"));
}

#[test]
fn keyword_not_offered_is_text() {
    let mut s = Session::resume("do {", 0, &[1, 0, 1, 1, 0]);
    assert_eq!(s.next(ValidTokens::REGION_TEXT), tok(TokenKind::RegionText, "do {"));
    assert_eq!(s.state().regions().top(), Some(2));
}

// === Serialization ===

#[test]
fn reset_returns_to_fresh_state() {
    let mut s = Session::new("{a ${");
    let _ = s.next(OUTSIDE);
    let _ = s.next(INSIDE);
    let _ = s.next(INSIDE);
    assert_ne!(s.state(), &ScannerState::new());
    s.scanner.reset();
    assert_eq!(s.scanner, Scanner::new());
}

#[test]
fn snapshot_resumes_mid_document() {
    let source = "{one\ntwo {three\nfour} five}";
    let mut full = Session::new(source);
    assert_eq!(full.next(OUTSIDE), tok(TokenKind::RegionStart, "{"));
    assert_eq!(full.next(INSIDE), tok(TokenKind::RegionText, "one\n"));
    assert_eq!(full.next(INSIDE), tok(TokenKind::RegionText, "two {three\n"));

    let mut buffer = [0u8; crate::state::SERIALIZED_CAPACITY];
    let len = full.scanner.serialize(&mut buffer);
    assert_eq!(&buffer[..len], &[1, 0, 1, 2, 0]);

    let mut resumed = Session::resume(source, full.lexer.origin(), &buffer[..len]);
    for _ in 0..3 {
        assert_eq!(resumed.next(INSIDE), full.next(INSIDE));
        assert_eq!(resumed.state(), full.state());
    }
    assert!(!full.state().in_region());
}

#[test]
fn deserialize_replaces_state() {
    let mut scanner = Scanner::new();
    scanner.deserialize(&[2, 1, 0, 1, 0, 3, 0]);
    assert_eq!(scanner.state().regions().iter().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(scanner.state().interpolation_depth(), 1);
    scanner.deserialize(&[]);
    assert_eq!(scanner, Scanner::new());
}

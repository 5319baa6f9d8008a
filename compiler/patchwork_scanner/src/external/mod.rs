//! Entry points in the shape the host parsing engine calls them.
//!
//! The host owns the scanner as an opaque handle and may call any entry
//! point without one (before creation or after destruction). Those calls
//! are no-ops, return 0, or decline.

use tracing::debug;

use crate::lexer::Lexer;
use crate::scanner::Scanner;
use crate::token_kind::{TokenKind, ValidTokens};

/// Allocate a scanner in the reset state.
pub fn create() -> Box<Scanner> {
    debug!("created prompt scanner");
    Box::new(Scanner::new())
}

/// Release a scanner.
pub fn destroy(scanner: Option<Box<Scanner>>) {
    if let Some(scanner) = scanner {
        debug!(regions = scanner.state().regions().len(), "destroyed prompt scanner");
        drop(scanner);
    }
}

pub fn reset(scanner: Option<&mut Scanner>) {
    if let Some(scanner) = scanner {
        scanner.reset();
    }
}

/// Write the scanner state into `buffer`; returns the bytes written.
pub fn serialize(scanner: Option<&Scanner>, buffer: &mut [u8]) -> usize {
    scanner.map_or(0, |scanner| scanner.serialize(buffer))
}

/// Restore the scanner state. A missing buffer resets it.
pub fn deserialize(scanner: Option<&mut Scanner>, buffer: Option<&[u8]>) {
    if let Some(scanner) = scanner {
        scanner.deserialize(buffer.unwrap_or_default());
    }
}

/// Scan one token with the host's per-symbol validity array.
pub fn scan(
    scanner: Option<&mut Scanner>,
    lexer: &mut dyn Lexer,
    valid_symbols: &[bool],
) -> Option<TokenKind> {
    scanner?.scan(lexer, ValidTokens::from_symbols(valid_symbols))
}

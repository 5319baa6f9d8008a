//! Context-sensitive prompt scanner for the Patchwork grammar.
//!
//! Patchwork embeds natural-language prompt regions in code:
//!
//! ```text
//! think {
//!     Summarize ${doc} in one line.
//!     do {
//!         Quote it with $'{' and $'}'.
//!     }
//! }
//! ```
//!
//! A context-free grammar cannot tell literal braces in the prose from the
//! region's closing brace, or `${` from text. The host parsing engine hands
//! those decisions to this scanner, which tracks nested regions and
//! interpolations across tokens and serializes that state so incremental
//! re-parses can resume anywhere.
//!
//! # Layout
//!
//! - [`token_kind`]: external token kinds and the valid-token mask
//! - [`lexer`]: the host cursor contract and a `&str` implementation
//! - [`region_stack`] / [`state`]: persistent state and its snapshot encoding
//! - [`scanner`]: the ordered classifier dispatch
//! - [`external`]: host entry points tolerating an absent scanner
//! - [`tokenize`]: a reference host that tokenizes whole documents

pub mod external;
pub mod lexer;
pub mod region_stack;
pub mod scanner;
pub mod state;
pub mod token_kind;
pub mod tokenize;

pub use lexer::{Lexer, Span, StrLexer};
pub use region_stack::{RegionOverflow, RegionStack, INITIAL_DEPTH, REGION_CAPACITY};
pub use scanner::{Scanner, DISPATCH_ORDER};
pub use state::{ScannerState, Snapshot, StateFlags, HEADER_LEN, SERIALIZED_CAPACITY};
pub use token_kind::{TokenKind, ValidTokens};
pub use tokenize::{tokenize, Token, TokenTag, Tokenizer};

// The snapshot header stores the region count in one byte.
const _: () = assert!(REGION_CAPACITY < 256);

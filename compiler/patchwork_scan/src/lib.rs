//! Token dump for the Patchwork prompt scanner.
//!
//! Runs the reference tokenizer over a file and prints one line per token,
//! optionally with the scanner snapshot taken after it.

use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Once;

use patchwork_scanner::{Snapshot, Token, TokenTag, Tokenizer};
use thiserror::Error;

pub const USAGE: &str = "usage: patchwork-scan [--state] [--no-skipped] <file|->";

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, so the dump stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{}", USAGE)]
    Usage,
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("{}", describe_io(.path, .source))]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

fn describe_io(path: &str, err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
        io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
        io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
        _ => format!("error reading '{path}': {err}"),
    }
}

/// Command-line options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Input file, or `-` for standard input.
    pub path: String,
    /// Print the serialized scanner state after each token.
    pub show_state: bool,
    /// Print whitespace the scanner skipped.
    pub show_skipped: bool,
    pub help: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            path: "-".to_string(),
            show_state: false,
            show_skipped: true,
            help: false,
        }
    }
}

/// Parse arguments (without the program name).
pub fn parse_args(args: &[String]) -> Result<ScanOptions, CliError> {
    let mut options = ScanOptions::default();
    let mut path = None;

    for arg in args {
        if arg == "--state" {
            options.show_state = true;
        } else if arg == "--no-skipped" {
            options.show_skipped = false;
        } else if arg == "-h" || arg == "--help" {
            options.help = true;
        } else if arg.starts_with('-') && arg != "-" {
            return Err(CliError::UnknownOption(arg.clone()));
        } else if path.replace(arg.clone()).is_some() {
            return Err(CliError::Usage);
        }
    }

    match path {
        Some(path) => options.path = path,
        None if options.help => {}
        None => return Err(CliError::Usage),
    }
    Ok(options)
}

/// Read the input named by `path`; `-` reads standard input.
pub fn read_source(path: &str) -> Result<String, CliError> {
    let result = if path == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content).map(|_| content)
    } else {
        std::fs::read_to_string(path)
    };
    result.map_err(|source| CliError::Io {
        path: path.to_string(),
        source,
    })
}

/// Write the token dump for `source`.
pub fn write_tokens(
    out: &mut dyn Write,
    path: &str,
    source: &str,
    options: &ScanOptions,
) -> io::Result<()> {
    let mut tokenizer = Tokenizer::new(source);
    let mut rows: Vec<(Token, Option<Snapshot>)> = Vec::new();
    while let Some(token) = tokenizer.next_token() {
        if token.tag == TokenTag::Skipped && !options.show_skipped {
            continue;
        }
        let state = options.show_state.then(|| tokenizer.snapshot());
        rows.push((token, state));
    }
    tracing::debug!(path, tokens = rows.len(), "tokenized");

    writeln!(out, "Tokens for '{}' ({} tokens):", path, rows.len())?;
    for (token, state) in &rows {
        let text = &source[token.span.as_range()];
        write!(out, "  {} @ {} {:?}", token.tag, token.span, text)?;
        if let Some(state) = state {
            write!(out, " state={}", Hex(state))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Lowercase hex rendering of snapshot bytes.
struct Hex<'a>(&'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

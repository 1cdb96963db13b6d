//! Heuristic JavaScript minification.
//!
//! Removes whitespace and comments from JavaScript without changing
//! program semantics, using a single-pass scanner instead of a parser.
//! Four entry points share one scanner: emit or count, with or without
//! string collapsing.

mod keywords;
mod scanner;
mod sink;

use scanner::Scanner;
use sink::{ByteSink, SizeSink};
use thiserror::Error;

/// Minification failure. The partial output is discarded; the byte
/// offset points at the opening delimiter of the offending construct.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MinifyError {
    #[error("unterminated block comment at byte {offset}")]
    UnterminatedComment { offset: usize },

    #[error("unterminated string literal at byte {offset}")]
    UnterminatedString { offset: usize },

    #[error("unterminated regex literal at byte {offset}")]
    UnterminatedRegex { offset: usize },

    #[error("regex literal interrupted by a linebreak at byte {offset}")]
    RegexLineBreak { offset: usize },
}

/// Minify JavaScript, removing insignificant whitespace and comments.
pub fn minify_js(input: &[u8]) -> Result<Vec<u8>, MinifyError> {
    let sink = Scanner::new(input, ByteSink::default()).run()?;
    Ok(sink.bytes)
}

/// Compute the minified size without materializing the output.
pub fn minified_js_size(input: &[u8]) -> Result<usize, MinifyError> {
    let sink = Scanner::new(input, SizeSink::default()).run()?;
    Ok(sink.size)
}

/// Minify JavaScript and additionally empty out every string literal,
/// keeping only the matching quote characters.
pub fn minify_js_collapse_strings(input: &[u8]) -> Result<Vec<u8>, MinifyError> {
    let sink = Scanner::new(input, ByteSink::default())
        .collapse_strings()
        .run()?;
    Ok(sink.bytes)
}

/// Size variant of [`minify_js_collapse_strings`].
pub fn minified_js_size_collapse_strings(input: &[u8]) -> Result<usize, MinifyError> {
    let sink = Scanner::new(input, SizeSink::default())
        .collapse_strings()
        .run()?;
    Ok(sink.size)
}

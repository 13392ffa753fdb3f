//! Escape codec
//!
//! Maps arbitrary text to a line-feed-free encoding and back.
//!
//! Both functions make a single left-to-right pass, so sequences produced
//! by `escape` are never escaped again and `unescape` never reads one
//! escape's marker as the start of the next.

use thiserror::Error;

/// Character that introduces an escape sequence
pub const ESCAPE_CHAR: char = '\\';

/// Marker that follows `ESCAPE_CHAR` to encode a line feed
pub const NEWLINE_MARKER: char = 'n';

/// Errors raised while decoding an escaped field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input ended right after an escape character
    #[error("unterminated escape sequence at offset {position}")]
    UnterminatedEscape { position: usize },

    /// Escape character followed by something other than `\` or `n`
    #[error("unknown escape sequence '\\{marker}' at offset {position}")]
    UnknownEscape { marker: char, position: usize },
}

// =============================================================================
// Encoding
// =============================================================================

/// Escape backslashes and line feeds
///
/// ```
/// use flatkv::format::escape;
///
/// assert_eq!(escape("a\\b\nc"), "a\\\\b\\nc");
/// ```
pub fn escape(text: &str) -> String {
    // Most keys and values have nothing to escape
    let extra = text.bytes().filter(|b| *b == b'\\' || *b == b'\n').count();
    let mut encoded = String::with_capacity(text.len() + extra);

    for ch in text.chars() {
        match ch {
            ESCAPE_CHAR => {
                encoded.push(ESCAPE_CHAR);
                encoded.push(ESCAPE_CHAR);
            }
            '\n' => {
                encoded.push(ESCAPE_CHAR);
                encoded.push(NEWLINE_MARKER);
            }
            other => encoded.push(other),
        }
    }

    encoded
}

// =============================================================================
// Decoding
// =============================================================================

/// Reverse `escape`
///
/// Offsets in the returned error are character offsets into `encoded`.
pub fn unescape(encoded: &str) -> Result<String, CodecError> {
    let mut text = String::with_capacity(encoded.len());
    let mut chars = encoded.chars().enumerate();

    while let Some((position, ch)) = chars.next() {
        if ch != ESCAPE_CHAR {
            text.push(ch);
            continue;
        }

        match chars.next() {
            Some((_, ESCAPE_CHAR)) => text.push(ESCAPE_CHAR),
            Some((_, NEWLINE_MARKER)) => text.push('\n'),
            Some((_, marker)) => {
                return Err(CodecError::UnknownEscape { marker, position });
            }
            None => return Err(CodecError::UnterminatedEscape { position }),
        }
    }

    Ok(text)
}

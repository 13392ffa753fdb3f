//! Format Module
//!
//! Defines the on-disk text format for the store file.
//!
//! ## File Format (V1 - Line Pairs)
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ escape(key 1)                        \n │
//! │ escape(value 1)                      \n │
//! ├─────────────────────────────────────────┤
//! │ escape(key 2)                        \n │
//! │ escape(value 2)                      \n │
//! ├─────────────────────────────────────────┤
//! │ ... (repeated for each entry)           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ### Escape Sequences
//! - `\` (0x5C) → `\\`
//! - LF  (0x0A) → `\n`
//!
//! Every other character is written as-is, so an escaped field never
//! contains a raw line feed and the file splits cleanly on `\n`.

mod codec;
mod record;

pub use codec::{escape, unescape, CodecError, ESCAPE_CHAR, NEWLINE_MARKER};
pub use record::{write_record, Entry, Record, RecordError, RecordField, LINES_PER_RECORD};

/// Version of the line-pair format and its escape markers
pub const FORMAT_VERSION: u16 = 1;

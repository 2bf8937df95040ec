#![forbid(unsafe_code)]

//! A byte-aligned LZ77 codec for payloads that must be unpacked by very
//! small, fixed-function runtimes, such as the loaders of 8-bit retro
//! machines.
//!
//! Nothing on the wire is smaller than a byte, so a decoder needs no bit
//! accumulator: it is a literal block, a match block, and a loop. The
//! encoder pays for that luxury with a near-optimal parse: a backward
//! dynamic program picks the cheapest possible sequence of literal runs
//! and back-references under the configured cost model.
//!
//! The two ends share a [`Config`] and nothing else; the stream carries
//! no header, no checksum, and no terminator beyond running out of
//! bytes.

pub mod compress;
pub mod config;
mod cost;
pub mod decompress;
mod parse;

pub use compress::{compress, compress_to_vec, CompressError, Stats};
pub use config::{Config, ConfigError, MAX_BLOCK_LEN};
pub use decompress::{decompress, decompress_to_vec, DecodeError};

/// Hard cap on encoder input size. The parser is not streaming: it
/// needs the whole buffer plus one table cell per byte, so callers with
/// more data than this must chunk it themselves.
pub const MAX_INPUT: usize = 128 * 1024;

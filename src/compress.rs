//! The encoder.
//!
//! Encoding runs in two passes: the parser builds its table over the
//! whole input, then the emitter walks the table forward and writes the
//! byte stream. Blocks strictly alternate literal, match, literal,
//! match; zero-length blocks keep the alternation whenever two blocks
//! of the same kind have to touch.

use std::fmt;
use std::io::{self, Write};

use byteorder::{WriteBytesExt, LE};
use fehler::{throw, throws};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::cost::INFEASIBLE;
use crate::parse::parse;
use crate::MAX_INPUT;

/// Errors when encoding a buffer.
#[derive(Error, Debug)]
pub enum CompressError {
    #[error("refusing to encode {0} bytes; the parser wants the whole input in memory and tops out at 128 KiB, chunk your data")]
    InputTooLarge(usize),
    #[error("invalid codec parameters")]
    BadConfig(#[from] ConfigError),
    #[error("error writing to the output you gave me")]
    WriteError(#[from] io::Error),
}
type Error = CompressError; // do it this way for better docs

/// Counters filled during emission.
///
/// One of these is returned by every encode call; callers that don't
/// care simply drop it.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    /// Bytes consumed from the input buffer.
    pub input_bytes: u64,
    /// Bytes written to the output stream.
    pub output_bytes: u64,
    /// Literal blocks carrying at least one byte.
    pub literal_blocks: u64,
    /// Bytes carried by literal blocks.
    pub literal_bytes: u64,
    /// Match blocks carrying at least one byte.
    pub match_blocks: u64,
    /// Bytes reproduced by match blocks.
    pub match_bytes: u64,
    /// Zero-length match blocks separating adjacent literal blocks.
    pub zero_matches: u64,
    /// Zero-length literal headers separating adjacent match blocks.
    pub zero_literals: u64,
    /// Histogram of literal block lengths, indexed by length.
    pub literal_lengths: Vec<u32>,
    /// Histogram of match block lengths, indexed by length.
    pub match_lengths: Vec<u32>,
}

impl Stats {
    fn bump(hist: &mut Vec<u32>, len: usize) {
        if hist.len() <= len {
            hist.resize(len + 1, 0);
        }
        hist[len] += 1;
    }

    /// Output size as a fraction of the input size. 1.0 when the input
    /// was empty.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            1.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} -> {} bytes ({:.2}%)",
            self.input_bytes,
            self.output_bytes,
            self.ratio() * 100.0
        )?;
        writeln!(
            f,
            "literals: {} blocks, {} bytes, {} zero-length boundaries",
            self.literal_blocks, self.literal_bytes, self.zero_literals
        )?;
        write!(
            f,
            "matches:  {} blocks, {} bytes, {} zero-length boundaries",
            self.match_blocks, self.match_bytes, self.zero_matches
        )
    }
}

struct Emitter<'a, W: Write> {
    cfg: &'a Config,
    writer: W,
    /// Whether the previous block was a literal; drives both the
    /// block-boundary markers and the selection cost below.
    in_literal: bool,
    /// Input position of the block being emitted, which is also the
    /// decoder's output cursor when it reads the block. Only
    /// address-relative offsets need it.
    pos: usize,
    stats: Stats,
}

impl<'a, W: Write> Emitter<'a, W> {
    /// Write a length field: one byte, or the two-byte form once the
    /// configured limit allows lengths a single byte cannot hold.
    #[throws(io::Error)]
    fn put_len(&mut self, len: u32, limit: u32) {
        if limit > 255 && len > 127 {
            self.writer.write_u8(0x80 | (len & 0x7F) as u8)?;
            self.writer.write_u8(((len >> 7) - 1) as u8)?;
            self.stats.output_bytes += 2;
        } else {
            self.writer.write_u8(len as u8)?;
            self.stats.output_bytes += 1;
        }
    }

    #[throws(io::Error)]
    fn literal(&mut self, data: &[u8]) {
        if self.in_literal {
            // a zero-length match terminates the previous literal block
            self.match_block(0, 1)?;
        }
        self.put_len(data.len() as u32, self.cfg.max_llen)?;
        self.writer.write_all(data)?;
        self.in_literal = true;
        self.stats.output_bytes += data.len() as u64;
        self.stats.literal_blocks += 1;
        self.stats.literal_bytes += data.len() as u64;
        Stats::bump(&mut self.stats.literal_lengths, data.len());
    }

    #[throws(io::Error)]
    fn match_block(&mut self, len: u32, mpos: u32) {
        if !self.in_literal {
            // a zero-length literal header keeps the alternation
            self.writer.write_u8(0)?;
            self.stats.output_bytes += 1;
            self.stats.zero_literals += 1;
        }
        self.put_len(len, self.cfg.max_mlen)?;
        if (len > 0 || self.cfg.zero_offset) && self.cfg.bits_moff > 0 {
            let mut wire = match self.cfg.offset_rel {
                None => mpos - 1,
                Some(base) => {
                    let rel = self
                        .pos
                        .wrapping_add(base as usize)
                        .wrapping_sub(mpos as usize);
                    (rel & 0xFFFF) as u32
                }
            };
            if self.cfg.exor_offset {
                wire ^= self.cfg.mask();
            }
            if self.cfg.bits_moff > 8 {
                self.writer.write_u16::<LE>(wire as u16)?;
                self.stats.output_bytes += 2;
            } else {
                self.writer.write_u8(wire as u8)?;
                self.stats.output_bytes += 1;
            }
        }
        self.in_literal = false;
        if len > 0 {
            self.stats.match_blocks += 1;
            self.stats.match_bytes += len as u64;
        } else {
            self.stats.zero_matches += 1;
        }
        Stats::bump(&mut self.stats.match_lengths, len as usize);
    }
}

/// Encode `data` into `writer` and return the emission statistics.
///
/// The output carries none of the parameters in `cfg`; hand the decoder
/// the same configuration or the result will be garbage.
#[throws]
pub fn compress<W: Write>(cfg: &Config, data: &[u8], writer: W) -> Stats {
    cfg.validate()?;
    if data.len() > MAX_INPUT {
        throw!(Error::InputTooLarge(data.len()));
    }

    let sp = parse(cfg, data);
    let zero_match = cfg.zero_match_cost();
    let mut emitter = Emitter {
        cfg,
        writer,
        in_literal: false,
        pos: 0,
        stats: Stats::default(),
    };
    emitter.stats.input_bytes = data.len() as u64;

    let mut p = 0;
    while p < data.len() {
        let cell = &sp[p];
        emitter.pos = p;
        // continuing a literal run costs the zero-length match that
        // would terminate it
        let extra = if emitter.in_literal { zero_match } else { 0 };
        if cell.lbits.saturating_add(extra) <= cell.mbits {
            assert!(cell.lbits < INFEASIBLE, "parser chose an unencodable literal");
            let len = cell.llen.min(cfg.max_llen) as usize;
            emitter.literal(&data[p..p + len])?;
            p += len;
        } else {
            assert!(cell.mbits < INFEASIBLE, "parser chose an unencodable match");
            let len = cell.mlen.min(cfg.max_mlen);
            emitter.match_block(len, cell.mpos)?;
            p += len as usize;
        }
    }
    // close the final pair so the stream ends on a match block
    if emitter.in_literal {
        emitter.pos = p;
        emitter.match_block(0, 1)?;
    }
    emitter.stats
}

/// Convenience wrapper that encodes into a fresh vector.
#[throws]
pub fn compress_to_vec(cfg: &Config, data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    compress(cfg, data, &mut buf)?;
    buf
}

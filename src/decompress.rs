//! The decoder.
//!
//! The mirror image of a few dozen machine instructions on the target
//! hardware: read a literal block, read a match block, repeat. All
//! back-references go through a ring buffer the size of the offset
//! window, so the decoder never needs the output it has already handed
//! over.

use std::io::{self, Read, Write};

use byteorder::ReadBytesExt;
use fehler::{throw, throws};
use thiserror::Error;

use crate::config::{Config, ConfigError};

/// Errors when decoding a stream.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid codec parameters")]
    BadConfig(#[from] ConfigError),
    #[error("short file: expected {missing} more literal bytes after {produced} bytes of output. Either your input was truncated or your parameters disagree with the encoder's.")]
    TruncatedLiteral { produced: u64, missing: u64 },
    #[error("short file: expected the second byte of a length field after {produced} bytes of output")]
    TruncatedLength { produced: u64 },
    #[error("short file: expected a match offset after {produced} bytes of output")]
    TruncatedOffset { produced: u64 },
    #[error("error reading from the input you gave me")]
    ReadError(io::Error),
    #[error("error writing to the output you gave me")]
    WriteError(io::Error),
}
type Error = DecodeError; // do it this way for better docs

struct Decoder<'a, R: Read, W: Write> {
    cfg: &'a Config,
    reader: R,
    writer: W,
    ring: Vec<u8>,
    mask: usize,
    /// Monotonic output cursor; wraps into the ring under `mask`.
    pos: u64,
}

impl<'a, R: Read, W: Write> Decoder<'a, R, W> {
    /// One byte of input, or `None` at end of input.
    #[throws]
    fn next_byte(&mut self) -> Option<u8> {
        match self.reader.read_u8() {
            Ok(byte) => Some(byte),
            Err(ref e) if e.kind() == io::ErrorKind::UnexpectedEof => None,
            Err(e) => throw!(Error::ReadError(e)),
        }
    }

    /// One length field, or `None` when the input ends cleanly at the
    /// block boundary. The second byte of a two-byte field must follow
    /// once the first was read.
    #[throws]
    fn get_len(&mut self, limit: u32) -> Option<u64> {
        let first = match self.next_byte()? {
            Some(byte) => byte,
            None => return None,
        };
        let mut len = u64::from(first);
        if limit > 255 && first >= 0x80 {
            match self.next_byte()? {
                Some(second) => len += u64::from(second) << 7,
                None => throw!(Error::TruncatedLength { produced: self.pos }),
            }
        }
        Some(len)
    }

    /// Store one output byte in the ring and hand it to the sink.
    #[throws]
    fn push(&mut self, byte: u8) {
        self.ring[self.pos as usize & self.mask] = byte;
        self.writer
            .write_all(std::slice::from_ref(&byte))
            .map_err(Error::WriteError)?;
        self.pos += 1;
    }

    #[throws]
    fn run(&mut self) -> u64 {
        loop {
            let n = match self.get_len(self.cfg.max_llen)? {
                Some(n) => n,
                None => return self.pos,
            };
            for i in 0..n {
                match self.next_byte()? {
                    Some(byte) => self.push(byte)?,
                    None => throw!(Error::TruncatedLiteral {
                        produced: self.pos,
                        missing: n - i,
                    }),
                }
            }

            let n = match self.get_len(self.cfg.max_mlen)? {
                Some(n) => n,
                None => return self.pos,
            };
            if n > 0 || self.cfg.zero_offset {
                let mut off = 0usize;
                if self.cfg.bits_moff > 0 {
                    off = match self.next_byte()? {
                        Some(byte) => usize::from(byte),
                        None => throw!(Error::TruncatedOffset { produced: self.pos }),
                    };
                    if self.cfg.bits_moff > 8 {
                        match self.next_byte()? {
                            Some(byte) => off |= usize::from(byte) << 8,
                            None => throw!(Error::TruncatedOffset { produced: self.pos }),
                        }
                    }
                    if self.cfg.exor_offset {
                        off ^= self.mask;
                    }
                }
                let mut src = match self.cfg.offset_rel {
                    // off counts back from just before the cursor
                    None => (self.pos as usize)
                        .wrapping_sub(off)
                        .wrapping_add(self.mask)
                        & self.mask,
                    // off is a ring address, shifted by the base
                    Some(base) => (off + self.mask + 1 - base as usize) & self.mask,
                };
                for _ in 0..n {
                    let byte = self.ring[src & self.mask];
                    self.push(byte)?;
                    src += 1;
                }
            }
        }
    }
}

/// Decode a stream, writing output as it is produced, and return the
/// number of bytes decoded.
///
/// End of input at a block boundary is the normal way a stream stops.
/// End of input anywhere else is an error, by which point a prefix of
/// the output has already reached the sink.
#[throws]
pub fn decompress<R: Read, W: Write>(cfg: &Config, reader: R, writer: W) -> u64 {
    cfg.validate()?;
    let mask = cfg.mask() as usize;
    let mut decoder = Decoder {
        cfg,
        reader,
        writer,
        ring: vec![0; mask + 1],
        mask,
        pos: 0,
    };
    decoder.run()?
}

/// Convenience wrapper that decodes a byte slice into a fresh vector.
#[throws]
pub fn decompress_to_vec(cfg: &Config, input: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    decompress(cfg, input, &mut out)?;
    out
}

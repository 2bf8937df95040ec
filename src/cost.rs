//! The cost model.
//!
//! Everything the parser decides reduces to sums of these three
//! functions. Costs are bit counts and always whole bytes; the parser
//! saturates sums before comparing, so `INFEASIBLE` simply never wins.

use crate::config::Config;

/// Sentinel for "this emission cannot be encoded at all".
pub(crate) const INFEASIBLE: u32 = std::u32::MAX;

impl Config {
    /// Wire cost of a match offset, in bits.
    pub(crate) fn moff_cost(&self, off: u32) -> u32 {
        if off < 1 || off > self.max_off() {
            return INFEASIBLE;
        }
        match self.bits_moff {
            0 => 0,
            1..=8 => 8,
            _ => 16,
        }
    }

    /// Wire cost of a match length field, in bits.
    pub(crate) fn mlen_cost(&self, len: u32) -> u32 {
        if len > self.max_mlen {
            INFEASIBLE
        } else if self.max_mlen > 255 && len > 127 {
            16
        } else {
            8
        }
    }

    /// Wire cost of a literal run of `len` bytes worth of headers, in
    /// bits. Excludes the literal data itself.
    ///
    /// Runs beyond `max_llen` cost one extra header plus one zero-length
    /// match block per split; the emitter performs exactly those splits.
    pub(crate) fn llen_cost(&self, len: u32) -> u32 {
        if len == 0 {
            return 0;
        }
        let mut len = len;
        let mut bits = 8;
        while len > self.max_llen {
            bits += 8 + self.zero_match_cost();
            len -= self.max_llen;
        }
        if self.max_llen > 255 && len > 127 {
            bits += 8;
        }
        bits
    }

    /// Bits spent on a zero-length match block, the boundary marker
    /// between adjacent literal blocks.
    pub(crate) fn zero_match_cost(&self) -> u32 {
        self.mlen_cost(0) + if self.zero_offset { self.moff_cost(1) } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_costs() {
        let cfg = Config::default();
        assert_eq!(cfg.moff_cost(0), INFEASIBLE);
        assert_eq!(cfg.moff_cost(1), 8);
        assert_eq!(cfg.moff_cost(256), 8);
        assert_eq!(cfg.moff_cost(257), INFEASIBLE);

        let mut rle = Config::default();
        rle.offset_bits(0);
        assert_eq!(rle.moff_cost(1), 0);
        assert_eq!(rle.moff_cost(2), INFEASIBLE);

        let mut wide = Config::default();
        wide.offset_bits(12);
        assert_eq!(wide.moff_cost(4096), 16);
    }

    #[test]
    fn match_length_costs() {
        let cfg = Config::default();
        assert_eq!(cfg.mlen_cost(0), 8);
        assert_eq!(cfg.mlen_cost(255), 8);
        assert_eq!(cfg.mlen_cost(256), INFEASIBLE);

        let mut long = Config::default();
        long.max_match_len(1000);
        assert_eq!(long.mlen_cost(127), 8);
        assert_eq!(long.mlen_cost(128), 16);
        assert_eq!(long.mlen_cost(1000), 16);
        assert_eq!(long.mlen_cost(1001), INFEASIBLE);
    }

    #[test]
    fn literal_run_costs() {
        let cfg = Config::default();
        assert_eq!(cfg.llen_cost(0), 0);
        assert_eq!(cfg.llen_cost(1), 8);
        assert_eq!(cfg.llen_cost(255), 8);
        // one split: new header plus the zero-length match between blocks
        assert_eq!(cfg.llen_cost(256), 8 + 8 + 8);
        // three splits for a 1000-byte run at the default limit
        assert_eq!(cfg.llen_cost(1000), 8 + 3 * 16);
    }

    #[test]
    fn literal_run_costs_two_byte_headers() {
        let mut cfg = Config::default();
        cfg.max_literal_len(1000);
        assert_eq!(cfg.llen_cost(127), 8);
        assert_eq!(cfg.llen_cost(128), 16);
        assert_eq!(cfg.llen_cost(1000), 16);
        // splits are always priced as one-byte headers; the 100-byte
        // remainder after one split stays below the two-byte threshold
        assert_eq!(cfg.llen_cost(1100), 8 + 16);
    }

    #[test]
    fn zero_match_costs() {
        let mut cfg = Config::default();
        assert_eq!(cfg.zero_match_cost(), 8);
        assert_eq!(cfg.zero_offset(true).zero_match_cost(), 16);
        assert_eq!(cfg.offset_bits(12).zero_match_cost(), 24);
        assert_eq!(cfg.offset_bits(0).zero_match_cost(), 8);
    }
}

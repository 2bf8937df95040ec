//! The near-optimal parser.
//!
//! A backward dynamic program fills one cell per input position. Each
//! cell holds the cheapest way to finish the stream from that position
//! under two entry states: "the previous block was a literal" and "the
//! previous block was a match". The emitter then walks the table
//! forward and reads off the decisions.

use crate::config::Config;
use crate::cost::INFEASIBLE;

/// How many positions ahead a literal run may look when joining the run
/// that starts there. Five reaches every optimum this cost model can
/// produce; widening it further only re-finds the same joins.
const JOIN_WINDOW: usize = 5;

/// One entry of the parse table.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Cell {
    /// Best literal run starting here, possibly beyond the wire limit
    /// (the emitter splits).
    pub(crate) llen: u32,
    /// Cost to the end of input when the emission here is a literal.
    pub(crate) lbits: u32,
    /// Best match length starting here.
    pub(crate) mlen: u32,
    /// Window offset of that match, 1-based.
    pub(crate) mpos: u32,
    /// Cost to the end of input when the emission here is a match.
    pub(crate) mbits: u32,
}

/// Longest match for `data[p..]` within the window.
///
/// Plain O(window) scan; the format targets inputs tiny enough that
/// nothing smarter pays off. Ties go to the later start, i.e. the
/// smaller offset. Returns `(length, offset)`, length 0 when no byte
/// matches.
pub(crate) fn find_match(cfg: &Config, data: &[u8], p: usize) -> (u32, u32) {
    let window_start = p.saturating_sub(cfg.max_off() as usize);
    let cap = (data.len() - p).min(cfg.max_mlen as usize);
    let mut best_len = 0;
    let mut best_off = 0;
    for i in window_start..p {
        let len = data[i..]
            .iter()
            .zip(&data[p..])
            .take(cap)
            .take_while(|&(a, b)| a == b)
            .count();
        if len > 0 && len >= best_len {
            best_len = len;
            best_off = p - i;
        }
    }
    (best_len as u32, best_off as u32)
}

/// Fill the parse table for `data`: one cell per position plus a
/// sentinel, built back to front.
pub(crate) fn parse(cfg: &Config, data: &[u8]) -> Vec<Cell> {
    let n = data.len();
    let mut sp = vec![Cell::default(); n + 1];
    sp[n].mbits = INFEASIBLE; // can't enter the end through a match

    let zero_lit = cfg.llen_cost(1);
    for p in (0..n).rev() {
        let mut cell = Cell {
            llen: 0,
            lbits: INFEASIBLE,
            mlen: 0,
            mpos: 0,
            mbits: INFEASIBLE,
        };

        // Literal path. Either swallow the following literal run into
        // one longer run (paying the header difference), tracking how
        // far such a run could reach...
        let mut reach = 0;
        for i in 1..=JOIN_WINDOW.min(n - p) {
            let next = sp[p + i];
            reach = reach.max(next.llen as usize + i);
            let joined = next.llen + i as u32;
            let cand = next
                .lbits
                .saturating_add(8 * i as u32)
                .saturating_add(cfg.llen_cost(joined))
                .saturating_sub(cfg.llen_cost(next.llen));
            if cand < cell.lbits {
                cell.lbits = cand;
                cell.llen = joined;
            }
        }
        // ...or cut the run short anywhere inside that reach and hand
        // over to a match.
        for i in 1..reach {
            let cand = sp[p + i]
                .mbits
                .saturating_add(8 * i as u32)
                .saturating_add(cfg.llen_cost(i as u32));
            if cand < cell.lbits {
                cell.lbits = cand;
                cell.llen = i as u32;
            }
        }

        // Match path: try every length of the best window match. The
        // continuation either opens a literal block or is another match,
        // which costs the zero-length literal header between them.
        let (ml, mp) = find_match(cfg, data, p);
        if ml > 0 {
            cell.mpos = mp;
            let moff = cfg.moff_cost(mp);
            for l in 1..=ml {
                let next = sp[p + l as usize];
                let base = moff.saturating_add(cfg.mlen_cost(l));
                let lit_cont = next.lbits.saturating_add(base);
                if lit_cont <= cell.mbits {
                    cell.mbits = lit_cont;
                    cell.mlen = l;
                }
                let match_cont = next.mbits.saturating_add(zero_lit).saturating_add(base);
                if match_cont <= cell.mbits {
                    cell.mbits = match_cont;
                    cell.mlen = l;
                }
            }
        }

        sp[p] = cell;
    }
    sp
}

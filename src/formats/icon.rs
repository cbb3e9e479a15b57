//! Icon archive transformer.
//!
//! Config-driven: the manifest gives each record's format and extent, so
//! the archive itself carries no lengths to read. Without a manifest, a
//! documented heuristic stands in.

use crate::config::{IconFmt, IconRecord};
use crate::primitives::{read_u16_be, swap16_range};

const PALETTE_ENTRIES: usize = 16;
const WINDOW_SIZE: usize = 32;

pub fn convert(data: &[u8], records: &[IconRecord]) -> Vec<u8> {
    let mut out = data.to_vec();

    if records.is_empty() {
        heuristic_fallback(&mut out);
        return out;
    }

    let mut cursor = 0usize;
    for rec in records {
        let w = rec.w as usize;
        let h = rec.h as usize;
        match rec.fmt {
            IconFmt::Solo => {
                let raster_len = (w * h) / 2;
                let pal_off = cursor + raster_len;
                swap16_range(&mut out, pal_off, PALETTE_ENTRIES);
                cursor = pal_off + PALETTE_ENTRIES * 2;
            }
            IconFmt::Pair => {
                let raster_len = (w * h) / 2;
                let pal1_off = cursor + raster_len;
                swap16_range(&mut out, pal1_off, PALETTE_ENTRIES);
                let pal2_off = pal1_off + PALETTE_ENTRIES * 2;
                swap16_range(&mut out, pal2_off, PALETTE_ENTRIES);
                cursor = pal2_off + PALETTE_ENTRIES * 2;
            }
            IconFmt::Rgba16 => {
                swap16_range(&mut out, cursor, w * h);
                cursor += w * h * 2;
            }
        }
    }

    out
}

/// Heuristic fallback (spec §9: admitted heuristic, prefer configuration
/// when available): a 32-byte window whose 16 big-endian u16s are at least
/// half non-zero is treated as a 16-entry RGBA16 palette.
fn heuristic_fallback(out: &mut [u8]) {
    let mut start = 0usize;
    while start + WINDOW_SIZE <= out.len() {
        let nonzero = (0..PALETTE_ENTRIES)
            .filter(|&i| read_u16_be(out, start + i * 2) != 0)
            .count();
        if nonzero >= 8 {
            swap16_range(out, start, PALETTE_ENTRIES);
        }
        start += WINDOW_SIZE;
    }
}

//! BG (background image) transformer.
//!
//! Converts `pal_count` back-to-back background headers from BE to LE and
//! emits a relocation trailer for the pointer fields that survive
//! classification.
//!
//! ## Layout (per variant, 0x10 bytes)
//! ```text
//! [0x00] IMG_PTR raster   (BE, base 0x8020_0000)
//! [0x04] PAL_PTR palette  (BE, base 0x8020_0000)
//! [0x08] u16 startX
//! [0x0A] u16 startY
//! [0x0C] u16 width
//! [0x0E] u16 height
//! ```
//! Each referenced palette is 256 entries of RGBA16.

use crate::pointer::classify_ptr;
use crate::primitives::{read_u32_be, swap16, swap16_range, write_u32_le};
use crate::reloc::RelocTable;

const HEADER_SIZE: usize = 0x10;
const PALETTE_ENTRIES: usize = 256;

/// Convert a BE BG segment with `pal_count` header variants (default 1 when
/// no configuration names this segment) to LE plus relocation trailer.
/// `base` is the segment's virtual base address, resolved by the dispatcher
/// per-asset-kind (spec §4.1) rather than hardcoded here.
pub fn convert(data: &[u8], pal_count: u32, base: u32) -> Vec<u8> {
    let mut out = data.to_vec();
    let mut relocs = RelocTable::new();

    for i in 0..pal_count as usize {
        let header_off = i * HEADER_SIZE;
        if header_off + HEADER_SIZE > data.len() {
            break;
        }

        let raster_ptr = read_u32_be(data, header_off);
        let palette_ptr = read_u32_be(data, header_off + 0x04);

        match classify_ptr(raster_ptr, base, data.len()) {
            Some(off) => {
                relocs.insert(header_off);
                write_u32_le(&mut out, header_off, off as u32);
            }
            None => write_u32_le(&mut out, header_off, raster_ptr),
        }

        let palette_off = match classify_ptr(palette_ptr, base, data.len()) {
            Some(off) => {
                relocs.insert(header_off + 0x04);
                write_u32_le(&mut out, header_off + 0x04, off as u32);
                Some(off)
            }
            None => {
                write_u32_le(&mut out, header_off + 0x04, palette_ptr);
                None
            }
        };

        swap16(&mut out, header_off + 0x08);
        swap16(&mut out, header_off + 0x0A);
        swap16(&mut out, header_off + 0x0C);
        swap16(&mut out, header_off + 0x0E);

        if let Some(pal_off) = palette_off {
            if pal_off + PALETTE_ENTRIES * 2 <= out.len() {
                swap16_range(&mut out, pal_off, PALETTE_ENTRIES);
            }
        }
    }

    relocs.finalize(out)
}

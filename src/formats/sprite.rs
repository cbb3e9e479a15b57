//! Sprite archive transformer (player + NPC sprites).
//!
//! No relocation trailer is produced: the consumer treats every offset in a
//! sprite archive as self-relative to the table or structure that holds it,
//! so there is nothing for a loader to fix up against a runtime base.
//!
//! ## Archive layout
//! ```text
//! [0x00] Header (0x20 bytes); last four words (at 0x10/0x14/0x18/0x1C,
//!        each relative to 0x10) point to:
//!          - player raster table
//!          - player YAY0 offset table (14 fixed slots)
//!          - NPC YAY0 offset table (zero-sentinel terminated)
//!          - archive end
//! ```
//!
//! ## Sprite (decompressed) body layout
//! ```text
//! [0x00] image list offset    (-1-terminated array of 8-byte descriptors)
//! [0x04] palette list offset  (-1-terminated array of 16xRGBA16 palettes)
//! [0x08] reserved
//! [0x0C] reserved
//! [0x10] animation list offset (-1-terminated array of animations; each
//!        animation is itself a -1-terminated array of 12-byte components:
//!        {offset:u32, count:u16, three more u16 fields}, with a command
//!        stream of count/2 u16s living at the component's `offset`)
//! ```

use crate::decompress::{Decompressor, is_yay0_framed, maybe_decompress};
use crate::error::Warning;
use crate::primitives::{read_u16_be, read_u32_be, swap16, swap16_range, swap32, swap32_range, write_u32_le};

const HEADER_SIZE: usize = 0x20;
const PLAYER_SLOTS: usize = 14;
const LIST_TERMINATOR: u32 = 0xFFFF_FFFF;

/// Convert a full sprite archive. Returns the rebuilt archive bytes plus any
/// non-fatal warnings (a sprite slot whose YAY0 block failed to decompress
/// is skipped — recorded as a zero offset in the rebuilt table — rather than
/// aborting the whole archive).
pub fn convert(data: &[u8], decompress: Decompressor) -> (Vec<u8>, Vec<Warning>) {
    let mut warnings = Vec::new();
    if data.len() < HEADER_SIZE {
        return (data.to_vec(), warnings);
    }

    let raster_table_off = 0x10 + read_u32_be(data, 0x10) as usize;
    let player_yay0_off = 0x10 + read_u32_be(data, 0x14) as usize;
    let npc_yay0_off = 0x10 + read_u32_be(data, 0x18) as usize;
    let end_off = 0x10 + read_u32_be(data, 0x1C) as usize;

    let raster_table = convert_raster_table(data, raster_table_off, player_yay0_off);

    let player_spans = slot_spans(data, player_yay0_off, PLAYER_SLOTS, npc_yay0_off);
    let player_sprites = decompress_spans(data, &player_spans, decompress, "player", &mut warnings);

    let npc_slot_count = count_npc_slots(data, npc_yay0_off, end_off);
    let npc_spans = slot_spans(data, npc_yay0_off, npc_slot_count, end_off);
    let npc_sprites = decompress_spans(data, &npc_spans, decompress, "npc", &mut warnings);

    let mut out = vec![0u8; HEADER_SIZE];

    out.extend_from_slice(&raster_table);
    align4(&mut out);

    let new_raster_off = HEADER_SIZE;
    let new_player_table_off = out.len();
    write_slot_table(&mut out, &player_sprites, PLAYER_SLOTS);
    align16(&mut out);

    let new_npc_table_off = out.len();
    write_slot_table(&mut out, &npc_sprites, npc_slot_count + 1);

    let new_end_off = out.len();

    write_u32_le(&mut out, 0x10, (new_raster_off - 0x10) as u32);
    write_u32_le(&mut out, 0x14, (new_player_table_off - 0x10) as u32);
    write_u32_le(&mut out, 0x18, (new_npc_table_off - 0x10) as u32);
    write_u32_le(&mut out, 0x1C, (new_end_off - 0x10) as u32);

    (out, warnings)
}

fn align4(buf: &mut Vec<u8>) {
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
}

fn align16(buf: &mut Vec<u8>) {
    while buf.len() % 16 != 0 {
        buf.push(0);
    }
}

/// Byte-swap the player raster table's 3 boundary words, then byte-swap
/// every 32-bit word in each of the 3 contiguous sub-ranges those boundaries
/// describe.
fn convert_raster_table(data: &[u8], table_off: usize, table_end: usize) -> Vec<u8> {
    if table_off >= data.len() || table_off + 0x0C > data.len() {
        return Vec::new();
    }
    let len = table_end.saturating_sub(table_off).min(data.len() - table_off);
    let mut out = data[table_off..table_off + len].to_vec();

    let w0 = read_u32_be(&out, 0x00) as usize;
    let w1 = read_u32_be(&out, 0x04) as usize;
    let w2 = read_u32_be(&out, 0x08) as usize;
    swap32(&mut out, 0x00);
    swap32(&mut out, 0x04);
    swap32(&mut out, 0x08);

    let bounds = [0x0C, w0, w1, w2];
    for i in 0..3 {
        let start = bounds[i];
        let end = bounds[i + 1];
        if end > start && end <= out.len() {
            swap32_range(&mut out, start, (end - start) / 4);
        }
    }

    out
}

/// For each non-zero slot in a `count`-slot table at `table_off`, compute
/// its absolute compressed span: from the slot's own offset (relative to
/// the table base) to the next non-zero slot's offset, or `table_end` for
/// the last one.
fn slot_spans(data: &[u8], table_off: usize, count: usize, table_end: usize) -> Vec<(usize, usize, usize)> {
    let mut slots = Vec::new();
    for i in 0..count {
        let slot_addr = table_off + i * 4;
        if slot_addr + 4 > data.len() {
            break;
        }
        let v = read_u32_be(data, slot_addr);
        if v != 0 {
            slots.push((i, v as usize));
        }
    }
    slots.sort_by_key(|&(_, v)| v);

    let mut spans = Vec::with_capacity(slots.len());
    for (idx, (slot_index, v)) in slots.iter().enumerate() {
        let next = slots
            .get(idx + 1)
            .map(|&(_, nv)| nv)
            .unwrap_or(table_end.saturating_sub(table_off));
        spans.push((*slot_index, table_off + v, table_off + next));
    }
    spans.sort_by_key(|&(slot_index, _, _)| slot_index);
    spans
}

/// NPC table has no fixed slot count; read forward from `table_off` until a
/// zero slot (the sentinel) is hit.
fn count_npc_slots(data: &[u8], table_off: usize, table_end: usize) -> usize {
    let mut i = 0;
    loop {
        let slot_addr = table_off + i * 4;
        if slot_addr + 4 > data.len() || slot_addr >= table_end {
            break;
        }
        if read_u32_be(data, slot_addr) == 0 {
            break;
        }
        i += 1;
    }
    i
}

/// Decompress + convert each span. A span whose bytes fail to decompress is
/// dropped (recorded as a warning) rather than aborting the archive.
fn decompress_spans(
    data: &[u8],
    spans: &[(usize, usize, usize)],
    decompress: Decompressor,
    label: &str,
    warnings: &mut Vec<Warning>,
) -> Vec<Option<(usize, Vec<u8>)>> {
    let mut max_slot = spans.iter().map(|&(i, _, _)| i).max().map(|m| m + 1).unwrap_or(0);
    max_slot = max_slot.max(spans.len());
    let mut result = vec![None; max_slot];

    for &(slot_index, start, end) in spans {
        if start >= end || end > data.len() {
            warnings.push(Warning::new(
                format!("{label}[{slot_index}]"),
                "sprite span out of range",
            ));
            continue;
        }
        let raw = &data[start..end];
        if !is_yay0_framed(raw) {
            warnings.push(Warning::new(
                format!("{label}[{slot_index}]"),
                "sprite slot is not YAY0-framed",
            ));
            continue;
        }
        match maybe_decompress(raw, decompress) {
            Ok(decompressed) => {
                let converted = convert_sprite_body(&decompressed);
                if slot_index < result.len() {
                    result[slot_index] = Some((slot_index, converted));
                }
            }
            Err(e) => warnings.push(Warning::new(format!("{label}[{slot_index}]"), e.to_string())),
        }
    }

    result
}

/// Write a slot table of `slot_count` LE u32 entries (relative to the
/// table's own start) followed by each non-empty sprite payload, each
/// individually 4-byte aligned. Empty slots (decompression failures,
/// unused trailing slots) are written as `0`.
fn write_slot_table(out: &mut Vec<u8>, sprites: &[Option<(usize, Vec<u8>)>], slot_count: usize) {
    let table_start = out.len();
    out.resize(table_start + slot_count * 4, 0);

    for slot in sprites.iter().flatten() {
        let (slot_index, payload) = slot;
        align4(out);
        let payload_off = out.len() - table_start;
        write_u32_le(out, table_start + slot_index * 4, payload_off as u32);
        out.extend_from_slice(payload);
    }
}

/// Convert one decompressed sprite body in place. No pointer
/// classification or relocation tracking: every offset here is self-
/// relative and gets byte-swapped, never rewritten.
fn convert_sprite_body(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    if data.len() < 0x14 {
        return out;
    }

    let image_list_off = read_u32_be(data, 0x00) as usize;
    let palette_list_off = read_u32_be(data, 0x04) as usize;
    let anim_list_off = read_u32_be(data, 0x10) as usize;

    let image_offsets = read_offset_list(data, image_list_off);
    let palette_offsets = read_offset_list(data, palette_list_off);
    let anim_offsets = read_offset_list(data, anim_list_off);

    swap32(&mut out, 0x00);
    swap32(&mut out, 0x04);
    swap32(&mut out, 0x08);
    swap32(&mut out, 0x0C);
    swap32(&mut out, 0x10);

    swap_offset_list_entries(&mut out, image_list_off, image_offsets.len());
    swap_offset_list_entries(&mut out, palette_list_off, palette_offsets.len());
    swap_offset_list_entries(&mut out, anim_list_off, anim_offsets.len());

    for img_off in &image_offsets {
        swap32_range(&mut out, *img_off, 2);
    }
    for pal_off in &palette_offsets {
        swap16_range(&mut out, *pal_off, 16);
    }
    for anim_off in &anim_offsets {
        let comp_offsets = read_offset_list(data, *anim_off);
        swap_offset_list_entries(&mut out, *anim_off, comp_offsets.len());
        for comp_off in comp_offsets {
            if comp_off + 0x0C > data.len() {
                continue;
            }
            let cmd_off = read_u32_be(data, comp_off) as usize;
            let cmd_size = read_u16_be(data, comp_off + 0x04) as usize;

            swap32(&mut out, comp_off);
            swap16(&mut out, comp_off + 0x04);
            swap16(&mut out, comp_off + 0x06);
            swap16(&mut out, comp_off + 0x08);
            swap16(&mut out, comp_off + 0x0A);

            swap16_range(&mut out, cmd_off, cmd_size / 2);
        }
    }

    out
}

/// Read a `-1`-terminated array of `u32` offsets starting at `start`.
fn read_offset_list(data: &[u8], start: usize) -> Vec<usize> {
    let mut entries = Vec::new();
    if start >= data.len() {
        return entries;
    }
    let mut pos = start;
    while pos + 4 <= data.len() {
        let v = read_u32_be(data, pos);
        if v == LIST_TERMINATOR {
            break;
        }
        entries.push(v as usize);
        pos += 4;
    }
    entries
}

/// Byte-swap `entry_count` list entries plus the terminator slot that
/// follows them.
fn swap_offset_list_entries(out: &mut [u8], start: usize, entry_count: usize) {
    for i in 0..=entry_count {
        swap32(out, start + i * 4);
    }
}

//! Hit/collision data transformer.
//!
//! No pointers, no relocation trailer: every offset here is self-relative
//! to the segment, so a byte swap in place is the entire job.
//!
//! ## Layout
//! ```text
//! [0x00] collisionOff: i32
//! [0x04] zoneOff:      i32
//!
//! section (0x18 bytes, at each non-zero offset above):
//! [0x00] numColliders: i16
//! [0x02] _pad:         i16
//! [0x04] collidersOff: i32
//! [0x08] numVertices:  i16
//! [0x0A] _pad:         i16
//! [0x0C] verticesOff:  i32
//! [0x10] bbSize:       i16
//! [0x12] _pad:         i16
//! [0x14] bbOff:        i32
//!
//! collider (12 bytes): three u16, numTriangles:u16, trianglesOff:i32
//! ```

use crate::primitives::{read_i32_be, read_u16_be, swap16, swap32, swap32_range};

const SECTION_SIZE: usize = 0x18;
const COLLIDER_SIZE: usize = 12;

pub fn convert(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();

    let collision_off = read_i32_be(data, 0x00);
    let zone_off = read_i32_be(data, 0x04);
    swap32(&mut out, 0x00);
    swap32(&mut out, 0x04);

    for off in [collision_off, zone_off] {
        if off > 0 {
            convert_section(&mut out, off as usize);
        }
    }

    out
}

fn convert_section(out: &mut [u8], section_off: usize) {
    if section_off + SECTION_SIZE > out.len() {
        return;
    }

    let num_colliders = read_u16_be(out, section_off + 0x00);
    let colliders_off = read_i32_be(out, section_off + 0x04);
    let num_vertices = read_u16_be(out, section_off + 0x08);
    let vertices_off = read_i32_be(out, section_off + 0x0C);
    let bb_size = read_u16_be(out, section_off + 0x10);
    let bb_off = read_i32_be(out, section_off + 0x14);

    swap16(out, section_off + 0x00);
    swap16(out, section_off + 0x02);
    swap32(out, section_off + 0x04);
    swap16(out, section_off + 0x08);
    swap16(out, section_off + 0x0A);
    swap32(out, section_off + 0x0C);
    swap16(out, section_off + 0x10);
    swap16(out, section_off + 0x12);
    swap32(out, section_off + 0x14);

    if bb_off >= 0 {
        swap32_range(out, bb_off as usize, bb_size as usize);
    }
    if vertices_off >= 0 {
        swap16_range_3(out, vertices_off as usize, num_vertices as usize);
    }
    if colliders_off >= 0 {
        convert_colliders(out, colliders_off as usize, num_colliders as usize);
    }
}

fn swap16_range_3(out: &mut [u8], start: usize, num_vertices: usize) {
    let cells = num_vertices * 3;
    for i in 0..cells {
        swap16(out, start + i * 2);
    }
}

fn convert_colliders(out: &mut [u8], start: usize, count: usize) {
    for i in 0..count {
        let rec = start + i * COLLIDER_SIZE;
        if rec + COLLIDER_SIZE > out.len() {
            break;
        }
        let num_triangles = read_u16_be(out, rec + 0x06);
        let triangles_off = read_i32_be(out, rec + 0x08);

        swap16(out, rec + 0x00);
        swap16(out, rec + 0x02);
        swap16(out, rec + 0x04);
        swap16(out, rec + 0x06);
        swap32(out, rec + 0x08);

        if num_triangles > 0 && triangles_off >= 0 {
            swap32_range(out, triangles_off as usize, num_triangles as usize);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_offsets_only_swap_root() {
        let data = vec![0u8; 8];
        let out = convert(&data);
        assert_eq!(out, vec![0u8; 8]);
    }

    #[test]
    fn negative_section_offset_is_not_followed() {
        // collisionOff = 0xFFFFFFFF (-1): an absent-section sentinel, not a
        // huge unsigned offset. Must not panic or wrap when cast to usize.
        let mut data = vec![0u8; 8];
        data[0x00..0x04].copy_from_slice(&0xFFFF_FFFFu32.to_be_bytes());
        let out = convert(&data);
        assert_eq!(
            u32::from_le_bytes(out[0x00..0x04].try_into().unwrap()),
            0xFFFF_FFFF
        );
    }

    #[test]
    fn single_collision_section_round_trip() {
        let collision_off = 0x08u32;
        let mut data = vec![0u8; collision_off as usize + SECTION_SIZE];
        data[0x00..0x04].copy_from_slice(&collision_off.to_be_bytes());
        data[0x04..0x08].copy_from_slice(&0u32.to_be_bytes());

        let sec = collision_off as usize;
        data[sec + 0x00..sec + 0x02].copy_from_slice(&0u16.to_be_bytes());
        data[sec + 0x04..sec + 0x08].copy_from_slice(&0u32.to_be_bytes());
        data[sec + 0x08..sec + 0x0A].copy_from_slice(&0u16.to_be_bytes());
        data[sec + 0x0C..sec + 0x10].copy_from_slice(&0u32.to_be_bytes());
        data[sec + 0x10..sec + 0x12].copy_from_slice(&0u16.to_be_bytes());
        data[sec + 0x14..sec + 0x18].copy_from_slice(&0u32.to_be_bytes());

        let out = convert(&data);
        assert_eq!(
            u32::from_le_bytes(out[0x00..0x04].try_into().unwrap()),
            collision_off
        );
    }

    #[test]
    fn collider_triangles_swapped_when_present() {
        let collision_off = 0x18u32;
        let colliders_off = collision_off + SECTION_SIZE as u32;
        let triangles_off = colliders_off + COLLIDER_SIZE as u32;
        let total = triangles_off as usize + 4;
        let mut data = vec![0u8; total];

        data[0x00..0x04].copy_from_slice(&collision_off.to_be_bytes());

        let sec = collision_off as usize;
        data[sec + 0x00..sec + 0x02].copy_from_slice(&1u16.to_be_bytes());
        data[sec + 0x04..sec + 0x08].copy_from_slice(&colliders_off.to_be_bytes());

        let rec = colliders_off as usize;
        data[rec + 0x06..rec + 0x08].copy_from_slice(&1u16.to_be_bytes());
        data[rec + 0x08..rec + 0x0C].copy_from_slice(&triangles_off.to_be_bytes());

        data[triangles_off as usize..triangles_off as usize + 4]
            .copy_from_slice(&0xAABBCCDDu32.to_be_bytes());

        let out = convert(&data);
        assert_eq!(
            &out[triangles_off as usize..triangles_off as usize + 4],
            &0xAABBCCDDu32.to_le_bytes()
        );
    }
}

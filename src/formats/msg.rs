//! Message archive transformer.
//!
//! A two-level table of self-relative 4-byte offsets: a root table of
//! section offsets, zero-terminated, and per-section tables terminated by
//! an entry that points back at its own section.

use crate::primitives::{read_u32_be, swap32};

pub fn convert(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    let mut root_off = 0usize;

    loop {
        if root_off + 4 > out.len() {
            break;
        }
        let section_off = read_u32_be(&out, root_off);
        if section_off == 0 {
            break;
        }
        swap32(&mut out, root_off);
        convert_section(&mut out, section_off as usize);
        root_off += 4;
    }

    out
}

fn convert_section(out: &mut [u8], section_off: usize) {
    let mut entry_off = section_off;
    loop {
        if entry_off + 4 > out.len() {
            break;
        }
        let value = read_u32_be(out, entry_off);
        swap32(out, entry_off);
        if value as usize == section_off {
            break;
        }
        entry_off += 4;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_section_terminated_by_self_reference() {
        // root: one section offset (0x08), then zero terminator.
        // section at 0x08: one real entry (0x20), then self-reference (0x08).
        let mut data = vec![0u8; 0x10];
        data[0x00..0x04].copy_from_slice(&0x08u32.to_be_bytes());
        data[0x04..0x08].copy_from_slice(&0u32.to_be_bytes());
        data[0x08..0x0C].copy_from_slice(&0x20u32.to_be_bytes());
        data[0x0C..0x10].copy_from_slice(&0x08u32.to_be_bytes());

        let out = convert(&data);
        assert_eq!(&out[0x00..0x04], &0x08u32.to_le_bytes());
        assert_eq!(&out[0x04..0x08], &0u32.to_be_bytes());
        assert_eq!(&out[0x08..0x0C], &0x20u32.to_le_bytes());
        assert_eq!(&out[0x0C..0x10], &0x08u32.to_le_bytes());
    }

    #[test]
    fn empty_root_table_is_noop() {
        let data = vec![0u8; 4];
        let out = convert(&data);
        assert_eq!(out, data);
    }
}

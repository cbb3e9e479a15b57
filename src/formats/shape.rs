//! Shape (scene graph) transformer.
//!
//! Depth-first traversal of the typed pointer graph rooted at the shape
//! header, converting every BE absolute pointer to an LE file offset and
//! byte-swapping every other multi-byte field at its correct width.
//!
//! ## Layout
//! ```text
//! ShapeFileHeader (0x20 bytes):
//!   0x00: ModelNode*  root
//!   0x04: Vtx_t*      vertexTable
//!   0x08: char**      modelNames
//!   0x0C: char**      colliderNames
//!   0x10: char**      zoneNames
//!   0x14: pad[0xC]
//!
//! ModelNode (0x14 bytes):
//!   0x00: s32 type
//!   0x04: ModelDisplayData* displayData
//!   0x08: s32 numProperties
//!   0x0C: ModelNodeProperty* propertyList
//!   0x10: ModelGroupData* groupData
//!
//! ModelGroupData (0x14 bytes):
//!   0x00: Mtx* transformMatrix       (0x40-byte, 16 x s32 fixed-point)
//!   0x04: Lightsn* lightingGroup
//!   0x08: s32 numLights
//!   0x0C: s32 numChildren
//!   0x10: ModelNode** childList
//!
//! ModelDisplayData (0x08 bytes):
//!   0x00: Gfx* displayList
//!   0x04: pad
//!
//! ModelNodeProperty (0x0C bytes):
//!   0x00: s32 key
//!   0x04: s32 dataType
//!   0x08: union data (s32 / f32 / void*)
//! ```
//!
//! Display lists are 8-byte-per-command streams terminated by opcode
//! `0xDF`; opcodes `{0x01, 0x06, 0xD9, 0xDA, 0xDB, 0xDE}` carry a pointer in
//! their second word.

use crate::pointer::{SHAPE_BASE, classify_ptr};
use crate::primitives::{read_u32_be, swap32, swap32_range, write_u32_le};
use crate::reloc::RelocTable;
use std::collections::HashSet;

const HEADER_SIZE: usize = 0x20;
const NODE_SIZE: usize = 0x14;
const GROUP_SIZE: usize = 0x14;
const DISPLAY_DATA_SIZE: usize = 0x08;
const PROPERTY_SIZE: usize = 0x0C;
const MTX_SIZE: usize = 0x40;
const MAX_DISPLAY_LIST_COMMANDS: usize = 0x1_0000;

/// Opcodes whose second word is a pointer rather than a scalar.
const PTR_OPCODES: [u8; 6] = [0x01, 0x06, 0xD9, 0xDA, 0xDB, 0xDE];
/// Display-list terminator opcode (`G_ENDDL`).
const END_OPCODE: u8 = 0xDF;

/// Convert a BE shape segment to LE plus relocation trailer. `base` is the
/// segment's virtual base address, resolved by the dispatcher per-asset-kind
/// (spec §4.1) rather than hardcoded here, so the same traversal works for a
/// shape segment remapped to a different base in isolation or in tests.
pub fn convert(data: &[u8], base: u32) -> Vec<u8> {
    if data.len() < HEADER_SIZE {
        return data.to_vec();
    }

    let mut conv = ShapeConverter {
        orig: data,
        out: data.to_vec(),
        base,
        relocs: RelocTable::new(),
        visited: HashSet::new(),
    };
    conv.process_header();
    conv.relocs.finalize(conv.out)
}

struct ShapeConverter<'a> {
    orig: &'a [u8],
    out: Vec<u8>,
    base: u32,
    relocs: RelocTable,
    /// Node-like offsets already entered, to terminate on shared/cyclic
    /// graphs.
    visited: HashSet<usize>,
}

impl<'a> ShapeConverter<'a> {
    /// Read the BE pointer at `offset`; if it classifies, record + convert
    /// it to an LE file offset and return `Some(file_offset)`; otherwise
    /// byte-swap the field in place and return `None`.
    fn convert_ptr(&mut self, offset: usize) -> Option<usize> {
        if offset + 4 > self.orig.len() {
            return None;
        }
        let val = read_u32_be(self.orig, offset);
        match classify_ptr(val, self.base, self.orig.len()) {
            Some(file_off) => {
                self.relocs.insert(offset);
                write_u32_le(&mut self.out, offset, file_off as u32);
                Some(file_off)
            }
            None => {
                swap32(&mut self.out, offset);
                None
            }
        }
    }

    fn process_header(&mut self) {
        if self.orig.len() < HEADER_SIZE {
            return;
        }

        let root_off = self.convert_ptr(0x00);
        self.convert_ptr(0x04); // vertex table: no further structure to walk
        let model_names_off = self.convert_ptr(0x08);
        let collider_names_off = self.convert_ptr(0x0C);
        let zone_names_off = self.convert_ptr(0x10);
        swap32_range(&mut self.out, 0x14, 3);

        if let Some(off) = model_names_off {
            self.process_string_list(off);
        }
        if let Some(off) = collider_names_off {
            self.process_string_list(off);
        }
        if let Some(off) = zone_names_off {
            self.process_string_list(off);
        }

        if let Some(off) = root_off {
            self.process_model_node(off);
        }
    }

    /// Walk a null-terminated array of string pointers.
    fn process_string_list(&mut self, offset: usize) {
        if offset >= self.orig.len() {
            return;
        }
        let mut pos = offset;
        while pos + 4 <= self.orig.len() {
            let val = read_u32_be(self.orig, pos);
            if val == 0 {
                swap32(&mut self.out, pos);
                break;
            }
            self.convert_ptr(pos);
            pos += 4;
        }
    }

    fn process_model_node(&mut self, offset: usize) {
        if offset >= self.orig.len() || !self.visited.insert(offset) {
            return;
        }
        if offset + NODE_SIZE > self.orig.len() {
            return;
        }

        let num_props = read_u32_be(self.orig, offset + 0x08);

        swap32(&mut self.out, offset + 0x00);
        let display_off = self.convert_ptr(offset + 0x04);
        swap32(&mut self.out, offset + 0x08);
        let prop_off = self.convert_ptr(offset + 0x0C);
        let group_off = self.convert_ptr(offset + 0x10);

        if let Some(off) = display_off {
            self.process_display_data(off);
        }
        if let (Some(off), true) = (prop_off, num_props > 0) {
            self.process_property_list(off, num_props as usize);
        }
        if let Some(off) = group_off {
            self.process_group_data(off);
        }
    }

    fn process_display_data(&mut self, offset: usize) {
        if offset >= self.orig.len() || offset + DISPLAY_DATA_SIZE > self.orig.len() {
            return;
        }

        let gfx_off = self.convert_ptr(offset);
        swap32(&mut self.out, offset + 0x04);

        if let Some(off) = gfx_off {
            self.process_display_list(off);
        }
    }

    fn process_display_list(&mut self, offset: usize) {
        if offset >= self.orig.len() {
            return;
        }
        let mut pos = offset;
        let mut remaining = MAX_DISPLAY_LIST_COMMANDS;
        while pos + 8 <= self.orig.len() && remaining > 0 {
            let opcode = self.orig[pos];
            let word1 = read_u32_be(self.orig, pos + 4);

            swap32(&mut self.out, pos);

            if PTR_OPCODES.contains(&opcode) && classify_ptr(word1, self.base, self.orig.len()).is_some() {
                self.convert_ptr(pos + 4);
            } else {
                swap32(&mut self.out, pos + 4);
            }

            if opcode == END_OPCODE {
                break;
            }
            pos += 8;
            remaining -= 1;
        }
    }

    /// Property records are a tagged union (`dataType` selects the
    /// interpretation of the third word); this conservatively classifies by
    /// value, pointer-range wins. This can misclassify a float whose bit
    /// pattern happens to land in the pointer range — a known ambiguity,
    /// not fixed here.
    fn process_property_list(&mut self, offset: usize, count: usize) {
        if offset >= self.orig.len() {
            return;
        }
        for i in 0..count {
            let prop_off = offset + i * PROPERTY_SIZE;
            if prop_off + PROPERTY_SIZE > self.orig.len() {
                break;
            }
            swap32(&mut self.out, prop_off);
            swap32(&mut self.out, prop_off + 0x04);
            let val = read_u32_be(self.orig, prop_off + 0x08);
            if classify_ptr(val, self.base, self.orig.len()).is_some() {
                self.convert_ptr(prop_off + 0x08);
            } else {
                swap32(&mut self.out, prop_off + 0x08);
            }
        }
    }

    fn process_group_data(&mut self, offset: usize) {
        if offset >= self.orig.len() || !self.visited.insert(offset) {
            return;
        }
        if offset + GROUP_SIZE > self.orig.len() {
            return;
        }

        let num_children = read_u32_be(self.orig, offset + 0x0C);

        let mtx_off = self.convert_ptr(offset);
        self.convert_ptr(offset + 0x04);
        swap32(&mut self.out, offset + 0x08);
        swap32(&mut self.out, offset + 0x0C);
        let child_list_off = self.convert_ptr(offset + 0x10);

        if let Some(off) = mtx_off {
            if off + MTX_SIZE <= self.orig.len() {
                swap32_range(&mut self.out, off, 16);
            }
        }

        if let (Some(list_off), true) = (child_list_off, num_children > 0) {
            for i in 0..num_children as usize {
                let child_ptr_off = list_off + i * 4;
                if child_ptr_off + 4 > self.orig.len() {
                    break;
                }
                if let Some(child_off) = self.convert_ptr(child_ptr_off) {
                    self.process_model_node(child_off);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_root_node() {
        // header with root pointer 0x80210020, all other header words zero;
        // at 0x20 a ModelNode whose fields are all zero except type = 1.
        let mut data = vec![0u8; 0x20 + NODE_SIZE];
        data[0x00..0x04].copy_from_slice(&0x8021_0020u32.to_be_bytes());
        data[0x20..0x24].copy_from_slice(&1u32.to_be_bytes());

        let out = convert(&data, SHAPE_BASE);

        assert_eq!(&out[0x00..0x04], &0x0000_0020u32.to_le_bytes());
        assert_eq!(&out[0x20..0x24], &1u32.to_le_bytes());

        let count = u32::from_le_bytes(out[out.len() - 4..].try_into().unwrap());
        assert_eq!(count, 1);
        let trailer_start = out.len() - 4 - 4;
        assert_eq!(&out[trailer_start..trailer_start + 4], &0u32.to_le_bytes());
    }

    #[test]
    fn cyclic_group_data_terminates() {
        // Two ModelNodes whose group data each point to the other's child
        // list containing a self-reference; traversal must not loop forever.
        let root_node_off = 0x20usize;
        let group_off = 0x40usize;
        let child_list_off = 0x60usize;

        let mut data = vec![0u8; 0x80];
        data[0x00..0x04].copy_from_slice(&(SHAPE_BASE + root_node_off as u32).to_be_bytes());
        // root node: groupData -> group_off
        data[root_node_off + 0x10..root_node_off + 0x14]
            .copy_from_slice(&(SHAPE_BASE + group_off as u32).to_be_bytes());
        // group data: numChildren = 1, childList -> child_list_off
        data[group_off + 0x0C..group_off + 0x10].copy_from_slice(&1u32.to_be_bytes());
        data[group_off + 0x10..group_off + 0x14]
            .copy_from_slice(&(SHAPE_BASE + child_list_off as u32).to_be_bytes());
        // child list[0] points back at root node (cycle)
        data[child_list_off..child_list_off + 4]
            .copy_from_slice(&(SHAPE_BASE + root_node_off as u32).to_be_bytes());

        // Should terminate (test itself would hang/stack-overflow otherwise).
        let out = convert(&data, SHAPE_BASE);
        assert!(out.len() >= data.len());
    }

    #[test]
    fn display_list_stops_at_end_opcode() {
        let mut data = vec![0u8; 0x20 + NODE_SIZE + 0x10 + 0x10];
        let display_data_off = 0x20 + NODE_SIZE;
        let gfx_off = display_data_off + 0x10;

        data[0x00..0x04].copy_from_slice(&(SHAPE_BASE + 0x20).to_be_bytes());
        // ModelNode.displayData -> display_data_off
        data[0x20 + 0x04..0x20 + 0x08]
            .copy_from_slice(&(SHAPE_BASE + display_data_off as u32).to_be_bytes());
        // ModelDisplayData.displayList -> gfx_off
        data[display_data_off..display_data_off + 4]
            .copy_from_slice(&(SHAPE_BASE + gfx_off as u32).to_be_bytes());
        // one command, opcode 0xDF (end)
        data[gfx_off] = 0xDF;

        let out = convert(&data, SHAPE_BASE);
        assert_eq!(out[gfx_off], 0xDF);
    }
}

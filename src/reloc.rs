//! Relocation recording and trailer emission.
//!
//! Shape and BG conversions append a relocation trailer after their body so
//! a PC-side loader can walk the (now file-relative) pointer fields and add
//! a runtime base. Other asset kinds emit no trailer because their consumer
//! treats every offset as already self-relative.

use std::collections::HashSet;

use crate::primitives::write_u32_le;

/// An ordered, deduplicated set of file offsets that hold converted
/// pointers, built up during a single transformer's traversal.
#[derive(Debug, Default)]
pub struct RelocTable {
    offsets: Vec<usize>,
    seen: HashSet<usize>,
}

impl RelocTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `offset` as holding a converted pointer. A second insertion of
    /// the same offset is ignored, keeping entries unique.
    pub fn insert(&mut self, offset: usize) {
        if self.seen.insert(offset) {
            self.offsets.push(offset);
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Pad `body` to a 4-byte multiple, then append the ascending offsets as
    /// LE `u32`s followed by the LE `u32` count.
    ///
    /// A decoder that reads the last LE `u32` of the returned buffer gets
    /// `N`; the preceding `4*N` bytes are the ascending relocation offsets.
    pub fn finalize(mut self, mut body: Vec<u8>) -> Vec<u8> {
        while body.len() % 4 != 0 {
            body.push(0);
        }

        self.offsets.sort_unstable();

        let trailer_start = body.len();
        body.resize(trailer_start + self.offsets.len() * 4 + 4, 0);
        for (i, &off) in self.offsets.iter().enumerate() {
            write_u32_le(&mut body, trailer_start + i * 4, off as u32);
        }
        let count_off = trailer_start + self.offsets.len() * 4;
        write_u32_le(&mut body, count_off, self.offsets.len() as u32);

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_offsets_are_ignored() {
        let mut t = RelocTable::new();
        t.insert(4);
        t.insert(4);
        t.insert(0);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn finalize_pads_sorts_and_appends_count() {
        let mut t = RelocTable::new();
        t.insert(4);
        t.insert(0);
        let body = vec![1, 2, 3]; // not 4-aligned
        let out = t.finalize(body);
        // padded to 4, then reloc[0]=0, reloc[1]=4, then count=2
        assert_eq!(out.len(), 4 + 8 + 4);
        assert_eq!(&out[4..8], &0u32.to_le_bytes());
        assert_eq!(&out[8..12], &4u32.to_le_bytes());
        assert_eq!(&out[12..16], &2u32.to_le_bytes());
    }

    #[test]
    fn empty_table_still_appends_zero_count() {
        let t = RelocTable::new();
        let out = t.finalize(vec![1, 2, 3, 4]);
        assert_eq!(out.len(), 8);
        assert_eq!(&out[4..8], &0u32.to_le_bytes());
    }

    proptest::proptest! {
        #[test]
        fn offsets_strictly_ascending_and_unique(mut offs in proptest::collection::vec(0usize..4096, 0..64)) {
            let mut t = RelocTable::new();
            for &o in &offs {
                t.insert(o);
            }
            offs.sort_unstable();
            offs.dedup();
            let out = t.finalize(vec![0; 4096]);
            let count = u32::from_le_bytes(out[out.len() - 4..].try_into().unwrap()) as usize;
            proptest::prop_assert_eq!(count, offs.len());
            let trailer_start = out.len() - 4 - count * 4;
            let mut prev: Option<u32> = None;
            for i in 0..count {
                let v = u32::from_le_bytes(
                    out[trailer_start + i * 4..trailer_start + i * 4 + 4]
                        .try_into()
                        .unwrap(),
                );
                if let Some(p) = prev {
                    proptest::prop_assert!(v > p);
                }
                prev = Some(v);
            }
        }
    }
}

//! Virtual pointer classification.
//!
//! A 32-bit big-endian value read from a segment is either an absolute N64
//! pointer into that segment's virtual address range, or a scalar (an
//! integer, a float bit pattern, a small count) that merely looks like one.
//! [`classify_ptr`] is the single place that distinguishes the two; every
//! transformer calls it instead of re-deriving the base/size arithmetic.

/// Virtual base address for BG segments (`IMG_PTR`/`PAL_PTR` fields).
pub const BG_BASE: u32 = 0x8020_0000;

/// Virtual base address for shape segments (`ModelNode*` and friends).
pub const SHAPE_BASE: u32 = 0x8021_0000;

/// Classify `v` as a pointer into a buffer of `size` bytes based at `base`.
///
/// Returns the file offset `v - base` when `v >= base` and `v - base <
/// size`; otherwise returns `None` and the caller treats `v` as a scalar.
#[inline]
pub fn classify_ptr(v: u32, base: u32, size: usize) -> Option<usize> {
    let offset = v.checked_sub(base)?;
    let offset = offset as usize;
    (offset < size).then_some(offset)
}

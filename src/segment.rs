//! The segment: the unit of work handed to every top-level transformer.

/// A named byte range located in the source ROM image.
///
/// Produced by an external linker-map reader; the core only
/// consumes the triple.
#[derive(Debug, Clone)]
pub struct SegmentRange {
    pub name: String,
    pub start: u64,
    pub end: u64,
}

impl SegmentRange {
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A segment's raw bytes plus the metadata a transformer needs to interpret
/// them: its name (for dispatch and warnings) and its virtual base address
/// (for pointer classification).
#[derive(Debug, Clone)]
pub struct Segment {
    pub name: String,
    /// Virtual base address this segment's pointers are relative to. Not
    /// every transformer uses this (sprite/MapFS/texture/... have no
    /// absolute-pointer fields), but [`dispatch`](crate::dispatch::dispatch)
    /// passes it straight through to the shape/BG transformers instead of
    /// those modules hardcoding `SHAPE_BASE`/`BG_BASE` themselves, keeping
    /// `classify_ptr` reusable and testable with an arbitrary base.
    pub base: u32,
    pub data: Vec<u8>,
}

impl Segment {
    pub fn new(name: impl Into<String>, base: u32, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            base,
            data,
        }
    }
}

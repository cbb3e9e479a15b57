//! YAY0 frame detection and the injected decompressor interface.
//!
//! Actual YAY0 decompression is out of scope for this crate: the
//! core only recognizes the frame and hands the compressed bytes to a
//! caller-supplied callable. This mirrors the teacher library's separation
//! of concerns — parsers there receive already-decrypted/already-decompressed
//! bytes; here the boundary sits one step earlier, at "already decompressed
//! by the function you gave me."

use crate::error::Result;

/// Signature bytes at offset 0 of a YAY0-framed block.
pub const YAY0_MAGIC: [u8; 4] = *b"Yay0";

/// A callable that decompresses a complete YAY0-framed block.
pub type Decompressor<'a> = &'a dyn Fn(&[u8]) -> Result<Vec<u8>>;

/// Whether `buf` begins with the YAY0 signature.
#[inline]
pub fn is_yay0_framed(buf: &[u8]) -> bool {
    buf.len() >= 4 && buf[..4] == YAY0_MAGIC
}

/// Decompress `buf` with `decompress` iff it is YAY0-framed; otherwise
/// return it unchanged.
pub fn maybe_decompress(buf: &[u8], decompress: Decompressor) -> Result<Vec<u8>> {
    if is_yay0_framed(buf) {
        decompress(buf)
    } else {
        Ok(buf.to_vec())
    }
}

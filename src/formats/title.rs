//! Title-screen texture transformer.
//!
//! Driven entirely by the caller-supplied texture descriptor list rather
//! than any in-band layout: `position` is a byte offset into the segment,
//! `w`/`h` the pixel (or palette-entry) extent.

use crate::config::{ImgType, TitleTexture};
use crate::primitives::{swap16_range, swap32_range};

pub fn convert(data: &[u8], textures: &[TitleTexture]) -> Vec<u8> {
    let mut out = data.to_vec();

    for tex in textures {
        match tex.imgtype {
            ImgType::Rgba16 | ImgType::Ia16 => {
                swap16_range(&mut out, tex.position as usize, (tex.w * tex.h) as usize);
            }
            ImgType::Rgba32 => {
                swap32_range(&mut out, tex.position as usize, (tex.w * tex.h) as usize);
            }
            ImgType::Ci4 | ImgType::Ci8 => {
                if let Some(pal) = textures
                    .iter()
                    .find(|t| t.imgtype == ImgType::Pal && t.id == tex.id)
                {
                    swap16_range(&mut out, pal.position as usize, (pal.w * pal.h) as usize);
                }
            }
            ImgType::Pal => {
                // Only swapped when a Ci4/Ci8 primary references it by id.
            }
        }
    }

    out
}

//! MapFS (map file-system) archive transformer.
//!
//! Walks a name-keyed table of contents, decompressing and dispatching each
//! entry by name suffix/prefix to the transformer for its asset kind, then
//! rebuilds either a flat archive (same TOC shape, converted payloads) or a
//! one-file-per-entry layout with a small manifest — a configuration knob
//! the caller selects.
//!
//! ## Layout
//! ```text
//! [0x00] Header (0x20 bytes)
//! [0x20] TOC: back-to-back 0x1C-byte records
//!          {name[16], data_offset (rel. to 0x20), size, decomp_size}
//!        terminated by a record named "end_data"
//! [...]  Data region, 16-byte aligned per entry
//! ```

use crate::config::MapFsConfig;
use crate::decompress::{Decompressor, is_yay0_framed, maybe_decompress};
use crate::error::Warning;
use crate::pointer::{BG_BASE, SHAPE_BASE};
use crate::primitives::{read_u32_be, write_u32_le};
use crate::formats;

const HEADER_SIZE: usize = 0x20;
const RECORD_SIZE: usize = 0x1C;
const NAME_SIZE: usize = 16;
const END_MARKER: &str = "end_data";

/// One parsed TOC record.
#[derive(Debug, Clone)]
struct TocEntry {
    name: String,
    data_offset: u32,
    size: u32,
    decomp_size: u32,
}

/// Whether converted MapFS entries are packed back into one flat archive,
/// or emitted as individual files plus a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Flat,
    Split,
}

/// One converted MapFS entry, used by both output modes.
pub struct ConvertedEntry {
    pub name: String,
    pub data: Vec<u8>,
}

pub fn convert(
    data: &[u8],
    cfg: &dyn MapFsConfig,
    decompress: Decompressor,
    mode: OutputMode,
    warnings: &mut Vec<Warning>,
) -> Vec<u8> {
    let entries = read_toc(data);
    let mut converted = Vec::with_capacity(entries.len());

    for entry in &entries {
        let start = HEADER_SIZE + entry.data_offset as usize;
        let end = start + entry.size as usize;
        if end > data.len() {
            warnings.push(Warning::new(entry.name.clone(), "TOC entry exceeds buffer"));
            continue;
        }
        let raw = &data[start..end];

        let decompressed = if entry.size != entry.decomp_size {
            if is_yay0_framed(raw) {
                match maybe_decompress(raw, decompress) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warnings.push(Warning::new(entry.name.clone(), e.to_string()));
                        raw.to_vec()
                    }
                }
            } else {
                raw.to_vec()
            }
        } else {
            raw.to_vec()
        };

        let out = dispatch_entry(&entry.name, &decompressed, cfg, decompress, warnings);
        converted.push(ConvertedEntry {
            name: entry.name.clone(),
            data: out,
        });
    }

    match mode {
        OutputMode::Flat => rebuild_flat(&converted),
        OutputMode::Split => rebuild_manifest(&converted),
    }
}

fn read_toc(data: &[u8]) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    let mut pos = HEADER_SIZE;
    while pos + RECORD_SIZE <= data.len() {
        let name = read_fixed_name(&data[pos..pos + NAME_SIZE]);
        let data_offset = read_u32_be(data, pos + NAME_SIZE);
        let size = read_u32_be(data, pos + NAME_SIZE + 4);
        let decomp_size = read_u32_be(data, pos + NAME_SIZE + 8);

        if name == END_MARKER {
            break;
        }
        entries.push(TocEntry {
            name,
            data_offset,
            size,
            decomp_size,
        });
        pos += RECORD_SIZE;
    }
    entries
}

fn read_fixed_name(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// First-match-wins name dispatch table: suffix `_shape`/`_bg`/`_hit`/`_tex`,
/// prefix `party_`, exact `title_data`, otherwise identity copy.
fn dispatch_entry(
    name: &str,
    data: &[u8],
    cfg: &dyn MapFsConfig,
    decompress: Decompressor,
    warnings: &mut Vec<Warning>,
) -> Vec<u8> {
    if name.ends_with("_shape") {
        formats::shape::convert(data, SHAPE_BASE)
    } else if name.ends_with("_bg") {
        formats::bg::convert(data, cfg.pal_count(name), BG_BASE)
    } else if name.ends_with("_hit") {
        formats::hit::convert(data)
    } else if name.ends_with("_tex") {
        formats::texture::convert(data)
    } else if let Some(stripped) = name.strip_prefix("party_") {
        let _ = stripped;
        formats::party::convert(data)
    } else if name == "title_data" {
        match cfg.textures(name) {
            Some(textures) => formats::title::convert(data, textures),
            None => {
                warnings.push(Warning::new(name, "no texture configuration; copied unconverted"));
                data.to_vec()
            }
        }
    } else {
        let _ = decompress;
        data.to_vec()
    }
}

fn rebuild_flat(entries: &[ConvertedEntry]) -> Vec<u8> {
    let mut toc = Vec::with_capacity((entries.len() + 1) * RECORD_SIZE);
    let mut payloads = Vec::new();
    let mut cursor = 0u32;

    for entry in entries {
        let mut name_bytes = [0u8; NAME_SIZE];
        let n = entry.name.as_bytes();
        let copy_len = n.len().min(NAME_SIZE);
        name_bytes[..copy_len].copy_from_slice(&n[..copy_len]);
        toc.extend_from_slice(&name_bytes);

        let size = entry.data.len() as u32;
        push_u32_le(&mut toc, cursor);
        push_u32_le(&mut toc, size);
        push_u32_le(&mut toc, size);

        payloads.extend_from_slice(&entry.data);
        while payloads.len() % 16 != 0 {
            payloads.push(0);
        }
        cursor = payloads.len() as u32;
    }

    // sentinel record
    let mut sentinel_name = [0u8; NAME_SIZE];
    sentinel_name[..END_MARKER.len()].copy_from_slice(END_MARKER.as_bytes());
    toc.extend_from_slice(&sentinel_name);
    push_u32_le(&mut toc, 0);
    push_u32_le(&mut toc, 0);
    push_u32_le(&mut toc, 0);

    let mut out = vec![0u8; HEADER_SIZE];
    out.extend_from_slice(&toc);
    out.extend_from_slice(&payloads);
    out
}

fn push_u32_le(buf: &mut Vec<u8>, v: u32) {
    let mut tmp = [0u8; 4];
    write_u32_le(&mut tmp, 0, v);
    buf.extend_from_slice(&tmp);
}

/// One-file-per-entry manifest: `name\0` + LE u32 size, back to back,
/// followed immediately by the entry's own bytes. This crate does not
/// perform file I/O; the manifest plus the concatenated payload
/// stream is handed to an external writer that splits it into files.
fn rebuild_manifest(entries: &[ConvertedEntry]) -> Vec<u8> {
    let mut out = Vec::new();
    for entry in entries {
        out.extend_from_slice(entry.name.as_bytes());
        out.push(0);
        push_u32_le(&mut out, entry.data.len() as u32);
        out.extend_from_slice(&entry.data);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultMapFsConfig;

    fn push_record(buf: &mut Vec<u8>, name: &str, data_offset: u32, size: u32, decomp_size: u32) {
        let mut name_bytes = [0u8; NAME_SIZE];
        let n = name.as_bytes();
        name_bytes[..n.len()].copy_from_slice(n);
        buf.extend_from_slice(&name_bytes);
        buf.extend_from_slice(&data_offset.to_be_bytes());
        buf.extend_from_slice(&size.to_be_bytes());
        buf.extend_from_slice(&decomp_size.to_be_bytes());
    }

    #[test]
    fn three_entries_hit_bg_tex() {
        let hit_payload = vec![0u8; 0x30];
        let mut bg_payload = vec![0u8; 0x20];
        bg_payload[0x00..0x04].copy_from_slice(&0x8020_0000u32.to_be_bytes());
        bg_payload[0x10..0x14].copy_from_slice(&0x8020_0000u32.to_be_bytes());
        let tex_payload = vec![0u8; 0x30];

        let mut toc = Vec::new();
        let mut data_section = Vec::new();

        push_record(&mut toc, "foo_hit", 0, hit_payload.len() as u32, hit_payload.len() as u32);
        data_section.extend_from_slice(&hit_payload);
        while data_section.len() % 16 != 0 {
            data_section.push(0);
        }

        push_record(
            &mut toc,
            "bar_bg",
            data_section.len() as u32,
            bg_payload.len() as u32,
            bg_payload.len() as u32,
        );
        data_section.extend_from_slice(&bg_payload);
        while data_section.len() % 16 != 0 {
            data_section.push(0);
        }

        push_record(
            &mut toc,
            "baz_tex",
            data_section.len() as u32,
            tex_payload.len() as u32,
            tex_payload.len() as u32,
        );
        data_section.extend_from_slice(&tex_payload);

        // terminator
        push_record(&mut toc, END_MARKER, 0, 0, 0);

        let mut data = vec![0u8; HEADER_SIZE];
        data.extend_from_slice(&toc);
        data.extend_from_slice(&data_section);

        struct Cfg;
        impl MapFsConfig for Cfg {
            fn pal_count(&self, name: &str) -> u32 {
                if name == "bar_bg" { 2 } else { 1 }
            }
        }

        let mut warnings = Vec::new();
        let decompress = |_: &[u8]| -> crate::error::Result<Vec<u8>> { unreachable!() };
        let out = convert(&data, &Cfg, &decompress, OutputMode::Flat, &mut warnings);

        assert!(warnings.is_empty());

        let entries = read_toc(&out);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["foo_hit", "bar_bg", "baz_tex"]);
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let mut toc = Vec::new();
        push_record(&mut toc, "x_bg", 0, 0x10, 0x10);
        push_record(&mut toc, END_MARKER, 0, 0, 0);

        let mut data = vec![0u8; HEADER_SIZE];
        data.extend_from_slice(&toc);
        data.extend_from_slice(&vec![0u8; 0x10]);

        let mut warnings = Vec::new();
        let decompress = |_: &[u8]| -> crate::error::Result<Vec<u8>> { unreachable!() };
        let out = convert(&data, &DefaultMapFsConfig, &decompress, OutputMode::Flat, &mut warnings);
        assert!(!out.is_empty());
    }
}

//! Configuration objects the core consumes.
//!
//! The core never loads these from disk — parsing the palette-count /
//! texture-descriptor / icon-manifest sidecar files is a collaborator's job
//!. This module intentionally avoids any file-format parsing; it
//! is a plain data container, same posture as the teacher's `keys.rs`
//! ("this module intentionally avoids cryptographic operations — it is a
//! plain data container").

/// Pixel format of a texture descriptor entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImgType {
    Rgba16,
    Ia16,
    Rgba32,
    Ci4,
    Ci8,
    /// A palette entry, paired with a `Ci4`/`Ci8` primary by matching `id`.
    /// Skipped as a primary during the title-texture walk.
    Pal,
}

/// One entry of a title-screen texture descriptor list.
#[derive(Debug, Clone)]
pub struct TitleTexture {
    pub position: u32,
    pub imgtype: ImgType,
    pub id: u32,
    pub w: u32,
    pub h: u32,
}

/// Icon archive layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconFmt {
    /// One CI4 raster plus a single 16-entry RGBA16 palette.
    Solo,
    /// One CI4 raster plus two 16-entry RGBA16 palettes.
    Pair,
    /// A raw RGBA16 raster, no palette.
    Rgba16,
}

/// One entry of the icon manifest.
#[derive(Debug, Clone)]
pub struct IconRecord {
    pub fmt: IconFmt,
    pub name: String,
    pub w: u32,
    pub h: u32,
}

/// Configuration consulted by the MapFS transformer and its dispatched
/// sub-transformers (spec §4.6/§6).
///
/// Default implementations match spec's stated fallback behavior: missing
/// configuration for a named asset is not fatal.
pub trait MapFsConfig {
    /// Number of BG palette variants for `name`. Default `1`.
    fn pal_count(&self, name: &str) -> u32 {
        let _ = name;
        1
    }

    /// Title-texture descriptor list for `name`, if configured.
    fn textures(&self, name: &str) -> Option<&[TitleTexture]> {
        let _ = name;
        None
    }

    /// Whether `name`'s converted entries are repacked into one flat archive
    /// or emitted as individual files plus a manifest (spec §4.6: "the
    /// choice is a configuration knob"). Default flat, matching the
    /// single-ROM-segment shape the rest of the core assumes.
    fn output_mode(&self, name: &str) -> crate::formats::mapfs::OutputMode {
        let _ = name;
        crate::formats::mapfs::OutputMode::Flat
    }
}

/// A `MapFsConfig` with no overrides — every asset gets the stated
/// defaults. Used when a caller has no sidecar configuration at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMapFsConfig;

impl MapFsConfig for DefaultMapFsConfig {}

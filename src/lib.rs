//! **pm64-assets** - the asset-graph conversion core for a big-endian N64
//! ROM image's structure-aware asset transformers.
//!
//! This crate converts compressed and uncompressed binary segments
//! containing absolute N64 pointers into self-contained little-endian
//! asset files: every multi-byte field is re-encoded BE → LE at its
//! correct width, every pointer is rewritten from a fixed virtual address
//! into a file-relative offset, and a relocation table is emitted where
//! a PC-side loader needs one to fix pointers up at runtime.
//!
//! Out of scope, by design: a CLI, progress logging, linker-map parsing,
//! YAY0 block decompression, and file I/O. Those live in the caller; this
//! crate consumes already-parsed configuration, named byte ranges, and a
//! decompressor callable, and hands back converted bytes plus warnings.
//!
//! # Layout
//! | Module | Role |
//! |--------|------|
//! | [`primitives`] | Bounds-checked BE reads, LE writes, in-place byte swaps |
//! | [`pointer`]    | Virtual-address pointer classification |
//! | [`reloc`]      | Relocation offset recorder and trailer emitter |
//! | [`decompress`] | YAY0 frame detection and decompressor dispatch |
//! | [`config`]     | Configuration objects the core consumes, never loads |
//! | [`segment`]    | The named byte range handed to every transformer |
//! | [`formats`]    | One transformer per asset kind |
//! | [`dispatch`]   | Segment-name → transformer routing |

pub mod config;
pub mod decompress;
pub mod dispatch;
pub mod error;
pub mod formats;
pub mod pointer;
pub mod primitives;
pub mod reloc;
pub mod segment;

pub use error::{Error, Result, Warning};

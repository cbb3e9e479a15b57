//! Top-level segment dispatcher.
//!
//! Maps a segment's name to the transformer that owns it. This is the
//! single entry point a caller needs: hand it a [`Segment`] plus whatever
//! configuration objects it has, get back converted bytes and warnings.
//!
//! The match table is open (spec §9 "Dispatch by name"): built from an
//! ordered `Vec` of rules rather than a hardcoded `match`, so a caller can
//! register additional suffix/prefix rules without touching this module.

use crate::config::{IconRecord, MapFsConfig};
use crate::decompress::Decompressor;
use crate::error::Warning;
use crate::formats;
use crate::segment::Segment;

/// The asset kind a segment name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Shape,
    Bg,
    Sprite,
    MapFs,
    Hit,
    Texture,
    Party,
    Title,
    Msg,
    Icon,
    Charset,
    Logos,
    /// No rule matched; bytes pass through unconverted.
    Identity,
}

/// A name-matching rule: suffix, prefix, or exact match.
#[derive(Debug, Clone)]
pub enum Matcher {
    Suffix(String),
    Prefix(String),
    Exact(String),
}

impl Matcher {
    fn matches(&self, name: &str) -> bool {
        match self {
            Matcher::Suffix(s) => name.ends_with(s.as_str()),
            Matcher::Prefix(p) => name.starts_with(p.as_str()),
            Matcher::Exact(e) => name == e.as_str(),
        }
    }
}

/// Ordered, first-match-wins dispatch table.
#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    rules: Vec<(Matcher, Kind)>,
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Earlier rules win ties, matching the spec's
    /// "first match wins" MapFS dispatch table (§4.6) generalized to every
    /// top-level segment kind.
    pub fn with_rule(mut self, matcher: Matcher, kind: Kind) -> Self {
        self.rules.push((matcher, kind));
        self
    }

    /// The table matching spec §4.6's MapFS dispatch rules, generalized to
    /// top-level segments: shape/bg/hit/tex suffixes, a sprite/mapfs name
    /// convention, party prefix, and the `title_data` exact name.
    pub fn default_table() -> Self {
        Self::new()
            .with_rule(Matcher::Suffix("_shape".into()), Kind::Shape)
            .with_rule(Matcher::Suffix("_bg".into()), Kind::Bg)
            .with_rule(Matcher::Suffix("_hit".into()), Kind::Hit)
            .with_rule(Matcher::Suffix("_tex".into()), Kind::Texture)
            .with_rule(Matcher::Prefix("party_".into()), Kind::Party)
            .with_rule(Matcher::Exact("title_data".into()), Kind::Title)
            .with_rule(Matcher::Suffix("_sprite".into()), Kind::Sprite)
            .with_rule(Matcher::Suffix("_mapfs".into()), Kind::MapFs)
            .with_rule(Matcher::Suffix("_msg".into()), Kind::Msg)
            .with_rule(Matcher::Suffix("_icon".into()), Kind::Icon)
            .with_rule(Matcher::Suffix("_charset".into()), Kind::Charset)
            .with_rule(Matcher::Suffix("_logos".into()), Kind::Logos)
    }

    pub fn classify(&self, name: &str) -> Kind {
        self.rules
            .iter()
            .find(|(matcher, _)| matcher.matches(name))
            .map(|(_, kind)| *kind)
            .unwrap_or(Kind::Identity)
    }
}

/// Convert one top-level segment, dispatching by name. `mapfs_cfg` and
/// `icon_records` may be empty/default when the caller has no sidecar
/// configuration (spec §7's missing-configuration fallback).
pub fn dispatch(
    segment: &Segment,
    table: &DispatchConfig,
    mapfs_cfg: &dyn MapFsConfig,
    icon_records: &[IconRecord],
    decompress: Decompressor,
) -> (Vec<u8>, Vec<Warning>) {
    let mut warnings = Vec::new();
    let kind = table.classify(&segment.name);

    let out = match kind {
        Kind::Shape => formats::shape::convert(&segment.data, segment.base),
        Kind::Bg => formats::bg::convert(&segment.data, mapfs_cfg.pal_count(&segment.name), segment.base),
        Kind::Hit => formats::hit::convert(&segment.data),
        Kind::Texture => formats::texture::convert(&segment.data),
        Kind::Party => formats::party::convert(&segment.data),
        Kind::Title => match mapfs_cfg.textures(&segment.name) {
            Some(textures) => formats::title::convert(&segment.data, textures),
            None => {
                warnings.push(Warning::new(
                    segment.name.clone(),
                    "no texture configuration; copied unconverted",
                ));
                segment.data.clone()
            }
        },
        Kind::Sprite => {
            let (bytes, mut sprite_warnings) = formats::sprite::convert(&segment.data, decompress);
            warnings.append(&mut sprite_warnings);
            bytes
        }
        Kind::MapFs => formats::mapfs::convert(
            &segment.data,
            mapfs_cfg,
            decompress,
            mapfs_cfg.output_mode(&segment.name),
            &mut warnings,
        ),
        Kind::Msg => formats::msg::convert(&segment.data),
        Kind::Icon => formats::icon::convert(&segment.data, icon_records),
        Kind::Charset => formats::charset::convert(&segment.data),
        Kind::Logos => formats::logos::convert(&segment.data),
        Kind::Identity => segment.data.clone(),
    };

    (out, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultMapFsConfig;

    #[test]
    fn default_table_resolves_known_suffixes() {
        let table = DispatchConfig::default_table();
        assert_eq!(table.classify("area_bg"), Kind::Bg);
        assert_eq!(table.classify("area_shape"), Kind::Shape);
        assert_eq!(table.classify("party_mario"), Kind::Party);
        assert_eq!(table.classify("title_data"), Kind::Title);
        assert_eq!(table.classify("nonsense"), Kind::Identity);
    }

    #[test]
    fn custom_rule_can_be_registered_without_editing_the_table() {
        let table = DispatchConfig::new().with_rule(Matcher::Exact("my_logos".into()), Kind::Logos);
        assert_eq!(table.classify("my_logos"), Kind::Logos);
        assert_eq!(table.classify("other"), Kind::Identity);
    }

    #[test]
    fn unknown_segment_passes_through_unconverted() {
        let table = DispatchConfig::default_table();
        let segment = Segment::new("mystery_blob", 0, vec![1, 2, 3, 4]);
        let decompress = |_: &[u8]| -> crate::error::Result<Vec<u8>> { unreachable!() };
        let (out, warnings) = dispatch(&segment, &table, &DefaultMapFsConfig, &[], &decompress);
        assert_eq!(out, vec![1, 2, 3, 4]);
        assert!(warnings.is_empty());
    }

    /// An empty MapFS archive (header + sentinel record only) with no
    /// entries. Flat mode still emits the rebuilt header/TOC/sentinel;
    /// split mode emits an empty manifest. Both reachable purely through
    /// `MapFsConfig::output_mode`, proving §4.6's "configuration knob" is
    /// wired all the way from `dispatch()`.
    fn empty_mapfs_archive() -> Vec<u8> {
        let mut data = vec![0u8; 0x20];
        let mut record = vec![0u8; 0x1C];
        record[..8].copy_from_slice(b"end_data");
        data.extend_from_slice(&record);
        data
    }

    #[test]
    fn mapfs_output_mode_defaults_to_flat() {
        let table = DispatchConfig::default_table();
        let segment = Segment::new("area_mapfs", 0, empty_mapfs_archive());
        let decompress = |_: &[u8]| -> crate::error::Result<Vec<u8>> { unreachable!() };
        let (out, _) = dispatch(&segment, &table, &DefaultMapFsConfig, &[], &decompress);
        assert!(!out.is_empty());
    }

    #[test]
    fn mapfs_output_mode_honors_split_configuration() {
        struct SplitCfg;
        impl MapFsConfig for SplitCfg {
            fn output_mode(&self, _name: &str) -> crate::formats::mapfs::OutputMode {
                crate::formats::mapfs::OutputMode::Split
            }
        }

        let table = DispatchConfig::default_table();
        let segment = Segment::new("area_mapfs", 0, empty_mapfs_archive());
        let decompress = |_: &[u8]| -> crate::error::Result<Vec<u8>> { unreachable!() };
        let (out, _) = dispatch(&segment, &table, &SplitCfg, &[], &decompress);
        assert!(out.is_empty());
    }
}

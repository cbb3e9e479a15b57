//! One transformer per asset kind, plus the MapFS archive that dispatches
//! across several of them.
//!
//! Every transformer is a pure function from BE bytes (+ configuration, for
//! the few kinds that need it) to LE bytes. None of them perform file I/O
//! or own any state beyond the call.
//!
//! | Module | Asset kind | Produces trailer |
//! |--------|-----------|-------------------|
//! | [`bg`]      | Background image | yes |
//! | [`shape`]   | Scene-graph model | yes |
//! | [`sprite`]  | Player/NPC sprite archive | no (rebuilds archive) |
//! | [`mapfs`]   | Map file-system archive | no |
//! | [`hit`]     | Collision/hit data | no |
//! | [`texture`] | Texture archive | no |
//! | [`party`]   | Character palette | no |
//! | [`title`]   | Title-screen textures | no |
//! | [`msg`]     | Message archive | no |
//! | [`icon`]    | Icon archive | no |
//! | [`charset`] | Character-set archive | no |
//! | [`logos`]   | Raw RGBA16 logo archive | no |

pub mod bg;
pub mod charset;
pub mod hit;
pub mod icon;
pub mod logos;
pub mod mapfs;
pub mod msg;
pub mod party;
pub mod shape;
pub mod sprite;
pub mod texture;
pub mod title;

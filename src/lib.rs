//! osu-rs is a parser crate for the file formats of the rhythm game osu!.
//!
//! - [`beatmap`] parses `.osu` beatmap files: the sectioned, line-oriented text format carrying
//!   a map's settings, timing points and hit objects, including full slider path reconstruction.
//! - `replay` parses `.osr` replay files: the little-endian binary format carrying a score
//!   header and an LZMA-compressed input frame stream (behind the `replay` feature, on by
//!   default).
//! - `diagnostics` renders accumulated warnings as `ariadne` reports over the source text
//!   (behind the `diagnostics` feature, on by default).
//!
//! Both parsers take in-memory buffers; reading files from disk is left to the caller.
//!
//! ```
//! use osu_rs::beatmap::{BeatmapOutput, parse_beatmap};
//!
//! let source = std::fs::read_to_string("map.osu").unwrap_or_else(|_| {
//!     "osu file format v14\n[HitObjects]\n256,192,1000,5,0\n".to_string()
//! });
//! let BeatmapOutput { beatmap, warnings } = parse_beatmap(&source).expect("parsable");
//! println!("{} objects, {} warnings", beatmap.hit_objects.len(), warnings.len());
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod beatmap;

#[cfg(feature = "diagnostics")]
#[cfg_attr(docsrs, doc(cfg(feature = "diagnostics")))]
pub mod diagnostics;

#[cfg(feature = "replay")]
#[cfg_attr(docsrs, doc(cfg(feature = "replay")))]
pub mod replay;

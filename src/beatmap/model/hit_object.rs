//! Hit object variants of the `[HitObjects]` section.

use super::Position;
use crate::beatmap::curve::{Curve, CurveKind};

/// Sample triggers decoded from the hitSound bitfield. Each flag is independently settable; the
/// normal sample plays regardless in the game, so a zero bitfield is still audible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitSound {
    /// Bit 0.
    pub normal: bool,
    /// Bit 1.
    pub whistle: bool,
    /// Bit 2.
    pub finish: bool,
    /// Bit 3.
    pub clap: bool,
}

impl HitSound {
    /// Decodes the bitfield as written in files.
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            normal: bits & 1 != 0,
            whistle: bits & (1 << 1) != 0,
            finish: bits & (1 << 2) != 0,
            clap: bits & (1 << 3) != 0,
        }
    }

    /// Encodes back into the file bitfield.
    pub const fn to_bits(self) -> u8 {
        (self.normal as u8)
            | ((self.whistle as u8) << 1)
            | ((self.finish as u8) << 2)
            | ((self.clap as u8) << 3)
    }
}

/// The five-part sample descriptor `normalSet:additionSet:index:volume:filename` attached to a
/// hit object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitSample {
    /// Sample set of the normal sound (0 = timing point default).
    pub normal_set: u8,
    /// Sample set of whistle, finish and clap sounds (0 = same as `normal_set`).
    pub addition_set: u8,
    /// Custom sample index; 0 selects the timing point's index.
    pub index: u32,
    /// Volume percentage; 0 selects the timing point's volume.
    pub volume: u8,
    /// Custom filename of the addition sound, when present.
    pub filename: Option<String>,
}

/// A sample set pair for one slider edge, from the `edgeSets` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeSet {
    /// Sample set of the normal sound on this edge.
    pub normal_set: u8,
    /// Sample set of the addition sounds on this edge.
    pub addition_set: u8,
}

/// One entry of the `[HitObjects]` section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitObject {
    /// Position on the playfield. For sliders this is also the first control point of the path.
    pub pos: Position,
    /// Time in milliseconds the object is to be hit.
    pub start_time: i32,
    /// Whether this object starts a new combo (type bit 2).
    pub new_combo: bool,
    /// How many combo colours to skip when this object starts a new combo (type bits 4-6).
    pub combo_skip: u8,
    /// Sample triggers played on hit.
    pub hit_sound: HitSound,
    /// The sample descriptor. For sliders it applies to the slider body.
    pub sample: HitSample,
    /// The variant-specific data.
    pub kind: HitObjectKind,
}

impl HitObject {
    /// Time in milliseconds the object ends: the hit time for circles, the computed travel end
    /// for sliders and the explicit end for spinners and holds.
    pub const fn end_time(&self) -> i32 {
        match &self.kind {
            HitObjectKind::Circle => self.start_time,
            HitObjectKind::Slider(slider) => self.start_time + slider.duration,
            HitObjectKind::Spinner { end_time } | HitObjectKind::Hold { end_time } => *end_time,
        }
    }
}

/// The closed set of hit object variants. The type bitfield sets exactly one of circle (bit 0),
/// slider (bit 1), spinner (bit 3) or hold (bit 7).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitObjectKind {
    /// A hit circle.
    Circle,
    /// A slider; see [`Slider`].
    Slider(Slider),
    /// A spinner, spun until `end_time`.
    Spinner {
        /// Time in milliseconds the spinner ends.
        end_time: i32,
    },
    /// An osu!mania hold note, held until `end_time`.
    Hold {
        /// Time in milliseconds the hold ends.
        end_time: i32,
    },
}

/// The slider-specific data of a hit object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slider {
    /// The curve kind declared in the file. The path may have degraded to another kind on
    /// degenerate geometry; see [`Curve::kind`].
    pub curve_kind: CurveKind,
    /// The control points as written, starting with the object position. Consecutive duplicates
    /// are kept: for Bezier curves they separate independent sub-curves.
    pub control_points: Vec<Position>,
    /// How many times the path is traversed; 1 is a single pass, each extra slide reverses.
    pub slides: u32,
    /// The pixel length from the file, authoritative over the geometric path length.
    pub length: f64,
    /// Sample triggers per edge: head, each reverse, tail.
    pub edge_sounds: Vec<HitSound>,
    /// Sample sets per edge, parallel to `edge_sounds`.
    pub edge_sets: Vec<EdgeSet>,
    /// Total travel time in milliseconds over all slides, derived from the effective timing at
    /// the start time, rounded to the nearest millisecond with ties away from zero.
    pub duration: i32,
    /// The reconstructed path.
    pub path: Curve,
}

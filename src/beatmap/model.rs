//! Parsed model of a `.osu` beatmap.
//!
//! Everything here is plain data: it is constructed once by the parser and never mutated
//! afterwards. Consumers needing a modified map build a new value.

pub mod event;
pub mod hit_object;
pub mod timing;

use self::{
    event::Event,
    hit_object::HitObject,
    timing::{EffectiveTiming, TimingPoint, effective_timing_at},
};

/// A fully parsed `.osu` beatmap.
///
/// The sequences keep file order, which is authoritative: a malformed file with out-of-order
/// timing points or hit objects is not re-sorted.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Beatmap {
    /// The `osu file format v<N>` version number.
    pub format_version: i32,
    /// The `[General]` settings.
    pub general: General,
    /// The `[Editor]` settings.
    pub editor: Editor,
    /// The `[Metadata]` settings.
    pub metadata: Metadata,
    /// The `[Difficulty]` settings.
    pub difficulty: Difficulty,
    /// The `[Events]` entries, in file order.
    pub events: Vec<Event>,
    /// The `[TimingPoints]` entries, in file order.
    pub timing_points: Vec<TimingPoint>,
    /// The `[Colours]` settings.
    pub colours: Colours,
    /// The `[HitObjects]` entries, in file order.
    pub hit_objects: Vec<HitObject>,
}

impl Beatmap {
    /// Resolves the effective beat length, slider-velocity multiplier and meter at `time`.
    /// See [`effective_timing_at`].
    pub fn timing_at(&self, time: i32) -> EffectiveTiming {
        effective_timing_at(&self.timing_points, time)
    }
}

/// A position on the playfield, in osu! pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Horizontal position.
    pub x: i32,
    /// Vertical position.
    pub y: i32,
}

/// An opaque RGB colour of the `[Colours]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

/// The game mode the map is made for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// osu!standard.
    #[default]
    Osu,
    /// osu!taiko.
    Taiko,
    /// osu!catch.
    Catch,
    /// osu!mania.
    Mania,
}

impl Mode {
    /// Resolves the numeric representation used in files.
    pub const fn from_repr(repr: u8) -> Option<Self> {
        Some(match repr {
            0 => Self::Osu,
            1 => Self::Taiko,
            2 => Self::Catch,
            3 => Self::Mania,
            _ => return None,
        })
    }
}

/// The countdown shown before the first hit object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Countdown {
    /// No countdown.
    #[default]
    None,
    /// Normal speed.
    Normal,
    /// Half speed.
    Half,
    /// Double speed.
    Double,
}

impl Countdown {
    /// Resolves the numeric representation used in files.
    pub const fn from_repr(repr: u8) -> Option<Self> {
        Some(match repr {
            0 => Self::None,
            1 => Self::Normal,
            2 => Self::Half,
            3 => Self::Double,
            _ => return None,
        })
    }
}

/// The default sample set of the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleSet {
    /// Normal samples.
    #[default]
    Normal,
    /// Soft samples.
    Soft,
    /// Drum samples.
    Drum,
}

impl SampleSet {
    /// Resolves the name used in the `[General]` section.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Normal" => Self::Normal,
            "Soft" => Self::Soft,
            "Drum" => Self::Drum,
            _ => return None,
        })
    }
}

/// Where hit circle overlays are drawn relative to hit numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlayPosition {
    /// Use the skin setting.
    #[default]
    NoChange,
    /// Draw overlays under numbers.
    Below,
    /// Draw overlays on top of numbers.
    Above,
}

impl OverlayPosition {
    /// Resolves the name used in the `[General]` section.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "NoChange" => Self::NoChange,
            "Below" => Self::Below,
            "Above" => Self::Above,
            _ => return None,
        })
    }
}

/// The `[General]` settings, with the defaults of the current format version.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct General {
    /// Location of the audio file, relative to the beatmap directory.
    pub audio_filename: Option<String>,
    /// Milliseconds of silence before the audio starts playing.
    pub audio_lead_in: i32,
    /// Time in milliseconds when the audio preview should start; `-1` means unset.
    pub preview_time: i32,
    /// Speed of the countdown before the first hit object.
    pub countdown: Countdown,
    /// Sample set used when timing points do not override it.
    pub sample_set: SampleSet,
    /// Multiplier for the threshold under which hit objects placed close in time stack, 0-1.
    pub stack_leniency: f64,
    /// Game mode of the map.
    pub mode: Mode,
    /// Whether breaks have a letterboxing effect.
    pub letterbox_in_breaks: bool,
    /// Whether the storyboard is drawn in front of combo fire.
    pub story_fire_in_front: bool,
    /// Whether the storyboard can use the user's skin images.
    pub use_skin_sprites: bool,
    /// Draw order of hit circle overlays compared to hit numbers.
    pub overlay_position: OverlayPosition,
    /// Preferred skin to use during gameplay.
    pub skin_preference: Option<String>,
    /// Whether a warning about flashing colours should be shown at the start.
    pub epilepsy_warning: bool,
    /// Time in beats that the countdown starts before the first hit object.
    pub countdown_offset: i32,
    /// Whether the "N+1" style key layout is used for osu!mania.
    pub special_style: bool,
    /// Whether the storyboard allows widescreen viewing.
    pub widescreen_storyboard: bool,
    /// Whether sound samples change rate when playing with speed-changing mods.
    pub samples_match_playback_rate: bool,
}

impl Default for General {
    fn default() -> Self {
        Self {
            audio_filename: None,
            audio_lead_in: 0,
            preview_time: -1,
            countdown: Countdown::default(),
            sample_set: SampleSet::default(),
            stack_leniency: 0.7,
            mode: Mode::default(),
            letterbox_in_breaks: false,
            story_fire_in_front: true,
            use_skin_sprites: false,
            overlay_position: OverlayPosition::default(),
            skin_preference: None,
            epilepsy_warning: false,
            countdown_offset: 0,
            special_style: false,
            widescreen_storyboard: false,
            samples_match_playback_rate: false,
        }
    }
}

/// The `[Editor]` settings. Saved by the editor and irrelevant to gameplay.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Editor {
    /// Times of editor bookmarks, in milliseconds.
    pub bookmarks: Vec<i32>,
    /// Distance snap multiplier.
    pub distance_spacing: f64,
    /// Beat snap divisor.
    pub beat_divisor: i32,
    /// Grid size.
    pub grid_size: i32,
    /// Zoom of the editor timeline.
    pub timeline_zoom: f64,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            bookmarks: vec![],
            distance_spacing: 1.0,
            beat_divisor: 4,
            grid_size: 4,
            timeline_zoom: 1.0,
        }
    }
}

/// The `[Metadata]` settings, used for identification and search.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// Romanised song title.
    pub title: Option<String>,
    /// Song title.
    pub title_unicode: Option<String>,
    /// Romanised song artist.
    pub artist: Option<String>,
    /// Song artist.
    pub artist_unicode: Option<String>,
    /// Beatmap creator.
    pub creator: Option<String>,
    /// Difficulty name.
    pub version: Option<String>,
    /// Original media the song was produced for.
    pub source: Option<String>,
    /// Search terms, space separated in the file.
    pub tags: Vec<String>,
    /// Difficulty ID on the osu! website.
    pub beatmap_id: Option<i64>,
    /// Beatmap set ID on the osu! website.
    pub beatmap_set_id: Option<i64>,
}

/// The `[Difficulty]` settings. Unspecified values default to 5 on the 0-10 scale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Difficulty {
    /// HP drain rate, 0-10.
    pub hp_drain_rate: f64,
    /// Circle size, 0-10.
    pub circle_size: f64,
    /// Overall difficulty, 0-10.
    pub overall_difficulty: f64,
    /// Approach rate, 0-10.
    pub approach_rate: f64,
    /// Base slider velocity in hundreds of pixels per beat.
    pub slider_multiplier: f64,
    /// Slider ticks per beat.
    pub slider_tick_rate: f64,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            hp_drain_rate: 5.0,
            circle_size: 5.0,
            overall_difficulty: 5.0,
            approach_rate: 5.0,
            slider_multiplier: 1.4,
            slider_tick_rate: 1.0,
        }
    }
}

/// The `[Colours]` settings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Colours {
    /// Combo colours, in file order. The `ComboN` index written in the key is cosmetic; the
    /// order of appearance is what the client cycles through.
    pub combo: Vec<Rgb>,
    /// Additive slider track colour.
    pub slider_track_override: Option<Rgb>,
    /// Slider border colour.
    pub slider_border: Option<Rgb>,
}

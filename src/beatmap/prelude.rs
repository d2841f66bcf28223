//! Prelude module for the beatmap parser.
//!
//! Re-exports all public types of the `beatmap` module for convenient access. You can use
//! `use osu_rs::beatmap::prelude::*;` to import them at once.

pub use super::{
    BeatmapOutput, BeatmapWarning,
    curve::{Curve, CurveKind, GeometryFallback, Vec2},
    lex::{LexOutput, LexWarning, LexWarningWithPos, token::{Section, Token, TokenWithPos}},
    mixin::{SourceLineMixin, SourceLineMixinExt},
    model::{
        Beatmap, Colours, Countdown, Difficulty, Editor, General, Metadata, Mode,
        OverlayPosition, Position, Rgb, SampleSet,
        event::Event,
        hit_object::{EdgeSet, HitObject, HitObjectKind, HitSample, HitSound, Slider},
        timing::{
            EffectiveTiming, Effects, FALLBACK_BEAT_LENGTH, TimingPoint, effective_timing_at,
        },
    },
    parse::{ParseError, ParseErrorWithPos, ParseOutput, ParseWarning, ParseWarningWithPos},
    parse_beatmap,
};

//! Dispatcher of the `[HitObjects]` section.
//!
//! A hit object line is `x,y,time,type,hitSound` followed by variant-specific fields. The type
//! bitfield selects exactly one variant: circle (bit 0), slider (bit 1), spinner (bit 3) or
//! osu!mania hold (bit 7); bit 2 starts a new combo and bits 4-6 skip combo colours.

use super::{ParseError, ParseWarning, invalid, optional};
use crate::beatmap::{
    curve::{Curve, CurveKind},
    model::{
        Position,
        hit_object::{EdgeSet, HitObject, HitObjectKind, HitSample, HitSound, Slider},
        timing::{TimingPoint, effective_timing_at},
    },
};

const TYPE_CIRCLE: u8 = 1;
const TYPE_SLIDER: u8 = 1 << 1;
const TYPE_NEW_COMBO: u8 = 1 << 2;
const TYPE_SPINNER: u8 = 1 << 3;
const TYPE_HOLD: u8 = 1 << 7;
const COMBO_SKIP_MASK: u8 = 0b0111_0000;

/// Parses one hit object line.
///
/// Fewer than the 5 mandatory fields, or a hold object without its `endTime:sample` separator,
/// is a terminal error. An object whose time or type fails coercion is dropped with a warning;
/// any other bad value falls back to its default.
pub(crate) fn hit_object(
    line: &str,
    timing_points: &[TimingPoint],
    slider_multiplier: f64,
    warnings: &mut Vec<ParseWarning>,
) -> Result<Option<HitObject>, ParseError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 5 {
        return Err(ParseError::HitObjectFieldCount { got: fields.len() });
    }

    let pos = Position {
        x: optional(&fields, 0, "x", 0, warnings),
        y: optional(&fields, 1, "y", 0, warnings),
    };
    let Ok(start_time) = fields[2].parse::<i32>() else {
        warnings.push(invalid("time", fields[2]));
        return Ok(None);
    };
    let Ok(type_bits) = fields[3].parse::<u8>() else {
        warnings.push(invalid("type", fields[3]));
        return Ok(None);
    };
    let hit_sound = HitSound::from_bits(optional(&fields, 4, "hitSound", 0, warnings));

    let new_combo = type_bits & TYPE_NEW_COMBO != 0;
    let combo_skip = (type_bits & COMBO_SKIP_MASK) >> 4;

    let (kind, sample) = if type_bits & TYPE_CIRCLE != 0 {
        (HitObjectKind::Circle, hit_sample(&fields, 5, warnings))
    } else if type_bits & TYPE_SLIDER != 0 {
        let slider = slider(
            &fields,
            pos,
            start_time,
            hit_sound,
            timing_points,
            slider_multiplier,
            warnings,
        );
        (
            HitObjectKind::Slider(slider),
            hit_sample(&fields, 10, warnings),
        )
    } else if type_bits & TYPE_SPINNER != 0 {
        let end_time = optional(&fields, 5, "endTime", start_time, warnings);
        (
            HitObjectKind::Spinner { end_time },
            hit_sample(&fields, 6, warnings),
        )
    } else if type_bits & TYPE_HOLD != 0 {
        // A format quirk: the hold end time is prefixed onto the sample descriptor as
        // `endTime:normalSet:additionSet:index:volume:filename`.
        let Some((end_raw, sample_raw)) = fields.get(5).and_then(|raw| raw.split_once(':')) else {
            return Err(ParseError::HoldWithoutEndTime);
        };
        let end_time = end_raw.parse().unwrap_or_else(|_| {
            warnings.push(invalid("endTime", end_raw));
            start_time
        });
        (
            HitObjectKind::Hold { end_time },
            sample_descriptor(sample_raw, warnings),
        )
    } else {
        warnings.push(invalid("type", fields[3]));
        return Ok(None);
    };

    Ok(Some(HitObject {
        pos,
        start_time,
        new_combo,
        combo_skip,
        hit_sound,
        sample,
        kind,
    }))
}

#[allow(clippy::too_many_arguments)]
fn slider(
    fields: &[&str],
    pos: Position,
    start_time: i32,
    hit_sound: HitSound,
    timing_points: &[TimingPoint],
    slider_multiplier: f64,
    warnings: &mut Vec<ParseWarning>,
) -> Slider {
    // `curveType|x1:y1|x2:y2|...`
    let mut pieces = fields.get(5).copied().unwrap_or("").split('|');
    let tag = pieces.next().unwrap_or("");
    let curve_kind = tag
        .chars()
        .next()
        .and_then(CurveKind::from_tag)
        .unwrap_or_else(|| {
            warnings.push(invalid("curveType", tag));
            CurveKind::Bezier
        });

    let mut control_points = vec![pos];
    for piece in pieces {
        let parsed = piece
            .split_once(':')
            .and_then(|(x, y)| Some(Position {
                x: x.parse().ok()?,
                y: y.parse().ok()?,
            }));
        match parsed {
            Some(point) => control_points.push(point),
            None => warnings.push(invalid("curvePoints", piece)),
        }
    }

    let slides = optional(&fields, 6, "slides", 1_u32, warnings).max(1);
    let explicit_length = match fields.get(7) {
        None => None,
        Some(raw) if raw.is_empty() => None,
        Some(raw) => match raw.parse::<f64>() {
            Ok(length) => Some(length),
            Err(_) => {
                warnings.push(invalid("length", raw));
                None
            }
        },
    };

    let (path, geometry_fallback) = Curve::new(curve_kind, &control_points, explicit_length);
    if let Some(fallback) = geometry_fallback {
        warnings.push(ParseWarning::DegenerateGeometry(fallback));
    }
    let length = explicit_length.unwrap_or_else(|| path.length());

    let edges = slides as usize + 1;
    let edge_sounds = match fields.get(8) {
        None => vec![hit_sound; edges],
        Some(raw) => raw
            .split('|')
            .map(|bits| match bits.parse() {
                Ok(bits) => HitSound::from_bits(bits),
                Err(_) => {
                    warnings.push(invalid("edgeSounds", bits));
                    hit_sound
                }
            })
            .collect(),
    };
    let edge_sets = match fields.get(9) {
        None => vec![EdgeSet::default(); edges],
        Some(raw) => raw
            .split('|')
            .map(|pair| {
                let parsed = pair.split_once(':').and_then(|(normal, addition)| {
                    Some(EdgeSet {
                        normal_set: normal.parse().ok()?,
                        addition_set: addition.parse().ok()?,
                    })
                });
                parsed.unwrap_or_else(|| {
                    warnings.push(invalid("edgeSets", pair));
                    EdgeSet::default()
                })
            })
            .collect(),
    };

    // duration = length / (100 * SliderMultiplier * SV) * beatLength * slides, rounded to the
    // nearest millisecond with ties away from zero.
    let timing = effective_timing_at(timing_points, start_time);
    let velocity = 100.0 * slider_multiplier * timing.slider_velocity;
    let raw_duration = length / velocity * timing.beat_length * f64::from(slides);
    let duration = if raw_duration.is_finite() {
        raw_duration.round() as i32
    } else {
        0
    };

    Slider {
        curve_kind,
        control_points,
        slides,
        length,
        edge_sounds,
        edge_sets,
        duration,
        path,
    }
}

/// Parses the five-part sample descriptor at `fields[index]`, defaulting when absent.
fn hit_sample(fields: &[&str], index: usize, warnings: &mut Vec<ParseWarning>) -> HitSample {
    match fields.get(index) {
        None => HitSample::default(),
        Some(raw) => sample_descriptor(raw, warnings),
    }
}

fn sample_descriptor(raw: &str, warnings: &mut Vec<ParseWarning>) -> HitSample {
    if raw.is_empty() {
        return HitSample::default();
    }
    let parts: Vec<&str> = raw.splitn(5, ':').collect();
    HitSample {
        normal_set: optional(&parts, 0, "normalSet", 0, warnings),
        addition_set: optional(&parts, 1, "additionSet", 0, warnings),
        index: optional(&parts, 2, "sampleIndex", 0, warnings),
        volume: optional(&parts, 3, "sampleVolume", 0, warnings),
        filename: parts
            .get(4)
            .filter(|name| !name.is_empty())
            .map(|name| (*name).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::hit_object;
    use crate::beatmap::{
        model::hit_object::{HitObjectKind, HitSample},
        parse::ParseError,
    };

    #[test]
    fn hold_end_time_is_split_from_the_sample() {
        let mut warnings = vec![];
        let object = hit_object("256,192,1000,128,0,1500:0:0:0:0:", &[], 1.4, &mut warnings)
            .expect("must not be fatal")
            .expect("must produce an object");

        assert_eq!(warnings, vec![]);
        assert!(!object.new_combo);
        assert_eq!(object.kind, HitObjectKind::Hold { end_time: 1500 });
        assert_eq!(object.sample, HitSample::default());
    }

    #[test]
    fn hold_without_separator_is_fatal() {
        let mut warnings = vec![];
        assert_eq!(
            hit_object("256,192,1000,128,0", &[], 1.4, &mut warnings)
                .expect_err("must be fatal"),
            ParseError::HoldWithoutEndTime
        );
        assert_eq!(
            hit_object("256,192,1000,128,0,1500", &[], 1.4, &mut warnings)
                .expect_err("must be fatal"),
            ParseError::HoldWithoutEndTime
        );
    }

    #[test]
    fn short_line_is_fatal() {
        let mut warnings = vec![];
        assert_eq!(
            hit_object("256,192,1000,1", &[], 1.4, &mut warnings).expect_err("must be fatal"),
            ParseError::HitObjectFieldCount { got: 4 }
        );
    }

    #[test]
    fn combo_flags_are_decoded() {
        let mut warnings = vec![];
        // Bit 0 circle, bit 2 new combo, bits 4-6 = 0b011 -> skip 3 colours.
        let object = hit_object("100,100,2000,53,2", &[], 1.4, &mut warnings)
            .expect("must not be fatal")
            .expect("must produce an object");

        assert_eq!(object.kind, HitObjectKind::Circle);
        assert!(object.new_combo);
        assert_eq!(object.combo_skip, 3);
        assert!(object.hit_sound.whistle);
    }
}

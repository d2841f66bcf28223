//! Dispatcher of the `[TimingPoints]` section.

use super::{ParseError, ParseWarning, invalid, optional};
use crate::beatmap::model::timing::{Effects, TimingPoint};

/// Parses one timing point line of up to 8 comma-separated fields.
///
/// Fewer than the 2 mandatory fields is a terminal error. A point whose mandatory values fail
/// coercion, or whose beat length contradicts its inherited flag, is dropped with a warning;
/// trailing optional fields default individually.
pub(crate) fn timing_point(
    line: &str,
    warnings: &mut Vec<ParseWarning>,
) -> Result<Option<TimingPoint>, ParseError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 2 {
        return Err(ParseError::TimingPointFieldCount { got: fields.len() });
    }

    // Older clients wrote fractional times; the value is truncated like the reference client
    // reading a decimal into an integer.
    let Ok(time) = fields[0].parse::<f64>() else {
        warnings.push(invalid("time", fields[0]));
        return Ok(None);
    };
    let Ok(beat_length) = fields[1].parse::<f64>() else {
        warnings.push(invalid("beatLength", fields[1]));
        return Ok(None);
    };

    let meter = optional(&fields, 2, "meter", 4, warnings);
    let sample_set = optional(&fields, 3, "sampleSet", 0, warnings);
    let sample_index = optional(&fields, 4, "sampleIndex", 0, warnings);
    let volume = optional(&fields, 5, "volume", 100, warnings);
    // The legacy format had no inherited points, so an absent 7th field means uninherited.
    let uninherited = optional(&fields, 6, "uninherited", 1_i32, warnings) != 0;
    let effects = Effects(optional(&fields, 7, "effects", 0, warnings));

    if uninherited && beat_length <= 0.0 {
        warnings.push(ParseWarning::NonPositiveBeatLength { beat_length });
        return Ok(None);
    }
    if !uninherited && beat_length >= 0.0 {
        warnings.push(invalid("beatLength", fields[1]));
        return Ok(None);
    }

    Ok(Some(TimingPoint {
        time: time as i32,
        beat_length,
        meter,
        sample_set,
        sample_index,
        volume,
        uninherited,
        effects,
    }))
}

//! Timing points and the effective-timing query.
//!
//! A `[TimingPoints]` line is either *uninherited* - it defines an absolute tempo as
//! milliseconds per beat - or *inherited* - it scales the slider velocity relative to the most
//! recent uninherited point, storing `-100 / multiplier` in the same field.

/// One entry of the `[TimingPoints]` section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimingPoint {
    /// Start time in milliseconds. The point applies from here until the next one.
    pub time: i32,
    /// For uninherited points, milliseconds per beat (always positive). For inherited points, a
    /// negative value encoding the slider-velocity multiplier as `-100 / multiplier`.
    pub beat_length: f64,
    /// Beats per measure. Meaningless on inherited points.
    pub meter: u32,
    /// Default sample set of objects in range (0 = map default, 1 = normal, 2 = soft, 3 = drum).
    pub sample_set: u8,
    /// Custom sample index of objects in range; 0 selects the skin default.
    pub sample_index: u32,
    /// Volume percentage of objects in range, 0-100.
    pub volume: u8,
    /// Whether the point defines an absolute tempo.
    pub uninherited: bool,
    /// Effect bitflags.
    pub effects: Effects,
}

impl TimingPoint {
    /// The slider-velocity multiplier this point applies: `100 / -beat_length` for inherited
    /// points, `1.0` for uninherited ones.
    pub fn slider_velocity(&self) -> f64 {
        if self.uninherited {
            1.0
        } else {
            100.0 / -self.beat_length
        }
    }

    /// Beats per minute, for uninherited points.
    pub fn bpm(&self) -> Option<f64> {
        self.uninherited.then(|| 60_000.0 / self.beat_length)
    }
}

/// Effect bitflags of a timing point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effects(pub u32);

impl Effects {
    /// Bit 0: kiai time is active in range.
    pub const KIAI: u32 = 1;
    /// Bit 3: the first barline is omitted (osu!taiko and osu!mania).
    pub const OMIT_FIRST_BARLINE: u32 = 1 << 3;

    /// Whether kiai time is active in range.
    pub const fn kiai(self) -> bool {
        self.0 & Self::KIAI != 0
    }

    /// Whether the first barline is omitted.
    pub const fn omits_first_barline(self) -> bool {
        self.0 & Self::OMIT_FIRST_BARLINE != 0
    }
}

/// Beat length answered for timestamps not preceded by any uninherited point: 500 ms per beat,
/// that is 120 BPM.
pub const FALLBACK_BEAT_LENGTH: f64 = 500.0;

/// The timing values in effect at some timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectiveTiming {
    /// Milliseconds per beat of the governing uninherited point.
    pub beat_length: f64,
    /// Slider-velocity multiplier of the governing point.
    pub slider_velocity: f64,
    /// Beats per measure of the governing uninherited point.
    pub meter: u32,
}

impl Default for EffectiveTiming {
    /// The values answered when no point precedes the queried timestamp: the
    /// [`FALLBACK_BEAT_LENGTH`] tempo, unit velocity and a 4/4 meter.
    fn default() -> Self {
        Self {
            beat_length: FALLBACK_BEAT_LENGTH,
            slider_velocity: 1.0,
            meter: 4,
        }
    }
}

/// Resolves the timing values in effect at `time`.
///
/// The last uninherited point at or before `time` supplies the beat length and meter; the last
/// point of any kind at or before `time` supplies the slider-velocity multiplier, which is `1.0`
/// when that point is itself uninherited. When several points share a timestamp, the one later
/// in file order wins. `points` is scanned in file order, which is authoritative even in
/// malformed files that are not sorted by time.
pub fn effective_timing_at(points: &[TimingPoint], time: i32) -> EffectiveTiming {
    let mut timing = EffectiveTiming::default();
    for point in points {
        if point.time > time {
            continue;
        }
        if point.uninherited {
            timing.beat_length = point.beat_length;
            timing.meter = point.meter;
            timing.slider_velocity = 1.0;
        } else {
            timing.slider_velocity = point.slider_velocity();
        }
    }
    timing
}

#[cfg(test)]
mod tests {
    use super::{EffectiveTiming, Effects, TimingPoint, effective_timing_at};

    fn uninherited(time: i32, beat_length: f64, meter: u32) -> TimingPoint {
        TimingPoint {
            time,
            beat_length,
            meter,
            sample_set: 0,
            sample_index: 0,
            volume: 100,
            uninherited: true,
            effects: Effects(0),
        }
    }

    fn inherited(time: i32, beat_length: f64) -> TimingPoint {
        TimingPoint {
            uninherited: false,
            ..uninherited(time, beat_length, 4)
        }
    }

    #[test]
    fn sentinel_before_first_uninherited_point() {
        let points = [uninherited(1000, 400.0, 4)];
        assert_eq!(effective_timing_at(&points, 500), EffectiveTiming::default());
        assert_eq!(effective_timing_at(&[], 500), EffectiveTiming::default());
    }

    #[test]
    fn inherited_point_scales_velocity() {
        let points = [uninherited(0, 500.0, 4), inherited(2000, -50.0)];

        let before = effective_timing_at(&points, 1000);
        assert_eq!(before.beat_length, 500.0);
        assert_eq!(before.slider_velocity, 1.0);

        let after = effective_timing_at(&points, 2000);
        assert_eq!(after.beat_length, 500.0);
        assert_eq!(after.slider_velocity, 2.0);
    }

    #[test]
    fn uninherited_point_resets_velocity() {
        let points = [
            uninherited(0, 500.0, 4),
            inherited(1000, -200.0),
            uninherited(2000, 300.0, 3),
        ];

        let timing = effective_timing_at(&points, 3000);
        assert_eq!(timing.beat_length, 300.0);
        assert_eq!(timing.slider_velocity, 1.0);
        assert_eq!(timing.meter, 3);
    }

    #[test]
    fn later_point_wins_shared_timestamp() {
        let points = [uninherited(1000, 500.0, 4), uninherited(1000, 250.0, 4)];
        assert_eq!(effective_timing_at(&points, 1000).beat_length, 250.0);
    }

    #[test]
    fn file_order_is_authoritative_when_unsorted() {
        let points = [uninherited(1000, 400.0, 4), uninherited(0, 500.0, 4)];
        assert_eq!(effective_timing_at(&points, 500).beat_length, 500.0);
    }

    #[test]
    fn velocity_of_inherited_point() {
        assert_eq!(inherited(0, -100.0).slider_velocity(), 1.0);
        assert_eq!(inherited(0, -50.0).slider_velocity(), 2.0);
        assert_eq!(inherited(0, -200.0).slider_velocity(), 0.5);
    }
}

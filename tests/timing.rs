use osu_rs::beatmap::prelude::*;
use pretty_assertions::assert_eq;

fn parse(source: &str) -> BeatmapOutput {
    parse_beatmap(source).expect("must parse")
}

#[test]
fn timestamps_before_any_uninherited_point_get_the_sentinel() {
    let BeatmapOutput { beatmap, warnings } = parse(
        "osu file format v14\n\
        [TimingPoints]\n\
        1000,400,4,0,0,100,1,0\n",
    );

    assert_eq!(warnings, vec![]);
    let timing = beatmap.timing_at(0);
    assert_eq!(timing.beat_length, FALLBACK_BEAT_LENGTH);
    assert_eq!(timing.slider_velocity, 1.0);
    assert_eq!(timing.meter, 4);

    // From the first point on, the sentinel no longer applies.
    assert_eq!(beatmap.timing_at(1000).beat_length, 400.0);
}

#[test]
fn inherited_points_scale_only_the_velocity() {
    let BeatmapOutput { beatmap, warnings } = parse(
        "osu file format v14\n\
        [TimingPoints]\n\
        0,300,3,0,0,100,1,0\n\
        5000,-50,4,0,0,100,0,0\n\
        9000,-200,4,0,0,100,0,0\n",
    );

    assert_eq!(warnings, vec![]);
    assert_eq!(
        beatmap.timing_at(6000),
        EffectiveTiming {
            beat_length: 300.0,
            slider_velocity: 2.0,
            meter: 3,
        }
    );
    assert_eq!(beatmap.timing_at(9500).slider_velocity, 0.5);
}

#[test]
fn shared_timestamp_resolves_to_the_later_line() {
    let BeatmapOutput { beatmap, .. } = parse(
        "osu file format v14\n\
        [TimingPoints]\n\
        1000,500,4,0,0,100,1,0\n\
        1000,250,4,0,0,100,1,0\n",
    );

    assert_eq!(beatmap.timing_at(1000).beat_length, 250.0);
}

#[test]
fn non_positive_uninherited_beat_length_is_dropped_with_warning() {
    let BeatmapOutput { beatmap, warnings } = parse(
        "osu file format v14\n\
        [TimingPoints]\n\
        0,-500,4,0,0,100,1,0\n\
        0,500,4,0,0,100,1,0\n",
    );

    assert_eq!(beatmap.timing_points.len(), 1);
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        &warnings[0],
        BeatmapWarning::Parse(w)
            if matches!(w.content(), ParseWarning::NonPositiveBeatLength { .. })
    ));
}

#[test]
fn short_timing_point_line_is_fatal_with_position() {
    let error = parse_beatmap(
        "osu file format v14\n\
        [TimingPoints]\n\
        1000\n",
    )
    .expect_err("must fail");

    assert_eq!(error.content(), &ParseError::TimingPointFieldCount { got: 1 });
    assert_eq!(error.line(), 3);
}

#[test]
fn fractional_timestamps_are_truncated() {
    let BeatmapOutput { beatmap, warnings } = parse(
        "osu file format v14\n\
        [TimingPoints]\n\
        956.5,329.67032967033,4,2,1,60,1,0\n",
    );

    assert_eq!(warnings, vec![]);
    assert_eq!(beatmap.timing_points[0].time, 956);
}

#[test]
fn file_order_stays_authoritative_for_unsorted_points() {
    let BeatmapOutput { beatmap, warnings } = parse(
        "osu file format v14\n\
        [TimingPoints]\n\
        2000,400,4,0,0,100,1,0\n\
        0,500,4,0,0,100,1,0\n",
    );

    assert_eq!(warnings, vec![]);
    // Not re-sorted in the model.
    assert_eq!(beatmap.timing_points[0].time, 2000);
    // And the query scans in file order.
    assert_eq!(beatmap.timing_at(1000).beat_length, 500.0);
}

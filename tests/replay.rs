#![cfg(feature = "replay")]

use osu_rs::{
    beatmap::model::Mode,
    replay::{Mods, Replay, ReplayError},
};
use pretty_assertions::assert_eq;

fn push_string(buffer: &mut Vec<u8>, value: &str) {
    buffer.push(0x0b);
    assert!(value.len() < 0x80, "test strings fit one ULEB byte");
    buffer.push(value.len() as u8);
    buffer.extend_from_slice(value.as_bytes());
}

/// Assembles a standard-mode replay around the given frame stream text.
fn sample_replay(frames: &str, client_version: i32, mods: u32) -> Vec<u8> {
    let mut buffer = vec![0_u8];
    buffer.extend_from_slice(&client_version.to_le_bytes());
    push_string(&mut buffer, "d41d8cd98f00b204e9800998ecf8427e");
    push_string(&mut buffer, "fieryrage");
    push_string(&mut buffer, "aa571b2b0abbb84a7f0f21908d6bf4ea");
    for count in [598_u16, 14, 0, 122, 3, 2] {
        buffer.extend_from_slice(&count.to_le_bytes());
    }
    buffer.extend_from_slice(&8_340_177_i32.to_le_bytes());
    buffer.extend_from_slice(&412_u16.to_le_bytes());
    buffer.push(0);
    buffer.extend_from_slice(&mods.to_le_bytes());
    push_string(&mut buffer, "0|1,5000|0.85");
    buffer.extend_from_slice(&637_500_000_000_000_000_i64.to_le_bytes());

    let mut compressed = Vec::new();
    lzma_rs::lzma_compress(&mut std::io::Cursor::new(frames.as_bytes()), &mut compressed)
        .expect("compressible");
    buffer.extend_from_slice(&(compressed.len() as i32).to_le_bytes());
    buffer.extend_from_slice(&compressed);

    buffer.extend_from_slice(&123_456_789_i64.to_le_bytes());
    buffer
}

#[test]
fn round_trips_the_score_header() {
    let bytes = sample_replay(
        "0|256|192|0,16|260|190|1,17|264|188|1,",
        20151228,
        (Mods::HIDDEN | Mods::DOUBLE_TIME).0,
    );
    let replay = Replay::from_bytes(&bytes).expect("must parse");

    assert_eq!(replay.mode, Mode::Osu);
    assert_eq!(replay.client_version, 20151228);
    assert_eq!(replay.beatmap_hash, "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(replay.player_name, "fieryrage");
    assert_eq!(replay.count_300, 598);
    assert_eq!(replay.count_100, 14);
    assert_eq!(replay.count_miss, 2);
    assert_eq!(replay.score, 8_340_177);
    assert_eq!(replay.max_combo, 412);
    assert!(!replay.perfect);
    assert_eq!(replay.mods, Mods::HIDDEN | Mods::DOUBLE_TIME);
    assert_eq!(replay.mods.to_string(), "HD DT");
    assert_eq!(replay.life_graph, "0|1,5000|0.85");
    assert_eq!(replay.timestamp, 637_500_000_000_000_000);
    assert_eq!(replay.score_id, Some(123_456_789));
    assert_eq!(replay.target_practice_hits, None);

    assert_eq!(replay.frames.len(), 3);
    assert_eq!(replay.frames[2].time, 33);
    assert_eq!(replay.frames[2].x, 264.0);
    assert_eq!(replay.frame_at(20).map(|f| f.time), Some(16));
}

#[test]
fn seed_frame_is_not_a_real_frame() {
    let bytes = sample_replay("16|0|0|0,-12345|0|0|1337,", 20151228, 0);
    let replay = Replay::from_bytes(&bytes).expect("must parse");

    assert_eq!(replay.rng_seed, Some(1337));
    assert_eq!(replay.frames.len(), 1);
}

#[test]
fn truncated_buffer_fails_cleanly() {
    let bytes = sample_replay("0|0|0|0,", 20151228, 0);
    assert_eq!(
        Replay::from_bytes(&bytes[..20]).expect_err("must fail"),
        ReplayError::UnexpectedEof
    );
    assert_eq!(
        Replay::from_bytes(&[]).expect_err("must fail"),
        ReplayError::UnexpectedEof
    );
}

#[test]
fn unknown_mode_fails() {
    let mut bytes = sample_replay("0|0|0|0,", 20151228, 0);
    bytes[0] = 5;
    assert_eq!(
        Replay::from_bytes(&bytes).expect_err("must fail"),
        ReplayError::UnknownMode(5)
    );
}

#[test]
fn invalid_string_prefix_fails() {
    let mut bytes = sample_replay("0|0|0|0,", 20151228, 0);
    // The beatmap hash string starts right after mode and version.
    bytes[5] = 0x42;
    assert_eq!(
        Replay::from_bytes(&bytes).expect_err("must fail"),
        ReplayError::InvalidStringPrefix(0x42)
    );
}

#[test]
fn accuracy_matches_the_judgement_weights() {
    let bytes = sample_replay("0|0|0|0,", 20151228, 0);
    let replay = Replay::from_bytes(&bytes).expect("must parse");

    let all = f64::from(598 + 14 + 0 + 2);
    let weighted = 598.0 + 14.0 / 3.0;
    assert!((replay.accuracy() - weighted / all * 100.0).abs() < 1e-9);
}

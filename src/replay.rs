//! The parser module of osu! replay (.osr) files.
//!
//! A replay is a little-endian binary file: a score header (game mode, client version, hashes,
//! judgement counts, mods), followed by an LZMA-compressed stream of input frames encoded as
//! `delta|x|y|keys` text records, and version-dependent trailing fields.
//!
//! Parsing operates on an in-memory byte buffer; reading the file is left to the caller.
//!
//! ```no_run
//! use osu_rs::replay::Replay;
//!
//! let bytes = std::fs::read("play.osr").expect("readable");
//! let replay = Replay::from_bytes(&bytes).expect("parsable");
//! println!("{} +{} {:.2}%", replay.player_name, replay.mods, replay.accuracy());
//! ```

mod reader;

use thiserror::Error;

use crate::beatmap::model::Mode;

use self::reader::ByteReader;

/// Client versions from which the frame stream may carry an RNG seed frame.
const SEEDED_FRAMES_VERSION: i32 = 20130319;
/// Client versions from which the trailing score id widened to 64 bits.
const WIDE_SCORE_ID_VERSION: i32 = 20140721;
/// Client versions from which a trailing score id is present at all.
const SCORE_ID_VERSION: i32 = 20121008;

/// An error occurred when parsing a replay file.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReplayError {
    /// The buffer ended before the announced data did.
    #[error("unexpected end of replay data")]
    UnexpectedEof,
    /// A string field began with a byte other than `0x00` or `0x0b`.
    #[error("invalid string prefix byte {0:#04x}")]
    InvalidStringPrefix(u8),
    /// A string field held non-UTF-8 data.
    #[error("replay string is not valid UTF-8")]
    StringEncoding,
    /// The game mode byte is not one of the four modes.
    #[error("unknown game mode {0}")]
    UnknownMode(u8),
    /// The announced length of the compressed frame stream is negative.
    #[error("invalid compressed frame stream length {0}")]
    InvalidFrameStreamLength(i32),
    /// The compressed frame stream could not be decompressed.
    #[error("broken LZMA frame stream: {0}")]
    Lzma(String),
    /// The decompressed frame stream held non-UTF-8 data.
    #[error("replay frames are not valid UTF-8")]
    FrameEncoding,
}

/// Mod bitflags of the classic client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mods(pub u32);

impl Mods {
    /// No fail.
    pub const NO_FAIL: Self = Self(1);
    /// Easy.
    pub const EASY: Self = Self(1 << 1);
    /// Hidden.
    pub const HIDDEN: Self = Self(1 << 3);
    /// Hard rock.
    pub const HARD_ROCK: Self = Self(1 << 4);
    /// Sudden death.
    pub const SUDDEN_DEATH: Self = Self(1 << 5);
    /// Double time.
    pub const DOUBLE_TIME: Self = Self(1 << 6);
    /// Relax.
    pub const RELAX: Self = Self(1 << 7);
    /// Half time.
    pub const HALF_TIME: Self = Self(1 << 8);
    /// Nightcore; always set together with [`Mods::DOUBLE_TIME`].
    pub const NIGHTCORE: Self = Self(1 << 9);
    /// Flashlight.
    pub const FLASHLIGHT: Self = Self(1 << 10);
    /// Autoplay.
    pub const AUTOPLAY: Self = Self(1 << 11);
    /// Spun out.
    pub const SPUN_OUT: Self = Self(1 << 12);
    /// Autopilot.
    pub const AUTOPILOT: Self = Self(1 << 13);
    /// Perfect.
    pub const PERFECT: Self = Self(1 << 14);
    /// Target practice.
    pub const TARGET_PRACTICE: Self = Self(1 << 23);
    /// Score V2.
    pub const SCORE_V2: Self = Self(1 << 29);

    /// Whether every mod in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Mods {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::fmt::Display for Mods {
    /// Formats the set mods as their two-letter acronyms, space separated.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const ACRONYMS: [(Mods, &str); 13] = [
            (Mods::HIDDEN, "HD"),
            (Mods::HARD_ROCK, "HR"),
            (Mods::DOUBLE_TIME, "DT"),
            (Mods::EASY, "EZ"),
            (Mods::HALF_TIME, "HT"),
            (Mods::NIGHTCORE, "NC"),
            (Mods::NO_FAIL, "NF"),
            (Mods::SUDDEN_DEATH, "SD"),
            (Mods::PERFECT, "PF"),
            (Mods::FLASHLIGHT, "FL"),
            (Mods::RELAX, "RX"),
            (Mods::AUTOPILOT, "AP"),
            (Mods::SPUN_OUT, "SO"),
        ];
        let mut first = true;
        for (flag, acronym) in ACRONYMS {
            if self.contains(flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(acronym)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// One input frame, with its time decoded from the stored deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplayFrame {
    /// Absolute time in milliseconds.
    pub time: i32,
    /// Cursor x position, in playfield pixels.
    pub x: f32,
    /// Cursor y position, in playfield pixels.
    pub y: f32,
    /// Pressed key bitflags.
    pub keys: u32,
}

/// A fully parsed `.osr` replay.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Replay {
    /// The game mode the score was set in.
    pub mode: Mode,
    /// The client version, as a `YYYYMMDD` date number.
    pub client_version: i32,
    /// MD5 hash of the beatmap the score was set on.
    pub beatmap_hash: String,
    /// Name of the player.
    pub player_name: String,
    /// MD5 hash over the replay header fields.
    pub replay_hash: String,
    /// Number of 300s.
    pub count_300: u16,
    /// Number of 100s.
    pub count_100: u16,
    /// Number of 50s.
    pub count_50: u16,
    /// Number of gekis (osu!mania: MAX 300s).
    pub count_geki: u16,
    /// Number of katus (osu!mania: 200s).
    pub count_katu: u16,
    /// Number of misses.
    pub count_miss: u16,
    /// Total score.
    pub score: i32,
    /// Greatest combo of the play.
    pub max_combo: u16,
    /// Whether the combo was never broken.
    pub perfect: bool,
    /// The mods the score was set with.
    pub mods: Mods,
    /// Life bar graph as `time|fraction` pairs, kept verbatim.
    pub life_graph: String,
    /// Timestamp as .NET ticks (100-nanosecond units since 0001-01-01).
    pub timestamp: i64,
    /// The input frames, delta-decoded to absolute times and sorted by time.
    pub frames: Vec<ReplayFrame>,
    /// RNG seed carried as a pseudo-frame by clients since 2013-03-19.
    pub rng_seed: Option<i32>,
    /// Online score id, present since client 2012-10-08.
    pub score_id: Option<i64>,
    /// Total accuracy of target practice hits, present when the mod is set.
    pub target_practice_hits: Option<f64>,
}

impl Replay {
    /// Parses a complete `.osr` byte buffer.
    ///
    /// # Errors
    ///
    /// Returns a [`ReplayError`] when the buffer is truncated or any field violates the binary
    /// layout. Malformed individual frame records are skipped, matching the reference client.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplayError> {
        let mut reader = ByteReader::new(bytes);

        let mode_byte = reader.read_u8()?;
        let mode = Mode::from_repr(mode_byte).ok_or(ReplayError::UnknownMode(mode_byte))?;
        let client_version = reader.read_i32()?;
        let beatmap_hash = reader.read_string()?;
        let player_name = reader.read_string()?;
        let replay_hash = reader.read_string()?;
        let count_300 = reader.read_u16()?;
        let count_100 = reader.read_u16()?;
        let count_50 = reader.read_u16()?;
        let count_geki = reader.read_u16()?;
        let count_katu = reader.read_u16()?;
        let count_miss = reader.read_u16()?;
        let score = reader.read_i32()?;
        let max_combo = reader.read_u16()?;
        let perfect = reader.read_u8()? == 1;
        let mods = Mods(reader.read_u32()?);
        let life_graph = reader.read_string()?;
        let timestamp = reader.read_i64()?;

        let compressed_length = reader.read_i32()?;
        let compressed_length = usize::try_from(compressed_length)
            .map_err(|_| ReplayError::InvalidFrameStreamLength(compressed_length))?;
        let compressed = reader.take(compressed_length)?;
        let mut decompressed = Vec::new();
        lzma_rs::lzma_decompress(&mut std::io::Cursor::new(compressed), &mut decompressed)
            .map_err(|err| ReplayError::Lzma(err.to_string()))?;
        let stream =
            String::from_utf8(decompressed).map_err(|_| ReplayError::FrameEncoding)?;
        let (mut frames, rng_seed) = decode_frames(&stream, client_version);
        frames.sort_by_key(|frame| frame.time);

        // Replays written before the score id existed simply end here.
        let score_id = if reader.remaining() == 0 {
            None
        } else if client_version >= WIDE_SCORE_ID_VERSION {
            Some(reader.read_i64()?)
        } else if client_version >= SCORE_ID_VERSION {
            Some(i64::from(reader.read_i32()?))
        } else {
            None
        };
        let target_practice_hits = if mods.contains(Mods::TARGET_PRACTICE) {
            Some(reader.read_f64()?)
        } else {
            None
        };

        Ok(Self {
            mode,
            client_version,
            beatmap_hash,
            player_name,
            replay_hash,
            count_300,
            count_100,
            count_50,
            count_geki,
            count_katu,
            count_miss,
            score,
            max_combo,
            perfect,
            mods,
            life_graph,
            timestamp,
            frames,
            rng_seed,
            score_id,
            target_practice_hits,
        })
    }

    /// The judgement-weighted accuracy of the play, as a percentage.
    pub fn accuracy(&self) -> f64 {
        let all = u32::from(self.count_300)
            + u32::from(self.count_100)
            + u32::from(self.count_50)
            + u32::from(self.count_miss);
        let weighted = f64::from(self.count_300)
            + f64::from(self.count_100) / 3.0
            + f64::from(self.count_50) / 6.0;
        weighted / f64::from(all.max(1)) * 100.0
    }

    /// The last frame at or before `time`, or [`None`] before the first frame.
    pub fn frame_at(&self, time: i32) -> Option<&ReplayFrame> {
        let index = self.frames.partition_point(|frame| frame.time <= time);
        index.checked_sub(1).map(|index| &self.frames[index])
    }
}

/// Decodes the `delta|x|y|keys` records. The `-12345` pseudo-frame written by seeded clients
/// carries the RNG seed in its keys field and is not a real frame. Malformed records are
/// skipped.
fn decode_frames(stream: &str, client_version: i32) -> (Vec<ReplayFrame>, Option<i32>) {
    let mut frames = vec![];
    let mut rng_seed = None;
    let mut time = 0_i32;
    for record in stream.split(',').filter(|record| !record.is_empty()) {
        let mut parts = record.split('|');
        let (Some(delta), Some(x), Some(y), Some(keys)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            continue;
        };
        let Ok(delta) = delta.parse::<i32>() else {
            continue;
        };
        if delta == -12345 && client_version >= SEEDED_FRAMES_VERSION {
            rng_seed = keys.parse().ok();
            continue;
        }
        let (Ok(x), Ok(y), Ok(keys)) = (x.parse(), y.parse(), keys.parse()) else {
            continue;
        };
        time += delta;
        frames.push(ReplayFrame { time, x, y, keys });
    }
    (frames, rng_seed)
}

#[cfg(test)]
mod tests {
    use super::{Mods, Replay, ReplayFrame, decode_frames};

    #[test]
    fn frames_are_delta_decoded() {
        let (frames, seed) = decode_frames("0|256|192|0,16|260|190|1,17|264|188|1,", 0);

        assert_eq!(seed, None);
        assert_eq!(
            frames,
            vec![
                ReplayFrame {
                    time: 0,
                    x: 256.0,
                    y: 192.0,
                    keys: 0
                },
                ReplayFrame {
                    time: 16,
                    x: 260.0,
                    y: 190.0,
                    keys: 1
                },
                ReplayFrame {
                    time: 33,
                    x: 264.0,
                    y: 188.0,
                    keys: 1
                },
            ]
        );
    }

    #[test]
    fn seed_frame_is_extracted_on_seeded_clients() {
        let (frames, seed) = decode_frames("16|0|0|0,-12345|0|0|1337,", 20150414);
        assert_eq!(seed, Some(1337));
        assert_eq!(frames.len(), 1);

        // Before seeding existed the same record is an ordinary (if nonsensical) frame.
        let (frames, seed) = decode_frames("16|0|0|0,-12345|0|0|1337,", 20100101);
        assert_eq!(seed, None);
        assert_eq!(frames.len(), 2);
    }

    #[test]
    fn mods_format_as_acronyms() {
        let mods = Mods::HIDDEN | Mods::DOUBLE_TIME;
        assert!(mods.contains(Mods::HIDDEN));
        assert!(!mods.contains(Mods::FLASHLIGHT));
        assert_eq!(mods.to_string(), "HD DT");
        assert_eq!(Mods::default().to_string(), "");
    }

    #[test]
    fn accuracy_weights_judgements() {
        let replay = Replay {
            count_300: 90,
            count_100: 6,
            count_50: 0,
            count_miss: 4,
            ..blank()
        };
        assert!((replay.accuracy() - 92.0).abs() < 1e-9);
    }

    #[test]
    fn frame_at_returns_last_at_or_before() {
        let replay = Replay {
            frames: vec![
                ReplayFrame {
                    time: 0,
                    x: 0.0,
                    y: 0.0,
                    keys: 0
                },
                ReplayFrame {
                    time: 20,
                    x: 5.0,
                    y: 0.0,
                    keys: 1
                },
            ],
            ..blank()
        };

        assert_eq!(replay.frame_at(-1), None);
        assert_eq!(replay.frame_at(10).map(|f| f.time), Some(0));
        assert_eq!(replay.frame_at(20).map(|f| f.keys), Some(1));
        assert_eq!(replay.frame_at(1000).map(|f| f.time), Some(20));
    }

    fn blank() -> Replay {
        Replay {
            mode: crate::beatmap::model::Mode::Osu,
            client_version: 0,
            beatmap_hash: String::new(),
            player_name: String::new(),
            replay_hash: String::new(),
            count_300: 0,
            count_100: 0,
            count_50: 0,
            count_geki: 0,
            count_katu: 0,
            count_miss: 0,
            score: 0,
            max_combo: 0,
            perfect: false,
            mods: Mods::default(),
            life_graph: String::new(),
            timestamp: 0,
            frames: vec![],
            rng_seed: None,
            score_id: None,
            target_practice_hits: None,
        }
    }
}

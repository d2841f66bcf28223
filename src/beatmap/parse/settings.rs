//! Dispatchers of the key-value sections: `[General]`, `[Editor]`, `[Metadata]` and
//! `[Difficulty]`.
//!
//! Each dispatcher owns the fixed, case-sensitive mapping from key name to a typed setter.
//! Unknown keys are ignored for forward compatibility. A value failing coercion leaves the field
//! at its default and surfaces as the returned warning.

use super::{Result, invalid, number};
use crate::beatmap::model::{
    Countdown, Difficulty, Editor, General, Metadata, Mode, OverlayPosition, SampleSet,
};

/// `0`/`1` flags used throughout the key-value sections.
fn boolean(field: &str, value: &str) -> Result<bool> {
    match value {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(invalid(field, value)),
    }
}

pub(crate) fn general(general: &mut General, key: &str, value: &str) -> Result<()> {
    match key {
        "AudioFilename" => general.audio_filename = Some(value.to_string()),
        "AudioLeadIn" => general.audio_lead_in = number(key, value)?,
        "PreviewTime" => general.preview_time = number(key, value)?,
        "Countdown" => {
            general.countdown =
                Countdown::from_repr(number(key, value)?).ok_or_else(|| invalid(key, value))?;
        }
        "SampleSet" => {
            general.sample_set = SampleSet::from_name(value).ok_or_else(|| invalid(key, value))?;
        }
        "StackLeniency" => general.stack_leniency = number(key, value)?,
        "Mode" => {
            general.mode =
                Mode::from_repr(number(key, value)?).ok_or_else(|| invalid(key, value))?;
        }
        "LetterboxInBreaks" => general.letterbox_in_breaks = boolean(key, value)?,
        "StoryFireInFront" => general.story_fire_in_front = boolean(key, value)?,
        "UseSkinSprites" => general.use_skin_sprites = boolean(key, value)?,
        "OverlayPosition" => {
            general.overlay_position =
                OverlayPosition::from_name(value).ok_or_else(|| invalid(key, value))?;
        }
        "SkinPreference" => general.skin_preference = Some(value.to_string()),
        "EpilepsyWarning" => general.epilepsy_warning = boolean(key, value)?,
        "CountdownOffset" => general.countdown_offset = number(key, value)?,
        "SpecialStyle" => general.special_style = boolean(key, value)?,
        "WidescreenStoryboard" => general.widescreen_storyboard = boolean(key, value)?,
        "SamplesMatchPlaybackRate" => general.samples_match_playback_rate = boolean(key, value)?,
        _ => {}
    }
    Ok(())
}

pub(crate) fn editor(editor: &mut Editor, key: &str, value: &str) -> Result<()> {
    match key {
        "Bookmarks" => {
            editor.bookmarks = value
                .split(',')
                .map(|raw| raw.trim().parse().map_err(|_| invalid(key, raw)))
                .collect::<Result<_>>()?;
        }
        "DistanceSpacing" => editor.distance_spacing = number(key, value)?,
        "BeatDivisor" => editor.beat_divisor = number(key, value)?,
        "GridSize" => editor.grid_size = number(key, value)?,
        "TimelineZoom" => editor.timeline_zoom = number(key, value)?,
        _ => {}
    }
    Ok(())
}

pub(crate) fn metadata(metadata: &mut Metadata, key: &str, value: &str) -> Result<()> {
    match key {
        "Title" => metadata.title = Some(value.to_string()),
        "TitleUnicode" => metadata.title_unicode = Some(value.to_string()),
        "Artist" => metadata.artist = Some(value.to_string()),
        "ArtistUnicode" => metadata.artist_unicode = Some(value.to_string()),
        "Creator" => metadata.creator = Some(value.to_string()),
        "Version" => metadata.version = Some(value.to_string()),
        "Source" => metadata.source = Some(value.to_string()),
        "Tags" => metadata.tags = value.split_whitespace().map(str::to_string).collect(),
        "BeatmapID" => metadata.beatmap_id = Some(number(key, value)?),
        "BeatmapSetID" => metadata.beatmap_set_id = Some(number(key, value)?),
        _ => {}
    }
    Ok(())
}

pub(crate) fn difficulty(difficulty: &mut Difficulty, key: &str, value: &str) -> Result<()> {
    match key {
        "HPDrainRate" => difficulty.hp_drain_rate = number(key, value)?,
        "CircleSize" => difficulty.circle_size = number(key, value)?,
        "OverallDifficulty" => difficulty.overall_difficulty = number(key, value)?,
        "ApproachRate" => difficulty.approach_rate = number(key, value)?,
        "SliderMultiplier" => difficulty.slider_multiplier = number(key, value)?,
        "SliderTickRate" => difficulty.slider_tick_rate = number(key, value)?,
        _ => {}
    }
    Ok(())
}

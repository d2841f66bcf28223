//! Definitions of the logical lines of the `.osu` format.

use crate::beatmap::mixin::SourceLineMixin;

/// A recognized section of the `.osu` format.
///
/// Section names are fixed identifiers of the format. Headers with any other name are reported by
/// the parser and their contents are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Section {
    /// `[General]` - audio and global playback settings.
    General,
    /// `[Editor]` - editor-only state saved with the map.
    Editor,
    /// `[Metadata]` - titles, artists and identifiers.
    Metadata,
    /// `[Difficulty]` - difficulty and slider velocity settings.
    Difficulty,
    /// `[Events]` - background, video, breaks and storyboard lines.
    Events,
    /// `[TimingPoints]` - tempo and slider-velocity changes.
    TimingPoints,
    /// `[Colours]` - combo and slider colours.
    Colours,
    /// `[HitObjects]` - the playable objects.
    HitObjects,
}

impl Section {
    /// Resolves a section header name. Matching is case-sensitive, as the names are written by
    /// the editor itself and never vary in real files.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "General" => Self::General,
            "Editor" => Self::Editor,
            "Metadata" => Self::Metadata,
            "Difficulty" => Self::Difficulty,
            "Events" => Self::Events,
            "TimingPoints" => Self::TimingPoints,
            "Colours" => Self::Colours,
            "HitObjects" => Self::HitObjects,
            _ => return None,
        })
    }

    /// Returns the name as written in file headers.
    pub const fn name(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Editor => "Editor",
            Self::Metadata => "Metadata",
            Self::Difficulty => "Difficulty",
            Self::Events => "Events",
            Self::TimingPoints => "TimingPoints",
            Self::Colours => "Colours",
            Self::HitObjects => "HitObjects",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified content line of the `.osu` format.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Token<'a> {
    /// `osu file format v<N>`. Recognized only as the very first content line of the file.
    Format(i32),
    /// `[Name]`. Switches the current section. Carries the raw name; resolution to [`Section`]
    /// happens in the parser so that unknown sections warn instead of failing.
    Header(&'a str),
    /// Any other non-empty, non-comment line. Its interpretation depends on the current section.
    Data(&'a str),
}

/// A token with position information.
pub type TokenWithPos<'a> = SourceLineMixin<Token<'a>>;

/// Parses the `osu file format v<N>` version line.
pub(crate) fn format_version(line: &str) -> Option<i32> {
    line.strip_prefix("osu file format v")?.trim().parse().ok()
}

/// Extracts the name of a `[Name]` section header line. The name must consist of word
/// characters only.
pub(crate) fn section_header(line: &str) -> Option<&str> {
    let name = line.strip_prefix('[')?.strip_suffix(']')?;
    let word = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    word.then_some(name)
}

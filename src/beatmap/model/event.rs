//! Entries of the `[Events]` section.

use super::Position;

/// One line of the `[Events]` section, in file order.
///
/// Only backgrounds and videos are structurally parsed. Everything else - break periods and the
/// storyboard scripting language - is kept verbatim so the file content survives a round trip
/// through the model without this crate interpreting it.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// `0,0,filename,xOffset,yOffset` - the background image.
    Background {
        /// Start time; always 0 in files written by the editor.
        start_time: i32,
        /// Location of the image, relative to the beatmap directory.
        filename: String,
        /// Offset of the image origin from the screen center.
        offset: Position,
    },
    /// `Video,startTime,filename,xOffset,yOffset` - the background video.
    Video {
        /// Time in milliseconds the video starts at.
        start_time: i32,
        /// Location of the video, relative to the beatmap directory.
        filename: String,
        /// Offset of the video origin from the screen center.
        offset: Position,
    },
    /// Any other event line, kept as raw text.
    Other(String),
}

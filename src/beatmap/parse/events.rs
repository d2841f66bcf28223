//! Dispatcher of the `[Events]` section.
//!
//! Only backgrounds and videos are given structure. Break periods and storyboard commands pass
//! through as [`Event::Other`] so their text is preserved without interpretation.

use super::{Result, number};
use crate::beatmap::model::{Position, event::Event};

/// Strips the optional double quotes around event filenames.
fn unquote(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(raw)
}

/// Parses one event line. On a coercion failure the caller keeps the raw line as
/// [`Event::Other`], so no event is ever lost.
pub(crate) fn event(line: &str) -> Result<Event> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let offset = |index: usize| -> Result<i32> {
        match fields.get(index) {
            None => Ok(0),
            Some(raw) if raw.is_empty() => Ok(0),
            Some(raw) => number("event offset", raw),
        }
    };
    match fields[0] {
        "0" if fields.len() >= 3 => Ok(Event::Background {
            start_time: number("event start time", fields[1])?,
            filename: unquote(fields[2]).to_string(),
            offset: Position {
                x: offset(3)?,
                y: offset(4)?,
            },
        }),
        "Video" | "1" if fields.len() >= 3 => Ok(Event::Video {
            start_time: number("event start time", fields[1])?,
            filename: unquote(fields[2]).to_string(),
            offset: Position {
                x: offset(3)?,
                y: offset(4)?,
            },
        }),
        _ => Ok(Event::Other(line.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::event;
    use crate::beatmap::model::{Position, event::Event};

    #[test]
    fn background_is_structured() {
        assert_eq!(
            event(r#"0,0,"bg.jpg",0,32"#).expect("must parse"),
            Event::Background {
                start_time: 0,
                filename: "bg.jpg".to_string(),
                offset: Position { x: 0, y: 32 },
            }
        );
    }

    #[test]
    fn video_accepts_both_tags() {
        let expected = Event::Video {
            start_time: 500,
            filename: "intro.mp4".to_string(),
            offset: Position { x: 0, y: 0 },
        };
        assert_eq!(event(r#"Video,500,"intro.mp4""#).expect("must parse"), expected);
        assert_eq!(event(r#"1,500,"intro.mp4""#).expect("must parse"), expected);
    }

    #[test]
    fn breaks_and_storyboard_lines_pass_through() {
        assert_eq!(
            event("2,24000,27000").expect("must parse"),
            Event::Other("2,24000,27000".to_string())
        );
        assert_eq!(
            event("Sprite,Background,TopCentre,\"clouds.png\",320,240").expect("must parse"),
            Event::Other("Sprite,Background,TopCentre,\"clouds.png\",320,240".to_string())
        );
    }

    #[test]
    fn unparsable_background_warns() {
        event(r#"0,zero,"bg.jpg""#).expect_err("must warn");
    }
}

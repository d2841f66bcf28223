//! Parsing a [`Beatmap`] from the token lines.
//!
//! Token lines (in [`LexOutput`](super::lex::LexOutput)) == [`parse`](self) ==> [`Beatmap`] (in
//! [`ParseOutput`]).
//!
//! The parser is a small state machine over the current section: header tokens switch the state
//! and data tokens are routed to the dispatcher of that section. Field-level problems fall back
//! to defaults and accumulate as [`ParseWarning`]s; only structural violations - no format
//! version, or a mandatory line that cannot be split into its minimum field count - abort with a
//! [`ParseError`].

mod colours;
mod events;
mod hit_object;
mod settings;
mod timing;

use std::str::FromStr;

use thiserror::Error;

use crate::beatmap::{
    curve::GeometryFallback,
    lex::token::{Section, Token, TokenWithPos},
    mixin::{SourceLineMixin, SourceLineMixinExt},
    model::{Beatmap, event::Event},
};

/// A terminal error: the file cannot be understood as a beatmap at all.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseError {
    /// The first content line was not `osu file format v<N>`.
    #[error("missing `osu file format v<N>` header")]
    MissingFormatVersion,
    /// A `[TimingPoints]` line could not be split into the 2 mandatory fields.
    #[error("timing point line has {got} fields, expected at least 2")]
    TimingPointFieldCount {
        /// The number of fields found.
        got: usize,
    },
    /// A `[HitObjects]` line could not be split into the 5 mandatory fields.
    #[error("hit object line has {got} fields, expected at least 5")]
    HitObjectFieldCount {
        /// The number of fields found.
        got: usize,
    },
    /// A hold object whose 6th field lacks the `endTime:sample` separator.
    #[error("hold object lacks the `:` separator before its sample")]
    HoldWithoutEndTime,
}

/// A parse error with position information.
pub type ParseErrorWithPos = SourceLineMixin<ParseError>;

/// A recoverable problem. The affected field fell back to its documented default, or the
/// affected entry was dropped, and parsing continued.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseWarning {
    /// A value failed type coercion or was an unknown enum value.
    #[error("invalid value `{value}` for {field}")]
    InvalidValue {
        /// The field the value belongs to.
        field: String,
        /// The offending value text.
        value: String,
    },
    /// A `[Name]` header with an unrecognized name; its lines are skipped.
    #[error("unknown section `{name}`")]
    UnknownSection {
        /// The unrecognized section name.
        name: String,
    },
    /// An uninherited timing point with a non-positive beat length; the point is dropped.
    #[error("uninherited timing point with non-positive beat length {beat_length}")]
    NonPositiveBeatLength {
        /// The offending beat length.
        beat_length: f64,
    },
    /// A slider whose declared geometry is degenerate; a documented fallback path was built.
    #[error("degenerate slider geometry: {0}")]
    DegenerateGeometry(#[from] GeometryFallback),
}

/// A parse warning with position information.
pub type ParseWarningWithPos = SourceLineMixin<ParseWarning>;

/// Type alias of `core::result::Result<T, ParseWarning>`.
pub(crate) type Result<T> = core::result::Result<T, ParseWarning>;

pub(crate) fn invalid(field: &str, value: &str) -> ParseWarning {
    ParseWarning::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Parses a mandatory numeric field.
pub(crate) fn number<T: FromStr>(field: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| invalid(field, value))
}

/// Parses the optional field at `index`, warning and defaulting when it fails coercion.
/// Absent and empty fields default silently; trailing fields are optional in the format.
pub(crate) fn optional<T: FromStr>(
    fields: &[&str],
    index: usize,
    field: &str,
    default: T,
    warnings: &mut Vec<ParseWarning>,
) -> T {
    match fields.get(index) {
        None => default,
        Some(raw) if raw.is_empty() => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warnings.push(invalid(field, raw));
            default
        }),
    }
}

/// Beatmap parse output.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct ParseOutput {
    /// The parsed beatmap.
    pub beatmap: Beatmap,
    /// Warnings that occurred during parsing, in source order.
    pub parse_warnings: Vec<ParseWarningWithPos>,
}

impl Beatmap {
    /// Parses a token stream into a [`Beatmap`].
    ///
    /// The stream must start with a [`Token::Format`] line. Timing points are fully collected
    /// before any hit object line is parsed in a well-formed file, since `[TimingPoints]`
    /// precedes `[HitObjects]`; the slider duration computation relies on that order.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] with the offending line position on the structural violations
    /// documented on the type. Everything else recovers into `parse_warnings`.
    pub fn from_token_stream(
        tokens: &[TokenWithPos<'_>],
    ) -> core::result::Result<ParseOutput, ParseErrorWithPos> {
        let mut beatmap = Self::default();
        let mut parse_warnings: Vec<ParseWarningWithPos> = vec![];
        let mut section = None;
        let mut scratch: Vec<ParseWarning> = vec![];

        let mut tokens = tokens.iter();
        let Some(first) = tokens.next() else {
            return Err(ParseError::MissingFormatVersion.into_wrapper_manual(1, 0, 0));
        };
        let Token::Format(version) = first.content() else {
            return Err(ParseError::MissingFormatVersion.into_wrapper(first));
        };
        beatmap.format_version = *version;

        for token in tokens {
            match token.content() {
                Token::Format(_) => {}
                Token::Header(name) => {
                    section = Section::from_name(name);
                    if section.is_none() {
                        parse_warnings.push(
                            ParseWarning::UnknownSection {
                                name: (*name).to_string(),
                            }
                            .into_wrapper(token),
                        );
                    }
                }
                Token::Data(line) => {
                    let Some(current) = section else {
                        // Data of an unknown section; the header already warned.
                        continue;
                    };
                    match current {
                        Section::General
                        | Section::Editor
                        | Section::Metadata
                        | Section::Difficulty => {
                            let Some((key, value)) = key_value(line) else {
                                parse_warnings
                                    .push(invalid(current.name(), line).into_wrapper(token));
                                continue;
                            };
                            let dispatched = match current {
                                Section::General => {
                                    settings::general(&mut beatmap.general, key, value)
                                }
                                Section::Editor => settings::editor(&mut beatmap.editor, key, value),
                                Section::Metadata => {
                                    settings::metadata(&mut beatmap.metadata, key, value)
                                }
                                _ => settings::difficulty(&mut beatmap.difficulty, key, value),
                            };
                            if let Err(warning) = dispatched {
                                parse_warnings.push(warning.into_wrapper(token));
                            }
                        }
                        Section::Events => match events::event(line) {
                            Ok(event) => beatmap.events.push(event),
                            Err(warning) => {
                                // The line still round-trips, just without structure.
                                parse_warnings.push(warning.into_wrapper(token));
                                beatmap.events.push(Event::Other((*line).to_string()));
                            }
                        },
                        Section::TimingPoints => {
                            let parsed = timing::timing_point(line, &mut scratch)
                                .map_err(|err| err.into_wrapper(token))?;
                            parse_warnings
                                .extend(scratch.drain(..).map(|w| w.into_wrapper(token)));
                            if let Some(point) = parsed {
                                beatmap.timing_points.push(point);
                            }
                        }
                        Section::Colours => {
                            let Some((key, value)) = key_value(line) else {
                                parse_warnings
                                    .push(invalid(current.name(), line).into_wrapper(token));
                                continue;
                            };
                            if let Err(warning) =
                                colours::colour(&mut beatmap.colours, key, value)
                            {
                                parse_warnings.push(warning.into_wrapper(token));
                            }
                        }
                        Section::HitObjects => {
                            let parsed = hit_object::hit_object(
                                line,
                                &beatmap.timing_points,
                                beatmap.difficulty.slider_multiplier,
                                &mut scratch,
                            )
                            .map_err(|err| err.into_wrapper(token))?;
                            parse_warnings
                                .extend(scratch.drain(..).map(|w| w.into_wrapper(token)));
                            if let Some(object) = parsed {
                                beatmap.hit_objects.push(object);
                            }
                        }
                    }
                }
            }
        }

        Ok(ParseOutput {
            beatmap,
            parse_warnings,
        })
    }
}

/// Splits a key-value line on the first `:`, trimming both sides. Values may themselves
/// contain `:`.
fn key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), value.trim()))
}

#[cfg(test)]
mod tests {
    use super::key_value;

    #[test]
    fn key_value_splits_on_first_colon() {
        assert_eq!(
            key_value("AudioFilename: 03 Renatus : Reprise.mp3"),
            Some(("AudioFilename", "03 Renatus : Reprise.mp3"))
        );
        assert_eq!(key_value("no separator"), None);
    }
}

//! The parser module of osu! beatmap (.osu) files.
//!
//! This module consists of two phases: lexical analyzing and line parsing.
//!
//! `lex` module classifies the raw text into logical lines: the format-version line, `[Name]`
//! section headers, and data lines. Comments, blank lines and a leading BOM never reach the
//! parser.
//!
//! `parse` module routes each data line to the dispatcher of its section and assembles the
//! immutable [`Beatmap`] model, computing the derived slider values from the timing points and
//! the reconstructed curve paths on the way.
//!
//! In detail, our policies are:
//!
//! - Support only UTF-8 (as required `&str` to input).
//! - Do not support editing or writing back the `.osu` source text.
//! - Unknown keys and sections are skipped with a warning, never an error.
//! - Field-level problems fall back to documented defaults; only a missing format version or a
//!   mandatory line that cannot be split aborts.

pub mod curve;
pub mod lex;
pub mod mixin;
pub mod model;
pub mod parse;
pub mod prelude;

use thiserror::Error;

use self::{
    lex::{LexOutput, LexWarningWithPos},
    model::Beatmap,
    parse::{ParseErrorWithPos, ParseOutput, ParseWarningWithPos},
};

/// Any recoverable problem found while parsing a beatmap.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BeatmapWarning {
    /// A warning from the line analyzer.
    #[error("lex: {0}")]
    Lex(#[from] LexWarningWithPos),
    /// A warning from the section parsers.
    #[error("parse: {0}")]
    Parse(#[from] ParseWarningWithPos),
}

/// Output of parsing a beatmap file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct BeatmapOutput {
    /// The parsed beatmap.
    pub beatmap: Beatmap,
    /// Warnings that occurred during parsing, in source order.
    pub warnings: Vec<BeatmapWarning>,
}

/// Parses a complete `.osu` text buffer in one step.
///
/// Either the whole file parses into a usable [`Beatmap`] - possibly with warnings explaining
/// every value that fell back to a default - or a single terminal error with its line position
/// is returned. Nothing partially parsed escapes without a warning.
///
/// # Example
///
/// ```
/// use osu_rs::beatmap::{BeatmapOutput, parse_beatmap};
///
/// let source = "osu file format v14\n\
///     [Metadata]\n\
///     Title: Tsukinami\n\
///     [TimingPoints]\n\
///     0,400,4,2,0,70,1,0\n";
/// let BeatmapOutput { beatmap, warnings } = parse_beatmap(source).expect("parsable");
/// assert_eq!(beatmap.metadata.title.as_deref(), Some("Tsukinami"));
/// assert_eq!(beatmap.timing_points[0].bpm(), Some(150.0));
/// assert!(warnings.is_empty());
/// ```
///
/// # Errors
///
/// Returns the terminal [`parse::ParseError`] cases documented on that type.
pub fn parse_beatmap(source: &str) -> Result<BeatmapOutput, ParseErrorWithPos> {
    let LexOutput {
        tokens,
        lex_warnings,
    } = lex::parse(source);

    let ParseOutput {
        beatmap,
        parse_warnings,
    } = Beatmap::from_token_stream(&tokens)?;

    let mut warnings: Vec<BeatmapWarning> =
        lex_warnings.into_iter().map(BeatmapWarning::Lex).collect();
    warnings.extend(parse_warnings.into_iter().map(BeatmapWarning::Parse));

    Ok(BeatmapOutput { beatmap, warnings })
}

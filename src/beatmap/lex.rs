//! Line-level analyzer of the `.osu` format.
//!
//! Raw [`str`] == [`lex`](self) ==> token lines (in [`LexOutput`]) == parse ==> `Beatmap` (in
//! `BeatmapOutput`).
//!
//! The analyzer performs a single forward pass: it strips a UTF-8 BOM, drops blank and `//`
//! comment lines, and classifies every remaining line as a format-version line, a `[Name]`
//! section header, or a data line of the current section. The contents of data lines are not
//! interpreted here.

mod cursor;
pub mod token;

use thiserror::Error;

use crate::beatmap::mixin::{SourceLineMixin, SourceLineMixinExt};

use self::{
    cursor::Cursor,
    token::{Token, TokenWithPos, format_version, section_header},
};

/// A suspicious line found during lexical analysis.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LexWarning {
    /// A data line appeared before any section header, so it belongs to no section. The line is
    /// ignored.
    #[error("line `{content}` belongs to no section")]
    OrphanedLine {
        /// The ignored line content.
        content: String,
    },
}

/// A lex warning with position information.
pub type LexWarningWithPos = SourceLineMixin<LexWarning>;

/// Lexing results: token lines and warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LexOutput<'a> {
    /// Classified content lines, in file order.
    pub tokens: Vec<TokenWithPos<'a>>,
    /// Warnings found while classifying.
    pub lex_warnings: Vec<LexWarningWithPos>,
}

/// Analyzes the `.osu` format text into classified token lines.
pub fn parse(source: &str) -> LexOutput<'_> {
    let mut cursor = Cursor::new(source);

    let mut tokens = vec![];
    let mut lex_warnings = vec![];
    let mut seen_section = false;
    let mut first = true;
    while let Some((line, range, content)) = cursor.next_content_line() {
        if first {
            first = false;
            if let Some(version) = format_version(content) {
                tokens.push(Token::Format(version).into_wrapper_manual(
                    line,
                    range.start,
                    range.end,
                ));
                continue;
            }
        }
        if let Some(name) = section_header(content) {
            seen_section = true;
            tokens.push(Token::Header(name).into_wrapper_manual(line, range.start, range.end));
        } else if seen_section {
            tokens.push(Token::Data(content).into_wrapper_manual(line, range.start, range.end));
        } else {
            lex_warnings.push(
                LexWarning::OrphanedLine {
                    content: content.to_string(),
                }
                .into_wrapper_manual(line, range.start, range.end),
            );
        }
    }
    LexOutput {
        tokens,
        lex_warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::{LexOutput, LexWarning, parse, token::Token};

    #[test]
    fn classifies_lines() {
        const SRC: &str = "\u{feff}osu file format v14\n\
            // header comment\n\
            [General]\n\
            AudioFilename: audio.mp3\n\
            \n\
            [HitObjects]\n\
            256,192,1000,1,0\n";

        let LexOutput {
            tokens,
            lex_warnings,
        } = parse(SRC);

        assert_eq!(lex_warnings, vec![]);
        let contents: Vec<_> = tokens.iter().map(|t| *t.content()).collect();
        assert_eq!(
            contents,
            vec![
                Token::Format(14),
                Token::Header("General"),
                Token::Data("AudioFilename: audio.mp3"),
                Token::Header("HitObjects"),
                Token::Data("256,192,1000,1,0"),
            ]
        );
    }

    #[test]
    fn orphaned_lines_are_warned_and_dropped() {
        const SRC: &str = "osu file format v14\nstray line\n[General]\nMode: 0\n";

        let LexOutput {
            tokens,
            lex_warnings,
        } = parse(SRC);

        assert_eq!(lex_warnings.len(), 1);
        assert_eq!(
            lex_warnings[0].content(),
            &LexWarning::OrphanedLine {
                content: "stray line".to_string()
            }
        );
        assert_eq!(lex_warnings[0].line(), 2);
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn version_line_only_recognized_first() {
        const SRC: &str = "[General]\nosu file format v14\n";

        let LexOutput { tokens, .. } = parse(SRC);

        assert_eq!(
            tokens.iter().map(|t| *t.content()).collect::<Vec<_>>(),
            vec![Token::Header("General"), Token::Data("osu file format v14")]
        );
    }
}

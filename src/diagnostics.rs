//! Fancy diagnostics support using `ariadne`.
//!
//! Warnings and errors carry their byte span through [`SourceLineMixin`], so this module can
//! hand them to `ariadne` as labeled reports without any extra bookkeeping; ariadne derives the
//! row and column display from the byte offsets itself.

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::beatmap::{
    BeatmapWarning,
    lex::LexWarningWithPos,
    mixin::SourceLineMixin,
    parse::{ParseErrorWithPos, ParseWarningWithPos},
};

/// Simple source container that holds the filename and source text.
///
/// # Usage Example
///
/// ```rust
/// use osu_rs::diagnostics::SimpleSource;
///
/// let source_text = "osu file format v14\n[General]\n";
/// let source = SimpleSource::new("map.osu", source_text);
/// assert_eq!(source.text(), source_text);
/// ```
pub struct SimpleSource<'a> {
    /// Name of the source file.
    name: &'a str,
    /// Source text content.
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Trait for converting positioned warnings and errors to `ariadne::Report`.
pub trait ToAriadne {
    /// Convert to an ariadne Report over `src`.
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

fn labeled_report<'a, T: std::fmt::Display>(
    wrapped: &SourceLineMixin<T>,
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    prefix: &str,
    color: Color,
) -> Report<'a, (String, std::ops::Range<usize>)> {
    let (start, end) = wrapped.as_span();
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), start..end))
        .with_message(format!("{prefix}{}", wrapped.content()))
        .with_label(Label::new((filename, start..end)).with_color(color))
        .finish()
}

impl ToAriadne for LexWarningWithPos {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        labeled_report(self, src, ReportKind::Warning, "lex: ", Color::Yellow)
    }
}

impl ToAriadne for ParseWarningWithPos {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        labeled_report(self, src, ReportKind::Warning, "parse: ", Color::Blue)
    }
}

impl ToAriadne for ParseErrorWithPos {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        labeled_report(self, src, ReportKind::Error, "parse: ", Color::Red)
    }
}

impl ToAriadne for BeatmapWarning {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        match self {
            Self::Lex(warning) => warning.to_report(src),
            Self::Parse(warning) => warning.to_report(src),
        }
    }
}

/// Convenience method: batch render a warning list.
///
/// # Usage Example
///
/// ```rust
/// use osu_rs::beatmap::parse_beatmap;
/// use osu_rs::diagnostics::emit_beatmap_warnings;
///
/// let source = "osu file format v14\n[Whatever]\nkey: value\n";
/// let output = parse_beatmap(source).expect("parsable");
/// emit_beatmap_warnings("map.osu", source, &output.warnings);
/// ```
pub fn emit_beatmap_warnings<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a BeatmapWarning>,
) {
    let simple = SimpleSource::new(name, source);
    let ariadne_source = Source::from(source);
    for warning in warnings {
        let report = warning.to_report(&simple);
        let _ = report.print((name.to_string(), ariadne_source.clone()));
    }
}

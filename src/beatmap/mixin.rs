//! Mixin types for structures.
//!
//! - [`SourceLineMixin`] is a generic wrapper that attaches position information (1-based line
//!   number plus the byte span of the line content) to a value.
//! - [`SourceLineMixinExt`] provides convenient constructors for the wrapper.

/// A generic wrapper that attaches position information to a value.
///
/// The `.osu` format is line oriented, so every warning and error reports the 1-based line it
/// came from. The byte span of the trimmed line content is kept as well, so renderers working on
/// byte offsets (such as `ariadne`) need no separate line table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLineMixin<T> {
    /// Wrapped content value
    content: T,
    /// 1-based line number in the source text
    line: usize,
    /// Start byte index of the line content (inclusive)
    start: usize,
    /// End byte index of the line content (exclusive)
    end: usize,
}

impl<T> SourceLineMixin<T> {
    /// Instances a new `SourceLineMixin`.
    pub const fn new(content: T, line: usize, start: usize, end: usize) -> Self {
        Self {
            content,
            line,
            start,
            end,
        }
    }

    /// Returns the wrapped content.
    pub const fn content(&self) -> &T {
        &self.content
    }

    /// Leans the content out of the wrapper.
    pub fn into_content(self) -> T {
        self.content
    }

    /// Returns the 1-based line number the content came from.
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the start byte index of the source span.
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Returns the end byte index of the source span.
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Returns the source span as a tuple of (start, end).
    pub const fn as_span(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Maps the content of the wrapper, keeping the position.
    pub fn map<U, F>(self, f: F) -> SourceLineMixin<U>
    where
        F: FnOnce(T) -> U,
    {
        SourceLineMixin::new(f(self.content), self.line, self.start, self.end)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for SourceLineMixin<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at line {}", self.content, self.line)
    }
}

impl<T: std::error::Error + 'static> std::error::Error for SourceLineMixin<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.content)
    }
}

/// Extension methods to wrap any value into a [`SourceLineMixin`].
pub trait SourceLineMixinExt {
    /// Instances a new `SourceLineMixin` with the same position as `wrapper`.
    fn into_wrapper<W>(self, wrapper: &SourceLineMixin<W>) -> SourceLineMixin<Self>
    where
        Self: Sized,
    {
        SourceLineMixin::new(self, wrapper.line(), wrapper.start(), wrapper.end())
    }

    /// Instances a new `SourceLineMixin` with a given line number and byte span.
    fn into_wrapper_manual(self, line: usize, start: usize, end: usize) -> SourceLineMixin<Self>
    where
        Self: Sized,
    {
        SourceLineMixin::new(self, line, start, end)
    }
}

impl<T> SourceLineMixinExt for T {}

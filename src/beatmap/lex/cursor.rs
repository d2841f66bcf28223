pub struct Cursor<'a> {
    /// The line position, starts with 1.
    line: usize,
    /// The byte index position.
    index: usize,
    /// The source str.
    source: &'a str,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        // A UTF-8 byte-order marker is not part of any line.
        let index = if source.starts_with('\u{feff}') {
            '\u{feff}'.len_utf8()
        } else {
            0
        };
        Self {
            line: 1,
            index,
            source,
        }
    }

    /// Moves the cursor past the next content line and returns it, trimmed, together with its
    /// 1-based line number and the byte span of the trimmed content.
    ///
    /// Blank lines and `//` comment lines are skipped entirely. Returns [`None`] at the end of
    /// the source.
    pub fn next_content_line(&mut self) -> Option<(usize, std::ops::Range<usize>, &'a str)> {
        while self.index < self.source.len() {
            let line_start = self.index;
            let line_number = self.line;

            let rest = &self.source[line_start..];
            let (mut content_end, next_index) = match rest.find('\n') {
                Some(feed) => (line_start + feed, line_start + feed + 1),
                None => (self.source.len(), self.source.len()),
            };
            // CRLF line endings leave a trailing carriage return before the feed.
            if self.source[line_start..content_end].ends_with('\r') {
                content_end -= 1;
            }
            self.index = next_index;
            self.line += 1;

            let raw = &self.source[line_start..content_end];
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }

            let leading = raw.len() - raw.trim_start().len();
            let start = line_start + leading;
            let end = start + trimmed.len();
            return Some((line_number, start..end, trimmed));
        }
        None
    }
}

#[test]
fn test_content_lines() {
    let mut cursor = Cursor::new("osu file format v14\n\n[General]\r\nAudioFilename: a.mp3");

    let (line, _, content) = cursor.next_content_line().unwrap();
    assert_eq!((line, content), (1, "osu file format v14"));

    let (line, _, content) = cursor.next_content_line().unwrap();
    assert_eq!((line, content), (3, "[General]"));

    let (line, _, content) = cursor.next_content_line().unwrap();
    assert_eq!((line, content), (4, "AudioFilename: a.mp3"));

    assert!(cursor.next_content_line().is_none());
}

#[test]
fn test_bom_and_comments() {
    let mut cursor = Cursor::new("\u{feff}osu file format v14\n// a comment\n[Events]\n");

    let (line, range, content) = cursor.next_content_line().unwrap();
    assert_eq!((line, content), (1, "osu file format v14"));
    assert_eq!(range.start, 3);

    let (line, _, content) = cursor.next_content_line().unwrap();
    assert_eq!((line, content), (3, "[Events]"));

    assert!(cursor.next_content_line().is_none());
}

#[test]
fn test_span_of_indented_line() {
    let mut cursor = Cursor::new("  abc  \ndef");

    let (_, range, content) = cursor.next_content_line().unwrap();
    assert_eq!(content, "abc");
    assert_eq!(range, 2..5);

    let (_, range, content) = cursor.next_content_line().unwrap();
    assert_eq!(content, "def");
    assert_eq!(range, 8..11);
}

use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::MalformedInput;
use crate::escape;

/// Anchor preceding the `[[first, last]]` reference range in an API response.
pub const CHAPTER_RANGE_ANCHOR: &str = "\"parsed\":";

/// Characters left after the final verse of an API response (the `"]}` tail).
pub const DEFAULT_TRAILING_TRIM: usize = 3;

/// One addressable verse of a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verse {
    pub number: u32,
    pub text: String,
}

/// Splits decoded chapter text into numbered verses.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    trailing_trim: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            trailing_trim: DEFAULT_TRAILING_TRIM,
        }
    }
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of characters dropped from the end of the text when the final
    /// verse has no following marker.
    pub fn with_trailing_trim(mut self, chars: usize) -> Self {
        self.trailing_trim = chars;
        self
    }

    /// Decode the escape markers in raw chapter text, then segment it.
    pub fn extract(&self, raw: &str) -> Result<Vec<Verse>, MalformedInput> {
        let decoded = escape::decode(raw)?;
        self.segment(&decoded)
    }

    /// Segment `text` into verses. Numbers whose `[n]` marker is missing are
    /// skipped; the result is always in strictly increasing order.
    pub fn segment(&self, text: &str) -> Result<Vec<Verse>, MalformedInput> {
        let last = last_verse_number(text)?;
        debug!(last, "chapter range located");

        let trimmed_end = trim_end_chars(text, self.trailing_trim);
        let mut verses = Vec::new();

        for number in 1..=last {
            let marker = format!("[{number}]");
            let Some(marker_pos) = text.find(&marker) else {
                debug!(number, "verse marker missing, skipping");
                continue;
            };

            let start = skip_one_char(text, marker_pos + marker.len());
            let next_marker = format!("[{}]", number + 1);
            let end = match text[start..].find(&next_marker) {
                Some(offset) => start + offset,
                None => self.end_without_next_marker(text, start, trimmed_end),
            };

            if end <= start {
                warn!(number, "verse has no text, skipping");
                continue;
            }

            verses.push(Verse {
                number,
                text: text[start..end].to_string(),
            });
        }

        if verses.len() < last as usize {
            let found = verses.iter().map(|v| v.number).collect::<Vec<_>>();
            let missing = (1..=last).filter(|n| !found.contains(n)).join(", ");
            warn!(%missing, "some verses were not found in the chapter text");
        }

        Ok(verses)
    }

    fn end_without_next_marker(&self, text: &str, start: usize, trimmed_end: usize) -> usize {
        match next_bracketed(&text[start..]) {
            Some((offset, interior)) if is_verse_number(interior) => start + offset,
            Some((_, interior)) => {
                debug!(token = interior, "ignoring non-verse bracket");
                trimmed_end
            }
            None => trimmed_end,
        }
    }
}

/// Segment with the default trailing trim.
pub fn segment(text: &str) -> Result<Vec<Verse>, MalformedInput> {
    Segmenter::default().segment(text)
}

/// Read the final verse index from the `"parsed": [[first, last]]` marker.
///
/// The API encodes references as `BBCCCVVV`; anything of four digits or more
/// is reduced to its verse part.
pub fn last_verse_number(text: &str) -> Result<u32, MalformedInput> {
    let anchor = text
        .find(CHAPTER_RANGE_ANCHOR)
        .ok_or(MalformedInput::MissingChapterRange)?;
    let after = text[anchor + CHAPTER_RANGE_ANCHOR.len()..].trim_start();
    let range = after
        .strip_prefix("[[")
        .or_else(|| after.strip_prefix('['))
        .ok_or(MalformedInput::MissingChapterRange)?;

    let field = range
        .split(',')
        .nth(1)
        .ok_or_else(|| invalid_range(range))?
        .trim_start();
    let digits: String = field.chars().take_while(|c| c.is_ascii_digit()).collect();
    let last: u64 = digits.parse().map_err(|_| invalid_range(range))?;

    let verse = if last >= 1000 { last % 1000 } else { last };
    u32::try_from(verse).map_err(|_| invalid_range(range))
}

fn invalid_range(range: &str) -> MalformedInput {
    let found = range.split(']').next().unwrap_or(range);
    MalformedInput::InvalidChapterRange {
        found: found.to_string(),
    }
}

/// The first `[...]` token in `text`: byte offset of `[` and the interior.
fn next_bracketed(text: &str) -> Option<(usize, &str)> {
    let open = text.find('[')?;
    let close = text[open + 1..].find(']')?;
    Some((open, &text[open + 1..open + 1 + close]))
}

// Footnote markers carry letters; a purely numeric one would be mistaken for
// a verse marker.
fn is_verse_number(interior: &str) -> bool {
    !interior.is_empty() && interior.chars().all(|c| c.is_ascii_digit())
}

fn skip_one_char(text: &str, idx: usize) -> usize {
    text[idx..]
        .chars()
        .next()
        .map_or(text.len(), |c| idx + c.len_utf8())
}

fn trim_end_chars(text: &str, chars: usize) -> usize {
    if chars == 0 {
        return text.len();
    }
    text.char_indices()
        .rev()
        .nth(chars - 1)
        .map_or(0, |(idx, _)| idx)
}

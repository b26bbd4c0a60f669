//! Marker grammar for backend responses.
//!
//! A response carries a CV segment and a cover-letter segment, each delimited
//! by a literal comment pair. A segment is the shortest span between the first
//! opening marker and the first closing marker after it, whitespace-trimmed.
//! When either marker of a pair is missing the segment is `None`, never a
//! partial string, and callers treat the raw response as unstructured text.

use std::ops::Range;

pub const CV_START: &str = "<!-- CV_START -->";
pub const CV_END: &str = "<!-- CV_END -->";
pub const COVER_LETTER_START: &str = "<!-- COVER_LETTER_START -->";
pub const COVER_LETTER_END: &str = "<!-- COVER_LETTER_END -->";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerPair {
    pub start: &'static str,
    pub end: &'static str,
}

pub const CV_MARKERS: MarkerPair = MarkerPair {
    start: CV_START,
    end: CV_END,
};

pub const COVER_LETTER_MARKERS: MarkerPair = MarkerPair {
    start: COVER_LETTER_START,
    end: COVER_LETTER_END,
};

/// Fragments extracted from a raw response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResponse {
    pub cv: Option<String>,
    pub cover_letter: Option<String>,
}

impl ParsedResponse {
    /// False when neither marker pair matched.
    pub fn is_structured(&self) -> bool {
        self.cv.is_some() || self.cover_letter.is_some()
    }
}

impl MarkerPair {
    /// Byte range strictly between the markers, untrimmed.
    pub fn inner_range(&self, raw: &str) -> Option<Range<usize>> {
        let open = raw.find(self.start)?;
        let content_start = open + self.start.len();
        let content_end = content_start + raw[content_start..].find(self.end)?;
        Some(content_start..content_end)
    }

    /// The trimmed segment text.
    pub fn extract<'a>(&self, raw: &'a str) -> Option<&'a str> {
        self.inner_range(raw).map(|range| raw[range].trim())
    }

    /// Replaces the segment body with `replacement`, keeping both marker literals
    /// and everything outside them untouched. `None` if the pair is not present.
    pub fn splice(&self, raw: &str, replacement: &str) -> Option<String> {
        let range = self.inner_range(raw)?;
        let mut out = String::with_capacity(raw.len() + replacement.len());
        out.push_str(&raw[..range.start]);
        out.push('\n');
        out.push_str(replacement);
        out.push('\n');
        out.push_str(&raw[range.end..]);
        Some(out)
    }
}

pub fn parse_response(raw: &str) -> ParsedResponse {
    ParsedResponse {
        cv: CV_MARKERS.extract(raw).map(str::to_string),
        cover_letter: COVER_LETTER_MARKERS.extract(raw).map(str::to_string),
    }
}

//! Inline quote markers in debate text
//!
//! Debaters cite the source story with `<u_quote>…</u_quote>` (unverified) and
//! `<v_quote>…</v_quote>` (verified) markers. [`tokenize`] splits a message into
//! typed segments so each kind can be highlighted differently.

use serde::{Deserialize, Serialize};

/// Kind of a text segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Ordinary text, no decoration
    Plain,
    /// Text between `<u_quote>` markers
    UQuote,
    /// Text between `<v_quote>` markers
    VQuote,
}

impl SegmentKind {
    fn open_tag(self) -> &'static str {
        match self {
            SegmentKind::Plain => "",
            SegmentKind::UQuote => "<u_quote>",
            SegmentKind::VQuote => "<v_quote>",
        }
    }

    fn close_tag(self) -> &'static str {
        match self {
            SegmentKind::Plain => "",
            SegmentKind::UQuote => "</u_quote>",
            SegmentKind::VQuote => "</v_quote>",
        }
    }

    /// Is this a quote segment?
    pub fn is_quote(self) -> bool {
        !matches!(self, SegmentKind::Plain)
    }
}

/// A run of text sharing one [`SegmentKind`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub content: String,
}

impl Segment {
    fn new(kind: SegmentKind, content: &str) -> Self {
        Self {
            kind,
            content: content.to_string(),
        }
    }
}

const QUOTE_KINDS: [SegmentKind; 2] = [SegmentKind::UQuote, SegmentKind::VQuote];

/// Split `text` into plain and quoted segments.
///
/// Markers do not nest: inside an open quote only the closing tag of the same
/// kind ends the segment, every other marker is kept as literal text. An
/// opening marker that is never closed is flushed as plain text together with
/// the marker itself, so nothing in the input is lost.
///
/// ```
/// use rostrum_core::quote::{tokenize, SegmentKind};
///
/// let segments = tokenize("See <v_quote>the door was open</v_quote> here.");
/// assert_eq!(segments.len(), 3);
/// assert_eq!(segments[1].kind, SegmentKind::VQuote);
/// assert_eq!(segments[1].content, "the door was open");
/// ```
pub fn tokenize(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    // Start of the pending plain run
    let mut plain_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('<') {
        let at = cursor + offset;
        let rest = &text[at..];

        let Some(kind) = QUOTE_KINDS
            .into_iter()
            .find(|kind| rest.starts_with(kind.open_tag()))
        else {
            cursor = at + 1;
            continue;
        };

        let body_start = at + kind.open_tag().len();
        let Some(body_len) = text[body_start..].find(kind.close_tag()) else {
            // Unterminated: leave it in the plain run
            break;
        };

        if plain_start < at {
            segments.push(Segment::new(SegmentKind::Plain, &text[plain_start..at]));
        }
        let body_end = body_start + body_len;
        segments.push(Segment::new(kind, &text[body_start..body_end]));

        cursor = body_end + kind.close_tag().len();
        plain_start = cursor;
    }

    if plain_start < text.len() {
        segments.push(Segment::new(SegmentKind::Plain, &text[plain_start..]));
    }

    segments
}

/// Remove balanced quote markers, keeping their content
pub fn strip_markers(text: &str) -> String {
    tokenize(text).into_iter().map(|s| s.content).collect()
}

//! Conditional anchor scanning - the `[passed|failed](?condition)` micro-grammar.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Matches one conditional anchor: `[` passed `|` failed `]` `(?` condition `)`.
///
/// The passed and failed alternatives are maximal runs excluding `]` and
/// `|`; the condition name is a maximal run excluding `)`. Anchor-like text
/// that does not complete the shape (a missing `(?...)` marker, a second
/// `|` inside the brackets) never matches and stays literal.
static ANCHOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]|]*)\|([^\]|]*)\]\(\?([^)]*)\)").unwrap());

/// One conditional anchor occurrence in a piece of scene text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Text substituted when the condition holds.
    pub passed_text: String,

    /// Text substituted when the condition does not hold.
    pub failed_text: String,

    /// Name of the condition gating this anchor. The scanner reports empty
    /// names as-is; the expander rejects them.
    pub condition: String,

    /// Byte range of the full anchor markup in the scanned text.
    pub span: Range<usize>,
}

impl Anchor {
    /// The exact markup this anchor was scanned from.
    ///
    /// Reconstructed verbatim from the captures, so the caller can locate
    /// and substitute the anchor in text whose offsets have shifted since
    /// scanning.
    pub fn markup(&self) -> String {
        format!(
            "[{}|{}](?{})",
            self.passed_text, self.failed_text, self.condition
        )
    }
}

/// Scan text for conditional anchors, in order of first character offset.
///
/// The returned iterator is lazy and finite; scanning the same text again
/// restarts from the beginning. Anchors never nest: scanning resumes after
/// the end of each match, and anchor syntax inside a passed or failed
/// alternative is not recognized.
pub fn scan_anchors(text: &str) -> impl Iterator<Item = Anchor> + '_ {
    ANCHOR_REGEX.captures_iter(text).map(|caps| {
        let markup = caps.get(0).unwrap();
        Anchor {
            passed_text: caps[1].to_string(),
            failed_text: caps[2].to_string(),
            condition: caps[3].to_string(),
            span: markup.range(),
        }
    })
}

/// Check whether text still contains anchor markup.
pub fn contains_anchor(text: &str) -> bool {
    ANCHOR_REGEX.is_match(text)
}

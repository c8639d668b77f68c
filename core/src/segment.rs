//! Event-based segmentation of cleaned text.
//!
//! A line mentioning an event marker (battle, war, clash, "took place", ...)
//! opens a new segment; the lines after it belong to that segment until the
//! next marker. Each segment is then handed to the triple generator on its
//! own, which keeps long narratives within one event per request.

use crate::text::normalize_arabic;

/// Built-in Arabic event markers.
pub const DEFAULT_MARKERS: &[&str] = &[
    "معركة", "أحداث", "حرب", "اشتباك", "صراع", "وقعت", "اندلعت", "حدثت", "اجتياح", "عملية",
    "اغتيال",
];

/// Splits text into ordered segments at event-marker lines.
///
/// Markers are stored in normalized form, so a marker written with Ta
/// Marbuta or Hamza still matches text that went through
/// [`crate::text::clean_text`].
#[derive(Debug, Clone)]
pub struct EventSegmenter {
    markers: Vec<String>,
}

impl Default for EventSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_MARKERS.iter().copied())
    }
}

impl EventSegmenter {
    /// Creates a segmenter with exactly the given markers.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for marker in markers {
            let marker = normalize_arabic(marker.as_ref().trim());
            if !marker.is_empty() && !normalized.contains(&marker) {
                normalized.push(marker);
            }
        }
        Self {
            markers: normalized,
        }
    }

    /// Creates a segmenter with the built-in markers plus `extra`.
    pub fn with_extra_markers<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let builtin = DEFAULT_MARKERS.iter().map(|m| (*m).to_owned());
        let extra = extra.into_iter().map(|m| m.as_ref().to_owned());
        Self::new(builtin.chain(extra))
    }

    /// The normalized marker terms.
    #[must_use]
    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Returns `true` if `line` contains any marker.
    #[must_use]
    pub fn is_marker_line(&self, line: &str) -> bool {
        let line = normalize_arabic(line);
        self.markers.iter().any(|m| line.contains(m.as_str()))
    }

    /// Splits `text` into segments.
    ///
    /// Lines keep their order and content; every returned segment is
    /// trimmed and non-empty. Text without a marker comes back as a single
    /// segment (the whole trimmed text), and blank text yields none.
    #[must_use]
    pub fn segment(&self, text: &str) -> Vec<String> {
        let mut groups: Vec<Vec<&str>> = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.split('\n') {
            if self.is_marker_line(line) && !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            current.push(line);
        }
        if !current.is_empty() {
            groups.push(current);
        }

        let segments: Vec<String> = groups
            .into_iter()
            .map(|lines| lines.join("\n").trim().to_owned())
            .filter(|seg| !seg.is_empty())
            .collect();
        tracing::debug!(segments = segments.len(), "segmented text");
        segments
    }
}

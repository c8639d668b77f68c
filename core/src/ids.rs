//! Canonical identifiers for graph nodes and RDF resources.
//!
//! Two kinds of identifier exist. Slugs are a pure function of a label and
//! are used for objects and graph nodes. Event ids (`Event_1`, `Event_2`,
//! ...) are handed out in first-seen order by an [`EventIdAssigner`] that
//! lives for one build or export call only.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

/// Makes an IRI-safe slug: NFC, then spaces and path separators become `_`.
///
/// Arabic letters are kept as they are; Turtle and N-Triples both accept
/// them in IRIs.
#[must_use]
pub fn slug(label: &str) -> String {
    label
        .nfc()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

/// Slug of a trimmed entity label, used for subjects and objects alike.
#[must_use]
pub fn canonical_entity(label: &str) -> String {
    slug(label.trim())
}

/// Formats the `n`-th event id.
#[must_use]
pub fn event_id(n: usize) -> String {
    format!("Event_{n}")
}

/// Hands out `Event_<n>` ids for one build or export run.
///
/// Numbers start at 1, increase by one per id and are never reused.
/// [`EventIdAssigner::event_id_for`] remembers subjects, so the first
/// distinct subject seen gets the lowest number.
#[derive(Debug, Default, Clone)]
pub struct EventIdAssigner {
    issued: usize,
    by_subject: HashMap<String, String>,
}

impl EventIdAssigner {
    /// Creates an assigner whose first id is `Event_1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next unused id.
    pub fn next_event_id(&mut self) -> String {
        self.issued += 1;
        event_id(self.issued)
    }

    /// Returns the id already given to `subject`, or issues a new one.
    pub fn event_id_for(&mut self, subject: &str) -> String {
        if let Some(id) = self.by_subject.get(subject) {
            return id.clone();
        }
        let id = self.next_event_id();
        self.by_subject.insert(subject.to_owned(), id.clone());
        id
    }

    /// Number of ids issued so far.
    #[must_use]
    pub fn issued(&self) -> usize {
        self.issued
    }
}

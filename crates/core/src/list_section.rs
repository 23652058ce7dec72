//! Local-only list mini-sections (allergies, conditions, medications, labs, concerns).
//!
//! Entries are bare strings identified only by position. Nothing here talks to the
//! collaborator: a list lives and dies with the page that owns it.

use blueprint_types::NonEmptyText;
use std::fmt;

/// Which mini-section a list represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListKind {
    Allergies,
    Conditions,
    Medications,
    Labs,
    Concerns,
}

impl ListKind {
    pub const ALL: [ListKind; 5] = [
        ListKind::Allergies,
        ListKind::Conditions,
        ListKind::Medications,
        ListKind::Labs,
        ListKind::Concerns,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ListKind::Allergies => "Allergies",
            ListKind::Conditions => "Conditions",
            ListKind::Medications => "Medications",
            ListKind::Labs => "Lab Results",
            ListKind::Concerns => "Concerns",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            ListKind::Allergies => "No allergies recorded",
            ListKind::Conditions => "No conditions recorded",
            ListKind::Medications => "No medications recorded",
            ListKind::Labs => "No lab results recorded",
            ListKind::Concerns => "No concerns recorded",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// An ordered list of free-text entries.
///
/// Insertion order is preserved and duplicates are allowed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListSection {
    kind: ListKind,
    items: Vec<NonEmptyText>,
}

impl ListSection {
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    /// Append `input` if it has content after trimming.
    ///
    /// Returns `false` (and leaves the list untouched) for blank input.
    pub fn add(&mut self, input: &str) -> bool {
        match NonEmptyText::new(input) {
            Ok(item) => {
                self.items.push(item);
                true
            }
            Err(_) => false,
        }
    }

    /// Remove the entry at `index`, returning it. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<NonEmptyText> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn items(&self) -> &[NonEmptyText] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

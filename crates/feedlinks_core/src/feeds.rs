use serde::{Deserialize, Serialize};
use std::fmt;

/// The two syndication formats a feed link can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Rss,
    Atom,
}

impl FeedKind {
    /// Classify a `type` attribute value. The value is lower-cased before
    /// comparing, since HTML content types are case-insensitive.
    pub fn from_mime_type(value: &str) -> Option<Self> {
        let lowered = value.to_lowercase();
        if lowered == Self::Rss.mime_type() {
            Some(Self::Rss)
        } else if lowered == Self::Atom.mime_type() {
            Some(Self::Atom)
        } else {
            None
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            FeedKind::Rss => "application/rss+xml",
            FeedKind::Atom => "application/atom+xml",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::Rss => write!(f, "rss"),
            FeedKind::Atom => write!(f, "atom"),
        }
    }
}

/// Feed hrefs found in one document, split by kind.
///
/// Entries keep insertion order and are neither validated nor deduplicated.
/// Field order is the serialized key order: `rss` first, then `atom`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCollection {
    rss: Vec<String>,
    atom: Vec<String>,
}

impl FeedCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: FeedKind, href: impl Into<String>) {
        match kind {
            FeedKind::Rss => self.rss.push(href.into()),
            FeedKind::Atom => self.atom.push(href.into()),
        }
    }

    pub fn add_rss(&mut self, href: impl Into<String>) {
        self.add(FeedKind::Rss, href);
    }

    pub fn add_atom(&mut self, href: impl Into<String>) {
        self.add(FeedKind::Atom, href);
    }

    pub fn rss(&self) -> &[String] {
        &self.rss
    }

    pub fn atom(&self) -> &[String] {
        &self.atom
    }

    pub fn len(&self) -> usize {
        self.rss.len() + self.atom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rss.is_empty() && self.atom.is_empty()
    }
}

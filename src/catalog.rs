// catalog.rs — the list of selectable panoramas

use std::fmt;
use std::path::Path;

/// Panoramas shipped with the tour.
pub const DEFAULT_IMAGES: [&str; 5] = [
    "images/elevation.webp",
    "images/livingroom.webp",
    "images/kamalsir.jpeg",
    "images/kitchen2.jpg",
    "images/hall.webp",
];

pub const DEFAULT_INITIAL_IMAGE: &str = "images/kitchen2.jpg";

/// Identifies a panorama by its image source (path or URI).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn source(&self) -> &str {
        &self.0
    }

    /// Short name for thumbnails and the status bar: the file stem, or the
    /// whole source when it has none.
    pub fn label(&self) -> &str {
        Path::new(&self.0)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(source: &str) -> Self {
        Self::new(source)
    }
}

/// Ordered, duplicate-free list of panoramas the user can pick from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCatalog {
    entries: Vec<ImageId>,
}

impl ImageCatalog {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ImageId>,
    {
        let mut catalog = Self { entries: Vec::new() };
        for entry in entries {
            catalog.insert(entry.into());
        }
        catalog
    }

    pub fn entries(&self) -> &[ImageId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &ImageId) -> bool {
        self.entries.contains(id)
    }

    pub fn position(&self, id: &ImageId) -> Option<usize> {
        self.entries.iter().position(|e| e == id)
    }

    /// Adds `id` unless it is already listed. Returns the catalog's copy.
    pub fn insert(&mut self, id: ImageId) -> &ImageId {
        let index = match self.position(&id) {
            Some(i) => i,
            None => {
                self.entries.push(id);
                self.entries.len() - 1
            }
        };
        &self.entries[index]
    }

    /// Entry after `id`, wrapping around. Unknown ids start from the front.
    pub fn next_after(&self, id: &ImageId) -> Option<&ImageId> {
        if self.entries.is_empty() {
            return None;
        }
        let next = self.position(id).map_or(0, |i| (i + 1) % self.entries.len());
        self.entries.get(next)
    }

    /// Entry before `id`, wrapping around. Unknown ids start from the back.
    pub fn previous_before(&self, id: &ImageId) -> Option<&ImageId> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        let prev = self.position(id).map_or(len - 1, |i| (i + len - 1) % len);
        self.entries.get(prev)
    }
}

impl Default for ImageCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGES)
    }
}

//! File attachments and upload slots

use crate::error::Result;
use serde::Serialize;
use std::path::Path;

const MIB: f64 = 1024.0 * 1024.0;

/// A selected file, held in memory until submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// Original file name (no directory part)
    pub name: String,

    pub size_bytes: u64,

    #[serde(skip)]
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size_bytes: content.len() as u64,
            content,
        }
    }

    /// Read a file from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(name, content))
    }

    /// MIME type guessed from the file name
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .to_string()
    }

    /// Size in megabytes with two decimals, e.g. `0.50 MB`
    pub fn display_size(&self) -> String {
        format!("{:.2} MB", self.size_bytes as f64 / MIB)
    }
}

/// The current selection of one file input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttachmentSlot {
    Single(Option<Attachment>),
    Multi(Vec<Attachment>),
}

impl AttachmentSlot {
    pub fn empty(multiple: bool) -> Self {
        if multiple {
            AttachmentSlot::Multi(Vec::new())
        } else {
            AttachmentSlot::Single(None)
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, AttachmentSlot::Multi(_))
    }

    /// Apply a selection event
    ///
    /// An empty selection leaves the slot untouched, like a cancelled file
    /// picker. Otherwise a single slot takes the first file and a multi slot
    /// replaces its whole list.
    pub fn select(&mut self, files: Vec<Attachment>) {
        if files.is_empty() {
            return;
        }

        match self {
            AttachmentSlot::Single(current) => {
                *current = files.into_iter().next();
            }
            AttachmentSlot::Multi(current) => {
                *current = files;
            }
        }
    }

    /// Remove the file at `index`
    ///
    /// Out-of-range indices (including any index on an empty slot) are a
    /// no-op returning `None`. A single slot only has index 0.
    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        match self {
            AttachmentSlot::Single(current) if index == 0 => current.take(),
            AttachmentSlot::Single(_) => None,
            AttachmentSlot::Multi(current) if index < current.len() => Some(current.remove(index)),
            AttachmentSlot::Multi(_) => None,
        }
    }

    pub fn clear(&mut self) {
        match self {
            AttachmentSlot::Single(current) => *current = None,
            AttachmentSlot::Multi(current) => current.clear(),
        }
    }

    /// The file sent on submit
    pub fn first(&self) -> Option<&Attachment> {
        self.files().first()
    }

    pub fn files(&self) -> &[Attachment] {
        match self {
            AttachmentSlot::Single(current) => current.as_slice(),
            AttachmentSlot::Multi(current) => current,
        }
    }

    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: usize) -> Attachment {
        Attachment::new(name, vec![0u8; size])
    }

    fn names(slot: &AttachmentSlot) -> Vec<&str> {
        slot.files().iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_single_select_replaces() {
        let mut slot = AttachmentSlot::empty(false);
        slot.select(vec![file("a.png", 10)]);
        slot.select(vec![file("b.png", 10), file("c.png", 10)]);
        assert_eq!(names(&slot), vec!["b.png"]);
    }

    #[test]
    fn test_empty_selection_keeps_previous() {
        let mut slot = AttachmentSlot::empty(false);
        slot.select(vec![file("a.png", 10)]);
        slot.select(Vec::new());
        assert_eq!(names(&slot), vec!["a.png"]);

        let mut multi = AttachmentSlot::empty(true);
        multi.select(vec![file("a.png", 10), file("b.png", 10)]);
        multi.select(Vec::new());
        assert_eq!(multi.len(), 2);
    }

    #[test]
    fn test_multi_select_replaces_list() {
        let mut slot = AttachmentSlot::empty(true);
        slot.select(vec![file("a.png", 1), file("b.png", 1)]);
        slot.select(vec![file("c.png", 1)]);
        assert_eq!(names(&slot), vec!["c.png"]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut slot = AttachmentSlot::empty(true);
        slot.select(vec![
            file("a.png", 1),
            file("b.png", 1),
            file("c.png", 1),
            file("d.png", 1),
        ]);

        let removed = slot.remove(1);
        assert_eq!(removed.map(|f| f.name), Some("b.png".to_string()));
        assert_eq!(names(&slot), vec!["a.png", "c.png", "d.png"]);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut slot = AttachmentSlot::empty(true);
        assert!(slot.remove(0).is_none());

        slot.select(vec![file("a.png", 1)]);
        assert!(slot.remove(3).is_none());
        assert_eq!(slot.len(), 1);

        let mut single = AttachmentSlot::empty(false);
        assert!(single.remove(0).is_none());
        single.select(vec![file("a.png", 1)]);
        assert!(single.remove(1).is_none());
        assert!(single.remove(0).is_some());
        assert!(single.is_empty());
    }

    #[test]
    fn test_display_size() {
        assert_eq!(file("a.png", 512 * 1024).display_size(), "0.50 MB");
        assert_eq!(file("a.png", 3 * 1024 * 1024).display_size(), "3.00 MB");
    }

    #[test]
    fn test_from_path_reads_name_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"jpegdata").unwrap();

        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.name, "photo.jpg");
        assert_eq!(attachment.size_bytes, 8);
        assert_eq!(attachment.mime_type(), "image/jpeg");
    }
}

//! Session metadata persisted next to each uploaded document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sidecar metadata for one editing session.
///
/// `pages` holds original 1-based page numbers in current document order,
/// so the UI can keep labelling each page by where it came from after
/// deletes and moves have shuffled positions around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    /// Original filename stem, without the .pdf extension
    pub filename: String,
    pub pages: Vec<u32>,
    pub uploaded_at: DateTime<Utc>,
}

impl SessionMeta {
    pub fn new(filename: &str, page_count: u32) -> Self {
        Self {
            filename: filename.to_string(),
            pages: (1..=page_count).collect(),
            uploaded_at: Utc::now(),
        }
    }

    /// Fallback when the sidecar is missing or out of sync with the
    /// document: label pages by their current position.
    pub fn fallback(page_count: u32) -> Self {
        Self::new("document", page_count)
    }

    /// Mirror a page deletion in the label list.
    pub fn delete_page(&mut self, page: u32) {
        let idx = (page - 1) as usize;
        if idx < self.pages.len() {
            self.pages.remove(idx);
        }
    }

    /// Mirror a page move (pop-and-insert) in the label list.
    pub fn move_page(&mut self, from: u32, to: u32) {
        let from = (from - 1) as usize;
        let to = (to - 1) as usize;
        if from < self.pages.len() && to < self.pages.len() {
            let label = self.pages.remove(from);
            self.pages.insert(to, label);
        }
    }

    pub fn download_name(&self) -> String {
        format!("{}_edited.pdf", self.filename)
    }
}

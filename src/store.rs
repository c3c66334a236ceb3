use crate::error::StoreError;
use crate::model::Bookmark;
use std::sync::{Mutex, MutexGuard};

/// In-memory bookmark collection, kept in insertion order.
///
/// Every operation takes the single lock for its whole duration, so reads and
/// writes from concurrent requests never interleave inside one operation.
/// Lookups are linear scans over the list.
pub struct BookmarkStore {
    bookmarks: Mutex<Vec<Bookmark>>,
}

impl BookmarkStore {
    pub fn new() -> Self {
        Self {
            bookmarks: Mutex::new(Vec::new()),
        }
    }

    pub fn with_seed(seed: Vec<Bookmark>) -> Result<Self, StoreError> {
        let store = Self::new();
        for bookmark in seed {
            store.append(bookmark)?;
        }
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Bookmark>>, StoreError> {
        self.bookmarks
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))
    }

    pub fn list(&self) -> Result<Vec<Bookmark>, StoreError> {
        Ok(self.lock()?.clone())
    }

    pub fn find(&self, id: &str) -> Result<Option<Bookmark>, StoreError> {
        let bookmarks = self.lock()?;
        Ok(bookmarks.iter().find(|b| b.id == id).cloned())
    }

    pub fn append(&self, bookmark: Bookmark) -> Result<Bookmark, StoreError> {
        let mut bookmarks = self.lock()?;
        if bookmarks.iter().any(|b| b.id == bookmark.id) {
            return Err(StoreError::DuplicateId(bookmark.id));
        }
        bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    /// Removes the first bookmark with `id`, keeping the rest in order.
    pub fn remove(&self, id: &str) -> Result<Option<Bookmark>, StoreError> {
        let mut bookmarks = self.lock()?;
        match bookmarks.iter().position(|b| b.id == id) {
            Some(index) => Ok(Some(bookmarks.remove(index))),
            None => Ok(None),
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }
}

impl Default for BookmarkStore {
    fn default() -> Self {
        Self::new()
    }
}

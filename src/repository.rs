use std::future::Future;

use anyhow::Result;

use crate::model::{Bookmark, NewBookmark};

/// Storage the bookmarks controller works against.
///
/// Implementations serialize their own access; the controller treats every
/// call as consistent with the previous one within a request.
pub trait BookmarkRepository: Send + Sync {
    fn get(&self, id: i64) -> impl Future<Output = Result<Option<Bookmark>>> + Send;

    /// All bookmarks in insertion order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Bookmark>>> + Send;

    /// Inserts `bookmark` and returns it with its assigned id.
    fn add(&self, bookmark: NewBookmark) -> impl Future<Output = Result<Bookmark>> + Send;

    /// Returns `false` when no bookmark has `bookmark.id`.
    fn update(&self, bookmark: Bookmark) -> impl Future<Output = Result<bool>> + Send;

    /// Returns `false` when no bookmark has `id`.
    fn remove(&self, id: i64) -> impl Future<Output = Result<bool>> + Send;
}

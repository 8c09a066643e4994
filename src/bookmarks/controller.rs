use serde_json::{Map, Value};

use super::query::{self, BookmarkQuery};
use crate::api::{Responder, send_once};
use crate::config::Locale;
use crate::error::{ApiError, Detail};
use crate::model::{Bookmark, NewBookmark};
use crate::repository::BookmarkRepository;

/// Operations listed for a bare `GET /api/bookmarks?`: English label,
/// French label, path template.
const OPERATIONS: &[(&str, &str, &str)] = &[
    (
        "Returns the bookmark with this name (GET)",
        "Retourne le signet portant ce nom (GET)",
        "/api/bookmarks?name=name",
    ),
    (
        "Returns the bookmarks in this category (GET)",
        "Retourne les signets de cette catégorie (GET)",
        "/api/bookmarks?category=category",
    ),
    (
        "Returns the bookmarks sorted by name or category (GET)",
        "Retourne les signets triés par nom ou catégorie (GET)",
        "/api/bookmarks?sort=name",
    ),
    (
        "Returns the bookmark with this id (GET)",
        "Retourne le signet avec cet id (GET)",
        "/api/bookmarks/id",
    ),
    ("Adds a bookmark (POST)", "Ajoute un signet (POST)", "/api/bookmarks"),
    (
        "Updates the bookmark with this id (PUT)",
        "Modifie le signet avec cet id (PUT)",
        "/api/bookmarks/id",
    ),
    (
        "Removes the bookmark with this id (DELETE)",
        "Enlève le signet avec cet id (DELETE)",
        "/api/bookmarks/id",
    ),
];

pub fn capabilities(locale: Locale) -> Vec<Value> {
    let operations = OPERATIONS
        .iter()
        .map(|(en, fr, path)| {
            let label = match locale {
                Locale::En => en,
                Locale::Fr => fr,
            };
            (label.to_string(), Value::from(*path))
        })
        .collect::<Map<String, Value>>();
    vec![Value::Object(operations)]
}

/// Path ids that are not integers name no bookmark.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::NotFound(Detail::NoBookmarkWithId))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update { id: i64 },
}

pub struct BookmarksController<'a, R> {
    repo: &'a R,
}

impl<'a, R: BookmarkRepository> BookmarksController<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// `GET /api/bookmarks[/id][?query]`.
    ///
    /// `raw_query` is `None` when the request had no `?` at all and
    /// `Some("")` for a bare `?`, which asks for the capability listing.
    pub async fn get(&self, id: Option<i64>, raw_query: Option<&str>, res: &mut Responder) {
        if let Some(id) = id {
            return self.get_one(id, res).await;
        }

        if raw_query == Some("") {
            let listing = capabilities(res.locale());
            send_once(res.json(&listing));
            return;
        }

        let params = match BookmarkQuery::parse(raw_query.unwrap_or_default()) {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting undecodable bookmark query");
                send_once(res.json_error(ApiError::Validation(Detail::UnknownParameterKey)));
                return;
            }
        };
        if params.has_unknown_keys() {
            tracing::warn!(
                supplied = params.supplied(),
                applied = params.applied(),
                "rejecting bookmark query with unknown parameter keys"
            );
            send_once(res.json_error(ApiError::Validation(Detail::UnknownParameterKey)));
            return;
        }

        let Some(mut bookmarks) = self.all(res).await else {
            return;
        };

        if let Some(name) = params.name.as_deref().filter(|s| !s.is_empty()) {
            bookmarks = query::search_by_name(name, bookmarks);
        }

        if let Some(category) = params.category.as_deref().filter(|s| !s.is_empty()) {
            bookmarks = query::search_by_category(category, bookmarks);
        }

        if params.sorts() {
            let Some(fields) = query::parse_sort_fields(&params.sort) else {
                tracing::warn!(sort = ?params.sort, "rejecting invalid sort value");
                send_once(res.json_error(ApiError::Validation(Detail::InvalidSortValue)));
                return;
            };
            bookmarks = query::sort(&fields, bookmarks);
        }

        tracing::info!(count = bookmarks.len(), "listed bookmarks");
        send_once(res.json(&bookmarks));
    }

    async fn get_one(&self, id: i64, res: &mut Responder) {
        match self.repo.get(id).await {
            Ok(Some(bookmark)) => send_once(res.json(&bookmark)),
            Ok(None) => send_once(res.json_error(ApiError::NotFound(Detail::NoBookmarkWithId))),
            Err(e) => {
                tracing::error!(id, "failed to get bookmark: {:#}", e);
                send_once(res.json_error(ApiError::Internal(Detail::StorageUnavailable)));
            }
        }
    }

    async fn all(&self, res: &mut Responder) -> Option<Vec<Bookmark>> {
        match self.repo.get_all().await {
            Ok(bookmarks) => Some(bookmarks),
            Err(e) => {
                tracing::error!("failed to list bookmarks: {:#}", e);
                send_once(res.json_error(ApiError::Internal(Detail::StorageUnavailable)));
                None
            }
        }
    }

    /// `POST /api/bookmarks`.
    pub async fn post(&self, bookmark: NewBookmark, res: &mut Responder) {
        let bookmark = normalize(bookmark);
        if !self.validate(&bookmark, WriteMode::Create, res).await {
            return;
        }

        match self.repo.add(bookmark).await {
            Ok(created) => {
                tracing::info!(id = created.id, "bookmark added");
                send_once(res.created(&created));
            }
            Err(e) => {
                tracing::error!("failed to add bookmark: {:#}", e);
                send_once(res.json_error(ApiError::Internal(Detail::CouldNotBeAdded)));
            }
        }
    }

    /// `PUT /api/bookmarks/{id}`. The path id wins; a body `Id` that
    /// disagrees with it is rejected.
    pub async fn put(&self, id: i64, bookmark: NewBookmark, res: &mut Responder) {
        if bookmark.id.is_some_and(|body_id| body_id != id) {
            send_once(res.json_error(ApiError::Validation(Detail::IdMismatch)));
            return;
        }

        let bookmark = normalize(bookmark);
        if !self.validate(&bookmark, WriteMode::Update { id }, res).await {
            return;
        }

        match self.repo.update(bookmark.with_id(id)).await {
            Ok(true) => {
                tracing::info!(id, "bookmark updated");
                send_once(res.ok());
            }
            Ok(false) => send_once(res.json_error(ApiError::NotFound(Detail::NoBookmarkWithId))),
            Err(e) => {
                tracing::error!(id, "failed to update bookmark: {:#}", e);
                send_once(res.json_error(ApiError::Internal(Detail::Unexpected)));
            }
        }
    }

    /// `DELETE /api/bookmarks/{id}`.
    pub async fn remove(&self, id: i64, res: &mut Responder) {
        match self.repo.remove(id).await {
            Ok(true) => {
                tracing::info!(id, "bookmark removed");
                send_once(res.accepted());
            }
            Ok(false) => send_once(res.json_error(ApiError::NotFound(Detail::NoBookmarkWithId))),
            Err(e) => {
                tracing::error!(id, "failed to remove bookmark: {:#}", e);
                send_once(res.json_error(ApiError::Internal(Detail::Unexpected)));
            }
        }
    }

    /// Checks blank fields and name uniqueness. On failure the error has
    /// already been sent and `false` is returned.
    ///
    /// An update may keep (or re-case) its own name: only another bookmark
    /// holding the name counts as a duplicate. An update of a missing id
    /// passes so the update itself can answer 404.
    pub async fn validate(&self, bookmark: &NewBookmark, mode: WriteMode, res: &mut Responder) -> bool {
        let blank = [&bookmark.name, &bookmark.url, &bookmark.category]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank {
            send_once(res.json_error(ApiError::Validation(Detail::BlankField)));
            return false;
        }

        let Some(bookmarks) = self.all(res).await else {
            return false;
        };
        let wanted = bookmark.name.trim().to_lowercase();
        let mut same_name = bookmarks
            .iter()
            .filter(|b| b.name.trim().to_lowercase() == wanted);

        let duplicate = match mode {
            WriteMode::Create => same_name.next().is_some(),
            WriteMode::Update { id } => match self.repo.get(id).await {
                Ok(Some(_)) => same_name.any(|b| b.id != id),
                Ok(None) => false,
                Err(e) => {
                    tracing::error!(id, "failed to get bookmark: {:#}", e);
                    send_once(res.json_error(ApiError::Internal(Detail::StorageUnavailable)));
                    return false;
                }
            },
        };

        if duplicate {
            tracing::warn!(name = %bookmark.name, "rejecting duplicate bookmark name");
            send_once(res.json_error(ApiError::Validation(Detail::DuplicateName)));
            return false;
        }
        true
    }
}

fn normalize(bookmark: NewBookmark) -> NewBookmark {
    NewBookmark {
        id: bookmark.id,
        name: bookmark.name.trim().to_owned(),
        url: bookmark.url.trim().to_owned(),
        category: bookmark.category.trim().to_owned(),
    }
}

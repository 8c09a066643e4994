//! HTTP handlers for the bookmarks API

use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};

use super::controller::{BookmarksController, parse_id};
use crate::api::{Responder, send_once};
use crate::error::{ApiError, Detail};
use crate::handler::AppState;
use crate::model::NewBookmark;

fn body_or_reject(
    payload: Result<Json<NewBookmark>, JsonRejection>,
    res: &mut Responder,
) -> Option<NewBookmark> {
    match payload {
        Ok(Json(bookmark)) => Some(bookmark),
        Err(e) => {
            tracing::warn!("rejecting bookmark body: {}", e.body_text());
            send_once(res.json_error(ApiError::Validation(Detail::InvalidBody)));
            None
        }
    }
}

fn id_or_reject(raw: &str, res: &mut Responder) -> Option<i64> {
    match parse_id(raw) {
        Ok(id) => Some(id),
        Err(e) => {
            send_once(res.json_error(e));
            None
        }
    }
}

pub async fn list_bookmarks(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let mut res = Responder::new(state.locale);
    BookmarksController::new(state.db.as_ref())
        .get(None, query.as_deref(), &mut res)
        .await;
    res.into_response()
}

pub async fn get_bookmark(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut res = Responder::new(state.locale);
    if let Some(id) = id_or_reject(&id, &mut res) {
        BookmarksController::new(state.db.as_ref())
            .get(Some(id), None, &mut res)
            .await;
    }
    res.into_response()
}

pub async fn create_bookmark(
    State(state): State<AppState>,
    payload: Result<Json<NewBookmark>, JsonRejection>,
) -> Response {
    let mut res = Responder::new(state.locale);
    if let Some(bookmark) = body_or_reject(payload, &mut res) {
        BookmarksController::new(state.db.as_ref())
            .post(bookmark, &mut res)
            .await;
    }
    res.into_response()
}

pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewBookmark>, JsonRejection>,
) -> Response {
    let mut res = Responder::new(state.locale);
    let Some(id) = id_or_reject(&id, &mut res) else {
        return res.into_response();
    };
    if let Some(bookmark) = body_or_reject(payload, &mut res) {
        BookmarksController::new(state.db.as_ref())
            .put(id, bookmark, &mut res)
            .await;
    }
    res.into_response()
}

pub async fn delete_bookmark(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut res = Responder::new(state.locale);
    if let Some(id) = id_or_reject(&id, &mut res) {
        BookmarksController::new(state.db.as_ref())
            .remove(id, &mut res)
            .await;
    }
    res.into_response()
}

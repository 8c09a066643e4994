use axum::{Router, routing::get};

use crate::handler::{AppState, healthcheck};

pub mod api;
pub mod bookmarks;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod model;
pub mod repository;

/// Every route the service answers, without transport layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(healthcheck))
        .nest("/api/bookmarks", bookmarks::routes())
        .with_state(state)
}

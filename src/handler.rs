use std::sync::Arc;

use axum::{Json, response::IntoResponse};
use tracing::info;

use crate::api::APIResponse;
use crate::config::Locale;
use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub locale: Locale,
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(APIResponse::new_from_msg("ok"))
}

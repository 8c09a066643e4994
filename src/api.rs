use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Locale;
use crate::error::{ApiError, Detail};

#[derive(Debug, Serialize)]
pub struct APIResponse {
    pub status: String,
}

impl APIResponse {
    pub fn new_from_msg(msg: &str) -> Self {
        APIResponse {
            status: msg.to_owned(),
        }
    }
}

/// Returned by [`Responder`] when a response has already been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a response was already sent for this request")]
pub struct AlreadySent;

/// A response as recorded by the [`Responder`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sent {
    pub status: StatusCode,
    pub body: Option<Value>,
}

/// One-shot response sink. The first write wins; every later write is
/// refused with [`AlreadySent`] and leaves the recorded response untouched.
#[derive(Debug)]
pub struct Responder {
    locale: Locale,
    sent: Option<Sent>,
}

impl Responder {
    pub fn new(locale: Locale) -> Self {
        Responder { locale, sent: None }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn is_sent(&self) -> bool {
        self.sent.is_some()
    }

    pub fn sent(&self) -> Option<&Sent> {
        self.sent.as_ref()
    }

    fn send(&mut self, status: StatusCode, body: Option<Value>) -> Result<(), AlreadySent> {
        if self.sent.is_some() {
            return Err(AlreadySent);
        }
        self.sent = Some(Sent { status, body });
        Ok(())
    }

    fn send_payload<T: Serialize>(&mut self, status: StatusCode, payload: &T) -> Result<(), AlreadySent> {
        match serde_json::to_value(payload) {
            Ok(value) => self.send(status, Some(value)),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response payload");
                self.json_error(ApiError::Internal(Detail::Unexpected))
            }
        }
    }

    pub fn json<T: Serialize>(&mut self, payload: &T) -> Result<(), AlreadySent> {
        self.send_payload(StatusCode::OK, payload)
    }

    pub fn json_error(&mut self, error: ApiError) -> Result<(), AlreadySent> {
        tracing::debug!(%error, "sending error response");
        let body = error.body(self.locale);
        self.send_payload(error.status(), &body)
    }

    pub fn created<T: Serialize>(&mut self, payload: &T) -> Result<(), AlreadySent> {
        self.send_payload(StatusCode::CREATED, payload)
    }

    pub fn ok(&mut self) -> Result<(), AlreadySent> {
        self.send(StatusCode::OK, None)
    }

    pub fn accepted(&mut self) -> Result<(), AlreadySent> {
        self.send(StatusCode::ACCEPTED, None)
    }
}

impl IntoResponse for Responder {
    fn into_response(self) -> Response {
        match self.sent {
            Some(Sent {
                status,
                body: Some(body),
            }) => (status, Json(body)).into_response(),
            Some(Sent { status, body: None }) => status.into_response(),
            None => {
                tracing::error!("request finished without a response");
                let error = ApiError::Internal(Detail::Unexpected);
                (error.status(), Json(error.body(self.locale))).into_response()
            }
        }
    }
}

/// Drops a refused write. Whatever was sent first stays the response.
pub fn send_once(result: Result<(), AlreadySent>) {
    if let Err(e) = result {
        tracing::debug!("{}, dropping the second one", e);
    }
}

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::config::Locale;

/// Details the bookmarks API can report back to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    NoBookmarkWithId,
    UnknownParameterKey,
    InvalidSortValue,
    BlankField,
    DuplicateName,
    IdMismatch,
    InvalidBody,
    CouldNotBeAdded,
    StorageUnavailable,
    Unexpected,
}

impl Detail {
    pub fn message(&self, locale: Locale) -> &'static str {
        use Detail::*;
        match (self, locale) {
            (NoBookmarkWithId, Locale::En) => "No bookmark with that id exists.",
            (NoBookmarkWithId, Locale::Fr) => "Aucun signet avec cet Id existe.",
            (UnknownParameterKey, Locale::En) => "One or more parameter keys do not exist.",
            (UnknownParameterKey, Locale::Fr) => "La clé d'un ou plusieurs paramètres n'existe pas.",
            (InvalidSortValue, Locale::En) => "The sort parameter must be name or category.",
            (InvalidSortValue, Locale::Fr) => "La valeur du paramètre sort doit être name ou category.",
            (BlankField, Locale::En) => "Name, Url and Category must not be empty or only whitespace.",
            (BlankField, Locale::Fr) => {
                "Les valeurs des paramètres ne doivent pas être vides, nulles ou contenir seulement des espaces blancs."
            }
            (DuplicateName, Locale::En) => "A bookmark with that name already exists.",
            (DuplicateName, Locale::Fr) => "La valeur du paramètre name existe déjà.",
            (IdMismatch, Locale::En) => "The Id in the body does not match the Id in the path.",
            (IdMismatch, Locale::Fr) => "L'Id du corps ne correspond pas à l'Id du chemin.",
            (InvalidBody, Locale::En) => "The request body is not a valid bookmark.",
            (InvalidBody, Locale::Fr) => "Le corps de la requête n'est pas un signet valide.",
            (CouldNotBeAdded, Locale::En) => "The bookmark could not be added.",
            (CouldNotBeAdded, Locale::Fr) => "Le signet n'a pas pu être ajouté.",
            (StorageUnavailable, Locale::En) => "The bookmarks could not be read.",
            (StorageUnavailable, Locale::Fr) => "Les signets n'ont pas pu être lus.",
            (Unexpected, Locale::En) => "An unexpected error occurred.",
            (Unexpected, Locale::Fr) => "Une erreur inattendue est survenue.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("not found: {0:?}")]
    NotFound(Detail),
    #[error("validation failed: {0:?}")]
    Validation(Detail),
    #[error("internal error: {0:?}")]
    Internal(Detail),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> Detail {
        match self {
            ApiError::NotFound(d) | ApiError::Validation(d) | ApiError::Internal(d) => *d,
        }
    }

    pub fn body(&self, locale: Locale) -> ErrorBody {
        let status = self.status();
        ErrorBody {
            title: status_title(status, locale).to_owned(),
            detail: self.detail().message(locale).to_owned(),
            status: status.as_u16(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub title: String,
    pub detail: String,
    pub status: u16,
}

pub fn status_title(status: StatusCode, locale: Locale) -> &'static str {
    match (status, locale) {
        (StatusCode::NOT_FOUND, Locale::En) => "Not found",
        (StatusCode::NOT_FOUND, Locale::Fr) => "Non trouvé",
        (StatusCode::UNPROCESSABLE_ENTITY, Locale::En) => "Invalid parameters.",
        (StatusCode::UNPROCESSABLE_ENTITY, Locale::Fr) => "Paramètres invalides.",
        (_, Locale::En) => "Internal error",
        (_, Locale::Fr) => "Erreur interne",
    }
}

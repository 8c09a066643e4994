//! Bookmarks Module
//!
//! REST resource for bookmarks (name, URL, category) mounted under
//! `/api/bookmarks`.
//!
//! # Features
//!
//! - Listing with `name` (exact or `prefix*`), `category` and repeatable
//!   `sort` (`name`/`category`) query parameters
//! - Fetch, create, update and delete by id
//! - Case-insensitive name uniqueness and blank-field validation
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookmarks::bookmarks;
//!
//! let app = Router::new()
//!     .nest("/api/bookmarks", bookmarks::routes())
//!     .with_state(app_state);
//!
//! // Or drive the controller directly against any repository
//! let mut res = Responder::new(Locale::En);
//! BookmarksController::new(&repo).get(None, Some("sort=name"), &mut res).await;
//! ```

mod controller;
mod handler;
pub mod query;
mod routes;

pub use controller::{BookmarksController, WriteMode, capabilities, parse_id};
pub use routes::routes;

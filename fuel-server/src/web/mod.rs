//! Web layer for the fuel price explorer.
//!
//! JSON API endpoints plus a small HTML frontend; search endpoints return
//! an HTML fragment instead of JSON when the client asks for `text/html`.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;

//! Poll application: questions with a publication date, an index of the
//! published ones, detail and results pages, and voting.
//!
//! Every query takes "now" explicitly; handlers read it from the [`Clock`]
//! in [`AppState`].
//!
//! [`Clock`]: clock::Clock
//! [`AppState`]: app_state::AppState

pub mod app_state;
pub mod clock;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod poll;
pub mod routes;
pub mod store;
pub mod templates;

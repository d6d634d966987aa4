//! REST endpoint handlers organized by resource.

pub mod actions;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes.
///
/// `system::routes` is merged alongside so `/actions/system/status`
/// resolves as a static route ahead of the `/actions/{user_address}`
/// capture.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(actions::routes())
        .merge(system::routes())
}

// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Route configuration.

use crate::handlers::{self, AppState};
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the service router.
///
/// CORS stays permissive: the SPA frontend is served from a different
/// origin and talks to this API cross-origin.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route(
            "/contact",
            get(handlers::list_contacts).post(handlers::submit_contact),
        )
        .route("/contact/:id/status", put(handlers::update_contact_status))
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/:id",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route(
            "/skills",
            get(handlers::list_skills).post(handlers::create_skill),
        )
        .route(
            "/skills/:id",
            get(handlers::get_skill)
                .put(handlers::update_skill)
                .delete(handlers::delete_skill),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

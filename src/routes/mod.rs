pub mod auth;
pub mod comments;
pub mod contents;
pub mod courses;
pub mod health;
pub mod users;

use axum::{middleware, routing, Router};
use serde::Serialize;

use crate::state::AppState;

/// Plain human-readable outcome of a mutating operation
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new().nest("/api", api_routes(state))
}

/// API routes under /api prefix
fn api_routes(state: AppState) -> Router {
    // Public routes: registration and read-only course/content listings
    let public = Router::new()
        .merge(health::routes())
        .route("/auth/register", routing::post(auth::register))
        .route(
            "/courses/:id/contents/active",
            routing::get(contents::list_active_contents),
        )
        .route(
            "/contents/:id/comments",
            routing::get(comments::list_comments),
        );

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/courses/mine", routing::get(courses::list_my_courses))
        .route(
            "/courses/:id/enroll",
            routing::post(courses::batch_enroll_students),
        )
        .route(
            "/courses/:id/analytics",
            routing::get(courses::course_analytics),
        )
        .route(
            "/courses/:id/certificate",
            routing::get(courses::get_certificate),
        )
        .route(
            "/courses/:id/completion",
            routing::get(courses::show_course_completion),
        )
        .route(
            "/contents/:id/complete",
            routing::post(contents::complete_content)
                .delete(contents::delete_completion),
        )
        .route(
            "/comments/:id/moderate",
            routing::post(comments::moderate_comment),
        )
        .route("/users/students", routing::get(users::list_students))
        .route("/users/dashboard", routing::get(users::user_dashboard))
        .route("/users/completed", routing::get(contents::list_completed_contents))
        .route("/users/profile", routing::put(users::update_profile))
        .route("/users/:id/profile", routing::get(users::show_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::auth_required,
        ));

    public.merge(protected).with_state(state)
}

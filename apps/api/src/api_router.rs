use axum::Router;
use axum::routing::{get, patch};
use formdesk_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;

use cors::build_cors_layer;

pub fn build_router(app_state: AppState, frontend_url: Option<&str>) -> Result<Router, AppError> {
    let feedback_form_routes = Router::new()
        .route(
            "/api/feedback-forms",
            get(handlers::feedback_forms::list_feedback_forms_handler)
                .post(handlers::feedback_forms::create_feedback_form_handler),
        )
        .route(
            "/api/feedback-forms/{form_config_id}",
            get(handlers::feedback_forms::get_feedback_form_handler)
                .put(handlers::feedback_forms::update_feedback_form_handler)
                .delete(handlers::feedback_forms::delete_feedback_form_handler),
        )
        .route(
            "/api/feedback-forms/{form_config_id}/toggle-active",
            patch(handlers::feedback_forms::toggle_feedback_form_active_handler),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(feedback_form_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}

use super::{handlers, state::AppState};
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/admin/diag", get(handlers::diag_handler))
        .route("/admin/import", post(handlers::import_csv_handler))
        .route(
            "/admin/catalog",
            get(handlers::list_catalog)
                .post(handlers::upsert_catalog)
                .delete(handlers::delete_catalog),
        )
        .route(
            "/admin/multipliers",
            get(handlers::list_multipliers)
                .post(handlers::upsert_multiplier)
                .delete(handlers::delete_multiplier),
        )
        .route(
            "/admin/tips",
            get(handlers::list_tips)
                .post(handlers::upsert_tip)
                .delete(handlers::delete_tip),
        )
        .route("/admin/leads", get(handlers::list_leads))
        .route("/admin/leads/export", get(handlers::export_leads))
        .route(
            "/admin/leads/{id}",
            patch(handlers::update_lead).delete(handlers::delete_lead),
        )
        .route("/admin/leads/{id}/events", get(handlers::list_lead_events))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

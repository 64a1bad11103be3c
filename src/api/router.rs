use axum::{
    routing::{get, MethodRouter},
    Router,
};

use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Served both bare and under /api, where the form has historically posted.
    Router::new()
        .route("/health", get(health_check))
        .merge(contact_routes("/contact"))
        .merge(contact_routes("/api/contact"))
        .with_state(state)
}

/// Contact routes under `base`, with and without a trailing slash.
fn contact_routes(base: &str) -> Router<AppState> {
    let collection: MethodRouter<AppState> =
        get(handlers::contacts::get_contacts).post(handlers::contacts::create_contact);
    let item: MethodRouter<AppState> = get(handlers::contacts::get_contact)
        .put(handlers::contacts::update_contact)
        .delete(handlers::contacts::delete_contact);

    Router::new()
        .route(base, collection.clone())
        .route(&format!("{base}/"), collection)
        .route(&format!("{base}/:id"), item.clone())
        .route(&format!("{base}/:id/"), item)
}

async fn health_check() -> &'static str {
    "OK"
}

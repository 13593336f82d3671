use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::{self, JwtKeys};
use crate::services;
use crate::store::Store;

pub fn app(state: AppState) -> Router {
    let protected = Router::<AppState>::new()
        .route("/", get(services::root))
        // active budget
        .route("/budget", get(services::get_budget_handler))
        .route("/budget", put(services::put_budget_handler))
        .route("/budget/reset", post(services::reset_budget_handler))
        // dashboard
        .route("/dashboard", get(services::dashboard_handler))
        // presets
        .route("/presets", get(services::list_presets_handler))
        .route("/presets/{name}", get(services::get_preset_handler))
        .route("/presets/{name}", put(services::put_preset_handler))
        .route("/presets/{name}/load", post(services::load_preset_handler))
        .route_layer(from_fn_with_state(state.clone(), auth::auth_middleware));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub keys: JwtKeys,
    pub currency: Arc<str>,
}

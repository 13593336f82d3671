use crate::auth::AuthUser;
use crate::error::AppError;
use crate::routes::AppState;
use axum::{
    extract::{Json, Path, State},
    Extension,
};
use budget_analyzer::stat::{Budget, Dashboard};
use serde::Serialize;

pub async fn root(Extension(user): Extension<AuthUser>) -> String {
    format!("Hello, {}", user.username)
}

pub async fn get_budget_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Budget>, AppError> {
    let budget = state.store.get_budget(&user.username).await?;
    Ok(Json(budget))
}

pub async fn put_budget_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(budget): Json<Budget>,
) -> Result<Json<Budget>, AppError> {
    state.store.put_budget(&user.username, &budget).await?;
    Ok(Json(budget))
}

pub async fn reset_budget_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Budget>, AppError> {
    let budget = state.store.reset_budget(&user.username).await?;
    Ok(Json(budget))
}

pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Dashboard>, AppError> {
    let budget = state.store.get_budget(&user.username).await?;
    Ok(Json(Dashboard::from_budget(&budget, &state.currency)))
}

#[derive(Debug, Serialize)]
pub struct PresetList {
    pub presets: Vec<String>,
}

pub async fn list_presets_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PresetList>, AppError> {
    let presets = state.store.list_presets(&user.username).await?;
    Ok(Json(PresetList { presets }))
}

pub async fn get_preset_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(name): Path<String>,
) -> Result<Json<Budget>, AppError> {
    let budget = state.store.get_preset(&user.username, &name).await?;
    Ok(Json(budget))
}

pub async fn put_preset_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(name): Path<String>,
    Json(budget): Json<Budget>,
) -> Result<Json<Budget>, AppError> {
    state.store.put_preset(&user.username, &name, &budget).await?;
    Ok(Json(budget))
}

pub async fn load_preset_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(name): Path<String>,
) -> Result<Json<Budget>, AppError> {
    let budget = state.store.load_preset(&user.username, &name).await?;
    Ok(Json(budget))
}

//! HTTP routes — views, auth forms, traffic endpoints.

pub mod auth;
pub mod traffic;
pub mod views;

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::models::user::User;
use crate::services::predictor_service::PredictiveModel;
use crate::services::user_service;
use crate::session::{self, SessionStore};

/// Shared state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub sessions: Arc<SessionStore>,
    pub model: Arc<PredictiveModel>,
    pub http: reqwest::Client,
}

/// Build the application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        // Views
        .route("/", get(home))
        .route("/ai-based-prediction", get(ai_based_prediction))
        .route("/data-based-prediction", get(data_based_prediction))
        // Auth
        .route("/login", get(auth::login_form).post(auth::login_submit))
        .route(
            "/register",
            get(auth::register_form).post(auth::register_submit),
        )
        .route("/logout", get(auth::logout))
        // Traffic API
        .route("/get-traffic", post(traffic::get_traffic))
        .route("/predict-traffic", post(traffic::predict_traffic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolve the current session's user, if any.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<User> {
    let token = session::token_from_headers(headers, &state.config.session_secret)?;
    let user_id = state.sessions.resolve(&token)?;
    let mut conn = state.pool.get().await.ok()?;
    user_service::load(&mut conn, user_id).await.ok().flatten()
}

// ── Views ──

async fn home(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let user = current_user(&state, &headers).await;
    Html(views::landing_page(
        user.as_ref().map(|u| u.username.as_str()),
    ))
}

async fn ai_based_prediction() -> Html<&'static str> {
    Html(views::AI_PAGE)
}

async fn data_based_prediction() -> Html<&'static str> {
    Html(views::DATA_PAGE)
}

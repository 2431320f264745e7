//! Login, registration, and logout form handlers.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::routes::{views, AppState};
use crate::services::user_service::{self, AuthError};
use crate::session;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub async fn login_form() -> Html<String> {
    Html(views::login_page(None))
}

pub async fn login_submit(
    State(state): State<AppState>,
    Form(creds): Form<Credentials>,
) -> Response {
    let mut conn = match state.pool.get().await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("Database pool error: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match user_service::authenticate(&mut conn, &creds.username, &creds.password).await {
        Ok(user) => {
            let token = state.sessions.create(user.id, state.config.session_ttl_min);
            let cookie = session::cookie_value(&state.config.session_secret, &token);
            crate::metrics::login_attempt("ok");
            tracing::info!(user_id = user.id, "User logged in");
            ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            crate::metrics::login_attempt("rejected");
            Html(views::login_page(Some("Invalid username or password"))).into_response()
        }
        Err(e) => {
            tracing::error!("Login failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn register_form() -> Html<String> {
    Html(views::register_page(None))
}

pub async fn register_submit(
    State(state): State<AppState>,
    Form(creds): Form<Credentials>,
) -> Response {
    if creds.username.trim().is_empty() || creds.password.is_empty() {
        return Html(views::register_page(Some(
            "Username and password are required",
        )))
        .into_response();
    }

    let mut conn = match state.pool.get().await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("Database pool error: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match user_service::register(&mut conn, creds.username.trim(), &creds.password).await {
        Ok(_) => {
            crate::metrics::user_registered();
            Redirect::to("/login").into_response()
        }
        Err(AuthError::DuplicateUsername) => {
            Html(views::register_page(Some("That username is already taken"))).into_response()
        }
        Err(e) => {
            tracing::error!("Registration failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match session::token_from_headers(&headers, &state.config.session_secret) {
        Some(token) => {
            state.sessions.remove(&token);
            (
                [(header::SET_COOKIE, session::clear_cookie())],
                Redirect::to("/login"),
            )
                .into_response()
        }
        None => Redirect::to("/login").into_response(),
    }
}

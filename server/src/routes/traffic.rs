//! Traffic estimation endpoints — narrative (hosted model) and numeric
//! (local artifact).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::Form;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::routes::AppState;
use crate::services::llm_service;

#[derive(Debug, Deserialize)]
pub struct TrafficQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// `junction` arrives as text so a malformed value lands in the JSON
/// error body instead of a form-rejection status.
#[derive(Debug, Deserialize)]
pub struct PredictForm {
    pub datetime: String,
    pub junction: String,
}

pub async fn get_traffic(
    State(state): State<AppState>,
    Json(query): Json<TrafficQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let (Some(latitude), Some(longitude)) = (query.latitude, query.longitude) else {
        crate::metrics::narrative_request("invalid_location");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid location data" })),
        ));
    };

    match llm_service::fetch_narrative(&state.http, &state.config, latitude, longitude).await {
        Ok(traffic) => {
            crate::metrics::narrative_request("ok");
            Ok(Json(json!({ "traffic": traffic })))
        }
        Err(e) => {
            crate::metrics::narrative_request("upstream_error");
            tracing::error!("Narrative estimate failed: {e}");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            ))
        }
    }
}

pub async fn predict_traffic(
    State(state): State<AppState>,
    Form(form): Form<PredictForm>,
) -> Json<Value> {
    match state.model.predict_count(&form.datetime, &form.junction) {
        Ok(prediction) => {
            crate::metrics::prediction("ok");
            Json(json!({ "prediction": prediction }))
        }
        Err(e) => {
            crate::metrics::prediction("error");
            Json(json!({ "error": e.to_string() }))
        }
    }
}

//! Prediction Route

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use flight_validator::FlightInput;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Body of a prediction request
#[derive(Debug, Deserialize, Serialize)]
pub struct PredictRequest {
    pub flights: Vec<FlightInput>,
}

/// Delay label per requested flight, in request order
#[derive(Debug, Deserialize, Serialize)]
pub struct PredictResponse {
    pub predict: Vec<u8>,
}

/// Predict delays for a batch of flights
pub async fn post_predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let start = Instant::now();
    counter!("flight_delay_predict_requests_total").increment(1);

    let result = predict(&state, payload);
    match &result {
        Ok(Json(response)) => {
            let delayed = response.predict.iter().filter(|&&y| y == 1).count() as u64;
            let on_time = response.predict.len() as u64 - delayed;
            counter!("flight_delay_predicted_flights_total", "label" => "1").increment(delayed);
            counter!("flight_delay_predicted_flights_total", "label" => "0").increment(on_time);
            histogram!("flight_delay_predict_latency_seconds").record(start.elapsed().as_secs_f64());
        }
        Err(_) => counter!("flight_delay_predict_rejected_total").increment(1),
    }
    result
}

fn predict(
    state: &AppState,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::Malformed(rejection.body_text()))?;

    let records = state
        .validator
        .validate_batch(&request.flights)
        .map_err(ApiError::Validation)?;
    let features = state.preprocessor.preprocess(&records)?;
    let predict = state.engine.predict(&features);

    debug!("Predicted {} flights", predict.len());
    Ok(Json(PredictResponse { predict }))
}

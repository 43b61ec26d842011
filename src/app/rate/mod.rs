use axum::{extract::State, routing::get, Json, Router};

use super::AppState;
use crate::app::error::AppResult;

pub fn router() -> Router<AppState> {
    Router::new().route("/rate", get(get_rate))
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct RateResponse {
    pub rate: f64,
}

#[tracing::instrument(name = "Get current exchange rate", skip(state))]
pub async fn get_rate(State(state): State<AppState>) -> AppResult<Json<RateResponse>> {
    let rate = state.rate_client.fetch_usd_to_local_rate().await?;

    Ok(Json(RateResponse { rate }))
}

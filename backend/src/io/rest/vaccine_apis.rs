//! # REST API for the Vaccine Catalog

use axum::{extract::State, response::Json};
use tracing::info;

use crate::io::rest::mappers::ChildMapper;
use crate::AppState;
use shared::VaccineInfo;

/// Axum handler function for GET /vaccines
pub async fn list_vaccines(State(state): State<AppState>) -> Json<Vec<VaccineInfo>> {
    info!("GET /vaccines");

    let vaccines = state
        .child_service
        .rules()
        .vaccines
        .iter()
        .map(ChildMapper::to_vaccine_dto)
        .collect();

    Json(vaccines)
}

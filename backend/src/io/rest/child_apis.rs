//! # REST API for Child Registration
//!
//! Endpoints for submitting a registration and listing all registrations.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::RegistryError;
use crate::io::rest::mappers::ChildMapper;
use crate::AppState;
use shared::SubmitChildRequest;

/// Wire names of the text fields, in the order they are checked
const TEXT_FIELDS: [&str; 5] = ["childName", "parentId", "parentEmail", "gender", "dob"];

/// Axum handler function for POST /submit-data
pub async fn submit_data(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(value)) => parse_submission(value),
        Err(rejection) => Err(RegistryError::validation("body", rejection.body_text())),
    };
    let request = match request {
        Ok(request) => request,
        Err(e) => {
            warn!("POST /submit-data - rejected body: {}", e);
            return e.into_response();
        }
    };
    info!(
        "POST /submit-data - child: {:?}, parent: {:?}",
        request.child_name, request.parent_id
    );

    match state.child_service.submit_child(request).await {
        Ok(child) => (StatusCode::CREATED, Json(ChildMapper::to_submit_response(&child))).into_response(),
        Err(e) => {
            warn!("POST /submit-data failed: {}", e);
            e.into_response()
        }
    }
}

/// Axum handler function for GET /get-data
pub async fn get_data(State(state): State<AppState>) -> Response {
    info!("GET /get-data");

    match state.child_service.list_children().await {
        Ok(children) => {
            info!("Returning {} children", children.len());
            (StatusCode::OK, Json(ChildMapper::to_record_list_dto(children))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Decode a submission, naming the offending field when one has the wrong type
fn parse_submission(value: Value) -> Result<SubmitChildRequest, RegistryError> {
    let Value::Object(fields) = &value else {
        return Err(RegistryError::validation("body", "Request body must be a JSON object"));
    };

    for name in TEXT_FIELDS {
        match fields.get(name) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => return Err(RegistryError::validation(name, format!("{} must be a string", name))),
        }
    }

    serde_json::from_value(value).map_err(|e| RegistryError::validation("body", e.to_string()))
}

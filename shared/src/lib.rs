use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /submit-data`.
///
/// Every field is optional at the wire level so that a missing field can be
/// reported by name instead of failing deserialization as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmitChildRequest {
    pub child_name: Option<String>,
    pub parent_id: Option<String>,
    pub parent_email: Option<String>,
    pub gender: Option<String>,
    /// ISO 8601 calendar date (YYYY-MM-DD)
    pub dob: Option<String>,
}

/// Acknowledgement returned after a record has been stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitChildResponse {
    pub success: bool,
    /// Identifier assigned by the registry ("child::<uuid>")
    pub id: String,
    pub message: String,
}

/// One entry of `GET /get-data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRecord {
    pub id: String,
    pub child_name: String,
    pub parent_id: String,
    pub parent_email: String,
    pub gender: String,
    pub dob: String, // ISO 8601 date format (YYYY-MM-DD)
    /// Human-readable labels, earliest dose first
    pub vaccination_schedule: Vec<String>,
}

/// One vaccine of the active schedule rule set, as served by `GET /vaccines`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccineInfo {
    pub name: String,
    pub doses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genders: Option<Vec<String>>,
}

/// Machine-readable error category carried in every error response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    ValidationError,
    StorageError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ValidationError => write!(f, "ValidationError"),
            ErrorKind::StorageError => write!(f, "StorageError"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    /// Offending request field, for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

impl ErrorResponse {
    pub fn new(kind: ErrorKind, field: Option<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                kind,
                field,
                message: message.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submit_request_uses_camel_case_fields() {
        let request: SubmitChildRequest = serde_json::from_value(json!({
            "childName": "Ana",
            "parentId": "P1",
            "parentEmail": "a@b.com",
            "gender": "F",
            "dob": "2023-01-15"
        }))
        .unwrap();

        assert_eq!(request.child_name.as_deref(), Some("Ana"));
        assert_eq!(request.parent_id.as_deref(), Some("P1"));
        assert_eq!(request.parent_email.as_deref(), Some("a@b.com"));
        assert_eq!(request.dob.as_deref(), Some("2023-01-15"));
    }

    #[test]
    fn test_submit_request_tolerates_missing_fields() {
        let request: SubmitChildRequest =
            serde_json::from_value(json!({ "parentId": "P2" })).unwrap();

        assert!(request.child_name.is_none());
        assert_eq!(request.parent_id.as_deref(), Some("P2"));
        assert!(request.dob.is_none());
    }

    #[test]
    fn test_child_record_serializes_schedule_as_array() {
        let record = ChildRecord {
            id: "child::1".to_string(),
            child_name: "Ana".to_string(),
            parent_id: "P1".to_string(),
            parent_email: "a@b.com".to_string(),
            gender: "F".to_string(),
            dob: "2023-01-15".to_string(),
            vaccination_schedule: vec!["BCG (at birth): 2023-01-15".to_string()],
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["childName"], "Ana");
        assert_eq!(value["parentEmail"], "a@b.com");
        assert_eq!(value["vaccinationSchedule"][0], "BCG (at birth): 2023-01-15");
    }

    #[test]
    fn test_error_response_shape() {
        let response = ErrorResponse::new(
            ErrorKind::ValidationError,
            Some("childName".to_string()),
            "Child name cannot be empty",
        );

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["kind"], "ValidationError");
        assert_eq!(value["error"]["field"], "childName");

        let storage = ErrorResponse::new(ErrorKind::StorageError, None, "database is locked");
        let value = serde_json::to_value(&storage).unwrap();
        assert!(value["error"].get("field").is_none());
    }

    #[test]
    fn test_vaccine_info_omits_missing_genders() {
        let info = VaccineInfo {
            name: "BCG".to_string(),
            doses: vec!["0 days".to_string()],
            genders: None,
        };
        let value = serde_json::to_value(&info).unwrap();
        assert!(value.get("genders").is_none());
    }
}

//! Uniform API response envelope
//!
//! Every endpoint outcome, success or failure, is expressed as the same
//! envelope: `{status, responseCode, responseMessage, responseData}`.
//! The builders here are pure: no I/O, no shared state, and they are
//! defined for every input — absent data is a legitimate outcome, not
//! an error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical response codes carried inside the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u16)]
pub enum ResponseCode {
    Ok = 200,
    Created = 201,
    Accepted = 202,
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    Conflict = 409,
    RateLimitExceeded = 429,
    ServerError = 500,
}

impl ResponseCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Message action used by the success builders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Created,
    Updated,
    Gotten,
}

impl Action {
    fn as_str(self) -> &'static str {
        match self {
            Action::Created => "created",
            Action::Updated => "updated",
            Action::Gotten => "gotten",
        }
    }
}

/// The uniform response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TncResponse {
    pub status: bool,
    pub response_code: u16,
    pub response_message: String,
    pub response_data: Option<Value>,
}

impl TncResponse {
    fn build(status: bool, code: u16, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status,
            response_code: code,
            response_message: message.into(),
            response_data: data,
        }
    }

    /// Success envelope with empty-data degradation.
    ///
    /// Pluralizes the entity name when the payload is a list. When the
    /// payload is empty and a write action was requested, the matching
    /// failure envelope is returned instead; an empty read degrades to
    /// not-found.
    pub fn success_response(
        entity_name: &str,
        data: Option<Value>,
        code: ResponseCode,
        action: Option<Action>,
        message: Option<&str>,
    ) -> Self {
        let entity_name = format_entity(entity_name, data.as_ref());
        let error_message = match action {
            Some(Action::Created) => Some(format!("Failed to create {entity_name}")),
            Some(Action::Updated) => Some(format!("Failed to update {entity_name}")),
            _ => None,
        };

        if let Some(resp) = Self::check_data(&entity_name, data.as_ref(), error_message, action) {
            return resp;
        }

        let action_msg = match action {
            Some(action) => format!("{} {} successfully.", entity_name, action.as_str()),
            None => format!("{entity_name} request successful."),
        };
        Self::build(
            true,
            code.as_u16(),
            message.map(str::to_string).unwrap_or(action_msg),
            data,
        )
    }

    /// Degrade empty payloads: write actions fail outright, reads are not-found
    fn check_data(
        entity_name: &str,
        data: Option<&Value>,
        error_message: Option<String>,
        action: Option<Action>,
    ) -> Option<Self> {
        if !is_empty(data) {
            return None;
        }
        match action {
            Some(Action::Created) | Some(Action::Updated) => Some(Self::error_response(
                error_message.as_deref(),
                ResponseCode::ServerError,
            )),
            _ => Some(Self::not_found_response(entity_name, None)),
        }
    }

    pub fn get_response(entity_name: &str, data: Option<Value>, message: Option<&str>) -> Self {
        Self::success_response(entity_name, data, ResponseCode::Ok, Some(Action::Gotten), message)
    }

    pub fn create_response(entity_name: &str, data: Option<Value>, message: Option<&str>) -> Self {
        Self::success_response(
            entity_name,
            data,
            ResponseCode::Created,
            Some(Action::Created),
            message,
        )
    }

    pub fn update_response(entity_name: &str, data: Option<Value>, message: Option<&str>) -> Self {
        Self::success_response(entity_name, data, ResponseCode::Ok, Some(Action::Updated), message)
    }

    pub fn not_found_response(entity_name: &str, message: Option<&str>) -> Self {
        Self::build(
            false,
            ResponseCode::NotFound.as_u16(),
            message
                .map(str::to_string)
                .unwrap_or_else(|| format!("{entity_name} not found.")),
            None,
        )
    }

    pub fn delete_response(
        entity_name: &str,
        is_deleted: bool,
        message: Option<&str>,
        data: Option<Value>,
    ) -> Self {
        if is_deleted {
            return Self::build(
                true,
                ResponseCode::Ok.as_u16(),
                message
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{entity_name} successfully deleted.")),
                data,
            );
        }
        Self::error_response(
            Some(&format!("Failed to delete {entity_name}")),
            ResponseCode::BadRequest,
        )
    }

    pub fn conflict_response(
        entity_name: &str,
        message: Option<&str>,
        subject: Option<&str>,
    ) -> Self {
        let subject_name = subject.map(capitalize).unwrap_or_else(|| "User".to_string());
        Self::build(
            false,
            ResponseCode::Conflict.as_u16(),
            message
                .map(str::to_string)
                .unwrap_or_else(|| format!("{subject_name} with {entity_name} already exists.")),
            None,
        )
    }

    pub fn login_response(
        entity_name: &str,
        data: Option<Value>,
        success: bool,
        message: Option<&str>,
    ) -> Self {
        if success {
            return Self::build(
                true,
                ResponseCode::Ok.as_u16(),
                message
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{entity_name} logged in successfully.")),
                data,
            );
        }
        Self::error_response(
            Some(&format!("{entity_name} login failed.")),
            ResponseCode::BadRequest,
        )
    }

    pub fn verify_response(entity_name: &str, data: Option<Value>, message: Option<&str>) -> Self {
        if is_empty(data.as_ref()) {
            return Self::error_response(
                Some(&format!("Failed to verify {entity_name}.")),
                ResponseCode::BadRequest,
            );
        }
        Self::build(
            true,
            ResponseCode::Ok.as_u16(),
            message
                .map(str::to_string)
                .unwrap_or_else(|| format!("{entity_name} verified successfully")),
            data,
        )
    }

    /// Paged success envelope; an empty page degrades to not-found
    pub fn paged_response(
        entity_name: &str,
        data: Vec<Value>,
        total: u64,
        page: u64,
        page_size: i64,
        meta_data: Option<Value>,
        message: Option<&str>,
    ) -> Self {
        let data = Value::Array(data);
        let entity_name = format_entity(entity_name, Some(&data));
        if let Some(resp) = Self::check_data(&entity_name, Some(&data), None, None) {
            return resp;
        }

        let response_data = serde_json::json!({
            "data": data,
            "total": total,
            "page": page,
            "pageSize": page_size,
            "metaData": meta_data,
        });
        Self::build(
            true,
            ResponseCode::Ok.as_u16(),
            message
                .map(str::to_string)
                .unwrap_or_else(|| format!("{entity_name} gotten successfully")),
            Some(response_data),
        )
    }

    pub fn error_response(message: Option<&str>, error_code: ResponseCode) -> Self {
        Self::build(
            false,
            error_code.as_u16(),
            message.unwrap_or("Internal Server Error."),
            None,
        )
    }

    pub fn unauthorized_response(message: Option<&str>) -> Self {
        Self::build(
            false,
            ResponseCode::Unauthorized.as_u16(),
            message.unwrap_or("You are Unauthorized, Please provide a valid access token."),
            None,
        )
    }

    pub fn forbidden_response(message: Option<&str>) -> Self {
        Self::build(
            false,
            ResponseCode::Forbidden.as_u16(),
            message.unwrap_or("You do not have access to this feature."),
            None,
        )
    }

    pub fn custom_response(
        message: &str,
        response_code: u16,
        success: bool,
        data: Option<Value>,
    ) -> Self {
        Self::build(success, response_code, message, data)
    }
}

impl IntoResponse for TncResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.response_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Pluralize the entity name when the payload is a list
fn format_entity(entity_name: &str, data: Option<&Value>) -> String {
    match data {
        Some(Value::Array(_)) => format!("{entity_name}s"),
        _ => entity_name.to_string(),
    }
}

/// Empty-payload check: null, empty collections, empty strings, zero and
/// false all count as absent data
fn is_empty(data: Option<&Value>) -> bool {
    match data {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_with_data() {
        let resp = TncResponse::get_response("report", Some(json!({"summary": "ok"})), None);
        assert!(resp.status);
        assert_eq!(resp.response_code, 200);
        assert_eq!(resp.response_message, "report gotten successfully.");
    }

    #[test]
    fn test_success_pluralizes_lists() {
        let resp = TncResponse::get_response("report", Some(json!([{"summary": "a"}])), None);
        assert_eq!(resp.response_message, "reports gotten successfully.");
    }

    #[test]
    fn test_empty_list_degrades_to_not_found() {
        let resp = TncResponse::success_response("report", Some(json!([])), ResponseCode::Ok, None, None);
        assert!(!resp.status);
        assert_eq!(resp.response_code, 404);
        assert_eq!(resp.response_message, "reports not found.");
    }

    #[test]
    fn test_empty_create_degrades_to_error() {
        let resp = TncResponse::create_response("report", None, None);
        assert!(!resp.status);
        assert_eq!(resp.response_code, 500);
        assert_eq!(resp.response_message, "Failed to create report");
    }

    #[test]
    fn test_empty_update_degrades_to_error() {
        let resp = TncResponse::update_response("report", Some(Value::Null), None);
        assert!(!resp.status);
        assert_eq!(resp.response_code, 500);
        assert_eq!(resp.response_message, "Failed to update report");
    }

    #[test]
    fn test_explicit_message_wins() {
        let resp = TncResponse::get_response("report", Some(json!({"a": 1})), Some("custom message"));
        assert_eq!(resp.response_message, "custom message");
    }

    #[test]
    fn test_paged_response_shape() {
        let resp = TncResponse::paged_response(
            "report",
            vec![json!({"id": 1}), json!({"id": 2})],
            2,
            1,
            10,
            None,
            None,
        );
        assert_eq!(resp.response_code, 200);
        assert_eq!(
            resp.response_data,
            Some(json!({
                "data": [{"id": 1}, {"id": 2}],
                "total": 2,
                "page": 1,
                "pageSize": 10,
                "metaData": null,
            }))
        );
    }

    #[test]
    fn test_paged_response_empty_is_not_found() {
        let resp = TncResponse::paged_response("report", vec![], 0, 1, 10, None, None);
        assert!(!resp.status);
        assert_eq!(resp.response_code, 404);
    }

    #[test]
    fn test_delete_response() {
        let ok = TncResponse::delete_response("report", true, None, None);
        assert!(ok.status);
        assert_eq!(ok.response_message, "report successfully deleted.");

        let failed = TncResponse::delete_response("report", false, None, None);
        assert!(!failed.status);
        assert_eq!(failed.response_code, 400);
        assert_eq!(failed.response_message, "Failed to delete report");
    }

    #[test]
    fn test_conflict_response_capitalizes_subject() {
        let resp = TncResponse::conflict_response("email", None, Some("user"));
        assert_eq!(resp.response_code, 409);
        assert_eq!(resp.response_message, "User with email already exists.");
    }

    #[test]
    fn test_conflict_response_defaults_subject() {
        let resp = TncResponse::conflict_response("email", None, None);
        assert_eq!(resp.response_message, "User with email already exists.");
    }

    #[test]
    fn test_verify_response_empty_fails() {
        let resp = TncResponse::verify_response("token", None, None);
        assert!(!resp.status);
        assert_eq!(resp.response_code, 400);
        assert_eq!(resp.response_message, "Failed to verify token.");
    }

    #[test]
    fn test_login_response() {
        let ok = TncResponse::login_response("user", Some(json!({"token": "t"})), true, None);
        assert!(ok.status);
        assert_eq!(ok.response_message, "user logged in successfully.");

        let failed = TncResponse::login_response("user", None, false, None);
        assert!(!failed.status);
        assert_eq!(failed.response_code, 400);
    }

    #[test]
    fn test_unauthorized_and_forbidden_defaults() {
        let unauthorized = TncResponse::unauthorized_response(None);
        assert_eq!(unauthorized.response_code, 401);
        assert_eq!(
            unauthorized.response_message,
            "You are Unauthorized, Please provide a valid access token."
        );

        let forbidden = TncResponse::forbidden_response(None);
        assert_eq!(forbidden.response_code, 403);
        assert_eq!(
            forbidden.response_message,
            "You do not have access to this feature."
        );
    }

    #[test]
    fn test_envelope_field_names() {
        let resp = TncResponse::get_response("report", Some(json!({"a": 1})), None);
        let serialized = serde_json::to_value(&resp).unwrap();
        assert!(serialized.get("status").is_some());
        assert!(serialized.get("responseCode").is_some());
        assert!(serialized.get("responseMessage").is_some());
        assert!(serialized.get("responseData").is_some());
    }
}

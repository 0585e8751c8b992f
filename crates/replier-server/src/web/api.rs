// crates/replier-server/src/web/api.rs
// REST API handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use replier_types::{ErrorResponse, GenerateReplyResponse, GenerateRequest, HealthResponse, Tone};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::ReplierError;
use crate::web::state::AppState;

/// Client-facing message for any upstream failure
pub const GENERATE_FAILED_MESSAGE: &str = "Failed to generate reply";

pub const SELECTED_TEXT_MESSAGE: &str = "selectedText is required and must be a string";

// ═══════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════

/// Maps library errors onto HTTP responses without leaking upstream detail
#[derive(Debug)]
pub struct ApiError(pub ReplierError);

impl From<ReplierError> for ApiError {
    fn from(err: ReplierError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            ReplierError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERATE_FAILED_MESSAGE.to_string(),
            ),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

// ═══════════════════════════════════════
// HEALTH
// ═══════════════════════════════════════

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::ok())
}

// ═══════════════════════════════════════
// GENERATE REPLY
// ═══════════════════════════════════════

pub fn response_type_message() -> String {
    format!(
        "responseType is required and must be one of: {}",
        Tone::valid_list()
    )
}

/// Validate a raw JSON body in order: selectedText, then responseType.
///
/// An empty, null, or non-string userPrompt is treated as absent.
pub fn parse_generate_request(body: &Value) -> Result<GenerateRequest, ReplierError> {
    let selected_text = body
        .get("selectedText")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ReplierError::Validation(SELECTED_TEXT_MESSAGE.to_string()))?;

    let response_type = body
        .get("responseType")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse::<Tone>().ok())
        .ok_or_else(|| ReplierError::Validation(response_type_message()))?;

    let user_prompt = body
        .get("userPrompt")
        .and_then(Value::as_str)
        .filter(|prompt| !prompt.is_empty())
        .map(str::to_string);

    Ok(GenerateRequest {
        selected_text: selected_text.to_string(),
        response_type,
        user_prompt,
    })
}

/// Body of a generate-reply request. Anything that is not a JSON document
/// (missing body, wrong content type, malformed JSON) reads as `null` so it
/// fails field validation like an empty object would.
pub fn request_body(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!(reason = %rejection, "Unreadable generate-reply body");
            Value::Null
        }
    }
}

pub async fn generate_reply(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerateReplyResponse>, ApiError> {
    let body = request_body(body);
    let request = parse_generate_request(&body).inspect_err(|e| {
        warn!(error = %e, "Rejected generate-reply request");
    })?;

    match state.generator.generate_reply(&request).await {
        Ok(reply) => Ok(Json(GenerateReplyResponse { reply })),
        Err(e) => {
            error!(error = %e, tone = %request.response_type, "Error generating reply");
            Err(ApiError(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ============================================================================
    // parse_generate_request tests
    // ============================================================================

    #[test]
    fn test_parse_valid_request() {
        let body = json!({
            "selectedText": "I just shipped a new feature!",
            "responseType": "cheerleader",
            "userPrompt": "casual"
        });
        let req = parse_generate_request(&body).unwrap();
        assert_eq!(req.selected_text, "I just shipped a new feature!");
        assert_eq!(req.response_type, Tone::Cheerleader);
        assert_eq!(req.user_prompt.as_deref(), Some("casual"));
    }

    #[test]
    fn test_selected_text_checked_before_response_type() {
        let body = json!({"responseType": "bogus"});
        let err = parse_generate_request(&body).unwrap_err();
        assert_eq!(err.to_string(), SELECTED_TEXT_MESSAGE);
    }

    #[test]
    fn test_selected_text_rejections() {
        for body in [
            json!({"responseType": "cheerleader"}),
            json!({"selectedText": "", "responseType": "cheerleader"}),
            json!({"selectedText": 42, "responseType": "cheerleader"}),
            json!({"selectedText": null, "responseType": "cheerleader"}),
            json!(["not", "an", "object"]),
            Value::Null,
        ] {
            let err = parse_generate_request(&body).unwrap_err();
            assert!(matches!(err, ReplierError::Validation(_)));
            assert!(err.to_string().contains("selectedText"));
        }
    }

    #[test]
    fn test_response_type_rejections_list_all_tones() {
        for body in [
            json!({"selectedText": "hi"}),
            json!({"selectedText": "hi", "responseType": "hype_man"}),
            json!({"selectedText": "hi", "responseType": 3}),
        ] {
            let err = parse_generate_request(&body).unwrap_err();
            let message = err.to_string();
            for tone in Tone::ALL {
                assert!(message.contains(tone.as_str()), "missing {tone} in {message}");
            }
        }
    }

    #[test]
    fn test_user_prompt_treated_as_absent() {
        for prompt in [json!(""), json!(null), json!(7)] {
            let body = json!({
                "selectedText": "hi",
                "responseType": "networker",
                "userPrompt": prompt
            });
            assert_eq!(parse_generate_request(&body).unwrap().user_prompt, None);
        }
    }

    // ============================================================================
    // ApiError tests
    // ============================================================================

    #[test]
    fn test_api_error_status_codes() {
        let validation = ApiError(ReplierError::Validation("bad".to_string())).into_response();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let upstream = ApiError(ReplierError::InvalidResponse).into_response();
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

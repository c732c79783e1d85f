use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use super::{AttendanceRecord, AttendanceVerdict, RegistrationReceipt};
use crate::{AttendError, Result};

/// Messages the service uses for a completed search without a match.
pub const NO_MATCH_MESSAGES: [&str; 2] =
    ["No matching user found", "No registered users found"];

const REGISTRATION_FAILED: &str = "Registration failed";
const ATTENDANCE_FAILED: &str = "Attendance marking failed";

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

#[derive(Deserialize)]
struct AttendanceBody {
    message: Option<String>,
    #[serde(default)]
    user_id: Option<Value>,
    name: Option<String>,
    timestamp: Option<String>,
    confidence: Option<f64>,
    registered_face_image: Option<String>,
}

pub fn interpret_registration(
    status: StatusCode,
    body: &[u8],
) -> Result<RegistrationReceipt> {
    if !status.is_success() {
        return Err(server_error(status, body, REGISTRATION_FAILED));
    }

    let value: Value = serde_json::from_slice(body)?;
    match value.get("error") {
        None | Some(Value::Null) => Ok(RegistrationReceipt(value)),
        Some(error) => Err(AttendError::Rejected(
            text_of(error).unwrap_or_else(|| REGISTRATION_FAILED.to_owned()),
        )),
    }
}

pub fn interpret_attendance(
    status: StatusCode,
    body: &[u8],
) -> Result<AttendanceVerdict> {
    if !status.is_success() {
        return Err(server_error(status, body, ATTENDANCE_FAILED));
    }

    let body: AttendanceBody = serde_json::from_slice(body)?;
    if let Some(message) = body.message.as_deref() {
        if NO_MATCH_MESSAGES.contains(&message) {
            return Ok(AttendanceVerdict::NoMatch(message.to_owned()));
        }
    }

    let user_id = match body.user_id.as_ref().and_then(text_of) {
        Some(id) if !id.is_empty() => id,
        _ => {
            log::warn!("Attendance response has neither a match nor a verdict");
            return Err(AttendError::Parse);
        }
    };

    let record = AttendanceRecord {
        user_id,
        name: body.name.ok_or(AttendError::Parse)?,
        timestamp: body.timestamp.ok_or(AttendError::Parse)?,
        confidence: body.confidence.ok_or(AttendError::Parse)?,
        registered_face_image: body
            .registered_face_image
            .filter(|image| !image.is_empty()),
    };
    Ok(AttendanceVerdict::Matched(record))
}

fn server_error(status: StatusCode, body: &[u8], fallback: &str) -> AttendError {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.detail)
        .and_then(|detail| text_of(&detail))
        .unwrap_or_else(|| fallback.to_owned());
    log::debug!("Service answered {}: {}", status, detail);

    AttendError::Server {
        status: status.as_u16(),
        detail,
    }
}

/// Strings are taken as they are, numbers are rendered, anything else is
/// serialized back to JSON text.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn registration_error_detail_is_surfaced() {
        let err = interpret_registration(
            StatusCode::BAD_REQUEST,
            &body(json!({ "detail": "Email already registered" })),
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "Email already registered");
        assert!(matches!(err, AttendError::Server { status: 400, .. }));
    }

    #[test]
    fn registration_error_without_detail_uses_fallback() {
        let err = interpret_registration(
            StatusCode::INTERNAL_SERVER_ERROR,
            b"<html>Bad gateway</html>",
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "Registration failed");
    }

    #[test]
    fn structured_detail_is_kept_as_text() {
        let err = interpret_registration(
            StatusCode::UNPROCESSABLE_ENTITY,
            &body(json!({ "detail": [{ "loc": ["body", "email"] }] })),
        )
        .unwrap_err();
        assert!(err.user_message().contains("email"));
    }

    #[test]
    fn registration_success_with_error_field_is_rejected() {
        let err = interpret_registration(
            StatusCode::OK,
            &body(json!({ "error": "Face not detected" })),
        )
        .unwrap_err();
        assert!(matches!(err, AttendError::Rejected(ref m) if m == "Face not detected"));
    }

    #[test]
    fn registration_success_is_a_receipt() {
        let receipt = interpret_registration(
            StatusCode::CREATED,
            &body(json!({ "message": "User registered", "error": null })),
        )
        .unwrap();
        assert_eq!(receipt.message(), Some("User registered"));
    }

    #[test]
    fn no_match_messages_are_verdicts_not_errors() {
        for message in NO_MATCH_MESSAGES {
            let verdict = interpret_attendance(
                StatusCode::OK,
                &body(json!({ "message": message })),
            )
            .unwrap();
            assert_eq!(verdict, AttendanceVerdict::NoMatch(message.to_owned()));
        }
    }

    #[test]
    fn match_is_parsed_into_a_record() {
        let verdict = interpret_attendance(
            StatusCode::OK,
            &body(json!({
                "user_id": "123",
                "name": "Jane",
                "timestamp": "2024-05-01 09:00:00",
                "confidence": 0.873,
                "message": "Attendance marked",
            })),
        )
        .unwrap();
        match verdict {
            AttendanceVerdict::Matched(record) => {
                assert_eq!(record.user_id, "123");
                assert_eq!(record.name, "Jane");
                assert_eq!(record.confidence_percent(), "87.30%");
                assert_eq!(record.registered_face_image, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn numeric_user_id_and_reference_image_are_accepted() {
        let verdict = interpret_attendance(
            StatusCode::OK,
            &body(json!({
                "user_id": 4821937,
                "name": "Jane Doe",
                "timestamp": "2024-05-01 09:00:00",
                "confidence": 0.91,
                "registered_face_image": "data:image/jpeg;base64,/9j/4A==",
            })),
        )
        .unwrap();
        let AttendanceVerdict::Matched(record) = verdict else {
            panic!("expected a match");
        };
        assert_eq!(record.user_id, "4821937");
        assert!(record.registered_face_image.is_some());
    }

    #[test]
    fn body_without_verdict_is_malformed() {
        for value in [
            json!({ "message": "Something else" }),
            json!({}),
            json!({ "user_id": "123", "name": "Jane" }),
        ] {
            assert!(matches!(
                interpret_attendance(StatusCode::OK, &body(value)),
                Err(AttendError::Parse)
            ));
        }
        assert!(matches!(
            interpret_attendance(StatusCode::OK, b"not json"),
            Err(AttendError::Parse)
        ));
    }

    #[test]
    fn attendance_error_detail_is_surfaced() {
        let err = interpret_attendance(
            StatusCode::BAD_REQUEST,
            &body(json!({ "detail": "No face detected in image" })),
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "No face detected in image");

        let err = interpret_attendance(StatusCode::BAD_GATEWAY, b"").unwrap_err();
        assert_eq!(err.user_message(), "Attendance marking failed");
    }
}

//! Everything that crosses the wire to the recognition service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::capture::FaceImage;
use crate::identity::IdentityDraft;
use crate::Result;

mod http;
pub mod multipart;
mod response;

pub use http::HttpBackend;
pub use multipart::{MultipartPayload, PartValue, FACE_IMAGE_FIELD, FACE_IMAGE_FILENAME};
pub use response::{
    interpret_attendance, interpret_registration, NO_MATCH_MESSAGES,
};

/// Fields sent when registering a new identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub face: FaceImage,
}

impl RegistrationRequest {
    /// The draft is expected to be validated already.
    pub fn new(draft: &IdentityDraft, face: FaceImage) -> Self {
        Self {
            user_id: draft.user_id().to_owned(),
            name: draft.full_name(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            face,
        }
    }

    pub fn payload(&self) -> MultipartPayload {
        MultipartPayload::new()
            .face(&self.face)
            .text("user_id", &self.user_id)
            .text("name", &self.name)
            .text("email", &self.email)
            .text("phone", &self.phone)
    }
}

pub fn attendance_payload(face: &FaceImage) -> MultipartPayload {
    MultipartPayload::new().face(face)
}

/// Body of a successful registration. Its shape is owned by the service and
/// only kept for display and logging.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RegistrationReceipt(pub serde_json::Value);

impl RegistrationReceipt {
    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(|m| m.as_str())
    }
}

/// A recognized identity, as reported by the service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AttendanceRecord {
    pub user_id: String,
    pub name: String,
    pub timestamp: String,
    /// Match quality in `[0, 1]`.
    pub confidence: f64,
    /// Image reference of the registered face, when the service sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_face_image: Option<String>,
}

impl AttendanceRecord {
    /// Two decimals, with exact halves rounded away from zero.
    pub fn confidence_percent(&self) -> String {
        let percent = self.confidence * 100.0;
        // An exact tie at the third decimal is a multiple of 1/8.
        let eighths = percent * 8.0;
        if eighths.fract() != 0.0 || eighths % 2.0 == 0.0 {
            return format!("{:.2}%", percent);
        }
        let hundredths = (percent * 100.0).round() as i64;
        let sign = if hundredths < 0 { "-" } else { "" };
        let hundredths = hundredths.unsigned_abs();
        format!("{}{}.{:02}%", sign, hundredths / 100, hundredths % 100)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttendanceVerdict {
    Matched(AttendanceRecord),
    /// The call went through but nobody matched; carries the service's
    /// message.
    NoMatch(String),
}

/// The recognition service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationReceipt>;

    async fn mark_attendance(
        &self,
        face: &FaceImage,
    ) -> Result<AttendanceVerdict>;
}

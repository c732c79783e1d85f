use faceattend::AttendError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No screen is served at {0}")]
    UnknownRoute(String),

    #[error("Registration form has {0} invalid field(s)")]
    InvalidForm(usize),

    #[error("No face image was provided")]
    MissingImage,

    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    #[error("Attendance was not marked")]
    AttendanceNotMarked,

    #[error("Camera could not be opened")]
    CameraUnavailable,

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    AttendError(#[from] AttendError),
}

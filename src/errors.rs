use thiserror::Error;

pub type Result<T> = std::result::Result<T, AttendError>;

#[derive(Error, Debug)]
pub enum AttendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{detail}")]
    Server { status: u16, detail: String },
    #[error("{0}")]
    Rejected(String),
    #[error("Image decoding error: {0}")]
    Decode(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Parsing error")]
    Parse,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("Camera access was denied")]
    PermissionDenied,
    #[error("Camera is unavailable: {0}")]
    Unavailable(String),
    #[error("Camera has been released")]
    Released,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Image size should be less than 5MB ({size} bytes given)")]
    TooLarge { size: u64 },
    #[error("Image file is empty")]
    Empty,
    #[error("File is not a supported image")]
    NotAnImage,
}

impl AttendError {
    /// Message suitable for showing to the person at the screen.
    pub fn user_message(&self) -> String {
        match self {
            AttendError::Server { detail, .. } => detail.clone(),
            AttendError::Rejected(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for AttendError {
    fn from(_: serde_json::Error) -> Self {
        Self::Parse
    }
}

impl From<base64::DecodeError> for AttendError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<url::ParseError> for AttendError {
    fn from(e: url::ParseError) -> Self {
        Self::Config(e.to_string())
    }
}

//! Client side of a face-recognition attendance system.
//!
//! The crate acquires a face photo (from a camera or an uploaded file),
//! validates the registration form, packages both into a multipart
//! submission and hands it to the remote recognition service. Matching,
//! storage and identity confidence all live in that service; this crate only
//! drives the capture-and-submit workflow and reconciles the answer into
//! state a front end can render.

#[macro_use]
extern crate lazy_static;

pub mod capture;
pub mod config;
pub mod errors;
pub mod identity;
pub mod notify;
pub mod screen;
pub mod transport;
pub mod workflow;

pub use capture::{CapturedImage, FaceImage, ImageSource};
pub use config::ApiConfig;
pub use errors::{AttendError, CameraError, Result, UploadError};
pub use identity::{Field, FieldErrors, IdentityDraft};
pub use notify::{Notification, Notifier, Progress, Tone};
pub use screen::{Redirect, Screen};
pub use transport::{
    AttendanceRecord, AttendanceVerdict, Backend, HttpBackend,
    RegistrationReceipt, RegistrationRequest,
};

pub const KILOBYTE: u64 = 1024;
pub const MEGABYTE: u64 = 1024 * KILOBYTE;

/// Uploads above this size are refused before the file is read.
pub const MAX_UPLOAD_BYTES: u64 = 5 * MEGABYTE;

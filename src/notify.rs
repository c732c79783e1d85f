//! User-facing notifications emitted by the workflows.

use std::time::Duration;

use crate::capture::ImageSource;
use crate::{AttendError, CameraError};

pub const VERIFY_NOTIFICATION_ID: &str = "verify-notification";
pub const REGISTER_NOTIFICATION_ID: &str = "register-notification";

const SHORT: Duration = Duration::from_millis(3000);
const LONG: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Option<&'static str>,
    pub title: String,
    pub message: String,
    pub tone: Tone,
    /// `None` keeps the notification up until it is dismissed.
    pub auto_close: Option<Duration>,
    pub loading: bool,
}

impl Notification {
    pub fn new<T, M>(tone: Tone, title: T, message: M) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Self {
            id: None,
            title: title.into(),
            message: message.into(),
            tone,
            auto_close: None,
            loading: false,
        }
    }

    pub fn error<M: Into<String>>(message: M) -> Self {
        Self::new(Tone::Error, "Error", message)
    }

    pub fn success<M: Into<String>>(message: M) -> Self {
        Self::new(Tone::Success, "Success", message)
    }

    fn closing_after(mut self, after: Duration) -> Self {
        self.auto_close = Some(after);
        self
    }

    pub fn missing_image(source: ImageSource) -> Self {
        match source {
            ImageSource::Camera => Self::error("Please capture a face image"),
            ImageSource::Upload => Self::error("Please upload a face image"),
        }
    }

    pub fn upload_too_large() -> Self {
        Self::error("Image size should be less than 5MB")
    }

    pub fn registered() -> Self {
        Self::success("Registration successful!")
    }

    /// Indeterminate progress shown while a face is being verified. It has
    /// no timer of its own; see [`Progress`].
    pub fn verifying() -> Self {
        Self {
            id: Some(VERIFY_NOTIFICATION_ID),
            loading: true,
            ..Self::new(
                Tone::Info,
                "Verifying",
                "Please wait while we verify your face...",
            )
        }
    }

    /// Shown while a registration is on its way to the service.
    pub fn registering() -> Self {
        Self {
            id: Some(REGISTER_NOTIFICATION_ID),
            loading: true,
            ..Self::new(Tone::Info, "Registering", "Registering your face...")
        }
    }

    pub fn registration_required() -> Self {
        Self::new(
            Tone::Warning,
            "Registration Required",
            "No matching face found. Please register yourself in the system first.",
        )
        .closing_after(LONG)
    }

    pub fn attendance_marked() -> Self {
        Self::success("Attendance marked successfully!").closing_after(SHORT)
    }

    pub fn verification_failed() -> Self {
        Self::error("Face verification failed. Please try again.")
            .closing_after(SHORT)
    }

    pub fn camera_denied() -> Self {
        Self::new(
            Tone::Error,
            "Camera Unavailable",
            "Camera access was denied. Allow camera access and try again.",
        )
    }

    pub fn camera_unavailable<M: Into<String>>(message: M) -> Self {
        Self::new(Tone::Error, "Camera Unavailable", message)
    }

    /// Notification for a failed camera open or snapshot.
    pub fn for_camera_error(err: &AttendError) -> Self {
        match err {
            AttendError::Camera(CameraError::PermissionDenied) => {
                Self::camera_denied()
            }
            AttendError::Camera(other) => {
                Self::camera_unavailable(other.to_string())
            }
            other => Self::error(other.user_message()),
        }
    }
}

/// Where notifications end up: a toast area, a terminal, a log.
pub trait Notifier {
    fn show(&self, notification: Notification);

    fn dismiss(&self, id: &str);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn show(&self, notification: Notification) {
        (**self).show(notification)
    }

    fn dismiss(&self, id: &str) {
        (**self).dismiss(id)
    }
}

/// Keeps a loading notification up for exactly as long as the guard lives,
/// so the indicator disappears when the awaited work does.
pub struct Progress<'a, N: Notifier + ?Sized> {
    notifier: &'a N,
    id: &'static str,
}

impl<'a, N: Notifier + ?Sized> Progress<'a, N> {
    pub fn start(notifier: &'a N, mut notification: Notification) -> Self {
        let id = *notification.id.get_or_insert("progress");
        notification.auto_close = None;
        notification.loading = true;
        notifier.show(notification);
        Self { notifier, id }
    }

    pub fn finish(self) {}
}

impl<N: Notifier + ?Sized> Drop for Progress<'_, N> {
    fn drop(&mut self) {
        self.notifier.dismiss(self.id);
    }
}

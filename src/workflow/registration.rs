use std::path::Path;

use crate::capture::{
    load_upload, CameraHandle, CaptureSlot, CapturedImage, FrameSource,
    ImageSource,
};
use crate::identity::{Field, FieldErrors, IdentityDraft};
use crate::notify::{Notification, Notifier, Progress};
use crate::screen::Redirect;
use crate::transport::{Backend, RegistrationReceipt, RegistrationRequest};
use crate::{AttendError, Result, UploadError};

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationState {
    pub draft: IdentityDraft,
    pub errors: FieldErrors,
    /// Where the face photo is expected to come from.
    pub mode: ImageSource,
    pub image: CaptureSlot,
    pub loading: bool,
    pub registered: bool,
}

impl RegistrationState {
    pub fn new(mode: ImageSource) -> Self {
        Self::with_draft(IdentityDraft::new(), mode)
    }

    pub fn with_draft(draft: IdentityDraft, mode: ImageSource) -> Self {
        Self {
            draft,
            errors: FieldErrors::default(),
            mode,
            image: CaptureSlot::default(),
            loading: false,
            registered: false,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.registered
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationAction {
    Edit(Field, String),
    SetMode(ImageSource),
    ImageAcquired(CapturedImage),
    Retake,
    ValidationFailed(FieldErrors),
    SubmitStarted,
    SubmitSucceeded,
    SubmitFailed,
}

pub fn reduce(
    state: &RegistrationState,
    action: RegistrationAction,
) -> RegistrationState {
    let mut next = state.clone();
    match action {
        RegistrationAction::Edit(field, value) => {
            next.draft.set(field, value);
            next.errors.clear(field);
        }
        RegistrationAction::SetMode(mode) => {
            if next.mode != mode {
                next.mode = mode;
                next.image.retake();
            }
        }
        RegistrationAction::ImageAcquired(image) => {
            next.mode = image.source();
            next.image.store(image);
        }
        RegistrationAction::Retake => next.image.retake(),
        RegistrationAction::ValidationFailed(errors) => next.errors = errors,
        RegistrationAction::SubmitStarted => {
            next.loading = true;
            next.errors = FieldErrors::default();
        }
        RegistrationAction::SubmitSucceeded => {
            next.loading = false;
            next.registered = true;
        }
        RegistrationAction::SubmitFailed => next.loading = false,
    }
    next
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    /// A submission is already running or the identity is registered.
    Busy,
    Invalid(FieldErrors),
    MissingImage,
    Failed(String),
    Registered {
        receipt: RegistrationReceipt,
        redirect: Redirect,
    },
}

pub struct RegistrationFlow;

impl RegistrationFlow {
    /// Takes a user-selected file as the face photo. A rejected file leaves
    /// the current image in place.
    pub fn upload<P, N>(
        state: &RegistrationState,
        path: P,
        notifier: &N,
    ) -> RegistrationState
    where
        P: AsRef<Path>,
        N: Notifier + ?Sized,
    {
        match load_upload(path) {
            Ok(image) => {
                reduce(state, RegistrationAction::ImageAcquired(image))
            }
            Err(AttendError::Upload(UploadError::TooLarge { size })) => {
                log::info!("Upload of {} bytes refused", size);
                notifier.show(Notification::upload_too_large());
                state.clone()
            }
            Err(e) => {
                log::warn!("Upload failed: {}", e);
                notifier.show(Notification::error(e.user_message()));
                state.clone()
            }
        }
    }

    /// Snapshots the open camera as the face photo.
    pub fn capture<S, N>(
        state: &RegistrationState,
        camera: &mut CameraHandle<S>,
        notifier: &N,
    ) -> RegistrationState
    where
        S: FrameSource,
        N: Notifier + ?Sized,
    {
        match camera.capture() {
            Ok(image) => {
                reduce(state, RegistrationAction::ImageAcquired(image))
            }
            Err(e) => {
                log::warn!("Capture failed: {}", e);
                notifier.show(Notification::for_camera_error(&e));
                state.clone()
            }
        }
    }

    pub async fn submit<B, N>(
        state: &RegistrationState,
        backend: &B,
        notifier: &N,
    ) -> (RegistrationState, RegistrationOutcome)
    where
        B: Backend + ?Sized,
        N: Notifier + ?Sized,
    {
        if !state.can_submit() {
            return (state.clone(), RegistrationOutcome::Busy);
        }

        if let Err(errors) = state.draft.validate() {
            log::debug!("Registration blocked by {} invalid fields", errors.len());
            let next =
                reduce(state, RegistrationAction::ValidationFailed(errors.clone()));
            return (next, RegistrationOutcome::Invalid(errors));
        }

        let image = match state.image.current() {
            Some(image) => image.clone(),
            None => {
                notifier.show(Notification::missing_image(state.mode));
                return (state.clone(), RegistrationOutcome::MissingImage);
            }
        };

        let loading = reduce(state, RegistrationAction::SubmitStarted);
        let progress = Progress::start(notifier, Notification::registering());
        let sent = Self::send(&loading.draft, &image, backend).await;
        progress.finish();

        match sent {
            Ok(receipt) => {
                log::info!("Registered user {}", loading.draft.user_id());
                notifier.show(Notification::registered());
                let outcome = RegistrationOutcome::Registered {
                    receipt,
                    redirect: Redirect::home_after_registration(),
                };
                (reduce(&loading, RegistrationAction::SubmitSucceeded), outcome)
            }
            Err(e) => {
                let message = e.user_message();
                log::warn!("Registration failed: {}", e);
                notifier.show(Notification::error(message.clone()));
                (
                    reduce(&loading, RegistrationAction::SubmitFailed),
                    RegistrationOutcome::Failed(message),
                )
            }
        }
    }

    async fn send<B>(
        draft: &IdentityDraft,
        image: &CapturedImage,
        backend: &B,
    ) -> Result<RegistrationReceipt>
    where
        B: Backend + ?Sized,
    {
        let face = image.decode()?;
        let request = RegistrationRequest::new(draft, face);
        backend.register(&request).await
    }
}

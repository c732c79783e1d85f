use crate::capture::{
    CameraDevice, CameraHandle, CaptureSlot, CapturedImage, FrameSource,
};
use crate::notify::{Notification, Notifier, Progress};
use crate::transport::{AttendanceRecord, AttendanceVerdict, Backend};
use crate::Result;

/// `Idle -> Capturing -> Verifying -> {Matched | NoMatch | Failed}`; the
/// next capture trigger starts over from any terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttendancePhase {
    #[default]
    Idle,
    Capturing,
    Verifying,
    Matched,
    NoMatch,
    Failed,
}

impl AttendancePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AttendancePhase::Matched
                | AttendancePhase::NoMatch
                | AttendancePhase::Failed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttendanceState {
    pub phase: AttendancePhase,
    pub loading: bool,
    pub captured: CaptureSlot,
    pub result: Option<AttendanceRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttendanceAction {
    CaptureStarted,
    Captured(CapturedImage),
    Matched(AttendanceRecord),
    NoMatch,
    Failed,
    Reset,
}

pub fn reduce(
    state: &AttendanceState,
    action: AttendanceAction,
) -> AttendanceState {
    let mut next = state.clone();
    match action {
        AttendanceAction::CaptureStarted => {
            next.phase = AttendancePhase::Capturing;
            next.loading = true;
            next.result = None;
        }
        AttendanceAction::Captured(image) => {
            next.phase = AttendancePhase::Verifying;
            next.captured.store(image);
        }
        AttendanceAction::Matched(record) => {
            next.phase = AttendancePhase::Matched;
            next.loading = false;
            next.result = Some(record);
        }
        AttendanceAction::NoMatch => {
            next.phase = AttendancePhase::NoMatch;
            next.loading = false;
            next.captured.retake();
            next.result = None;
        }
        AttendanceAction::Failed => {
            next.phase = AttendancePhase::Failed;
            next.loading = false;
            next.captured.retake();
            next.result = None;
        }
        AttendanceAction::Reset => next = AttendanceState::default(),
    }
    next
}

pub struct AttendanceFlow;

impl AttendanceFlow {
    /// Opens the camera for the lifetime of the attendance screen. A refused
    /// camera is reported and leaves the screen in `Failed`.
    pub fn mount<D, N>(
        device: &D,
        notifier: &N,
    ) -> (AttendanceState, Option<CameraHandle<D::Source>>)
    where
        D: CameraDevice,
        N: Notifier + ?Sized,
    {
        match CameraHandle::open(device) {
            Ok(handle) => (AttendanceState::default(), Some(handle)),
            Err(e) => {
                log::warn!("Camera could not be opened: {}", e);
                notifier.show(Notification::for_camera_error(&e));
                let state =
                    reduce(&AttendanceState::default(), AttendanceAction::Failed);
                (state, None)
            }
        }
    }

    /// Snapshots the camera and asks the service who it is. Loading is
    /// cleared on every way out.
    pub async fn capture_and_verify<S, B, N>(
        state: &AttendanceState,
        camera: &mut CameraHandle<S>,
        backend: &B,
        notifier: &N,
    ) -> AttendanceState
    where
        S: FrameSource,
        B: Backend + ?Sized,
        N: Notifier + ?Sized,
    {
        if state.loading {
            log::debug!("Verification already running, ignoring trigger");
            return state.clone();
        }

        let capturing = reduce(state, AttendanceAction::CaptureStarted);
        let progress = Progress::start(notifier, Notification::verifying());

        let image = match camera.capture() {
            Ok(image) => image,
            Err(e) => {
                progress.finish();
                log::warn!("Capture failed: {}", e);
                notifier.show(Notification::for_camera_error(&e));
                return reduce(&capturing, AttendanceAction::Failed);
            }
        };

        let verifying =
            reduce(&capturing, AttendanceAction::Captured(image.clone()));
        let verdict = Self::verify(&image, backend).await;
        progress.finish();

        match verdict {
            Ok(AttendanceVerdict::Matched(record)) => {
                log::info!(
                    "Attendance marked for {} ({}) at {}",
                    record.name,
                    record.user_id,
                    record.confidence_percent()
                );
                notifier.show(Notification::attendance_marked());
                reduce(&verifying, AttendanceAction::Matched(record))
            }
            Ok(AttendanceVerdict::NoMatch(message)) => {
                log::info!("No match: {}", message);
                notifier.show(Notification::registration_required());
                reduce(&verifying, AttendanceAction::NoMatch)
            }
            Err(e) => {
                log::warn!("Verification failed: {}", e);
                notifier.show(Notification::verification_failed());
                reduce(&verifying, AttendanceAction::Failed)
            }
        }
    }

    async fn verify<B>(
        image: &CapturedImage,
        backend: &B,
    ) -> Result<AttendanceVerdict>
    where
        B: Backend + ?Sized,
    {
        let face = image.decode()?;
        backend.mark_attendance(&face).await
    }
}

use std::path::PathBuf;

use faceattend::capture::FrameFileCamera;
use faceattend::workflow::{AttendanceFlow, AttendancePhase};
use faceattend::{HttpBackend, Screen};

use crate::{provide_config, AppError, TerminalNotifier};

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "attend", about = "Capture a face and mark attendance")]
pub struct Attend {
    #[clap(
        long,
        value_parser,
        help = "Image file holding the camera's latest frame"
    )]
    frame: PathBuf,
}

impl Attend {
    pub async fn run(&self, api_url: &Option<String>) -> Result<(), AppError> {
        let backend = HttpBackend::new(provide_config(api_url)?)?;
        let notifier = TerminalNotifier;

        println!("{}", Screen::Attendance.title());
        let (state, camera) =
            AttendanceFlow::mount(&FrameFileCamera::new(&self.frame), &notifier);
        let mut camera = camera.ok_or(AppError::CameraUnavailable)?;

        let state = AttendanceFlow::capture_and_verify(
            &state,
            &mut camera,
            &backend,
            &notifier,
        )
        .await;
        camera.close();

        match (state.phase, &state.result) {
            (AttendancePhase::Matched, Some(record)) => {
                println!();
                println!("Attendance Marked Successfully!");
                println!("  Name:       {}", record.name);
                println!("  User ID:    {}", record.user_id);
                println!("  Time:       {}", record.timestamp);
                println!("  Confidence: {}", record.confidence_percent());
                if record.registered_face_image.is_some() {
                    println!("  Registered face image received");
                }
                println!("Attendance marked for {} today", record.name);
                Ok(())
            }
            _ => Err(AppError::AttendanceNotMarked),
        }
    }
}

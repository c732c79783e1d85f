use std::path::PathBuf;

use faceattend::capture::{CameraHandle, FrameFileCamera, GUIDELINES};
use faceattend::workflow::registration::reduce;
use faceattend::workflow::{
    RegistrationAction, RegistrationFlow, RegistrationOutcome,
    RegistrationState,
};
use faceattend::{Field, HttpBackend, ImageSource, Notification, Notifier, Screen};

use crate::commands::render_screen;
use crate::{provide_config, AppError, TerminalNotifier};

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "register", about = "Register a new user with a face photo")]
pub struct Register {
    #[clap(long, help = "First name")]
    first_name: Option<String>,
    #[clap(long, help = "Last name")]
    last_name: Option<String>,
    #[clap(long, help = "Email address")]
    email: Option<String>,
    #[clap(long, help = "Phone number, 10 digits")]
    phone: Option<String>,
    #[clap(
        long,
        value_parser,
        conflicts_with = "image",
        help = "Image file holding the camera's latest frame"
    )]
    frame: Option<PathBuf>,
    #[clap(long, value_parser, help = "Face photo to upload (5MB at most)")]
    image: Option<PathBuf>,
}

impl Register {
    pub async fn run(&self, api_url: &Option<String>) -> Result<(), AppError> {
        let backend = HttpBackend::new(provide_config(api_url)?)?;
        let notifier = TerminalNotifier;

        let mode = if self.image.is_some() {
            ImageSource::Upload
        } else {
            ImageSource::Camera
        };
        let mut state = RegistrationState::new(mode);

        println!("{}", Screen::Register.title());
        println!("Unique ID: {}", state.draft.user_id());
        println!("Face image guidelines:");
        for guideline in GUIDELINES {
            println!("  - {}", guideline);
        }

        for (field, value) in [
            (Field::FirstName, &self.first_name),
            (Field::LastName, &self.last_name),
            (Field::Email, &self.email),
            (Field::Phone, &self.phone),
        ] {
            if let Some(value) = value {
                state = reduce(
                    &state,
                    RegistrationAction::Edit(field, value.clone()),
                );
            }
        }

        if let Some(path) = &self.image {
            state = RegistrationFlow::upload(&state, path, &notifier);
        } else if let Some(path) = &self.frame {
            match CameraHandle::open(&FrameFileCamera::new(path)) {
                Ok(mut camera) => {
                    state =
                        RegistrationFlow::capture(&state, &mut camera, &notifier);
                }
                Err(e) => {
                    notifier.show(Notification::for_camera_error(&e));
                    return Err(AppError::CameraUnavailable);
                }
            }
        }

        let (state, outcome) =
            RegistrationFlow::submit(&state, &backend, &notifier).await;
        match outcome {
            RegistrationOutcome::Registered { redirect, .. } => {
                println!(
                    "Registered {} with ID {}",
                    state.draft.full_name(),
                    state.draft.user_id()
                );
                render_screen(redirect.wait().await);
                Ok(())
            }
            RegistrationOutcome::Invalid(errors) => {
                for (field, message) in errors.iter() {
                    eprintln!("  {}: {}", field, message);
                }
                Err(AppError::InvalidForm(errors.len()))
            }
            RegistrationOutcome::MissingImage => Err(AppError::MissingImage),
            RegistrationOutcome::Failed(message) => {
                Err(AppError::RegistrationFailed(message))
            }
            RegistrationOutcome::Busy => Ok(()),
        }
    }
}

use faceattend::screen::{APP_TAGLINE, FEATURES};
use faceattend::Screen;

use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "landing", about = "Show a screen and how to reach it")]
pub struct Landing {
    #[clap(default_value = "/", help = "Route of the screen, e.g. /register")]
    path: String,
}

impl Landing {
    pub fn run(&self) -> Result<(), AppError> {
        let screen = Screen::from_path(&self.path)
            .ok_or_else(|| AppError::UnknownRoute(self.path.clone()))?;
        render_screen(screen);
        Ok(())
    }
}

pub fn render_screen(screen: Screen) {
    println!("{}", screen.title());
    match screen {
        Screen::Landing => {
            println!("{}\n", APP_TAGLINE);
            for (title, description) in FEATURES {
                println!("  {:<12} {}", title, description);
            }
            println!();
            println!("Register New User   attend-cli register --help");
            println!("Mark Attendance     attend-cli attend --help");
        }
        Screen::Register => {
            println!("Fill in your details and provide a face photo:");
            println!("  attend-cli register --first-name .. --last-name .. --email .. --phone .. (--frame PATH | --image PATH)");
        }
        Screen::Attendance => {
            println!("Look into the camera and run:");
            println!("  attend-cli attend --frame PATH");
        }
    }
}

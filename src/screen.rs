use std::fmt;
use std::time::Duration;

pub const APP_TITLE: &str = "Face Recognition Attendance System";
pub const APP_TAGLINE: &str = "Experience the future of attendance management with our advanced face recognition technology";

pub const FEATURES: [(&str, &str); 3] = [
    (
        "Secure",
        "Advanced face recognition algorithms ensure accurate identification",
    ),
    (
        "Fast",
        "Mark attendance in seconds with real-time processing",
    ),
    (
        "Easy to Use",
        "Simple interface for quick registration and attendance",
    ),
];

/// Pause between a successful registration and returning to the landing
/// screen.
pub const REGISTERED_REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Landing,
    Register,
    Attendance,
}

impl Screen {
    pub const ALL: [Screen; 3] =
        [Screen::Landing, Screen::Register, Screen::Attendance];

    pub fn path(&self) -> &'static str {
        match self {
            Screen::Landing => "/",
            Screen::Register => "/register",
            Screen::Attendance => "/attendance",
        }
    }

    pub fn from_path(path: &str) -> Option<Screen> {
        let trimmed = path.trim_end_matches('/');
        Screen::ALL.into_iter().find(|screen| {
            screen.path().trim_end_matches('/') == trimmed
        })
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Landing => APP_TITLE,
            Screen::Register => "User Registration",
            Screen::Attendance => "Mark Attendance",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Navigation requested by a workflow, to happen after `after` elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: Screen,
    pub after: Duration,
}

impl Redirect {
    pub fn home_after_registration() -> Self {
        Self {
            to: Screen::Landing,
            after: REGISTERED_REDIRECT_DELAY,
        }
    }

    pub async fn wait(&self) -> Screen {
        tokio::time::sleep(self.after).await;
        self.to
    }
}

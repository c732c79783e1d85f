use faceattend::{Notification, Notifier, Tone};

/// Prints notifications as terminal lines; errors go to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn show(&self, notification: Notification) {
        let marker = match notification.tone {
            Tone::Info if notification.loading => "[....]",
            Tone::Info => "[info]",
            Tone::Success => "[ ok ]",
            Tone::Warning => "[warn]",
            Tone::Error => "[fail]",
        };
        let line = format!(
            "{} {}: {}",
            marker, notification.title, notification.message
        );
        match notification.tone {
            Tone::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }

    fn dismiss(&self, id: &str) {
        log::debug!("Notification {} dismissed", id);
    }
}

use clap::Subcommand;

mod attend;
mod landing;
mod register;

pub use landing::render_screen;

#[derive(Debug, Subcommand)]
pub enum Commands {
    Landing(landing::Landing),
    Register(register::Register),
    Attend(attend::Attend),
}

use clap::Parser;
use faceattend::ApiConfig;

mod commands;
mod error;
mod notifier;

use commands::Commands;
pub use error::AppError;
pub use notifier::TerminalNotifier;

#[derive(Parser, Debug)]
#[clap(name = "attend-cli")]
#[clap(about = "Register faces and mark attendance", long_about = None)]
struct Cli {
    #[clap(
        long,
        global = true,
        help = "Base URL of the recognition service (defaults to $ATTENDANCE_API_URL)"
    )]
    api_url: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

pub fn provide_config(api_url: &Option<String>) -> Result<ApiConfig, AppError> {
    let config = match api_url {
        Some(url) => ApiConfig::new(url)?,
        None => ApiConfig::from_env()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Cli::parse();

    let result = match &args.command {
        Commands::Landing(landing) => landing.run(),
        Commands::Register(register) => register.run(&args.api_url).await,
        Commands::Attend(attend) => attend.run(&args.api_url).await,
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

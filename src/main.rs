//! Brickout entry point
//!
//! Usage: `brickout [settings.json]`

use std::path::PathBuf;
use std::process::ExitCode;

use brickout::Settings;
use brickout::app::App;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Brickout starting...");

    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);

    let result = Settings::load(settings_path.as_deref()).and_then(App::run);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

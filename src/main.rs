//! Mini Arcade entry point
//!
//! Sets up logging, loads settings and runs the menu on the terminal.

use std::fs::File;
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};

use mini_arcade::Settings;
use mini_arcade::app;
use mini_arcade::renderer::{Surface, TerminalRenderer};
use mini_arcade::settings::SETTINGS_FILE;

/// Log file in the working directory (stderr would garble the raw-mode screen)
const LOG_FILE: &str = "mini_arcade.log";

fn init_logging() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    match File::create(LOG_FILE) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("Could not create {}: {}; logging to stderr", LOG_FILE, e),
    }
    builder.init();
}

fn main() -> io::Result<()> {
    init_logging();
    log::info!("Mini Arcade starting...");

    let settings_path = Path::new(SETTINGS_FILE);
    let settings = Settings::load(settings_path);
    // First run: leave an editable copy of the defaults behind
    if !settings_path.exists() {
        if let Err(e) = settings.save(settings_path) {
            log::warn!("Could not write {}: {}", settings_path.display(), e);
        }
    }
    let mut renderer = TerminalRenderer::new(settings.show_fps);
    renderer.init()?;

    let result = app::run_menu(&mut renderer, &settings);
    renderer.cleanup()?;

    if let Err(e) = &result {
        log::error!("Terminal error: {}", e);
    }
    log::info!("Mini Arcade exiting");
    result
}

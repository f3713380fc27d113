//! Hidden House
//!
//! Console presentation of the house scene. Reads commands from stdin, forwards
//! clicks and timer ticks to the engine, and prints the session after each command.
//!
//! Usage: `hidden_house [path/to/scene.toml]`

mod console;

use std::error::Error;
use std::io;

use seek_engine::foundation::logging;
use seek_engine::prelude::*;

use console::ConsoleApp;

const DEFAULT_CONFIG: &str = "resources/config/house.toml";

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let config = GameConfig::load_from_file(&path)?;
    logging::init_with_level(&config.engine.log_level);
    log::info!("Loaded scene '{}' from {}", config.scene.name, path);
    config.validate()?;

    let mut app = ConsoleApp::new(config)?;
    app.run(io::stdin().lock(), io::stdout().lock())?;

    log::info!("Goodbye");
    Ok(())
}

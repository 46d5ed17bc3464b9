use std::fs::OpenOptions;

use color_eyre::Result;
use env_logger::{Builder, Env, Target};

use crate::config::AppConfig;

/// Installs the logger. While the dashboard owns the screen, records go to
/// the configured log file; in headless mode they go to stderr.
pub fn init(config: &AppConfig, headless: bool) -> Result<()> {
    let default_level = if config.debug { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().filter_or("FIREWATCH_LOG", default_level));

    if headless {
        builder.target(Target::Stderr);
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init()?;
    log::debug!("logging initialised (headless: {headless})");
    Ok(())
}

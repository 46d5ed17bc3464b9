mod app;
mod cli;
mod config;
mod event;
mod feed;
mod logging;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Flags are applied as environment overrides so one loader covers both.
    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}\n\n{}", CliArgs::help_text());
            return Err(e.into());
        }
    };

    let headless = args.headless || !is_terminal();
    logging::init(&config, headless)?;

    if headless {
        return event::run_headless(&config, args.json).await;
    }

    let boundary = feed::load_boundary(&config.boundary);
    let refresher = feed::spawn_refresher(&config)?;
    let mut app = App::new(boundary);

    let mut terminal = match terminal::setup() {
        Ok(terminal) => terminal,
        Err(e) => {
            refresher.stop().await;
            return Err(e);
        }
    };

    let result = event::run(&mut terminal, &mut app, &refresher).await;

    terminal::cleanup(true, true);
    refresher.stop().await;

    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}

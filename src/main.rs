pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod core;
pub mod directions;
pub mod grip;
pub mod mode;
pub mod navigation;
pub mod screens;
pub mod settings;
pub mod speech;
pub mod timer;
pub mod tui;
pub mod utils;

use clap::Parser;
use cli::Cli;
use color_eyre::eyre::Result;

use crate::{
  app::App,
  config::Config,
  utils::{initialize_logging, initialize_panic_handler},
};

async fn tokio_main() -> Result<()> {
  initialize_logging()?;

  initialize_panic_handler()?;

  let args = Cli::parse();
  let mut config = Config::new()?;
  if let Some(provider) = args.provider {
    config.directions.provider = provider;
  }
  tracing::info!(provider = %config.directions.provider, "Starting guidecane");
  let mut app = App::new(config, args.tick_rate, args.frame_rate)?;
  app.run().await?;

  Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
  if let Err(e) = tokio_main().await {
    eprintln!("{} error: Something went wrong", env!("CARGO_PKG_NAME"));
    Err(e)
  } else {
    Ok(())
  }
}

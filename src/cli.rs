use clap::Parser;

use crate::{directions::ProviderKind, utils::version};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
  #[arg(short, long, value_name = "FLOAT", help = "Tick rate, i.e. number of ticks per second", default_value_t = 4.0)]
  pub tick_rate: f64,

  #[arg(
    short,
    long,
    value_name = "FLOAT",
    help = "Frame rate, i.e. number of frames per second",
    default_value_t = 16.0
  )]
  pub frame_rate: f64,

  #[arg(short, long, value_name = "PROVIDER", help = "Directions provider: demo or gemini")]
  pub provider: Option<ProviderKind>,
}

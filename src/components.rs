pub mod chrome;
pub mod form;
pub mod grip;
pub mod header;
pub mod list;
pub mod select;
pub mod style;

use color_eyre::eyre::Result;
use ratatui::prelude::*;

pub trait Drawable {
  fn draw(&self, f: &mut Frame<'_>, area: Rect, selected: bool) -> Result<()>;
}

use std::fmt::Display;

use color_eyre::eyre::Result;
use ratatui::{prelude::Rect, Frame};
use strum::IntoEnumIterator;

use super::style::{button, columns};

/// Horizontal row of buttons, one per enum variant.
pub struct Select<T> {
  items: Vec<T>,
  selected: usize,
}

impl<T> Select<T>
where
  T: IntoEnumIterator + Display + Clone,
{
  pub fn next(&mut self) {
    let max_index = self.items.len().saturating_sub(1);
    self.select(max_index.min(self.selected + 1));
  }

  pub fn previous(&mut self) {
    self.select(self.selected.saturating_sub(1));
  }

  pub fn select(&mut self, pos: usize) {
    self.selected = pos
  }

  pub fn selected(&self) -> T {
    self.items[self.selected].clone()
  }

  pub fn draw(&self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    self.draw_with(f, area, |item| item.to_string())
  }

  /// Draws with custom labels, e.g. when a label depends on screen state.
  pub fn draw_with(
    &self,
    f: &mut Frame<'_>,
    area: Rect,
    label: impl Fn(&T) -> String,
  ) -> Result<()> {
    let layout = columns(area, self.items.len() as u16);
    for (index, item) in self.items.iter().enumerate() {
      let text = label(item);
      let is_selected = self.selected == index;
      f.render_widget(button(&text, is_selected), layout[index]);
    }
    Ok(())
  }
}

impl<T> Default for Select<T>
where
  T: IntoEnumIterator,
{
  fn default() -> Self {
    Select { items: T::iter().collect(), selected: 0 }
  }
}

#[cfg(test)]
mod tests {
  use strum::{Display, EnumIter};

  use super::*;

  #[derive(Debug, Clone, PartialEq, EnumIter, Display)]
  enum Choice {
    A,
    B,
    C,
  }

  #[test]
  fn selection_stays_in_bounds() {
    let mut select = Select::<Choice>::default();
    select.previous();
    assert_eq!(select.selected(), Choice::A);
    select.next();
    select.next();
    select.next();
    assert_eq!(select.selected(), Choice::C);
    select.previous();
    assert_eq!(select.selected(), Choice::B);
  }
}

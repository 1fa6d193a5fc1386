use color_eyre::eyre::Result;
use ratatui::prelude::*;

use super::Drawable;

/// Vertical list with an optional highlighted row, scrolled to keep it visible.
pub struct List<T: Drawable> {
  items: Vec<T>,
  selected: Option<usize>,
  item_height: u16,
}

impl<T: Drawable> List<T> {
  pub fn new(items: Vec<T>, item_height: u16) -> Self {
    Self { items, selected: None, item_height: item_height.max(1) }
  }

  pub fn items(&self) -> &[T] {
    &self.items
  }

  pub fn selected(&self) -> Option<usize> {
    self.selected
  }

  pub fn selected_item(&self) -> Option<&T> {
    self.selected.and_then(|i| self.items.get(i))
  }

  pub fn selected_item_mut(&mut self) -> Option<&mut T> {
    self.selected.and_then(|i| self.items.get_mut(i))
  }

  /// Moves down; returns false when already on the last item.
  pub fn next(&mut self) -> bool {
    match self.selected {
      Some(i) if i + 1 >= self.items.len() => false,
      Some(i) => {
        self.select(Some(i + 1));
        true
      },
      None if self.items.is_empty() => false,
      None => {
        self.select(Some(0));
        true
      },
    }
  }

  /// Moves up; leaving the first item unselects the list.
  pub fn previous(&mut self) {
    let i = match self.selected {
      Some(0) | None => None,
      Some(i) => Some(i - 1),
    };
    self.select(i);
  }

  pub fn unselect(&mut self) {
    self.select(None);
  }

  pub fn select(&mut self, pos: Option<usize>) {
    self.selected = pos
  }

  pub fn draw(&self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let n_drawable_items = usize::from((area.height / self.item_height).max(1));
    let start_index = match self.selected {
      Some(i) if i >= n_drawable_items => i + 1 - n_drawable_items,
      _ => 0,
    };
    let constraints: Vec<Constraint> =
      (0..n_drawable_items).map(|_| Constraint::Length(self.item_height)).collect();
    let list_layout = Layout::vertical(constraints).split(area);

    for (index, item) in
      self.items.iter().enumerate().skip(start_index).take(n_drawable_items)
    {
      item.draw(f, list_layout[index - start_index], self.selected == Some(index))?;
    }

    Ok(())
  }
}

impl<T: Drawable> Default for List<T> {
  fn default() -> Self {
    List { items: Vec::new(), selected: None, item_height: 3 }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Row;

  impl Drawable for Row {
    fn draw(&self, _f: &mut Frame<'_>, _area: Rect, _selected: bool) -> Result<()> {
      Ok(())
    }
  }

  #[test]
  fn moves_within_bounds() {
    let mut list = List::new(vec![Row, Row], 3);
    assert_eq!(list.selected(), None);
    assert!(list.next());
    assert!(list.next());
    assert!(!list.next());
    assert_eq!(list.selected(), Some(1));
    list.previous();
    list.previous();
    assert_eq!(list.selected(), None);
  }

  #[test]
  fn empty_list_never_selects() {
    let mut list: List<Row> = List::default();
    assert!(!list.next());
    assert!(list.selected_item().is_none());
  }
}

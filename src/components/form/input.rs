use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
  prelude::{Constraint, Layout, Margin, Rect},
  widgets::Paragraph,
  Frame,
};

use crate::components::style::{danger_style, default_style, input_block, muted_style};

/// Single line text field.
#[derive(Default)]
pub struct Input {
  label: String,
  placeholder: String,
  value: String,
  is_active: bool,
  error: Option<String>,
}

impl Input {
  pub fn new(label: impl Into<String>, placeholder: impl Into<String>) -> Self {
    Self { label: label.into(), placeholder: placeholder.into(), ..Input::default() }
  }

  pub fn draw(&self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let input_area = Layout::vertical(vec![
      Constraint::Length(1),
      Constraint::Length(2),
      Constraint::Length(1),
    ])
    .split(area);

    // Label
    f.render_widget(
      Paragraph::new(self.label.as_str()).style(default_style(self.is_active)),
      input_area[0],
    );

    f.render_widget(input_block(self.is_active, self.error.is_some()), input_area[1]);

    let value_area = input_area[1].inner(&Margin { horizontal: 1, vertical: 0 });
    let value = if self.value.is_empty() {
      Paragraph::new(self.placeholder.as_str()).style(muted_style())
    } else {
      let cursor = if self.is_active { "▏" } else { "" };
      Paragraph::new(format!("{}{cursor}", self.value)).style(default_style(self.is_active))
    };
    f.render_widget(value, Rect { height: 1, ..value_area });

    if let Some(error) = &self.error {
      f.render_widget(Paragraph::new(error.as_str()).style(danger_style()), input_area[2]);
    }
    Ok(())
  }

  /// Applies an editing key; returns true if the key was consumed.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
      return false;
    }
    match key.code {
      KeyCode::Char(c) => {
        self.value.push(c);
        true
      },
      KeyCode::Backspace => {
        self.value.pop();
        true
      },
      _ => false,
    }
  }

  pub fn insert_str(&mut self, text: &str) {
    self.value.push_str(text.trim_end_matches(['\n', '\r']));
  }

  pub fn value(&self) -> &str {
    &self.value
  }

  pub fn set_value(&mut self, value: impl Into<String>) {
    self.value = value.into();
  }

  pub fn is_active(&self) -> bool {
    self.is_active
  }

  pub fn set_active(&mut self, val: bool) {
    self.is_active = val;
  }

  pub fn set_error(&mut self, error: Option<String>) {
    self.error = error;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn edits_value() {
    let mut input = Input::new("目的地", "输入地点");
    assert!(input.handle_key(KeyEvent::new(KeyCode::Char('家'), KeyModifiers::NONE)));
    assert!(input.handle_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)));
    assert!(input.handle_key(KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)));
    assert!(!input.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    assert!(!input.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    assert_eq!(input.value(), "家");
    input.insert_str("门口\n");
    assert_eq!(input.value(), "家门口");
  }
}

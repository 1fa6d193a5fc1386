use ratatui::{
  prelude::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, BorderType, Borders, Paragraph},
};

pub struct Theme {
  bg: Color,
  bg_button: Color,
  bg_button_selected: Color,
  border: Color,
  border_selected: Color,
  text: Color,
  text_muted: Color,
  text_selected: Color,
  text_button: Color,
  text_button_selected: Color,
  accent: Color,
  danger: Color,
}

static DEFAULT_THEME: Theme = Theme {
  bg: Color::Indexed(234),
  bg_button: Color::Indexed(236),
  bg_button_selected: Color::Indexed(178),
  border: Color::Indexed(250),
  border_selected: Color::Green,
  text: Color::Indexed(252),
  text_muted: Color::Indexed(244),
  text_selected: Color::White,
  text_button: Color::Indexed(252),
  text_button_selected: Color::Black,
  accent: Color::Indexed(33),
  danger: Color::Indexed(160),
};

pub fn stylized_block<'a>(selected: bool) -> Block<'a> {
  Block::default()
    .borders(Borders::ALL)
    .style(default_style(selected))
    .border_style(default_border_style(selected))
    .border_type(BorderType::Rounded)
}

pub fn titled_block<'a>(title: &'a str, selected: bool) -> Block<'a> {
  stylized_block(selected).title(title)
}

pub fn outer_container_block<'a>() -> Block<'a> {
  Block::default().style(Style::default().bg(DEFAULT_THEME.bg).fg(DEFAULT_THEME.text))
}

pub fn default_style(selected: bool) -> Style {
  if selected {
    Style::default().bg(DEFAULT_THEME.bg).fg(DEFAULT_THEME.text_selected)
  } else {
    Style::default().bg(DEFAULT_THEME.bg).fg(DEFAULT_THEME.text)
  }
}

pub fn default_border_style(selected: bool) -> Style {
  if selected {
    Style::default().bg(DEFAULT_THEME.bg).fg(DEFAULT_THEME.border_selected)
  } else {
    Style::default().bg(DEFAULT_THEME.bg).fg(DEFAULT_THEME.border)
  }
}

pub fn header_style() -> Style {
  Style::default().bg(DEFAULT_THEME.bg).fg(DEFAULT_THEME.bg_button_selected)
}

pub fn muted_style() -> Style {
  Style::default().bg(DEFAULT_THEME.bg).fg(DEFAULT_THEME.text_muted)
}

pub fn accent_style() -> Style {
  Style::default().bg(DEFAULT_THEME.bg).fg(DEFAULT_THEME.accent).add_modifier(Modifier::BOLD)
}

pub fn danger_style() -> Style {
  Style::default().bg(DEFAULT_THEME.bg).fg(DEFAULT_THEME.danger).add_modifier(Modifier::BOLD)
}

/// Fill colour of an air cell in the grip visualizer.
pub fn cell_style(active: bool, warning: bool) -> Style {
  let fg = match (active, warning) {
    (_, true) => DEFAULT_THEME.danger,
    (true, false) => DEFAULT_THEME.accent,
    (false, false) => DEFAULT_THEME.bg_button,
  };
  Style::default().bg(DEFAULT_THEME.bg).fg(fg)
}

pub fn stylized_button<'a>(selected: bool) -> Block<'a> {
  Block::default()
    .borders(Borders::ALL)
    .style(button_style(selected))
    .border_style(button_border_style(selected))
    .border_type(BorderType::Rounded)
}

pub fn button(label: &str, selected: bool) -> Paragraph<'_> {
  Paragraph::new(label).alignment(Alignment::Center).block(stylized_button(selected))
}

pub fn button_style(selected: bool) -> Style {
  if selected {
    Style::default()
      .bg(DEFAULT_THEME.bg_button_selected)
      .fg(DEFAULT_THEME.text_button_selected)
      .add_modifier(Modifier::BOLD)
  } else {
    Style::default()
      .bg(DEFAULT_THEME.bg_button)
      .fg(DEFAULT_THEME.text_button)
      .add_modifier(Modifier::BOLD)
  }
}

pub fn button_border_style(selected: bool) -> Style {
  if selected {
    Style::default().bg(DEFAULT_THEME.bg_button_selected).fg(DEFAULT_THEME.bg_button_selected)
  } else {
    Style::default().bg(DEFAULT_THEME.bg_button).fg(DEFAULT_THEME.bg_button)
  }
}

pub fn input_block<'a>(active: bool, has_error: bool) -> Block<'a> {
  let border = if has_error {
    DEFAULT_THEME.danger
  } else if active {
    DEFAULT_THEME.border_selected
  } else {
    DEFAULT_THEME.border
  };
  Block::default()
    .borders(Borders::BOTTOM)
    .style(default_style(active))
    .border_style(Style::default().bg(DEFAULT_THEME.bg).fg(border))
}

/// Header, content and status line of every screen.
pub fn default_layout(area: Rect) -> (Rect, Rect, Rect) {
  let layout = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(2)])
    .split(area);
  (layout[0], layout[1], layout[2])
}

/// Splits `area` into `count` equal rows of at most `height` lines.
pub fn rows(area: Rect, count: usize, height: u16) -> Vec<Rect> {
  let mut constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Length(height)).collect();
  constraints.push(Constraint::Min(0));
  Layout::default().direction(Direction::Vertical).constraints(constraints).split(area).to_vec()
}

/// Splits `area` into `count` equal columns.
pub fn columns(area: Rect, count: u16) -> Vec<Rect> {
  let constraints: Vec<Constraint> =
    (0..count).map(|_| Constraint::Ratio(1, u32::from(count.max(1)))).collect();
  Layout::default().direction(Direction::Horizontal).constraints(constraints).split(area).to_vec()
}

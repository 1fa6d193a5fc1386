use color_eyre::eyre::Result;
use ratatui::{
  layout::{Alignment, Constraint, Layout, Rect},
  text::{Line, Span},
  widgets::Paragraph,
  Frame,
};

use super::style::{cell_style, muted_style, titled_block};
use crate::grip::GripState;

/// Three air cells of the handle, left to right.
pub fn active_cells(state: GripState) -> [bool; 3] {
  match state {
    GripState::Idle => [false, false, false],
    GripState::Pulse => [false, true, false],
    GripState::InflateLeft => [true, false, false],
    GripState::InflateRight => [false, false, true],
    GripState::Warning => [true, true, true],
  }
}

pub struct GripVisualizer {
  state: GripState,
}

impl GripVisualizer {
  pub fn new(state: GripState) -> Self {
    Self { state }
  }

  pub fn draw(&self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let block = titled_block(self.state.label(), false);
    let inner = block.inner(area);
    f.render_widget(block, area);
    let layout = Layout::vertical(vec![Constraint::Length(1), Constraint::Length(1)]).split(inner);
    let warning = self.state == GripState::Warning;
    let cells: Vec<Span> = active_cells(self.state)
      .iter()
      .map(|active| Span::styled(if *active { " ███ " } else { " ░░░ " }, cell_style(*active, warning)))
      .collect();
    f.render_widget(Paragraph::new(Line::from(cells)).alignment(Alignment::Center), layout[0]);
    f.render_widget(
      Paragraph::new(self.state.description()).alignment(Alignment::Center).style(muted_style()),
      layout[1],
    );
    Ok(())
  }
}

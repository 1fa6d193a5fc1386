use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use strum::{Display, EnumIter};
use tokio::sync::mpsc::UnboundedSender;

use super::{Screen, ScreenId};
use crate::{
  action::{Action, MoveDirection, ScreenUpdate},
  components::{
    chrome::Chrome,
    grip::GripVisualizer,
    select::Select,
    style::{accent_style, danger_style, muted_style, stylized_block},
  },
  grip::GripState,
  navigation::RouteView,
};

#[derive(Debug, Clone, PartialEq, EnumIter, Display)]
enum ActiveAction {
  #[strum(to_string = "下一步")]
  Next,
  #[strum(to_string = "结束导航")]
  End,
}

#[derive(Default)]
pub struct NavigationActive {
  command_tx: Option<UnboundedSender<Action>>,
  chrome: Chrome,
  route: RouteView,
  grip: GripState,
  actions: Select<ActiveAction>,
}

impl NavigationActive {
  fn is_last_step(&self) -> bool {
    self.route.total > 0 && self.route.index + 1 == self.route.total
  }

  fn label(&self, action: &ActiveAction) -> String {
    match action {
      ActiveAction::Next if self.is_last_step() => "完成行程".to_string(),
      other => other.to_string(),
    }
  }

  fn progress(&self) -> String {
    if self.route.total == 0 {
      String::new()
    } else {
      format!("第 {}/{} 步", self.route.index + 1, self.route.total)
    }
  }

  fn send(&self, action: Action) -> Result<()> {
    if let Some(command_tx) = &self.command_tx {
      command_tx.send(action)?;
    }
    Ok(())
  }
}

impl Screen for NavigationActive {
  fn id(&self) -> ScreenId {
    ScreenId::NAVIGATION_ACTIVE
  }

  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    self.command_tx = Some(tx);
    Ok(())
  }

  fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    match key.code {
      KeyCode::Char(' ') => Ok(Some(Action::AdvanceStep)),
      _ => Ok(None),
    }
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::Move(MoveDirection::Left) => self.actions.previous(),
      Action::Move(MoveDirection::Right) => self.actions.next(),
      Action::Accept => match self.actions.selected() {
        ActiveAction::Next => self.send(Action::AdvanceStep)?,
        ActiveAction::End => self.send(Action::Navigate(ScreenId::HOME))?,
      },
      Action::ScreenUpdate(update) => {
        match &update {
          ScreenUpdate::Route(route) => self.route = route.clone(),
          ScreenUpdate::Grip(grip) => self.grip = *grip,
          _ => {},
        }
        self.chrome.apply(&update);
      },
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let content_area =
      self.chrome.draw(f, area, self.id().title(), "空格 下一步 • ←→ 选择 • Esc 结束")?;
    let layout = Layout::vertical(vec![
      Constraint::Min(6),
      Constraint::Length(1),
      Constraint::Length(4),
      Constraint::Length(3),
    ])
    .split(content_area);

    let mut lines = Vec::new();
    if let Some(reason) = &self.route.offline_reason {
      lines.push(Line::styled(format!("离线路线 • {reason}"), danger_style()));
    }
    match &self.route.current {
      Some(step) => {
        lines.push(Line::styled(step.direction.arrow(), accent_style()).alignment(Alignment::Center));
        lines.push(Line::from(step.instruction.as_str()).alignment(Alignment::Center));
        lines.push(Line::styled(step.distance.as_str(), muted_style()).alignment(Alignment::Center));
      },
      None => lines.push(Line::styled("暂无路线", muted_style()).alignment(Alignment::Center)),
    }
    if self.route.finished {
      lines.push(Line::styled(crate::core::ARRIVED, accent_style()).alignment(Alignment::Center));
    }
    f.render_widget(
      Paragraph::new(lines).wrap(Wrap { trim: true }).block(stylized_block(false)),
      layout[0],
    );
    f.render_widget(
      Paragraph::new(self.progress()).alignment(Alignment::Center).style(muted_style()),
      layout[1],
    );
    GripVisualizer::new(self.grip).draw(f, layout[2])?;
    self.actions.draw_with(f, layout[3], |action| self.label(action))?;
    Ok(())
  }
}

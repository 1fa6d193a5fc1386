use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};
use strum::{Display, EnumIter};
use tokio::sync::mpsc::UnboundedSender;

use super::{Screen, ScreenId};
use crate::{
  action::{Action, MoveDirection},
  components::{
    chrome::Chrome,
    select::Select,
    style::{danger_style, muted_style, stylized_block},
  },
};

const CALLING: &str = "正在呼叫...";
const LOCATION_SENT: &str = "已发送当前位置给紧急联系人";

#[derive(Debug, Clone, PartialEq, EnumIter, Display)]
enum EmergencyAction {
  #[strum(to_string = "免提通话")]
  Speaker,
  #[strum(to_string = "取消")]
  Cancel,
}

#[derive(Default)]
pub struct Emergency {
  command_tx: Option<UnboundedSender<Action>>,
  chrome: Chrome,
  actions: Select<EmergencyAction>,
  speaker_on: bool,
  ticks: usize,
}

impl Emergency {
  fn calling_text(&self) -> String {
    let dots = ".".repeat(self.ticks % 4);
    format!("{}{dots}", CALLING.trim_end_matches('.'))
  }
}

impl Screen for Emergency {
  fn id(&self) -> ScreenId {
    ScreenId::EMERGENCY
  }

  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    self.command_tx = Some(tx);
    Ok(())
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::Tick => self.ticks = self.ticks.wrapping_add(1),
      Action::Move(MoveDirection::Left) => self.actions.previous(),
      Action::Move(MoveDirection::Right) => self.actions.next(),
      Action::Accept => match self.actions.selected() {
        EmergencyAction::Speaker => self.speaker_on = !self.speaker_on,
        EmergencyAction::Cancel => {
          if let Some(command_tx) = &self.command_tx {
            command_tx.send(Action::Navigate(ScreenId::HOME))?;
          }
        },
      },
      Action::ScreenUpdate(update) => self.chrome.apply(&update),
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let content_area = self.chrome.draw(f, area, self.id().title(), "←→ 选择 • Enter 确认 • Esc 取消")?;
    let layout =
      Layout::vertical(vec![Constraint::Min(5), Constraint::Length(3)]).split(content_area);
    let speaker = if self.speaker_on { "免提已开启" } else { "听筒模式" };
    let lines = vec![
      Line::styled("SOS", danger_style()).alignment(Alignment::Center),
      Line::from(self.calling_text()).alignment(Alignment::Center),
      Line::styled(LOCATION_SENT, muted_style()).alignment(Alignment::Center),
      Line::styled(speaker, muted_style()).alignment(Alignment::Center),
    ];
    f.render_widget(Paragraph::new(lines).block(stylized_block(true)), layout[0]);
    self.actions.draw(f, layout[1])?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use tokio::sync::mpsc;

  use super::*;

  #[test]
  fn cancel_returns_home() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut screen = Emergency::default();
    screen.register_action_handler(tx)?;
    screen.update(Action::Accept)?;
    assert!(screen.speaker_on);
    assert!(rx.try_recv().is_err());
    screen.update(Action::Move(MoveDirection::Right))?;
    screen.update(Action::Accept)?;
    assert_eq!(rx.try_recv().unwrap(), Action::Navigate(ScreenId::HOME));
    Ok(())
  }

  #[test]
  fn calling_text_animates() -> Result<()> {
    let mut screen = Emergency::default();
    assert_eq!(screen.calling_text(), "正在呼叫");
    for _ in 0..3 {
      screen.update(Action::Tick)?;
    }
    assert_eq!(screen.calling_text(), CALLING);
    Ok(())
  }
}

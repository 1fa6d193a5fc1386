use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};
use strum::{Display, EnumIter};
use tokio::sync::mpsc::UnboundedSender;

use super::{Screen, ScreenId};
use crate::{
  action::{Action, MoveDirection, ScreenUpdate},
  components::{chrome::Chrome, grip::GripVisualizer, select::Select, style::muted_style},
  grip::GripState,
  navigation::step::Direction,
  utils::formatting::percentage_bar,
};

#[derive(Debug, Clone, PartialEq, EnumIter, Display)]
enum GripTest {
  #[strum(to_string = "测试左转")]
  Left,
  #[strum(to_string = "测试直行")]
  Straight,
  #[strum(to_string = "测试右转")]
  Right,
}

impl From<GripTest> for Direction {
  fn from(test: GripTest) -> Self {
    match test {
      GripTest::Left => Direction::Left,
      GripTest::Straight => Direction::Straight,
      GripTest::Right => Direction::Right,
    }
  }
}

#[derive(Default)]
pub struct GripSettings {
  command_tx: Option<UnboundedSender<Action>>,
  chrome: Chrome,
  grip: GripState,
  strength: u8,
  tests: Select<GripTest>,
}

impl Screen for GripSettings {
  fn id(&self) -> ScreenId {
    ScreenId::GRIP_SETTINGS
  }

  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    self.command_tx = Some(tx);
    Ok(())
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::Move(MoveDirection::Left) => self.tests.previous(),
      Action::Move(MoveDirection::Right) => self.tests.next(),
      Action::Accept => {
        if let Some(command_tx) = &self.command_tx {
          command_tx.send(Action::TestGrip(self.tests.selected().into()))?;
        }
      },
      Action::ScreenUpdate(update) => {
        match &update {
          ScreenUpdate::Grip(grip) => self.grip = *grip,
          ScreenUpdate::Settings(settings) => self.strength = settings.haptic_strength,
          _ => {},
        }
        self.chrome.apply(&update);
      },
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let content_area = self.chrome.draw(f, area, self.id().title(), "←→ 选择 • Enter 测试 • Esc 返回")?;
    let layout = Layout::vertical(vec![
      Constraint::Length(4),
      Constraint::Length(1),
      Constraint::Min(0),
      Constraint::Length(3),
    ])
    .split(content_area);
    GripVisualizer::new(self.grip).draw(f, layout[0])?;
    f.render_widget(
      Paragraph::new(format!("反馈强度 {} {}%", percentage_bar(self.strength, 10), self.strength))
        .style(muted_style()),
      layout[1],
    );
    self.tests.draw(f, layout[3])?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use tokio::sync::mpsc;

  use super::*;

  #[test]
  fn each_button_tests_its_direction() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut screen = GripSettings::default();
    screen.register_action_handler(tx)?;
    screen.update(Action::Accept)?;
    screen.update(Action::Move(MoveDirection::Right))?;
    screen.update(Action::Accept)?;
    screen.update(Action::Move(MoveDirection::Right))?;
    screen.update(Action::Move(MoveDirection::Right))?;
    screen.update(Action::Accept)?;
    assert_eq!(rx.try_recv().unwrap(), Action::TestGrip(Direction::Left));
    assert_eq!(rx.try_recv().unwrap(), Action::TestGrip(Direction::Straight));
    assert_eq!(rx.try_recv().unwrap(), Action::TestGrip(Direction::Right));
    Ok(())
  }

  #[test]
  fn visualizer_follows_driver() -> Result<()> {
    let mut screen = GripSettings::default();
    screen.update(Action::ScreenUpdate(ScreenUpdate::Grip(GripState::InflateRight)))?;
    assert_eq!(screen.grip, GripState::InflateRight);
    Ok(())
  }
}

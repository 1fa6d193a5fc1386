use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};
use tokio::sync::mpsc::UnboundedSender;

use super::{Screen, ScreenId};
use crate::{
  action::{Action, MoveDirection, ScreenUpdate},
  components::{
    chrome::Chrome,
    style::{columns, rows, stylized_button},
  },
};

const GRID_COLUMNS: usize = 2;

#[derive(Default)]
pub struct Home {
  command_tx: Option<UnboundedSender<Action>>,
  chrome: Chrome,
  voice_enabled: bool,
  selected_action: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, EnumIter, EnumCount, Display)]
enum HomeAction {
  #[strum(to_string = "开始导航")]
  Navigate,
  #[strum(to_string = "紧急求助")]
  Emergency,
  #[strum(to_string = "天气")]
  Weather,
  #[strum(to_string = "手杖状态")]
  Device,
  #[strum(to_string = "气囊调试")]
  Grip,
  #[strum(to_string = "消息")]
  Notifications,
  #[strum(to_string = "设置")]
  Settings,
  #[strum(to_string = "语音")]
  Voice,
}

impl HomeAction {
  fn to_action(self) -> Action {
    match self {
      Self::Navigate => Action::Navigate(ScreenId::NAVIGATION_SETUP),
      Self::Emergency => Action::Navigate(ScreenId::EMERGENCY),
      Self::Weather => Action::Navigate(ScreenId::WEATHER_DETAIL),
      Self::Device => Action::Navigate(ScreenId::DEVICE_DETAIL),
      Self::Grip => Action::Navigate(ScreenId::GRIP_SETTINGS),
      Self::Notifications => Action::Navigate(ScreenId::NOTIFICATIONS),
      Self::Settings => Action::Navigate(ScreenId::SETTINGS),
      Self::Voice => Action::ToggleVoice,
    }
  }
}

impl Home {
  fn move_selection(&mut self, direction: MoveDirection) {
    let last = HomeAction::COUNT - 1;
    self.selected_action = match direction {
      MoveDirection::Up => self.selected_action.saturating_sub(GRID_COLUMNS),
      MoveDirection::Down => (self.selected_action + GRID_COLUMNS).min(last),
      MoveDirection::Left => self.selected_action.saturating_sub(1),
      MoveDirection::Right => (self.selected_action + 1).min(last),
    };
  }

  fn label(&self, action: HomeAction) -> String {
    match action {
      HomeAction::Voice if self.voice_enabled => "语音播报 开".to_string(),
      HomeAction::Voice => "语音播报 关".to_string(),
      other => other.to_string(),
    }
  }
}

impl Screen for Home {
  fn id(&self) -> ScreenId {
    ScreenId::HOME
  }

  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    self.command_tx = Some(tx);
    Ok(())
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::Move(direction) => self.move_selection(direction),
      Action::Accept => {
        if let Some(command_tx) = &self.command_tx {
          if let Some(action) = HomeAction::iter().nth(self.selected_action) {
            command_tx.send(action.to_action())?;
          }
        }
      },
      Action::ScreenUpdate(update) => {
        if let ScreenUpdate::Settings(settings) = &update {
          self.voice_enabled = settings.voice_enabled;
        }
        self.chrome.apply(&update);
      },
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let content_area =
      self.chrome.draw(f, area, self.id().title(), "方向键选择 • Enter 确认 • s 紧急求助 • q 退出")?;
    let grid_rows = rows(content_area, HomeAction::COUNT.div_ceil(GRID_COLUMNS), 4);
    for (index, action) in HomeAction::iter().enumerate() {
      let row = grid_rows[index / GRID_COLUMNS];
      let cell = columns(row, GRID_COLUMNS as u16)[index % GRID_COLUMNS];
      let cell = cell.inner(&Margin { horizontal: 1, vertical: 0 });
      let is_selected = index == self.selected_action;
      let button = Paragraph::new(self.label(action))
        .alignment(Alignment::Center)
        .block(stylized_button(is_selected));
      f.render_widget(button, cell);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use tokio::sync::mpsc;

  use super::*;
  use crate::settings::Settings;

  #[test]
  fn grid_movement_and_accept() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut home = Home::default();
    home.register_action_handler(tx)?;

    home.update(Action::Move(MoveDirection::Right))?;
    home.update(Action::Accept)?;
    assert_eq!(rx.try_recv().unwrap(), Action::Navigate(ScreenId::EMERGENCY));

    home.update(Action::Move(MoveDirection::Down))?;
    home.update(Action::Move(MoveDirection::Down))?;
    home.update(Action::Move(MoveDirection::Down))?;
    home.update(Action::Move(MoveDirection::Down))?;
    home.update(Action::Accept)?;
    assert_eq!(rx.try_recv().unwrap(), Action::ToggleVoice);

    home.update(Action::Move(MoveDirection::Left))?;
    home.update(Action::Move(MoveDirection::Up))?;
    home.update(Action::Accept)?;
    assert_eq!(rx.try_recv().unwrap(), Action::Navigate(ScreenId::GRIP_SETTINGS));
    Ok(())
  }

  #[test]
  fn voice_tile_follows_settings() -> Result<()> {
    let mut home = Home::default();
    home.update(Action::ScreenUpdate(ScreenUpdate::Settings(Settings::default())))?;
    assert_eq!(home.label(HomeAction::Voice), "语音播报 开");
    Ok(())
  }
}

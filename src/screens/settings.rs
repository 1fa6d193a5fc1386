use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};
use tokio::sync::mpsc::UnboundedSender;

use super::{Screen, ScreenId};
use crate::{
  action::{Action, MoveDirection, ScreenUpdate},
  components::{
    chrome::Chrome,
    style::{rows, titled_block},
  },
  settings::{Settings, MAX_LEVEL},
  utils::formatting::percentage_bar,
};

const SLIDER_STEP: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, EnumIter, EnumCount, Display)]
enum SettingRow {
  #[strum(to_string = "音量")]
  Volume,
  #[strum(to_string = "触觉强度")]
  Haptic,
  #[strum(to_string = "语音播报")]
  Voice,
}

#[derive(Default)]
pub struct SettingsScreen {
  command_tx: Option<UnboundedSender<Action>>,
  chrome: Chrome,
  settings: Settings,
  selected_row: usize,
}

impl SettingsScreen {
  fn row(&self) -> SettingRow {
    SettingRow::iter().nth(self.selected_row).unwrap_or(SettingRow::Volume)
  }

  /// Slider change for the selected row; `None` when the row is not a slider.
  fn adjust(&self, increase: bool) -> Option<Action> {
    let step = |value: u8| {
      if increase {
        value.saturating_add(SLIDER_STEP).min(MAX_LEVEL)
      } else {
        value.saturating_sub(SLIDER_STEP)
      }
    };
    match self.row() {
      SettingRow::Volume => Some(Action::SetVolume(step(self.settings.volume))),
      SettingRow::Haptic => Some(Action::SetHapticStrength(step(self.settings.haptic_strength))),
      SettingRow::Voice => None,
    }
  }

  fn value_text(&self, row: SettingRow) -> String {
    match row {
      SettingRow::Volume => {
        format!("{} {}%", percentage_bar(self.settings.volume, 20), self.settings.volume)
      },
      SettingRow::Haptic => format!(
        "{} {}%",
        percentage_bar(self.settings.haptic_strength, 20),
        self.settings.haptic_strength
      ),
      SettingRow::Voice if self.settings.voice_enabled => "已开启".to_string(),
      SettingRow::Voice => "已关闭".to_string(),
    }
  }
}

impl Screen for SettingsScreen {
  fn id(&self) -> ScreenId {
    ScreenId::SETTINGS
  }

  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    self.command_tx = Some(tx);
    Ok(())
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    let request = match action {
      Action::Move(MoveDirection::Up) => {
        self.selected_row = self.selected_row.saturating_sub(1);
        None
      },
      Action::Move(MoveDirection::Down) => {
        self.selected_row = (self.selected_row + 1).min(SettingRow::COUNT - 1);
        None
      },
      Action::Move(MoveDirection::Left) => self.adjust(false),
      Action::Move(MoveDirection::Right) => self.adjust(true),
      Action::Accept if self.row() == SettingRow::Voice => Some(Action::ToggleVoice),
      Action::ScreenUpdate(update) => {
        if let ScreenUpdate::Settings(settings) = &update {
          self.settings = *settings;
        }
        self.chrome.apply(&update);
        None
      },
      _ => None,
    };
    if let (Some(command_tx), Some(request)) = (&self.command_tx, request) {
      command_tx.send(request)?;
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let content_area =
      self.chrome.draw(f, area, self.id().title(), "↑↓ 选择 • ←→ 调节 • Enter 切换 • Esc 返回")?;
    let layout = rows(content_area, SettingRow::COUNT, 3);
    for (index, row) in SettingRow::iter().enumerate() {
      let title = row.to_string();
      let block = titled_block(&title, index == self.selected_row);
      f.render_widget(Paragraph::new(self.value_text(row)).block(block), layout[index]);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use tokio::sync::mpsc;

  use super::*;

  #[test]
  fn sliders_move_in_steps_and_clamp() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut screen = SettingsScreen::default();
    screen.register_action_handler(tx)?;
    let loud = Settings { volume: 95, haptic_strength: 5, ..Settings::default() };
    screen.update(Action::ScreenUpdate(ScreenUpdate::Settings(loud)))?;

    screen.update(Action::Move(MoveDirection::Right))?;
    assert_eq!(rx.try_recv().unwrap(), Action::SetVolume(100));
    screen.update(Action::Move(MoveDirection::Left))?;
    assert_eq!(rx.try_recv().unwrap(), Action::SetVolume(85));

    screen.update(Action::Move(MoveDirection::Down))?;
    screen.update(Action::Move(MoveDirection::Left))?;
    assert_eq!(rx.try_recv().unwrap(), Action::SetHapticStrength(0));
    Ok(())
  }

  #[test]
  fn voice_row_toggles() -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut screen = SettingsScreen::default();
    screen.register_action_handler(tx)?;
    screen.update(Action::Accept)?;
    assert!(rx.try_recv().is_err());
    screen.update(Action::Move(MoveDirection::Down))?;
    screen.update(Action::Move(MoveDirection::Down))?;
    screen.update(Action::Move(MoveDirection::Right))?;
    screen.update(Action::Accept)?;
    assert_eq!(rx.try_recv().unwrap(), Action::ToggleVoice);
    assert_eq!(screen.value_text(SettingRow::Voice), "已开启");
    Ok(())
  }
}

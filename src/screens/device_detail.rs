use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};
use strum::{Display, EnumIter};
use tokio::sync::mpsc::UnboundedSender;

use super::{Screen, ScreenId};
use crate::{
  action::{Action, MoveDirection, ScreenUpdate},
  components::{
    chrome::Chrome,
    select::Select,
    style::{danger_style, default_style, titled_block},
  },
  settings::DeviceStatus,
  utils::formatting::percentage_bar,
};

#[derive(Debug, Clone, PartialEq, EnumIter, Display)]
enum DeviceAction {
  #[strum(to_string = "查找我的手杖")]
  Find,
  #[strum(to_string = "描述周围环境")]
  Describe,
}

#[derive(Default)]
pub struct DeviceDetail {
  command_tx: Option<UnboundedSender<Action>>,
  chrome: Chrome,
  device: DeviceStatus,
  actions: Select<DeviceAction>,
}

impl DeviceDetail {
  fn status_lines(&self) -> Vec<Line<'static>> {
    let connection = if self.device.is_connected {
      Line::styled("已连接", default_style(false))
    } else {
      Line::styled("未连接", danger_style())
    };
    vec![
      Line::from(format!(
        "电量    {} {}%",
        percentage_bar(self.device.battery_level, 20),
        self.device.battery_level
      )),
      Line::from(format!("握力    {}", self.device.grip_pressure)),
      connection,
    ]
  }
}

impl Screen for DeviceDetail {
  fn id(&self) -> ScreenId {
    ScreenId::DEVICE_DETAIL
  }

  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    self.command_tx = Some(tx);
    Ok(())
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::Move(MoveDirection::Left) => self.actions.previous(),
      Action::Move(MoveDirection::Right) => self.actions.next(),
      Action::Accept => {
        if let Some(command_tx) = &self.command_tx {
          command_tx.send(match self.actions.selected() {
            DeviceAction::Find => Action::FindCane,
            DeviceAction::Describe => Action::DescribeSurroundings,
          })?;
        }
      },
      Action::ScreenUpdate(update) => {
        if let ScreenUpdate::Device(device) = &update {
          self.device = *device;
        }
        self.chrome.apply(&update);
      },
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let content_area = self.chrome.draw(f, area, self.id().title(), "←→ 选择 • Enter 确认 • Esc 返回")?;
    let layout =
      Layout::vertical(vec![Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
        .split(content_area);
    f.render_widget(
      Paragraph::new(self.status_lines()).block(titled_block("智能手杖", false)),
      layout[0],
    );
    self.actions.draw(f, layout[2])?;
    Ok(())
  }
}

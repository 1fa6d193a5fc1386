use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use serde::Serialize;
use strum::{Display, EnumIter, EnumString};
use tokio::sync::mpsc::UnboundedSender;

use crate::{action::Action, config::Config, mode::Mode, tui::Event};

pub mod device_detail;
pub mod emergency;
pub mod grip_settings;
pub mod home;
pub mod navigation_active;
pub mod navigation_setup;
pub mod notifications;
pub mod settings;
pub mod weather_detail;

#[allow(non_camel_case_types)]
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, EnumIter,
)]
pub enum ScreenId {
  HOME,
  NAVIGATION_SETUP,
  NAVIGATION_ACTIVE,
  SETTINGS,
  EMERGENCY,
  WEATHER_DETAIL,
  DEVICE_DETAIL,
  GRIP_SETTINGS,
  NOTIFICATIONS,
}

impl ScreenId {
  /// Spoken when the screen is entered with voice enabled.
  pub fn announcement(&self) -> &'static str {
    match self {
      ScreenId::HOME => "已回到首页",
      ScreenId::NAVIGATION_SETUP => "路线规划页面",
      ScreenId::NAVIGATION_ACTIVE => "正在导航中",
      ScreenId::SETTINGS => "设置页面",
      ScreenId::EMERGENCY => "紧急模式已激活，正在呼叫紧急联系人",
      ScreenId::WEATHER_DETAIL => "当前天气详情",
      ScreenId::DEVICE_DETAIL => "手杖设备状态",
      ScreenId::GRIP_SETTINGS => "气囊反馈调试页面",
      ScreenId::NOTIFICATIONS => "消息通知中心",
    }
  }

  pub fn title(&self) -> &'static str {
    match self {
      ScreenId::HOME => "首页",
      ScreenId::NAVIGATION_SETUP => "规划路线",
      ScreenId::NAVIGATION_ACTIVE => "语音导航中",
      ScreenId::SETTINGS => "设置",
      ScreenId::EMERGENCY => "紧急求助",
      ScreenId::WEATHER_DETAIL => "天气详情",
      ScreenId::DEVICE_DETAIL => "设备状态",
      ScreenId::GRIP_SETTINGS => "气囊调试",
      ScreenId::NOTIFICATIONS => "消息中心",
    }
  }

  /// Fresh screen instance for this id.
  pub fn mount(&self) -> Box<dyn Screen> {
    match self {
      ScreenId::HOME => Box::<home::Home>::default(),
      ScreenId::NAVIGATION_SETUP => Box::<navigation_setup::NavigationSetup>::default(),
      ScreenId::NAVIGATION_ACTIVE => Box::<navigation_active::NavigationActive>::default(),
      ScreenId::SETTINGS => Box::<settings::SettingsScreen>::default(),
      ScreenId::EMERGENCY => Box::<emergency::Emergency>::default(),
      ScreenId::WEATHER_DETAIL => Box::<weather_detail::WeatherDetail>::default(),
      ScreenId::DEVICE_DETAIL => Box::<device_detail::DeviceDetail>::default(),
      ScreenId::GRIP_SETTINGS => Box::<grip_settings::GripSettings>::default(),
      ScreenId::NOTIFICATIONS => Box::<notifications::Notifications>::default(),
    }
  }
}

/// A full-page view. Screens only read snapshots and send actions; all state
/// changes happen in the core.
pub trait Screen {
  fn id(&self) -> ScreenId;

  #[allow(unused_variables)]
  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    Ok(())
  }

  #[allow(unused_variables)]
  fn register_config_handler(&mut self, config: Config) -> Result<()> {
    Ok(())
  }

  #[allow(unused_variables)]
  fn init(&mut self, area: Rect) -> Result<()> {
    Ok(())
  }

  /// Key handling mode; `Input` disables single-letter shortcuts.
  fn mode(&self) -> Mode {
    Mode::Normal
  }

  fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>> {
    let r = match event {
      Some(Event::Key(key_event)) => self.handle_key_events(key_event)?,
      Some(Event::Paste(text)) => self.handle_paste(text)?,
      _ => None,
    };
    Ok(r)
  }

  #[allow(unused_variables)]
  fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    Ok(None)
  }

  #[allow(unused_variables)]
  fn handle_paste(&mut self, text: String) -> Result<Option<Action>> {
    Ok(None)
  }

  #[allow(unused_variables)]
  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()>;
}

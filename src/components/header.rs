use chrono::{DateTime, Local};
use color_eyre::eyre::Result;
use ratatui::{
  layout::{Alignment, Constraint, Layout, Rect},
  widgets::Paragraph,
  Frame,
};

use super::style::{header_style, muted_style};
use crate::{
  settings::{DeviceStatus, Settings},
  utils::formatting::{greeting, percentage_bar},
};

/// Top bar shared by all screens: title, greeting, battery and voice state.
pub struct CaneHeader {
  battery_level: u8,
  voice_enabled: bool,
  last_update: Option<DateTime<Local>>,
}

impl Default for CaneHeader {
  fn default() -> Self {
    Self { battery_level: 0, voice_enabled: true, last_update: None }
  }
}

impl CaneHeader {
  pub fn last_updated(&self) -> Option<DateTime<Local>> {
    self.last_update
  }

  pub fn update(&mut self, settings: &Settings, device: &DeviceStatus) {
    self.voice_enabled = settings.voice_enabled;
    self.battery_level = device.battery_level;
    self.last_update = Some(Local::now());
  }

  pub fn voice_label(&self) -> &'static str {
    if self.voice_enabled {
      "语音 开"
    } else {
      "语音 关"
    }
  }

  pub fn draw(&self, f: &mut Frame<'_>, area: Rect, title: &str) -> Result<()> {
    let layout =
      Layout::horizontal(vec![Constraint::Min(0), Constraint::Length(24)]).split(area);
    let title_layout =
      Layout::vertical(vec![Constraint::Length(1), Constraint::Length(1)]).split(layout[0]);
    let info_layout =
      Layout::vertical(vec![Constraint::Length(1), Constraint::Length(1)]).split(layout[1]);

    f.render_widget(Paragraph::new(title).style(header_style()), title_layout[0]);
    let now = self.last_update.unwrap_or_else(Local::now);
    f.render_widget(Paragraph::new(greeting(now)).style(muted_style()), title_layout[1]);
    f.render_widget(
      Paragraph::new(format!("电量 {} {}%", percentage_bar(self.battery_level, 5), self.battery_level))
        .alignment(Alignment::Right),
      info_layout[0],
    );
    f.render_widget(
      Paragraph::new(self.voice_label()).alignment(Alignment::Right).style(muted_style()),
      info_layout[1],
    );
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn follows_settings_and_device() {
    let mut header = CaneHeader::default();
    assert_eq!(header.voice_label(), "语音 开");
    assert!(header.last_updated().is_none());

    let settings = Settings { voice_enabled: false, ..Settings::default() };
    header.update(&settings, &DeviceStatus::default());
    assert_eq!(header.voice_label(), "语音 关");
    assert_eq!(header.battery_level, 62);
    assert!(header.last_updated().is_some());
  }
}

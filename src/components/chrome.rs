use color_eyre::eyre::Result;
use ratatui::{
  prelude::{Margin, Rect},
  text::{Line, Span},
  widgets::Paragraph,
  Frame,
};

use super::{
  header::CaneHeader,
  style::{accent_style, default_layout, muted_style, outer_container_block},
};
use crate::{
  action::ScreenUpdate,
  settings::{DeviceStatus, Settings},
};

/// Frame around every screen: header on top, last announcement and key hints below.
#[derive(Default)]
pub struct Chrome {
  header: CaneHeader,
  settings: Settings,
  device: DeviceStatus,
  last_spoken: Option<String>,
}

impl Chrome {
  pub fn apply(&mut self, update: &ScreenUpdate) {
    match update {
      ScreenUpdate::Settings(settings) => {
        self.settings = *settings;
        self.header.update(&self.settings, &self.device);
      },
      ScreenUpdate::Device(device) => {
        self.device = *device;
        self.header.update(&self.settings, &self.device);
      },
      ScreenUpdate::Spoken(text) => self.last_spoken = Some(text.clone()),
      _ => {},
    }
  }

  pub fn last_spoken(&self) -> Option<&str> {
    self.last_spoken.as_deref()
  }

  /// Draws the frame and returns the content area.
  pub fn draw(&self, f: &mut Frame<'_>, area: Rect, title: &str, hint: &str) -> Result<Rect> {
    f.render_widget(outer_container_block(), area);
    let inner_area = area.inner(&Margin { horizontal: 2, vertical: 1 });
    let (header_area, content_area, status_area) = default_layout(inner_area);
    self.header.draw(f, header_area, title)?;

    let spoken = match &self.last_spoken {
      Some(text) => Line::from(vec![Span::styled("♪ ", accent_style()), Span::raw(text.as_str())]),
      None => Line::from(""),
    };
    f.render_widget(
      Paragraph::new(vec![spoken, Line::styled(hint, muted_style())]),
      status_area,
    );
    Ok(content_area)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keeps_latest_announcement() {
    let mut chrome = Chrome::default();
    assert!(chrome.last_spoken().is_none());
    chrome.apply(&ScreenUpdate::Spoken("已回到首页".to_string()));
    chrome.apply(&ScreenUpdate::Spoken("设置页面".to_string()));
    assert_eq!(chrome.last_spoken(), Some("设置页面"));
  }

  #[test]
  fn header_follows_snapshots() {
    let mut chrome = Chrome::default();
    chrome.apply(&ScreenUpdate::Settings(Settings { voice_enabled: false, ..Settings::default() }));
    chrome.apply(&ScreenUpdate::Device(DeviceStatus::default()));
    assert_eq!(chrome.header.voice_label(), "语音 关");
    assert!(!chrome.settings.voice_enabled);
  }
}

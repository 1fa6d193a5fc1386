use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};

use super::{Screen, ScreenId};
use crate::{
  action::Action,
  components::{
    chrome::Chrome,
    style::{accent_style, columns, muted_style, titled_block},
  },
};

/// Conditions shown on the weather card.
pub struct Forecast {
  pub temperature: i8,
  pub summary: &'static str,
  pub wind_level: u8,
  pub rain_chance: u8,
}

pub const TODAY: Forecast =
  Forecast { temperature: 24, summary: "多云转晴 • 建议出行", wind_level: 3, rain_chance: 10 };

#[derive(Default)]
pub struct WeatherDetail {
  chrome: Chrome,
}

impl Screen for WeatherDetail {
  fn id(&self) -> ScreenId {
    ScreenId::WEATHER_DETAIL
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    if let Action::ScreenUpdate(update) = action {
      self.chrome.apply(&update);
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let content_area = self.chrome.draw(f, area, self.id().title(), "Esc 返回")?;
    let layout =
      Layout::vertical(vec![Constraint::Length(5), Constraint::Length(3), Constraint::Min(0)])
        .split(content_area);
    let card = vec![
      Line::styled(format!("{}°", TODAY.temperature), accent_style()).alignment(Alignment::Center),
      Line::from(TODAY.summary).alignment(Alignment::Center),
    ];
    f.render_widget(Paragraph::new(card).block(titled_block("今日", false)), layout[0]);
    let details = columns(layout[1], 2);
    f.render_widget(
      Paragraph::new(format!("{}级", TODAY.wind_level))
        .alignment(Alignment::Center)
        .block(titled_block("风力", false)),
      details[0],
    );
    f.render_widget(
      Paragraph::new(format!("{}%", TODAY.rain_chance))
        .alignment(Alignment::Center)
        .block(titled_block("降水概率", false)),
      details[1],
    );
    f.render_widget(
      Paragraph::new("数据为本地示例，不代表实时天气").style(muted_style()),
      layout[2],
    );
    Ok(())
  }
}

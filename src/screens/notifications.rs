use chrono::{DateTime, Duration, Utc};
use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};

use super::{Screen, ScreenId};
use crate::{
  action::{Action, MoveDirection},
  components::{
    chrome::Chrome,
    list::List,
    style::{accent_style, default_style, muted_style},
    Drawable,
  },
  utils::formatting::time_ago,
};

pub struct Notification {
  title: &'static str,
  received_at: DateTime<Utc>,
  unread: bool,
}

impl Notification {
  fn age(&self, now: DateTime<Utc>) -> String {
    time_ago(self.received_at, now)
  }
}

impl Drawable for Notification {
  fn draw(&self, f: &mut Frame<'_>, area: Rect, selected: bool) -> Result<()> {
    let marker = if self.unread { Span::styled("● ", accent_style()) } else { Span::raw("  ") };
    let lines = vec![
      Line::from(vec![marker, Span::styled(self.title, default_style(selected))]),
      Line::styled(format!("  {}", self.age(Utc::now())), muted_style()),
    ];
    let style = if selected { Style::default().add_modifier(Modifier::REVERSED) } else { Style::default() };
    f.render_widget(Paragraph::new(lines).style(style), area);
    Ok(())
  }
}

fn inbox(now: DateTime<Utc>) -> Vec<Notification> {
  vec![
    Notification {
      title: "固件更新可用",
      received_at: now - Duration::minutes(10),
      unread: true,
    },
    Notification { title: "电量低于 20%", received_at: now - Duration::hours(26), unread: false },
  ]
}

pub struct Notifications {
  chrome: Chrome,
  list: List<Notification>,
}

impl Default for Notifications {
  fn default() -> Self {
    let mut list = List::new(inbox(Utc::now()), 3);
    list.select(Some(0));
    Self { chrome: Chrome::default(), list }
  }
}

impl Notifications {
  fn unread_count(&self) -> usize {
    self.list.items().iter().filter(|n| n.unread).count()
  }
}

impl Screen for Notifications {
  fn id(&self) -> ScreenId {
    ScreenId::NOTIFICATIONS
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::Move(MoveDirection::Down) => {
        self.list.next();
      },
      Action::Move(MoveDirection::Up) => {
        if self.list.selected() != Some(0) {
          self.list.previous();
        }
      },
      Action::Accept => {
        if let Some(notification) = self.list.selected_item_mut() {
          notification.unread = false;
        }
      },
      Action::ScreenUpdate(update) => self.chrome.apply(&update),
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let content_area = self.chrome.draw(f, area, self.id().title(), "↑↓ 选择 • Enter 标为已读 • Esc 返回")?;
    let layout = Layout::vertical(vec![Constraint::Length(2), Constraint::Min(0)]).split(content_area);
    f.render_widget(
      Paragraph::new(format!("{} 条未读", self.unread_count())).style(muted_style()),
      layout[0],
    );
    self.list.draw(f, layout[1])?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn inbox_ages() {
    let now = Utc::now();
    let ages: Vec<String> = inbox(now).iter().map(|n| n.age(now)).collect();
    assert_eq!(ages, vec!["10分钟前".to_string(), "昨天".to_string()]);
  }

  #[test]
  fn accept_marks_read() -> Result<()> {
    let mut screen = Notifications::default();
    assert_eq!(screen.unread_count(), 1);
    screen.update(Action::Move(MoveDirection::Up))?;
    screen.update(Action::Accept)?;
    assert_eq!(screen.unread_count(), 0);
    screen.update(Action::Move(MoveDirection::Down))?;
    screen.update(Action::Move(MoveDirection::Down))?;
    assert_eq!(screen.list.selected(), Some(1));
    Ok(())
  }
}

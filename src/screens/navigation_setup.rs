use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;

use super::{Screen, ScreenId};
use crate::{
  action::{Action, MoveDirection, ScreenUpdate},
  components::{
    chrome::Chrome,
    form::input::Input,
    list::List,
    style::{button, default_style, muted_style},
    Drawable,
  },
  mode::Mode,
};

const PLANNING_LABEL: &str = "正在规划...";
const START_LABEL: &str = "开始导航";

pub struct QuickDestination {
  name: &'static str,
  hint: &'static str,
}

impl Drawable for QuickDestination {
  fn draw(&self, f: &mut Frame<'_>, area: Rect, selected: bool) -> Result<()> {
    let marker = if selected { "▶ " } else { "  " };
    let lines = vec![
      Line::styled(format!("{marker}{}", self.name), default_style(selected)),
      Line::styled(format!("  {}", self.hint), muted_style()),
    ];
    f.render_widget(Paragraph::new(lines), area);
    Ok(())
  }
}

fn quick_destinations() -> Vec<QuickDestination> {
  vec![
    QuickDestination { name: "家", hint: "1.2km • 步行约15分钟" },
    QuickDestination { name: "公司", hint: "3.5km • 建议公交" },
    QuickDestination { name: "沃尔玛超市", hint: "800m • 步行约8分钟" },
    QuickDestination { name: "人民医院", hint: "2.1km • 步行约25分钟" },
  ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
  Input,
  Quick,
  Start,
}

pub struct NavigationSetup {
  command_tx: Option<UnboundedSender<Action>>,
  chrome: Chrome,
  input: Input,
  destinations: List<QuickDestination>,
  focus: Focus,
  planning: bool,
}

impl Default for NavigationSetup {
  fn default() -> Self {
    let mut input = Input::new("目的地", "请输入或说出目的地");
    input.set_active(true);
    Self {
      command_tx: None,
      chrome: Chrome::default(),
      input,
      destinations: List::new(quick_destinations(), 2),
      focus: Focus::Input,
      planning: false,
    }
  }
}

impl NavigationSetup {
  fn set_focus(&mut self, focus: Focus) {
    self.focus = focus;
    self.input.set_active(focus == Focus::Input);
  }

  fn move_focus(&mut self, direction: MoveDirection) {
    match (self.focus, direction) {
      (Focus::Input, MoveDirection::Down) => {
        if self.destinations.next() {
          self.set_focus(Focus::Quick);
        }
      },
      (Focus::Quick, MoveDirection::Down) => {
        if !self.destinations.next() {
          self.destinations.unselect();
          self.set_focus(Focus::Start);
        }
      },
      (Focus::Quick, MoveDirection::Up) => {
        self.destinations.previous();
        if self.destinations.selected().is_none() {
          self.set_focus(Focus::Input);
        }
      },
      (Focus::Start, MoveDirection::Up) => {
        let last = self.destinations.items().len().checked_sub(1);
        self.destinations.select(last);
        self.set_focus(if last.is_some() { Focus::Quick } else { Focus::Input });
      },
      _ => {},
    }
  }

  fn submit(&mut self) -> Option<Action> {
    match self.focus {
      Focus::Quick => {
        let name = self.destinations.selected_item()?.name;
        self.input.set_value(name);
        Some(Action::PlanRoute(name.to_string()))
      },
      Focus::Input | Focus::Start => Some(Action::PlanRoute(self.input.value().to_string())),
    }
  }
}

impl Screen for NavigationSetup {
  fn id(&self) -> ScreenId {
    ScreenId::NAVIGATION_SETUP
  }

  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    self.command_tx = Some(tx);
    Ok(())
  }

  fn mode(&self) -> Mode {
    if self.focus == Focus::Input {
      Mode::Input
    } else {
      Mode::Normal
    }
  }

  fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    if self.focus == Focus::Input {
      self.input.handle_key(key);
    }
    Ok(None)
  }

  fn handle_paste(&mut self, text: String) -> Result<Option<Action>> {
    if self.focus == Focus::Input {
      self.input.insert_str(&text);
    }
    Ok(None)
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::Move(direction) => self.move_focus(direction),
      Action::Accept if self.planning => {},
      Action::Accept => {
        if let (Some(command_tx), Some(action)) = (self.command_tx.clone(), self.submit()) {
          command_tx.send(action)?;
        }
      },
      Action::ScreenUpdate(update) => {
        if let ScreenUpdate::Route(route) = &update {
          self.planning = route.planning;
          self.input.set_error(route.error.clone());
        }
        self.chrome.apply(&update);
      },
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let content_area =
      self.chrome.draw(f, area, self.id().title(), "输入目的地 • ↑↓ 选择 • Enter 规划 • Esc 返回")?;
    let layout = Layout::vertical(vec![
      Constraint::Length(4),
      Constraint::Length(1),
      Constraint::Length(1),
      Constraint::Min(0),
      Constraint::Length(3),
    ])
    .split(content_area);
    self.input.draw(f, layout[0])?;
    f.render_widget(Paragraph::new("常用地点").style(muted_style()), layout[2]);
    self.destinations.draw(f, layout[3])?;
    let label = if self.planning { PLANNING_LABEL } else { START_LABEL };
    f.render_widget(button(label, self.focus == Focus::Start), layout[4]);
    Ok(())
  }
}

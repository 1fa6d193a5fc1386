use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::Rect;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::{
  action::{Action, MoveDirection},
  config::Config,
  core::Core,
  mode::Mode,
  screens::{Screen, ScreenId},
  tui::{self, Tui},
};

pub struct App {
  pub config: Config,
  pub tick_rate: f64,
  pub frame_rate: f64,
  pub screen: Box<dyn Screen>,
  pub should_quit: bool,
  pub should_suspend: bool,
  core: Core,
  action_tx: UnboundedSender<Action>,
  action_rx: UnboundedReceiver<Action>,
  tui: Tui,
}

impl App {
  pub fn new(config: Config, tick_rate: f64, frame_rate: f64) -> Result<Self> {
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let core = Core::from_config(&config, action_tx.clone())?;
    let tui = tui::Tui::new()?.tick_rate(tick_rate).frame_rate(frame_rate);
    let screen = ScreenId::HOME.mount();
    let mut app = Self {
      tick_rate,
      frame_rate,
      screen,
      should_quit: false,
      should_suspend: false,
      config,
      core,
      action_tx,
      action_rx,
      tui,
    };
    app.mount(ScreenId::HOME)?;
    Ok(app)
  }

  fn mount(&mut self, id: ScreenId) -> Result<()> {
    let mut screen = id.mount();
    screen.register_action_handler(self.action_tx.clone())?;
    screen.register_config_handler(self.config.clone())?;
    screen.init(self.tui.size()?)?;
    self.screen = screen;
    self.push_updates()
  }

  /// Hands the core's current snapshots to the mounted screen.
  fn push_updates(&mut self) -> Result<()> {
    for update in self.core.updates() {
      if let Some(action) = self.screen.update(Action::ScreenUpdate(update))? {
        self.action_tx.send(action)?;
      }
    }
    Ok(())
  }

  fn map_key(&self, key: KeyEvent) -> Option<Action> {
    let mode = self.screen.mode();
    if let Some(keymap) = self.config.keybindings.get(&mode) {
      if let Some(action) = keymap.get(&vec![key]) {
        return Some(action.clone());
      }
    }
    match key.code {
      KeyCode::Up => Some(Action::Move(MoveDirection::Up)),
      KeyCode::Down => Some(Action::Move(MoveDirection::Down)),
      KeyCode::Left if mode == Mode::Normal => Some(Action::Move(MoveDirection::Left)),
      KeyCode::Right if mode == Mode::Normal => Some(Action::Move(MoveDirection::Right)),
      KeyCode::Enter => Some(Action::Accept),
      KeyCode::Esc => Some(Action::Back),
      _ => None,
    }
  }

  fn draw(&mut self) -> Result<()> {
    let action_tx = self.action_tx.clone();
    let screen = &mut self.screen;
    self.tui.draw(|f| {
      if let Err(e) = screen.draw(f, f.size()) {
        let _ = action_tx.send(Action::Error(format!("Failed to draw: {:?}", e)));
      }
    })?;
    Ok(())
  }

  pub async fn run(&mut self) -> Result<()> {
    self.tui.enter()?;
    let action_tx = self.action_tx.clone();

    loop {
      if let Some(e) = self.tui.next().await {
        match e {
          tui::Event::Quit => action_tx.send(Action::Quit)?,
          tui::Event::Tick => action_tx.send(Action::Tick)?,
          tui::Event::Render => action_tx.send(Action::Render)?,
          tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
          tui::Event::Key(key) => {
            if let Some(action) = self.map_key(key) {
              debug!("Got action: {action:?}");
              action_tx.send(action)?;
            }
          },
          _ => {},
        }
        if let Some(action) = self.screen.handle_events(Some(e.clone()))? {
          action_tx.send(action)?;
        }
      }

      while let Ok(action) = self.action_rx.try_recv() {
        if !matches!(action, Action::Tick | Action::Render) {
          debug!("{action:?}");
        }
        match action {
          Action::Tick => {},
          Action::Quit => self.should_quit = true,
          Action::Suspend => self.should_suspend = true,
          Action::Resume => self.should_suspend = false,
          Action::Error(ref message) => error!("{message}"),
          Action::Resize(w, h) => {
            self.tui.resize(Rect::new(0, 0, w, h))?;
            self.draw()?;
          },
          Action::Render => self.draw()?,
          Action::ScreenUpdate(_) => {},
          ref domain => {
            self.core.dispatch(domain);
            if self.core.screen() != self.screen.id() {
              info!(screen = %self.core.screen(), "Mounting screen");
              self.mount(self.core.screen())?;
            } else {
              self.push_updates()?;
            }
          },
        }
        if let Some(action) = self.screen.update(action.clone())? {
          action_tx.send(action)?
        };
      }
      if self.should_suspend {
        self.tui.suspend()?;
        action_tx.send(Action::Resume)?;
        self.tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate);
        self.tui.enter()?;
      } else if self.should_quit {
        self.tui.stop()?;
        break;
      }
    }
    self.tui.exit()?;
    Ok(())
  }
}

pub mod error;

use std::{sync::Arc, time::Duration};

use error::CoreError;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::{
  action::{Action, ScreenUpdate},
  config::{CaneConfig, Config},
  directions::{build_provider, DirectionsProvider},
  grip::{GripDriver, GripState},
  navigation::{
    step::{Direction, NavigationStep},
    AdvanceOutcome, NavigationSession, PlanError, PlanOutcome,
  },
  screens::ScreenId,
  settings::{DeviceStatus, Settings},
  speech::{Announcer, CommandAnnouncer, LogAnnouncer},
  timer::Timer,
};

pub const MISSING_DESTINATION: &str = "请先输入目的地";
pub const ARRIVED: &str = "已到达目的地，导航结束。";
pub const FINDING_CANE: &str = "正在为您查找手杖，请听声音。";
pub const SERVICE_UNAVAILABLE: &str = "服务不可用。";

/// Owner of all application state. Every domain action goes through
/// [`Core::dispatch`]; asynchronous work reports back on the action channel.
pub struct Core {
  screen: ScreenId,
  session: NavigationSession,
  grip: GripDriver,
  settings: Settings,
  device: DeviceStatus,
  arrival: Timer,
  arrival_delay: Duration,
  last_spoken: Option<String>,
  provider: Arc<dyn DirectionsProvider>,
  announcer: Arc<dyn Announcer>,
  action_tx: UnboundedSender<Action>,
}

impl Core {
  pub fn builder() -> CoreBuilder {
    CoreBuilder::new()
  }

  pub fn from_config(
    config: &Config,
    action_tx: UnboundedSender<Action>,
  ) -> Result<Core, CoreError> {
    let provider = build_provider(&config.directions, &config.cane)?;
    let announcer: Arc<dyn Announcer> = match CommandAnnouncer::new(&config.speech.command) {
      Some(announcer) => Arc::new(announcer),
      None => Arc::new(LogAnnouncer),
    };
    Core::builder()
      .provider(provider)
      .announcer(announcer)
      .action_tx(action_tx)
      .cane(config.cane.clone())
      .settings(config.settings)
      .build()
  }

  pub fn screen(&self) -> ScreenId {
    self.screen
  }

  pub fn session(&self) -> &NavigationSession {
    &self.session
  }

  pub fn grip_state(&self) -> GripState {
    self.grip.state()
  }

  pub fn settings(&self) -> Settings {
    self.settings
  }

  pub fn last_spoken(&self) -> Option<&str> {
    self.last_spoken.as_deref()
  }

  /// Snapshots for the mounted screen.
  pub fn updates(&self) -> Vec<ScreenUpdate> {
    let mut updates = vec![
      ScreenUpdate::Grip(self.grip.state()),
      ScreenUpdate::Route(self.session.view()),
      ScreenUpdate::Settings(self.settings),
      ScreenUpdate::Device(self.device),
    ];
    if let Some(spoken) = &self.last_spoken {
      updates.push(ScreenUpdate::Spoken(spoken.clone()));
    }
    updates
  }

  pub fn dispatch(&mut self, action: &Action) {
    match action {
      Action::Navigate(screen) => self.navigate_to(*screen),
      Action::Back => self.navigate_to(ScreenId::HOME),
      Action::PlanRoute(destination) => {
        if let Err(error) = self.plan_route(destination) {
          debug!(%error, "Route request refused");
        }
      },
      Action::RoutePlanned(generation, result) => {
        self.route_planned(*generation, result.clone())
      },
      Action::AdvanceStep => self.advance_step(),
      Action::ReturnHome(generation) => {
        if self.arrival.fire(*generation) {
          self.navigate_to(ScreenId::HOME);
        }
      },
      Action::TestGrip(direction) => self.test_grip(*direction),
      Action::GripRelease(generation) => {
        self.grip.release(*generation);
      },
      Action::ToggleVoice => {
        let enabled = self.settings.toggle_voice();
        self.say(if enabled { "语音播报已开启" } else { "语音播报已关闭" });
      },
      Action::SetVolume(volume) => self.settings.set_volume(*volume),
      Action::SetHapticStrength(strength) => self.settings.set_haptic_strength(*strength),
      Action::FindCane => self.say(FINDING_CANE),
      Action::DescribeSurroundings => self.describe_surroundings(),
      Action::Described(result) => match result {
        Ok(text) => self.say(text),
        Err(error) => {
          warn!(%error, "Surroundings description failed");
          self.say(SERVICE_UNAVAILABLE);
        },
      },
      _ => {},
    }
  }

  /// Replaces the active screen. There is no history and no guard.
  pub fn navigate_to(&mut self, screen: ScreenId) {
    if screen == self.screen {
      return;
    }
    if self.screen == ScreenId::NAVIGATION_SETUP {
      self.session.cancel_planning();
    }
    if self.screen == ScreenId::NAVIGATION_ACTIVE {
      self.arrival.cancel();
    }
    info!(from = %self.screen, to = %screen, "Navigate");
    self.screen = screen;
    if self.settings.voice_enabled {
      self.say(screen.announcement());
    }
    if screen == ScreenId::NAVIGATION_ACTIVE {
      if let Some(step) = self.session.current_step() {
        let text = step.spoken();
        self.say(&text);
      }
    }
  }

  pub fn plan_route(&mut self, destination: &str) -> Result<u64, PlanError> {
    let destination = destination.trim();
    let generation = match self.session.begin_planning(destination) {
      Ok(generation) => generation,
      Err(PlanError::MissingDestination) => {
        self.say(MISSING_DESTINATION);
        return Err(PlanError::MissingDestination);
      },
      Err(error) => return Err(error),
    };
    self.say(&format!("正在为您规划前往{destination}的路线"));
    let provider = self.provider.clone();
    let action_tx = self.action_tx.clone();
    let destination = destination.to_string();
    tokio::spawn(async move {
      let result = provider.fetch_steps(&destination).await;
      let _ = action_tx.send(Action::RoutePlanned(generation, result));
    });
    Ok(generation)
  }

  fn route_planned(
    &mut self,
    generation: u64,
    result: Result<Vec<NavigationStep>, crate::directions::error::DirectionsError>,
  ) {
    match self.session.complete_planning(generation, result) {
      PlanOutcome::Stale => {},
      PlanOutcome::Started { first } => {
        self.navigate_to(ScreenId::NAVIGATION_ACTIVE);
        self.grip.trigger(first.direction);
      },
      PlanOutcome::Failed { message } => self.say(&message),
    }
  }

  pub fn advance_step(&mut self) {
    match self.session.advance() {
      AdvanceOutcome::Advanced(step) => {
        self.grip.trigger(step.direction);
        self.say(&step.spoken());
      },
      AdvanceOutcome::Arrived => {
        self.grip.trigger(Direction::Arrive);
        self.say(ARRIVED);
        self.arrival.schedule(self.arrival_delay, self.action_tx.clone(), Action::ReturnHome);
      },
      AdvanceOutcome::AlreadyFinished => debug!("Trip already finished"),
      AdvanceOutcome::NoRoute => warn!("Advance requested without a route"),
    }
  }

  fn test_grip(&mut self, direction: Direction) {
    self.grip.trigger(direction);
    self.say(match direction {
      Direction::Left => "正在测试左转反馈",
      Direction::Right => "正在测试右转反馈",
      Direction::Straight => "正在测试直行脉冲",
      Direction::Arrive => "正在测试到达警示",
    });
  }

  fn describe_surroundings(&mut self) {
    let context = match self.session.current_step() {
      Some(step) if self.screen == ScreenId::NAVIGATION_ACTIVE => step.instruction.clone(),
      _ => format!("用户正在查看{}", self.screen.title()),
    };
    let provider = self.provider.clone();
    let action_tx = self.action_tx.clone();
    tokio::spawn(async move {
      let result = provider.describe_surroundings(&context).await;
      let _ = action_tx.send(Action::Described(result));
    });
  }

  fn say(&mut self, text: &str) {
    self.announcer.announce(text);
    self.last_spoken = Some(text.to_string());
  }
}

pub struct CoreBuilder {
  provider: Option<Arc<dyn DirectionsProvider>>,
  announcer: Option<Arc<dyn Announcer>>,
  action_tx: Option<UnboundedSender<Action>>,
  cane: Option<CaneConfig>,
  settings: Option<Settings>,
}

impl CoreBuilder {
  pub fn new() -> Self {
    CoreBuilder { provider: None, announcer: None, action_tx: None, cane: None, settings: None }
  }
  pub fn provider(self, value: Arc<dyn DirectionsProvider>) -> Self {
    CoreBuilder { provider: Some(value), ..self }
  }
  pub fn announcer(self, value: Arc<dyn Announcer>) -> Self {
    CoreBuilder { announcer: Some(value), ..self }
  }
  pub fn action_tx(self, value: UnboundedSender<Action>) -> Self {
    CoreBuilder { action_tx: Some(value), ..self }
  }
  pub fn cane(self, value: CaneConfig) -> Self {
    CoreBuilder { cane: Some(value), ..self }
  }
  pub fn settings(self, value: Settings) -> Self {
    CoreBuilder { settings: Some(value), ..self }
  }
  pub fn build(self) -> Result<Core, CoreError> {
    let action_tx = self.action_tx.ok_or(CoreError::BuilderIncomplete("action_tx"))?;
    let cane = self.cane.unwrap_or_default();
    Ok(Core {
      screen: ScreenId::HOME,
      session: NavigationSession::new(),
      grip: GripDriver::new(cane.grip_hold(), action_tx.clone()),
      settings: self.settings.unwrap_or_default(),
      device: DeviceStatus::default(),
      arrival: Timer::new(),
      arrival_delay: cane.arrival_return(),
      last_spoken: None,
      provider: self.provider.ok_or(CoreError::BuilderIncomplete("provider"))?,
      announcer: self.announcer.ok_or(CoreError::BuilderIncomplete("announcer"))?,
      action_tx,
    })
  }
}

impl Default for CoreBuilder {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use async_trait::async_trait;
  use pretty_assertions::assert_eq;
  use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    time::Instant,
  };

  use super::*;
  use crate::{
    directions::{demo::DemoDirections, error::DirectionsError, fallback_steps},
    navigation::ROUTE_UNAVAILABLE,
    speech::testing::RecordingAnnouncer,
  };

  struct StaticDirections(Result<Vec<NavigationStep>, DirectionsError>);

  #[async_trait]
  impl DirectionsProvider for StaticDirections {
    async fn fetch_steps(
      &self,
      _destination: &str,
    ) -> Result<Vec<NavigationStep>, DirectionsError> {
      self.0.clone()
    }

    async fn describe_surroundings(&self, _context: &str) -> Result<String, DirectionsError> {
      Err(DirectionsError::MissingApiKey)
    }
  }

  struct Harness {
    core: Core,
    rx: UnboundedReceiver<Action>,
    speech: RecordingAnnouncer,
  }

  impl Harness {
    fn new(provider: impl DirectionsProvider + 'static) -> Self {
      let (tx, rx) = mpsc::unbounded_channel();
      let speech = RecordingAnnouncer::default();
      let core = Core::builder()
        .provider(Arc::new(provider))
        .announcer(Arc::new(speech.clone()))
        .action_tx(tx)
        .cane(CaneConfig::default())
        .build()
        .unwrap();
      Self { core, rx, speech }
    }

    fn demo() -> Self {
      Self::new(DemoDirections::new(CaneConfig::default().planning_delay()))
    }

    fn dispatch(&mut self, action: Action) {
      self.core.dispatch(&action);
    }

    /// Waits for the next asynchronous action and applies it.
    async fn step(&mut self) -> Action {
      let action = self.rx.recv().await.unwrap();
      self.core.dispatch(&action);
      action
    }

    async fn run_until(&mut self, done: impl Fn(&Core) -> bool) {
      for _ in 0..20 {
        if done(&self.core) {
          return;
        }
        self.step().await;
      }
      panic!("condition not reached");
    }

    async fn plan(&mut self, destination: &str) {
      self.dispatch(Action::Navigate(ScreenId::NAVIGATION_SETUP));
      self.dispatch(Action::PlanRoute(destination.to_string()));
      self.run_until(|core| !core.session().is_planning()).await;
    }
  }

  #[tokio::test(start_paused = true)]
  async fn demo_route_starts_active_navigation() {
    let mut h = Harness::demo();
    h.plan("家").await;

    assert_eq!(h.core.screen(), ScreenId::NAVIGATION_ACTIVE);
    assert_eq!(h.core.grip_state(), GripState::InflateLeft);
    assert_eq!(h.core.session().current_index(), 0);
    assert_eq!(h.core.session().steps()[0].instruction, "前方路口向左转，进入人民路。");
    let spoken = h.speech.spoken();
    assert!(spoken.contains(&"正在为您规划前往家的路线".to_string()));
    assert!(spoken.contains(&"正在导航中".to_string()));
    assert_eq!(h.speech.last().unwrap(), "前方路口向左转，进入人民路。。距离还有120米。");
  }

  #[tokio::test(start_paused = true)]
  async fn missing_destination_keeps_screen() {
    let mut h = Harness::demo();
    h.dispatch(Action::Navigate(ScreenId::NAVIGATION_SETUP));
    for destination in ["", "  "] {
      h.dispatch(Action::PlanRoute(destination.to_string()));
      assert_eq!(h.core.screen(), ScreenId::NAVIGATION_SETUP);
      assert_eq!(h.speech.last().unwrap(), MISSING_DESTINATION);
      assert!(!h.core.session().is_planning());
    }
    assert!(h.rx.try_recv().is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn arrival_returns_home_after_delay() {
    let mut h = Harness::demo();
    h.plan("人民医院").await;
    let total = h.core.session().steps().len();
    for _ in 1..total {
      h.dispatch(Action::AdvanceStep);
    }
    assert_eq!(h.core.session().current_index(), total - 1);

    let arrived_at = Instant::now();
    h.dispatch(Action::AdvanceStep);
    assert_eq!(h.core.grip_state(), GripState::Warning);
    assert_eq!(h.speech.last().unwrap(), ARRIVED);
    assert_eq!(h.core.screen(), ScreenId::NAVIGATION_ACTIVE);

    h.dispatch(Action::AdvanceStep);
    assert_eq!(h.core.session().current_index(), total - 1);

    h.run_until(|core| core.screen() == ScreenId::HOME).await;
    assert!(arrived_at.elapsed() >= Duration::from_secs(3));
    assert_eq!(h.speech.last().unwrap(), "已回到首页");

    h.dispatch(Action::AdvanceStep);
    assert_eq!(h.core.screen(), ScreenId::HOME);
  }

  #[tokio::test(start_paused = true)]
  async fn leaving_active_navigation_cancels_return_home() {
    let mut h = Harness::demo();
    h.plan("家").await;
    while !h.core.session().is_finished() {
      h.dispatch(Action::AdvanceStep);
    }
    h.dispatch(Action::Navigate(ScreenId::SETTINGS));
    tokio::time::sleep(Duration::from_secs(5)).await;
    while let Ok(action) = h.rx.try_recv() {
      h.core.dispatch(&action);
    }
    assert_eq!(h.core.screen(), ScreenId::SETTINGS);
  }

  #[tokio::test(start_paused = true)]
  async fn provider_failure_falls_back_to_local_script() {
    let mut h = Harness::new(StaticDirections(Err(DirectionsError::Http("offline".into()))));
    h.plan("公司").await;

    assert_eq!(h.core.screen(), ScreenId::NAVIGATION_ACTIVE);
    assert_eq!(h.core.session().steps(), fallback_steps().as_slice());
    assert_eq!(h.core.grip_state(), GripState::Pulse);
    let view = h.core.session().view();
    assert!(view.offline_reason.unwrap().contains("offline"));
  }

  #[tokio::test(start_paused = true)]
  async fn empty_route_reports_error_in_place() {
    let mut h = Harness::new(StaticDirections(Ok(Vec::new())));
    h.plan("公司").await;

    assert_eq!(h.core.screen(), ScreenId::NAVIGATION_SETUP);
    assert_eq!(h.core.session().error(), Some(ROUTE_UNAVAILABLE));
    assert_eq!(h.speech.last().unwrap(), ROUTE_UNAVAILABLE);
    assert_eq!(h.core.grip_state(), GripState::Idle);
  }

  #[tokio::test(start_paused = true)]
  async fn leaving_setup_discards_pending_route() {
    let mut h = Harness::demo();
    h.dispatch(Action::Navigate(ScreenId::NAVIGATION_SETUP));
    h.dispatch(Action::PlanRoute("家".to_string()));
    assert!(h.core.session().is_planning());
    h.dispatch(Action::Navigate(ScreenId::HOME));

    let late = h.step().await;
    assert!(matches!(late, Action::RoutePlanned(_, Ok(_))));
    assert_eq!(h.core.screen(), ScreenId::HOME);
    assert!(h.core.session().steps().is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn duplicate_plan_requests_are_ignored() {
    let mut h = Harness::demo();
    h.dispatch(Action::Navigate(ScreenId::NAVIGATION_SETUP));
    h.dispatch(Action::PlanRoute("家".to_string()));
    h.dispatch(Action::PlanRoute("公司".to_string()));
    h.step().await;
    assert_eq!(h.core.screen(), ScreenId::NAVIGATION_ACTIVE);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!matches!(h.rx.try_recv(), Ok(Action::RoutePlanned(..))));
  }

  #[tokio::test(start_paused = true)]
  async fn screen_announcements_follow_voice_setting() {
    let mut h = Harness::demo();
    h.dispatch(Action::Navigate(ScreenId::SETTINGS));
    assert_eq!(h.speech.last().unwrap(), "设置页面");
    h.dispatch(Action::ToggleVoice);
    assert_eq!(h.speech.last().unwrap(), "语音播报已关闭");
    h.dispatch(Action::Navigate(ScreenId::WEATHER_DETAIL));
    assert_eq!(h.speech.last().unwrap(), "语音播报已关闭");
    h.dispatch(Action::Navigate(ScreenId::WEATHER_DETAIL));
    assert_eq!(h.speech.spoken().len(), 2);
  }

  #[tokio::test(start_paused = true)]
  async fn grip_test_buttons_drive_the_handle() {
    let mut h = Harness::demo();
    h.dispatch(Action::TestGrip(Direction::Right));
    assert_eq!(h.core.grip_state(), GripState::InflateRight);
    assert_eq!(h.speech.last().unwrap(), "正在测试右转反馈");
    h.step().await;
    assert_eq!(h.core.grip_state(), GripState::Idle);
  }

  #[tokio::test(start_paused = true)]
  async fn description_failure_is_spoken() {
    let mut h = Harness::new(StaticDirections(Ok(Vec::new())));
    h.dispatch(Action::DescribeSurroundings);
    h.step().await;
    assert_eq!(h.speech.last().unwrap(), SERVICE_UNAVAILABLE);
  }

  #[tokio::test(start_paused = true)]
  async fn settings_are_clamped() {
    let mut h = Harness::demo();
    h.dispatch(Action::SetVolume(150));
    h.dispatch(Action::SetHapticStrength(40));
    assert_eq!(h.core.settings().volume, 100);
    assert_eq!(h.core.settings().haptic_strength, 40);
  }

  #[test]
  fn builder_requires_channel() {
    let result = Core::builder()
      .provider(Arc::new(StaticDirections(Ok(Vec::new()))))
      .announcer(Arc::new(LogAnnouncer))
      .build();
    assert!(matches!(result, Err(CoreError::BuilderIncomplete("action_tx"))));
  }
}

use std::time::Duration;

use serde::Serialize;
use strum::Display;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::{action::Action, navigation::step::Direction, timer::Timer};

/// Pattern currently driven through the handle's air cells.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum GripState {
  #[default]
  Idle,
  Pulse,
  InflateLeft,
  InflateRight,
  Warning,
}

impl From<Direction> for GripState {
  fn from(direction: Direction) -> Self {
    match direction {
      Direction::Left => GripState::InflateLeft,
      Direction::Right => GripState::InflateRight,
      Direction::Arrive => GripState::Warning,
      Direction::Straight => GripState::Pulse,
    }
  }
}

impl GripState {
  pub fn label(&self) -> &'static str {
    match self {
      GripState::Idle => "气囊待机",
      _ => "触觉反馈中",
    }
  }

  pub fn description(&self) -> &'static str {
    match self {
      GripState::InflateLeft => "左侧气囊充气 • 向左转",
      GripState::InflateRight => "右侧气囊充气 • 向右转",
      GripState::Pulse => "中央脉冲 • 直行",
      GripState::Warning => "全手柄震动 • 停下",
      GripState::Idle => "握持手柄感应方向",
    }
  }
}

/// Holds a feedback pattern for a fixed time, then falls back to idle.
pub struct GripDriver {
  state: GripState,
  hold: Duration,
  revert: Timer,
  action_tx: UnboundedSender<Action>,
}

impl GripDriver {
  pub fn new(hold: Duration, action_tx: UnboundedSender<Action>) -> Self {
    Self { state: GripState::Idle, hold, revert: Timer::new(), action_tx }
  }

  pub fn state(&self) -> GripState {
    self.state
  }

  /// Starts the pattern for `direction`, replacing any pattern still held.
  pub fn trigger(&mut self, direction: Direction) -> GripState {
    self.state = GripState::from(direction);
    let generation =
      self.revert.schedule(self.hold, self.action_tx.clone(), Action::GripRelease);
    debug!(state = %self.state, generation, "Grip feedback triggered");
    self.state
  }

  /// Reverts to idle if `generation` belongs to the latest trigger.
  pub fn release(&mut self, generation: u64) -> bool {
    if !self.revert.fire(generation) {
      debug!(generation, "Ignoring outdated grip release");
      return false;
    }
    self.state = GripState::Idle;
    true
  }
}

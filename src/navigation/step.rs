use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Turn hint attached to every walking instruction.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
  Left,
  Right,
  Straight,
  Arrive,
}

impl Direction {
  pub fn arrow(&self) -> &'static str {
    match self {
      Direction::Left => "←",
      Direction::Right => "→",
      Direction::Straight => "↑",
      Direction::Arrive => "◎",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationStep {
  pub instruction: String,
  pub distance: String,
  pub direction: Direction,
}

impl NavigationStep {
  pub fn new(
    instruction: impl Into<String>,
    distance: impl Into<String>,
    direction: Direction,
  ) -> Self {
    Self { instruction: instruction.into(), distance: distance.into(), direction }
  }

  /// Text read out when this step becomes the current one.
  pub fn spoken(&self) -> String {
    format!("{}。距离还有{}。", self.instruction, self.distance)
  }
}

use std::{fmt, str::FromStr};

use serde::{
  de::{self, Deserializer, Visitor},
  Deserialize, Serialize,
};

use crate::{
  directions::error::DirectionsError,
  grip::GripState,
  navigation::{
    step::{Direction, NavigationStep},
    RouteView,
  },
  screens::ScreenId,
  settings::{DeviceStatus, Settings},
};

/// Snapshots pushed from the core to the mounted screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScreenUpdate {
  Grip(GripState),
  Route(RouteView),
  Settings(Settings),
  Device(DeviceStatus),
  Spoken(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Action {
  Tick,
  Render,
  Resize(u16, u16),
  Suspend,
  Resume,
  Quit,
  Error(String),
  Navigate(ScreenId),
  Move(MoveDirection),
  Accept,
  Back,
  PlanRoute(String),
  RoutePlanned(u64, Result<Vec<NavigationStep>, DirectionsError>),
  AdvanceStep,
  ReturnHome(u64),
  TestGrip(Direction),
  GripRelease(u64),
  ToggleVoice,
  SetVolume(u8),
  SetHapticStrength(u8),
  FindCane,
  DescribeSurroundings,
  Described(Result<String, DirectionsError>),
  ScreenUpdate(ScreenUpdate),
}

impl<'de> Deserialize<'de> for Action {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    struct ActionVisitor;

    impl<'de> Visitor<'de> for ActionVisitor {
      type Value = Action;

      fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a valid string representation of Action")
      }

      fn visit_str<E>(self, value: &str) -> Result<Action, E>
      where
        E: de::Error,
      {
        match value {
          "Tick" => Ok(Action::Tick),
          "Render" => Ok(Action::Render),
          "Suspend" => Ok(Action::Suspend),
          "Resume" => Ok(Action::Resume),
          "Quit" => Ok(Action::Quit),
          "Accept" => Ok(Action::Accept),
          "Back" => Ok(Action::Back),
          "AdvanceStep" => Ok(Action::AdvanceStep),
          "ToggleVoice" => Ok(Action::ToggleVoice),
          "FindCane" => Ok(Action::FindCane),
          "DescribeSurroundings" => Ok(Action::DescribeSurroundings),
          data if data.starts_with("Error(") => {
            let error_msg = data.trim_start_matches("Error(").trim_end_matches(')');
            Ok(Action::Error(error_msg.to_string()))
          },
          data if data.starts_with("Navigate(") => {
            let screen = data.trim_start_matches("Navigate(").trim_end_matches(')');
            ScreenId::from_str(screen.trim())
              .map(Action::Navigate)
              .map_err(|_| E::custom(format!("Unknown screen: {}", screen)))
          },
          data if data.starts_with("TestGrip(") => {
            let direction = data.trim_start_matches("TestGrip(").trim_end_matches(')');
            Direction::from_str(direction.trim())
              .map(Action::TestGrip)
              .map_err(|_| E::custom(format!("Unknown direction: {}", direction)))
          },
          data if data.starts_with("Resize(") => {
            let parts: Vec<&str> =
              data.trim_start_matches("Resize(").trim_end_matches(')').split(',').collect();
            if parts.len() == 2 {
              let width: u16 = parts[0].trim().parse().map_err(E::custom)?;
              let height: u16 = parts[1].trim().parse().map_err(E::custom)?;
              Ok(Action::Resize(width, height))
            } else {
              Err(E::custom(format!("Invalid Resize format: {}", value)))
            }
          },
          _ => Err(E::custom(format!("Unknown Action variant: {}", value))),
        }
      }
    }

    deserializer.deserialize_str(ActionVisitor)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoveDirection {
  Up,
  Down,
  Left,
  Right,
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn parse(raw: &str) -> Result<Action, serde_json::Error> {
    serde_json::from_str(&format!("\"{raw}\""))
  }

  #[test]
  fn parses_plain_and_parameterised_actions() {
    assert_eq!(parse("Quit").unwrap(), Action::Quit);
    assert_eq!(parse("AdvanceStep").unwrap(), Action::AdvanceStep);
    assert_eq!(parse("Navigate(EMERGENCY)").unwrap(), Action::Navigate(ScreenId::EMERGENCY));
    assert_eq!(parse("TestGrip(left)").unwrap(), Action::TestGrip(Direction::Left));
    assert_eq!(parse("Resize(80, 24)").unwrap(), Action::Resize(80, 24));
  }

  #[test]
  fn rejects_unknown_actions() {
    assert!(parse("Navigate(MOON)").is_err());
    assert!(parse("Jump").is_err());
    assert!(parse("Refresh").is_err());
    assert!(parse("Help").is_err());
  }
}

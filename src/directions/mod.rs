pub mod demo;
pub mod error;
pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use self::{demo::DemoDirections, error::DirectionsError, gemini::GeminiDirections};
use crate::{
  config::{CaneConfig, DirectionsConfig},
  navigation::step::{Direction, NavigationStep},
};

pub const NO_DESCRIPTION: &str = "暂无描述。";

/// Source of walking directions for a destination name.
///
/// Implementations may be slow and may fail. The caller decides what to do on
/// failure, see [`fallback_steps`].
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
  async fn fetch_steps(
    &self,
    destination: &str,
  ) -> Result<Vec<NavigationStep>, DirectionsError>;

  /// Short description of the surroundings for the given context.
  async fn describe_surroundings(&self, _context: &str) -> Result<String, DirectionsError> {
    Ok(NO_DESCRIPTION.to_string())
  }
}

#[derive(
  Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
  #[default]
  Demo,
  Gemini,
}

/// Fixed script used whenever the provider cannot deliver a route.
pub fn fallback_steps() -> Vec<NavigationStep> {
  vec![
    NavigationStep::new("向前直行前往目的地。", "100米", Direction::Straight),
    NavigationStep::new("导航数据暂时不可用。", "0米", Direction::Arrive),
  ]
}

pub fn build_provider(
  directions: &DirectionsConfig,
  cane: &CaneConfig,
) -> Result<Arc<dyn DirectionsProvider>, DirectionsError> {
  let provider: Arc<dyn DirectionsProvider> = match directions.provider {
    ProviderKind::Demo => Arc::new(DemoDirections::new(cane.planning_delay())),
    ProviderKind::Gemini => Arc::new(GeminiDirections::new(directions)?),
  };
  tracing::info!(provider = %directions.provider, "Directions provider ready");
  Ok(provider)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fallback_script_ends_with_arrival() {
    let steps = fallback_steps();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].direction, Direction::Straight);
    assert_eq!(steps[1].direction, Direction::Arrive);
    assert_eq!(steps[1].instruction, "导航数据暂时不可用。");
  }

  #[test]
  fn provider_kind_parses_from_config_names() {
    assert_eq!("gemini".parse::<ProviderKind>().ok(), Some(ProviderKind::Gemini));
    assert_eq!(ProviderKind::default(), ProviderKind::Demo);
  }
}

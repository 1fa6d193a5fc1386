use std::time::Duration;

use async_trait::async_trait;

use super::{error::DirectionsError, DirectionsProvider};
use crate::navigation::step::{Direction, NavigationStep};

pub const ROUTE_COUNT: usize = 3;

/// Offline provider returning one of a few canned routes.
pub struct DemoDirections {
  delay: Duration,
}

impl DemoDirections {
  pub fn new(delay: Duration) -> Self {
    Self { delay }
  }
}

#[async_trait]
impl DirectionsProvider for DemoDirections {
  async fn fetch_steps(
    &self,
    destination: &str,
  ) -> Result<Vec<NavigationStep>, DirectionsError> {
    tokio::time::sleep(self.delay).await;
    Ok(canned_route(destination))
  }
}

/// Sum of the UTF-16 code units of `destination`, modulo the route count.
pub fn route_index(destination: &str) -> usize {
  let checksum: u64 = destination.encode_utf16().map(u64::from).sum();
  (checksum % ROUTE_COUNT as u64) as usize
}

pub fn canned_route(destination: &str) -> Vec<NavigationStep> {
  use Direction::*;
  match route_index(destination) {
    0 => vec![
      NavigationStep::new("前方路口向左转，进入人民路。", "120米", Left),
      NavigationStep::new("沿人民路直行。", "300米", Straight),
      NavigationStep::new("在第二个红绿灯处向右转，进入中山大道。", "50米", Right),
      NavigationStep::new(format!("您已到达目的地附近：{destination}。"), "终点", Arrive),
    ],
    1 => vec![
      NavigationStep::new("沿当前道路直行，通过人行横道。", "80米", Straight),
      NavigationStep::new("在地铁站 C 口前向右转。", "200米", Right),
      NavigationStep::new(
        format!("继续前行，您的目的地 {destination} 就在左侧。"),
        "50米",
        Left,
      ),
      NavigationStep::new(format!("您已到达目的地：{destination}。"), "终点", Arrive),
    ],
    _ => vec![
      NavigationStep::new("请注意台阶，下楼后向左转。", "30米", Left),
      NavigationStep::new("穿过广场，保持直行。", "250米", Straight),
      NavigationStep::new("在公交站牌后向右转。", "100米", Right),
      NavigationStep::new(format!("导航结束，您已到达 {destination}。"), "终点", Arrive),
    ],
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn route_index_is_checksum_modulo_route_count() {
    assert_eq!(route_index("家"), 0);
    assert_eq!(route_index("公司"), 1);
    assert_eq!(route_index("沃尔玛超市"), 1);
    assert_eq!(route_index("人民医院"), 2);
    assert_eq!(route_index("abc"), (97 + 98 + 99) % 3);
  }

  #[test]
  fn same_destination_selects_same_route() {
    for destination in ["家", "公司", "人民医院", "Central Station", "🚏"] {
      assert_eq!(canned_route(destination), canned_route(destination));
    }
  }

  #[test]
  fn every_route_ends_at_the_destination() {
    for destination in ["家", "公司", "人民医院"] {
      let route = canned_route(destination);
      assert_eq!(route.len(), 4);
      let last = route.last().unwrap();
      assert_eq!(last.direction, Direction::Arrive);
      assert!(last.instruction.contains(destination));
    }
  }

  #[tokio::test(start_paused = true)]
  async fn waits_for_the_planning_delay() {
    let provider = DemoDirections::new(Duration::from_millis(1200));
    let started = tokio::time::Instant::now();
    let steps = provider.fetch_steps("家").await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(1200));
    assert_eq!(steps[0].direction, Direction::Left);
  }
}

pub mod step;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use self::step::NavigationStep;
use crate::directions::{error::DirectionsError, fallback_steps};

pub const ROUTE_UNAVAILABLE: &str = "无法规划路线";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
  #[error("No destination was given")]
  MissingDestination,
  #[error("A route is already being planned")]
  AlreadyPlanning,
}

/// Where the loaded route came from.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub enum RouteSource {
  #[default]
  Provider,
  Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
  /// Result of a request that was superseded or cancelled.
  Stale,
  Started { first: NavigationStep },
  Failed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
  NoRoute,
  Advanced(NavigationStep),
  Arrived,
  AlreadyFinished,
}

/// Read-only snapshot of the session for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteView {
  pub current: Option<NavigationStep>,
  pub index: usize,
  pub total: usize,
  pub planning: bool,
  pub error: Option<String>,
  pub offline_reason: Option<String>,
  pub finished: bool,
}

/// Route currently being walked and the planning request in flight, if any.
#[derive(Debug, Default)]
pub struct NavigationSession {
  steps: Vec<NavigationStep>,
  current_index: usize,
  planning: bool,
  generation: u64,
  error: Option<String>,
  finished: bool,
  source: RouteSource,
}

impl NavigationSession {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn steps(&self) -> &[NavigationStep] {
    &self.steps
  }

  pub fn current_index(&self) -> usize {
    self.current_index
  }

  pub fn current_step(&self) -> Option<&NavigationStep> {
    self.steps.get(self.current_index)
  }

  pub fn is_planning(&self) -> bool {
    self.planning
  }

  pub fn is_finished(&self) -> bool {
    self.finished
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn source(&self) -> &RouteSource {
    &self.source
  }

  pub fn view(&self) -> RouteView {
    RouteView {
      current: self.current_step().cloned(),
      index: self.current_index,
      total: self.steps.len(),
      planning: self.planning,
      error: self.error.clone(),
      offline_reason: match &self.source {
        RouteSource::Fallback { reason } => Some(reason.clone()),
        RouteSource::Provider => None,
      },
      finished: self.finished,
    }
  }

  /// Opens a planning request and returns the generation its result must carry.
  pub fn begin_planning(&mut self, destination: &str) -> Result<u64, PlanError> {
    if destination.trim().is_empty() {
      return Err(PlanError::MissingDestination);
    }
    if self.planning {
      return Err(PlanError::AlreadyPlanning);
    }
    self.error = None;
    self.planning = true;
    self.generation += 1;
    debug!(generation = self.generation, destination, "Planning route");
    Ok(self.generation)
  }

  /// Drops the request in flight so that its result is ignored.
  pub fn cancel_planning(&mut self) {
    if self.planning {
      self.planning = false;
      self.generation += 1;
      info!(generation = self.generation, "Route planning cancelled");
    }
  }

  pub fn complete_planning(
    &mut self,
    generation: u64,
    result: Result<Vec<NavigationStep>, DirectionsError>,
  ) -> PlanOutcome {
    if generation != self.generation || !self.planning {
      debug!(generation, current = self.generation, "Discarding stale route");
      return PlanOutcome::Stale;
    }
    self.planning = false;
    let (steps, source) = match result {
      Ok(steps) if steps.is_empty() => {
        self.error = Some(ROUTE_UNAVAILABLE.to_string());
        return PlanOutcome::Failed { message: ROUTE_UNAVAILABLE.to_string() };
      },
      Ok(steps) => (steps, RouteSource::Provider),
      Err(error) => {
        warn!(%error, "Directions provider failed, using the fallback route");
        (fallback_steps(), RouteSource::Fallback { reason: error.to_string() })
      },
    };
    self.load(steps, source);
    match self.current_step() {
      Some(first) => PlanOutcome::Started { first: first.clone() },
      None => PlanOutcome::Failed { message: ROUTE_UNAVAILABLE.to_string() },
    }
  }

  fn load(&mut self, steps: Vec<NavigationStep>, source: RouteSource) {
    info!(steps = steps.len(), ?source, "Route loaded");
    self.steps = steps;
    self.current_index = 0;
    self.finished = false;
    self.source = source;
  }

  pub fn advance(&mut self) -> AdvanceOutcome {
    if self.steps.is_empty() {
      return AdvanceOutcome::NoRoute;
    }
    if self.finished {
      return AdvanceOutcome::AlreadyFinished;
    }
    if self.current_index + 1 < self.steps.len() {
      self.current_index += 1;
      return AdvanceOutcome::Advanced(self.steps[self.current_index].clone());
    }
    self.finished = true;
    AdvanceOutcome::Arrived
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::{step::Direction, *};
  use crate::directions::demo::canned_route;

  fn planned(destination: &str) -> NavigationSession {
    let mut session = NavigationSession::new();
    let generation = session.begin_planning(destination).unwrap();
    session.complete_planning(generation, Ok(canned_route(destination)));
    session
  }

  #[test]
  fn blank_destination_is_rejected() {
    let mut session = NavigationSession::new();
    assert_eq!(session.begin_planning(""), Err(PlanError::MissingDestination));
    assert_eq!(session.begin_planning("   "), Err(PlanError::MissingDestination));
    assert!(!session.is_planning());
  }

  #[test]
  fn duplicate_submission_is_rejected_while_planning() {
    let mut session = NavigationSession::new();
    session.begin_planning("家").unwrap();
    assert_eq!(session.begin_planning("公司"), Err(PlanError::AlreadyPlanning));
  }

  #[test]
  fn successful_plan_starts_at_first_step() {
    let mut session = NavigationSession::new();
    let generation = session.begin_planning("家").unwrap();
    assert!(session.is_planning());
    let outcome = session.complete_planning(generation, Ok(canned_route("家")));
    assert_eq!(
      outcome,
      PlanOutcome::Started { first: canned_route("家").remove(0) }
    );
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.source(), &RouteSource::Provider);
    assert!(!session.is_planning());
  }

  #[test]
  fn empty_route_sets_error() {
    let mut session = NavigationSession::new();
    let generation = session.begin_planning("家").unwrap();
    let outcome = session.complete_planning(generation, Ok(Vec::new()));
    assert_eq!(outcome, PlanOutcome::Failed { message: ROUTE_UNAVAILABLE.to_string() });
    assert_eq!(session.error(), Some(ROUTE_UNAVAILABLE));
    assert!(session.steps().is_empty());

    session.begin_planning("家").unwrap();
    assert_eq!(session.error(), None);
  }

  #[test]
  fn provider_failure_loads_fallback_route() {
    let mut session = NavigationSession::new();
    let generation = session.begin_planning("家").unwrap();
    let outcome = session
      .complete_planning(generation, Err(DirectionsError::Http("timed out".to_string())));
    assert!(matches!(outcome, PlanOutcome::Started { ref first } if first.direction == Direction::Straight));
    assert_eq!(session.steps(), fallback_steps().as_slice());
    assert!(matches!(session.source(), RouteSource::Fallback { reason } if reason.contains("timed out")));
  }

  #[test]
  fn cancelled_request_result_is_stale() {
    let mut session = NavigationSession::new();
    let generation = session.begin_planning("家").unwrap();
    session.cancel_planning();
    assert_eq!(session.complete_planning(generation, Ok(canned_route("家"))), PlanOutcome::Stale);
    assert!(session.steps().is_empty());

    let newer = session.begin_planning("公司").unwrap();
    assert_eq!(session.complete_planning(generation, Ok(canned_route("家"))), PlanOutcome::Stale);
    assert!(matches!(session.complete_planning(newer, Ok(canned_route("公司"))), PlanOutcome::Started { .. }));
  }

  #[test]
  fn advance_moves_one_step_at_a_time() {
    let mut session = planned("家");
    let total = session.steps().len();
    for expected in 1..total {
      assert!(matches!(session.advance(), AdvanceOutcome::Advanced(_)));
      assert_eq!(session.current_index(), expected);
    }
    assert_eq!(session.advance(), AdvanceOutcome::Arrived);
    assert_eq!(session.current_index(), total - 1);
    assert!(session.is_finished());
  }

  #[test]
  fn advance_after_arrival_is_a_no_op() {
    let mut session = planned("人民医院");
    while session.advance() != AdvanceOutcome::Arrived {}
    let index = session.current_index();
    assert_eq!(session.advance(), AdvanceOutcome::AlreadyFinished);
    assert_eq!(session.advance(), AdvanceOutcome::AlreadyFinished);
    assert_eq!(session.current_index(), index);
  }

  #[test]
  fn advance_without_route_is_guarded() {
    let mut session = NavigationSession::new();
    assert_eq!(session.advance(), AdvanceOutcome::NoRoute);
    assert_eq!(session.current_step(), None);
  }

  #[test]
  fn new_plan_resets_progress() {
    let mut session = planned("家");
    session.advance();
    session.advance();
    let generation = session.begin_planning("公司").unwrap();
    session.complete_planning(generation, Ok(canned_route("公司")));
    assert_eq!(session.current_index(), 0);
    assert!(!session.is_finished());
  }
}

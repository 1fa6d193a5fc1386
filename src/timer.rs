use std::time::Duration;

use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

use crate::action::Action;

/// One pending delayed action at a time.
///
/// Every schedule or cancel bumps the generation; the fired action carries the
/// generation it was scheduled with so the owner can drop late deliveries with
/// [`Timer::fire`].
#[derive(Debug, Default)]
pub struct Timer {
  generation: u64,
  task: Option<JoinHandle<()>>,
}

impl Timer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn schedule<F>(&mut self, delay: Duration, tx: UnboundedSender<Action>, make: F) -> u64
  where
    F: FnOnce(u64) -> Action + Send + 'static,
  {
    self.cancel();
    let generation = self.generation;
    self.task = Some(tokio::spawn(async move {
      tokio::time::sleep(delay).await;
      let _ = tx.send(make(generation));
    }));
    generation
  }

  pub fn cancel(&mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
    self.generation += 1;
  }

  pub fn is_pending(&self) -> bool {
    self.task.as_ref().map(|task| !task.is_finished()).unwrap_or(false)
  }

  /// Accepts a fired generation once, clearing the pending task.
  pub fn fire(&mut self, generation: u64) -> bool {
    if generation != self.generation || self.task.is_none() {
      return false;
    }
    self.task = None;
    true
  }
}

impl Drop for Timer {
  fn drop(&mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
  }
}

use std::{process::Stdio, sync::Mutex};

use tokio::process::{Child, Command};
use tracing::{info, warn};

/// Speaks short texts to the user. A new announcement interrupts the previous
/// one; nothing is queued.
pub trait Announcer: Send + Sync {
  fn announce(&self, text: &str);
}

/// Writes announcements to the log only.
#[derive(Debug, Default)]
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
  fn announce(&self, text: &str) {
    info!(target: "speech", "{text}");
  }
}

/// Runs an external text-to-speech program, `espeak-ng -v cmn` for example,
/// with the text as its last argument.
pub struct CommandAnnouncer {
  program: String,
  args: Vec<String>,
  current: Mutex<Option<Child>>,
}

impl CommandAnnouncer {
  /// Returns `None` for an empty command line.
  pub fn new(command: &[String]) -> Option<Self> {
    let (program, args) = command.split_first()?;
    Some(Self { program: program.clone(), args: args.to_vec(), current: Mutex::new(None) })
  }
}

impl Announcer for CommandAnnouncer {
  fn announce(&self, text: &str) {
    info!(target: "speech", "{text}");
    let Ok(mut current) = self.current.lock() else {
      warn!("Speech process lock poisoned");
      return;
    };
    if let Some(mut previous) = current.take() {
      let _ = previous.start_kill();
    }
    let spawned = Command::new(&self.program)
      .args(&self.args)
      .arg(text)
      .stdin(Stdio::null())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .kill_on_drop(true)
      .spawn();
    match spawned {
      Ok(child) => *current = Some(child),
      Err(error) => warn!(program = %self.program, %error, "Failed to start speech program"),
    }
  }
}

#[cfg(test)]
pub mod testing {
  use std::sync::{Arc, Mutex};

  use super::Announcer;

  /// Keeps every announcement for assertions.
  #[derive(Debug, Clone, Default)]
  pub struct RecordingAnnouncer {
    spoken: Arc<Mutex<Vec<String>>>,
  }

  impl RecordingAnnouncer {
    pub fn spoken(&self) -> Vec<String> {
      self.spoken.lock().map(|spoken| spoken.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<String> {
      self.spoken().last().cloned()
    }
  }

  impl Announcer for RecordingAnnouncer {
    fn announce(&self, text: &str) {
      if let Ok(mut spoken) = self.spoken.lock() {
        spoken.push(text.to_string());
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_command_disables_program_output() {
    assert!(CommandAnnouncer::new(&[]).is_none());
    let announcer =
      CommandAnnouncer::new(&["espeak-ng".to_string(), "-v".to_string(), "cmn".to_string()])
        .unwrap();
    assert_eq!(announcer.program, "espeak-ng");
    assert_eq!(announcer.args, vec!["-v", "cmn"]);
  }

  #[tokio::test]
  async fn missing_program_is_not_fatal() {
    let announcer =
      CommandAnnouncer::new(&["guidecane-no-such-speech-program".to_string()]).unwrap();
    announcer.announce("已回到首页");
    announcer.announce("设置页面");
    assert!(announcer.current.lock().unwrap().is_none());
  }
}

use serde::{Deserialize, Serialize};

pub const MAX_LEVEL: u8 = 100;

/// Audio and haptic preferences for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub volume: u8,
  pub haptic_strength: u8,
  pub voice_enabled: bool,
}

impl Default for Settings {
  fn default() -> Self {
    Self { volume: 80, haptic_strength: 80, voice_enabled: true }
  }
}

impl Settings {
  pub fn set_volume(&mut self, volume: u8) {
    self.volume = volume.min(MAX_LEVEL);
  }

  pub fn set_haptic_strength(&mut self, strength: u8) {
    self.haptic_strength = strength.min(MAX_LEVEL);
  }

  /// Flips the voice flag and returns the new value.
  pub fn toggle_voice(&mut self) -> bool {
    self.voice_enabled = !self.voice_enabled;
    self.voice_enabled
  }
}

/// Live readings from the cane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
  pub battery_level: u8,
  pub grip_pressure: u8,
  pub is_connected: bool,
}

impl Default for DeviceStatus {
  fn default() -> Self {
    Self { battery_level: 62, grip_pressure: 0, is_connected: true }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn levels_are_clamped() {
    let mut settings = Settings::default();
    settings.set_volume(140);
    settings.set_haptic_strength(30);
    assert_eq!(settings.volume, 100);
    assert_eq!(settings.haptic_strength, 30);
  }

  #[test]
  fn voice_toggle_returns_new_value() {
    let mut settings = Settings::default();
    assert!(!settings.toggle_voice());
    assert!(settings.toggle_voice());
  }
}

use std::{collections::HashMap, path::PathBuf, time::Duration};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{de::Deserializer, Deserialize};

use crate::{action::Action, directions::ProviderKind, mode::Mode, settings::Settings};

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub _data_dir: PathBuf,
  #[serde(default)]
  pub _config_dir: PathBuf,
}

/// Timings of the cane interaction loop.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CaneConfig {
  pub grip_hold_ms: u64,
  pub arrival_return_ms: u64,
  pub planning_delay_ms: u64,
}

impl Default for CaneConfig {
  fn default() -> Self {
    Self { grip_hold_ms: 2000, arrival_return_ms: 3000, planning_delay_ms: 1200 }
  }
}

impl CaneConfig {
  pub fn grip_hold(&self) -> Duration {
    Duration::from_millis(self.grip_hold_ms)
  }

  pub fn arrival_return(&self) -> Duration {
    Duration::from_millis(self.arrival_return_ms)
  }

  pub fn planning_delay(&self) -> Duration {
    Duration::from_millis(self.planning_delay_ms)
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DirectionsConfig {
  pub provider: ProviderKind,
  pub model: String,
  pub base_url: String,
  pub api_key: Option<String>,
  pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
  fn default() -> Self {
    Self {
      provider: ProviderKind::Demo,
      model: "gemini-2.5-flash".to_string(),
      base_url: "https://generativelanguage.googleapis.com/v1beta/".to_string(),
      api_key: None,
      timeout_secs: 15,
    }
  }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
  /// Text-to-speech program and its arguments; empty logs announcements only.
  pub command: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
  #[serde(default, flatten)]
  pub config: AppConfig,
  #[serde(default)]
  pub keybindings: KeyBindings,
  #[serde(default)]
  pub cane: CaneConfig,
  #[serde(default)]
  pub directions: DirectionsConfig,
  #[serde(default)]
  pub speech: SpeechConfig,
  #[serde(default)]
  pub settings: Settings,
}

impl Config {
  pub fn new() -> Result<Self, config::ConfigError> {
    let default_config: Config = json5::from_str(CONFIG)
      .map_err(|e| config::ConfigError::Message(format!("Embedded config: {e}")))?;
    let data_dir = crate::utils::get_data_dir();
    let config_dir = crate::utils::get_config_dir();
    let mut builder = config::Config::builder()
      .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
      .set_default("_config_dir", config_dir.to_string_lossy().to_string())?;

    let config_files = [
      ("config.json5", config::FileFormat::Json5),
      ("config.json", config::FileFormat::Json),
      ("config.yaml", config::FileFormat::Yaml),
      ("config.toml", config::FileFormat::Toml),
      ("config.ini", config::FileFormat::Ini),
    ];
    let mut found_config = false;
    for (file, format) in &config_files {
      builder = builder
        .add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
      if config_dir.join(file).exists() {
        found_config = true
      }
    }
    if !found_config {
      log::info!("No configuration file found, using built-in defaults");
    }
    builder = builder.add_source(
      config::Environment::with_prefix(&crate::utils::PROJECT_NAME).separator("__"),
    );

    let mut cfg: Self = builder.build()?.try_deserialize()?;

    for (mode, default_bindings) in default_config.keybindings.iter() {
      let user_bindings = cfg.keybindings.entry(*mode).or_default();
      for (key, cmd) in default_bindings.iter() {
        user_bindings.entry(key.clone()).or_insert_with(|| cmd.clone());
      }
    }

    Ok(cfg)
  }
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyBindings(pub HashMap<Mode, HashMap<Vec<KeyEvent>, Action>>);

impl<'de> Deserialize<'de> for KeyBindings {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let parsed_map = HashMap::<Mode, HashMap<String, Action>>::deserialize(deserializer)?;

    let mut keybindings = HashMap::new();
    for (mode, inner_map) in parsed_map {
      let mut converted = HashMap::new();
      for (key_str, cmd) in inner_map {
        let sequence = parse_key_sequence(&key_str).map_err(serde::de::Error::custom)?;
        converted.insert(sequence, cmd);
      }
      keybindings.insert(mode, converted);
    }

    Ok(KeyBindings(keybindings))
  }
}

fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
  let raw_lower = raw.to_ascii_lowercase();
  let (remaining, modifiers) = extract_modifiers(&raw_lower);
  parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
  let mut modifiers = KeyModifiers::empty();
  let mut current = raw;

  loop {
    match current {
      rest if rest.starts_with("ctrl-") => {
        modifiers.insert(KeyModifiers::CONTROL);
        current = &rest[5..];
      },
      rest if rest.starts_with("alt-") => {
        modifiers.insert(KeyModifiers::ALT);
        current = &rest[4..];
      },
      rest if rest.starts_with("shift-") => {
        modifiers.insert(KeyModifiers::SHIFT);
        current = &rest[6..];
      },
      _ => break,
    };
  }

  (current, modifiers)
}

fn parse_key_code_with_modifiers(
  raw: &str,
  mut modifiers: KeyModifiers,
) -> Result<KeyEvent, String> {
  let c = match raw {
    "esc" => KeyCode::Esc,
    "enter" => KeyCode::Enter,
    "left" => KeyCode::Left,
    "right" => KeyCode::Right,
    "up" => KeyCode::Up,
    "down" => KeyCode::Down,
    "home" => KeyCode::Home,
    "end" => KeyCode::End,
    "pageup" => KeyCode::PageUp,
    "pagedown" => KeyCode::PageDown,
    "backtab" => {
      modifiers.insert(KeyModifiers::SHIFT);
      KeyCode::BackTab
    },
    "backspace" => KeyCode::Backspace,
    "delete" => KeyCode::Delete,
    "insert" => KeyCode::Insert,
    "f1" => KeyCode::F(1),
    "f2" => KeyCode::F(2),
    "f3" => KeyCode::F(3),
    "f4" => KeyCode::F(4),
    "f5" => KeyCode::F(5),
    "space" => KeyCode::Char(' '),
    "hyphen" | "minus" => KeyCode::Char('-'),
    "tab" => KeyCode::Tab,
    c if c.chars().count() == 1 => {
      let mut c = c.chars().next().unwrap_or_default();
      if modifiers.contains(KeyModifiers::SHIFT) {
        c = c.to_ascii_uppercase();
      }
      KeyCode::Char(c)
    },
    _ => return Err(format!("Unable to parse {raw}")),
  };
  Ok(KeyEvent::new(c, modifiers))
}

pub fn parse_key_sequence(raw: &str) -> Result<Vec<KeyEvent>, String> {
  if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count()
  {
    return Err(format!("Unable to parse `{}`", raw));
  }
  let raw = if !raw.contains("><") {
    let raw = raw.strip_prefix('<').unwrap_or(raw);
    raw.strip_suffix('>').unwrap_or(raw)
  } else {
    raw
  };
  raw
    .split("><")
    .map(|seq| {
      let seq = seq.strip_prefix('<').unwrap_or(seq);
      seq.strip_suffix('>').unwrap_or(seq)
    })
    .map(parse_key_event)
    .collect()
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::screens::ScreenId;

  #[test]
  fn embedded_config_parses() -> Result<()> {
    let c: Config = json5::from_str(CONFIG)?;
    let normal = c.keybindings.get(&Mode::Normal).unwrap();
    assert_eq!(
      normal.get(&parse_key_sequence("<q>").unwrap_or_default()),
      Some(&Action::Quit)
    );
    assert_eq!(
      normal.get(&parse_key_sequence("<s>").unwrap_or_default()),
      Some(&Action::Navigate(ScreenId::EMERGENCY))
    );
    assert_eq!(c.cane.grip_hold(), Duration::from_secs(2));
    assert_eq!(c.cane.arrival_return(), Duration::from_secs(3));
    assert_eq!(c.directions.provider, ProviderKind::Demo);
    assert_eq!(c.settings, Settings::default());
    assert!(c.speech.command.is_empty());
    Ok(())
  }

  #[test]
  fn input_mode_does_not_bind_plain_letters() -> Result<()> {
    let c: Config = json5::from_str(CONFIG)?;
    let input = c.keybindings.get(&Mode::Input).unwrap();
    assert!(input.get(&parse_key_sequence("<q>").unwrap_or_default()).is_none());
    Ok(())
  }

  #[test]
  fn test_with_modifiers() {
    assert_eq!(
      parse_key_event("ctrl-a").unwrap(),
      KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)
    );
    assert_eq!(
      parse_key_event("ctrl-alt-a").unwrap(),
      KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL | KeyModifiers::ALT)
    );
    assert_eq!(parse_key_event("esc").unwrap(), KeyEvent::new(KeyCode::Esc, KeyModifiers::empty()));
  }

  #[test]
  fn test_invalid_keys() {
    assert!(parse_key_event("invalid-key").is_err());
    assert!(parse_key_sequence("<ctrl-a").is_err());
  }

  #[test]
  fn test_sequences() {
    assert_eq!(
      parse_key_sequence("<g><h>").unwrap(),
      vec![
        KeyEvent::new(KeyCode::Char('g'), KeyModifiers::empty()),
        KeyEvent::new(KeyCode::Char('h'), KeyModifiers::empty()),
      ]
    );
  }
}

use serde::{Deserialize, Serialize};

/// Key handling mode of the mounted screen.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  #[default]
  Normal,
  Input,
}

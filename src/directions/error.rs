use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DirectionsError {
  #[error("No API key configured for the directions service")]
  MissingApiKey,
  #[error("Directions request failed: {0}")]
  Http(String),
  #[error("Directions service answered {status}: {body}")]
  Api { status: u16, body: String },
  #[error("Directions response is malformed: {0}")]
  Malformed(String),
}

/// The request URL is dropped so endpoint credentials never reach the log or screen.
impl From<reqwest::Error> for DirectionsError {
  fn from(error: reqwest::Error) -> Self {
    DirectionsError::Http(error.without_url().to_string())
  }
}

impl From<serde_json::Error> for DirectionsError {
  fn from(error: serde_json::Error) -> Self {
    DirectionsError::Malformed(error.to_string())
  }
}

use thiserror::Error;

use crate::directions::error::DirectionsError;

#[derive(Error, Debug)]
pub enum CoreError {
  #[error("Failed to build core due to missing attributes: {0}")]
  BuilderIncomplete(&'static str),
  #[error("Failed to set up the directions provider: {0}")]
  Provider(#[from] DirectionsError),
}

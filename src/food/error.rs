use thiserror::Error;

#[derive(Error, Debug)]
pub enum NutritionError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Upstream returned status {0}")]
    Status(u16),
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for NutritionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            NutritionError::Parse(e.to_string())
        } else {
            NutritionError::Transport(e.to_string())
        }
    }
}

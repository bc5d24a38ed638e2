use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoodwireError {
    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

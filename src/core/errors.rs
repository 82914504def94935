use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Language file missing: {0}")]
    MissingLanguageFile(String),

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("Chord table has {errors} invalid cells")]
    Validation { errors: usize },

    #[error("TrainerError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for TrainerError {
    fn from(error: std::io::Error) -> Self {
        TrainerError::Io(Box::new(error))
    }
}

pub mod console;
pub mod listener;
#[cfg(feature = "microphone")]
pub mod microphone;

use std::{
    fmt::Display,
    time::Duration,
};

use thiserror::Error;

pub use console::ConsoleRecognizer;
pub use listener::{
    VoiceListener,
    VoicePhrases,
};

use crate::core::{
    config::AppConfig,
    lang::Lang,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("No speech before the timeout")]
    Timeout,

    #[error("Speech could not be understood")]
    Unintelligible,

    #[error("Recognition request failed: {0}")]
    Request(String),
}

impl SpeechError {
    pub(crate) fn request(error: impl Display) -> Self {
        SpeechError::Request(error.to_string())
    }
}

/// A source of spoken transcripts.
pub trait Recognizer: Send {
    /// Blocks until a phrase is heard or `timeout` elapses.
    fn listen(&mut self, timeout: Duration) -> Result<String, SpeechError>;
}

impl<R: Recognizer + ?Sized> Recognizer for Box<R> {
    fn listen(&mut self, timeout: Duration) -> Result<String, SpeechError> {
        (**self).listen(timeout)
    }
}

/// Where and how recorded phrases are transcribed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechSettings {
    pub endpoint: String,
    pub api_key: String,
    /// BCP 47 tag such as `de-DE`.
    pub language: String,
}

impl SpeechSettings {
    pub fn new(config: &AppConfig, lang: &Lang) -> Self {
        Self {
            endpoint: config.speech_endpoint.clone(),
            api_key: config.speech_api_key.clone(),
            language: lang.code().replace('_', "-"),
        }
    }
}

/// The microphone when it can be opened, stdin otherwise.
pub fn open_recognizer(settings: &SpeechSettings) -> Box<dyn Recognizer> {
    match open_microphone(settings) {
        Ok(recognizer) => recognizer,
        Err(e) => {
            tracing::warn!("Microphone unavailable ({}), reading voice commands from stdin", e);
            Box::new(ConsoleRecognizer::spawn())
        }
    }
}

#[cfg(feature = "microphone")]
fn open_microphone(settings: &SpeechSettings) -> Result<Box<dyn Recognizer>, SpeechError> {
    let recognizer = microphone::MicrophoneRecognizer::open(settings)?;
    Ok(Box::new(recognizer))
}

#[cfg(not(feature = "microphone"))]
fn open_microphone(_settings: &SpeechSettings) -> Result<Box<dyn Recognizer>, SpeechError> {
    Err(SpeechError::Request("built without microphone support".to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_settings_use_the_interface_language() {
        let config = AppConfig { speech_api_key: "secret".to_string(), ..AppConfig::default() };
        let lang = Lang::from_map("de_DE", HashMap::new());

        let settings = SpeechSettings::new(&config, &lang);
        assert_eq!(settings.language, "de-DE");
        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.endpoint, config.speech_endpoint);
    }

    #[test]
    fn test_boxed_recognizer_delegates() {
        let mut boxed: Box<dyn Recognizer> =
            Box::new(ConsoleRecognizer::from_reader(std::io::Cursor::new("next\n")));
        assert_eq!(boxed.listen(Duration::from_secs(5)), Ok("next".to_string()));
    }
}

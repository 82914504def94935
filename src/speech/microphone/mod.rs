mod capture;
mod phrase;
mod web_api;

use std::{
    sync::mpsc::{
        Receiver,
        RecvTimeoutError,
    },
    time::{
        Duration,
        Instant,
    },
};

pub use phrase::{
    PhraseDetector,
    PhraseSettings,
};
pub use web_api::{
    parse_transcript,
    WebSpeechClient,
};

use super::{
    Recognizer,
    SpeechError,
    SpeechSettings,
};

/// Rate the transcription service receives.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;
/// Longest gap between chunks before a started phrase is cut off.
const CHUNK_STALL: Duration = Duration::from_secs(1);

/// Turns a recorded phrase into text.
pub trait Transcriber: Send {
    fn transcribe(&self, samples: &[f32], sample_rate: u32) -> Result<String, SpeechError>;
}

/// Records phrases from the default input device and sends them to a transcriber.
pub struct MicrophoneRecognizer<T = WebSpeechClient> {
    chunks: Receiver<Vec<f32>>,
    sample_rate: u32,
    phrase: PhraseSettings,
    transcriber: T,
    _capture: Option<capture::CaptureGuard>,
}

impl MicrophoneRecognizer {
    pub fn open(settings: &SpeechSettings) -> Result<Self, SpeechError> {
        if settings.api_key.trim().is_empty() {
            return Err(SpeechError::Request("no speech API key configured".to_string()));
        }

        let client = WebSpeechClient::new(settings)?;
        let capture = capture::start()?;
        Ok(Self {
            chunks: capture.chunks,
            sample_rate: capture.sample_rate,
            phrase: PhraseSettings::default(),
            transcriber: client,
            _capture: Some(capture.guard),
        })
    }
}

impl<T: Transcriber> MicrophoneRecognizer<T> {
    fn with_source(
        chunks: Receiver<Vec<f32>>,
        sample_rate: u32,
        phrase: PhraseSettings,
        transcriber: T,
    ) -> Self {
        Self { chunks, sample_rate, phrase, transcriber, _capture: None }
    }

    /// Audio captured while nobody listened, e.g. while the timer ran.
    fn discard_pending(&self) {
        let mut dropped = 0;
        while let Ok(chunk) = self.chunks.try_recv() {
            dropped += chunk.len();
        }
        if dropped > 0 {
            tracing::trace!("Dropped {} stale samples", dropped);
        }
    }

    fn record_phrase(&mut self, timeout: Duration) -> Result<Vec<f32>, SpeechError> {
        let mut detector = PhraseDetector::new(self.phrase, self.sample_rate);
        let deadline = Instant::now() + timeout;

        loop {
            let wait = if detector.is_started() {
                CHUNK_STALL
            } else {
                let left = deadline.saturating_duration_since(Instant::now());
                if left.is_zero() {
                    return Err(SpeechError::Timeout);
                }
                left
            };

            match self.chunks.recv_timeout(wait) {
                Ok(chunk) => {
                    if let Some(phrase) = detector.push(&chunk) {
                        return Ok(phrase);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(phrase) = detector.finish() {
                        return Ok(phrase);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(SpeechError::Request("microphone stream closed".to_string()));
                }
            }
        }
    }
}

impl<T: Transcriber> Recognizer for MicrophoneRecognizer<T> {
    fn listen(&mut self, timeout: Duration) -> Result<String, SpeechError> {
        self.discard_pending();
        let phrase = self.record_phrase(timeout)?;
        let samples = phrase::resample(&phrase, self.sample_rate, TARGET_SAMPLE_RATE);
        self.transcriber.transcribe(&samples, TARGET_SAMPLE_RATE)
    }
}

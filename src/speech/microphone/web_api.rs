use std::time::Duration;

use reqwest::{
    blocking::Client,
    header::CONTENT_TYPE,
};
use serde::Deserialize;

use super::{
    phrase::to_l16_bytes,
    Transcriber,
};
use crate::speech::{
    SpeechError,
    SpeechSettings,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the web speech recognition endpoint.
pub struct WebSpeechClient {
    client: Client,
    endpoint: String,
    api_key: String,
    language: String,
}

impl WebSpeechClient {
    pub fn new(settings: &SpeechSettings) -> Result<Self, SpeechError> {
        let client =
            Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(SpeechError::request)?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            language: settings.language.clone(),
        })
    }
}

impl Transcriber for WebSpeechClient {
    fn transcribe(&self, samples: &[f32], sample_rate: u32) -> Result<String, SpeechError> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("client", "chromium"),
                ("lang", self.language.as_str()),
                ("key", self.api_key.as_str()),
                ("output", "json"),
            ])
            .header(CONTENT_TYPE, format!("audio/l16; rate={sample_rate}"))
            .body(to_l16_bytes(samples))
            .send()
            .map_err(SpeechError::request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Request(format!("speech service answered {status}")));
        }

        let body = response.text().map_err(SpeechError::request)?;
        parse_transcript(&body)
    }
}

#[derive(Deserialize)]
struct RecognitionResponse {
    #[serde(default)]
    result: Vec<RecognitionResult>,
}

#[derive(Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternative: Vec<Alternative>,
}

#[derive(Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
    confidence: Option<f32>,
}

/// The service answers with one JSON object per line; the first is usually empty.
pub fn parse_transcript(body: &str) -> Result<String, SpeechError> {
    for line in body.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let response: RecognitionResponse =
            serde_json::from_str(line).map_err(SpeechError::request)?;

        let Some(result) = response.result.into_iter().next() else {
            continue;
        };
        let best = result
            .alternative
            .iter()
            .find(|a| a.confidence.is_some())
            .or_else(|| result.alternative.first());

        return match best {
            Some(alternative) if !alternative.transcript.trim().is_empty() => {
                Ok(alternative.transcript.trim().to_string())
            }
            _ => Err(SpeechError::Unintelligible),
        };
    }

    Err(SpeechError::Unintelligible)
}

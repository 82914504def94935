use std::{
    sync::mpsc::{
        self,
        Receiver,
        Sender,
    },
    thread,
};

use cpal::traits::{
    DeviceTrait,
    HostTrait,
    StreamTrait,
};

use super::phrase::downmix;
use crate::speech::SpeechError;

/// Keeps the input stream open. Dropping it ends the capture thread.
pub struct CaptureGuard {
    _shutdown: Sender<()>,
}

pub struct Capture {
    pub chunks: Receiver<Vec<f32>>,
    pub sample_rate: u32,
    pub guard: CaptureGuard,
}

/// Opens the default input device on its own thread.
///
/// `cpal::Stream` cannot leave the thread that built it, so the thread owns the
/// stream and only mono sample chunks cross over.
pub fn start() -> Result<Capture, SpeechError> {
    let (chunk_tx, chunks) = mpsc::channel();
    let (ready_tx, ready_rx) = mpsc::channel();
    let (shutdown, shutdown_rx) = mpsc::channel::<()>();

    thread::Builder::new()
        .name("microphone".to_string())
        .spawn(move || {
            let stream = match open_stream(chunk_tx) {
                Ok((stream, sample_rate)) => {
                    let _ = ready_tx.send(Ok(sample_rate));
                    stream
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            // Returns once the guard is dropped.
            let _ = shutdown_rx.recv();
            drop(stream);
            tracing::debug!("Microphone closed");
        })
        .map_err(SpeechError::request)?;

    let sample_rate = ready_rx
        .recv()
        .map_err(|_| SpeechError::Request("microphone thread exited".to_string()))??;

    Ok(Capture { chunks, sample_rate, guard: CaptureGuard { _shutdown: shutdown } })
}

fn open_stream(chunks: Sender<Vec<f32>>) -> Result<(cpal::Stream, u32), SpeechError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| SpeechError::Request("no input device".to_string()))?;
    let supported = device.default_input_config().map_err(SpeechError::request)?;

    let sample_rate = supported.sample_rate().0;
    let channels = usize::from(supported.channels());
    let config = supported.config();
    let on_error = |e: cpal::StreamError| tracing::warn!("Microphone stream error: {}", e);

    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let _ = chunks.send(downmix(data, channels, |s| s));
            },
            on_error,
            None,
        ),
        cpal::SampleFormat::I16 => device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let _ = chunks.send(downmix(data, channels, |s| f32::from(s) / f32::from(i16::MAX)));
            },
            on_error,
            None,
        ),
        cpal::SampleFormat::U16 => device.build_input_stream(
            &config,
            move |data: &[u16], _: &cpal::InputCallbackInfo| {
                let _ = chunks.send(downmix(data, channels, |s| (f32::from(s) - 32768.0) / 32768.0));
            },
            on_error,
            None,
        ),
        other => {
            return Err(SpeechError::Request(format!("unsupported sample format {other:?}")));
        }
    }
    .map_err(SpeechError::request)?;

    stream.play().map_err(SpeechError::request)?;
    tracing::info!(
        "Microphone '{}' open at {} Hz",
        device.name().unwrap_or_else(|_| "unknown".to_string()),
        sample_rate
    );
    Ok((stream, sample_rate))
}

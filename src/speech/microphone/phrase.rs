use std::{
    collections::VecDeque,
    mem,
    time::Duration,
};

/// Energy based end-pointing of a spoken phrase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhraseSettings {
    /// RMS level, on a -1.0..=1.0 sample scale, that counts as speech.
    pub energy_threshold: f32,
    /// Silence that ends a phrase.
    pub pause: Duration,
    /// Audio kept from before the phrase started.
    pub pre_roll: Duration,
    pub max_phrase: Duration,
}

impl Default for PhraseSettings {
    fn default() -> Self {
        Self {
            energy_threshold: 0.01,
            pause: Duration::from_millis(800),
            pre_roll: Duration::from_millis(500),
            max_phrase: Duration::from_secs(10),
        }
    }
}

pub struct PhraseDetector {
    threshold: f32,
    pause_samples: usize,
    pre_roll_samples: usize,
    max_samples: usize,
    pre_roll: VecDeque<f32>,
    phrase: Vec<f32>,
    silent: usize,
    started: bool,
}

impl PhraseDetector {
    pub fn new(settings: PhraseSettings, sample_rate: u32) -> Self {
        let pre_roll_samples = samples_in(settings.pre_roll, sample_rate);
        Self {
            threshold: settings.energy_threshold,
            pause_samples: samples_in(settings.pause, sample_rate).max(1),
            pre_roll_samples,
            max_samples: samples_in(settings.max_phrase, sample_rate).max(1),
            pre_roll: VecDeque::with_capacity(pre_roll_samples),
            phrase: Vec::new(),
            silent: 0,
            started: false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Feeds mono samples. Returns the phrase once it has ended.
    pub fn push(&mut self, chunk: &[f32]) -> Option<Vec<f32>> {
        let loud = rms(chunk) >= self.threshold;

        if !self.started {
            if !loud {
                self.pre_roll.extend(chunk.iter().copied());
                let excess = self.pre_roll.len().saturating_sub(self.pre_roll_samples);
                self.pre_roll.drain(..excess);
                return None;
            }
            self.started = true;
            self.phrase.extend(self.pre_roll.drain(..));
        }

        self.phrase.extend_from_slice(chunk);
        self.silent = if loud { 0 } else { self.silent + chunk.len() };

        if self.silent >= self.pause_samples || self.phrase.len() >= self.max_samples {
            self.finish()
        } else {
            None
        }
    }

    /// Ends a started phrase early, e.g. when the input stalls.
    pub fn finish(&mut self) -> Option<Vec<f32>> {
        if !self.started {
            return None;
        }
        self.started = false;
        self.silent = 0;
        Some(mem::take(&mut self.phrase))
    }
}

fn samples_in(duration: Duration, sample_rate: u32) -> usize {
    (duration.as_secs_f64() * f64::from(sample_rate)) as usize
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Averages interleaved frames into one channel.
pub fn downmix<S: Copy>(data: &[S], channels: usize, to_f32: impl Fn(S) -> f32) -> Vec<f32> {
    let channels = channels.max(1);
    data.chunks(channels)
        .map(|frame| frame.iter().map(|&s| to_f32(s)).sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Linear interpolation resampler.
pub fn resample(samples: &[f32], from: u32, to: u32) -> Vec<f32> {
    if from == to || samples.is_empty() || to == 0 {
        return samples.to_vec();
    }

    let ratio = f64::from(from) / f64::from(to);
    let len = (samples.len() as f64 / ratio) as usize;
    (0..len)
        .map(|i| {
            let position = i as f64 * ratio;
            let index = position as usize;
            let frac = (position - index as f64) as f32;
            let a = samples[index];
            let b = samples.get(index + 1).copied().unwrap_or(a);
            a + (b - a) * frac
        })
        .collect()
}

/// 16-bit little-endian PCM.
pub fn to_l16_bytes(samples: &[f32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|s| ((s.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16).to_le_bytes())
        .collect()
}

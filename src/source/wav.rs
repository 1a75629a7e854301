//! WAV-file driven features: mono mixdown, RMS energy, an energy-spike beat
//! detector and coarse FFT band magnitudes.

use std::collections::VecDeque;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use super::{FeatureSource, SPECTRUM_BANDS, WAVEFORM_LEN};
use crate::engine::features::rms;
use crate::engine::AudioFeatures;

/// Frames of energy history the beat detector compares against.
const HISTORY_LEN: usize = 43;
/// A beat is an energy this many times the recent average.
const BEAT_RATIO: f64 = 1.4;
/// Quieter frames never count as beats.
const BEAT_FLOOR: f64 = 0.02;
/// Minimum spacing between detected beats, in seconds.
const BEAT_COOLDOWN: f64 = 0.15;

#[derive(Debug)]
pub enum WavError {
    /// WAV decoding or I/O error.
    Wav(hound::Error),
    /// The WAV file contains no samples.
    Empty,
}

impl std::fmt::Display for WavError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WavError::Wav(e) => write!(f, "WAV error: {e}"),
            WavError::Empty => write!(f, "WAV file contains no samples"),
        }
    }
}

impl std::error::Error for WavError {}

impl From<hound::Error> for WavError {
    fn from(e: hound::Error) -> Self {
        WavError::Wav(e)
    }
}

/// A decoded mono track analysed on demand.
#[derive(Debug, Clone)]
pub struct WavSource {
    samples: Vec<f32>,
    sample_rate: u32,
    history: VecDeque<f64>,
    last_beat_time: Option<f64>,
    analyzer: SpectrumAnalyzer,
}

impl WavSource {
    pub fn open(path: &Path) -> Result<Self, WavError> {
        let reader = hound::WavReader::open(path)?;
        Self::decode(reader)
    }

    /// Decode WAV data from any seekable reader.
    ///
    /// 8/16/24/32-bit integer and 32-bit float files are accepted; channels
    /// are averaged down to mono.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, WavError> {
        Self::decode(hound::WavReader::new(reader)?)
    }

    fn decode<R: Read>(wav: hound::WavReader<R>) -> Result<Self, WavError> {
        let spec = wav.spec();
        let channels = spec.channels.max(1) as usize;

        let raw: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let full_scale = (1u64 << (spec.bits_per_sample.max(1) - 1)) as f32;
                wav.into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<Result<Vec<f32>, _>>()?
            }
            hound::SampleFormat::Float => {
                wav.into_samples::<f32>().collect::<Result<Vec<f32>, _>>()?
            }
        };

        if raw.is_empty() {
            return Err(WavError::Empty);
        }

        let samples = raw
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        Ok(Self::from_mono(samples, spec.sample_rate))
    }

    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate: sample_rate.max(1),
            history: VecDeque::with_capacity(HISTORY_LEN),
            last_beat_time: None,
            analyzer: SpectrumAnalyzer::new(WAVEFORM_LEN),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The analysis window starting at `time`, zero-padded past the end.
    fn window(&self, time: f64) -> Vec<f32> {
        let start = (time.max(0.0) * self.sample_rate as f64) as usize;
        let mut window: Vec<f32> = self
            .samples
            .iter()
            .skip(start)
            .take(WAVEFORM_LEN)
            .copied()
            .collect();
        window.resize(WAVEFORM_LEN, 0.0);
        window
    }

    fn detect_beat(&mut self, time: f64, energy: f64) -> bool {
        let average = if self.history.is_empty() {
            0.0
        } else {
            self.history.iter().sum::<f64>() / self.history.len() as f64
        };

        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(energy);

        let cooled = self
            .last_beat_time
            .map_or(true, |last| time - last >= BEAT_COOLDOWN);
        let beat = cooled && energy > BEAT_FLOOR && energy > average * BEAT_RATIO;
        if beat {
            self.last_beat_time = Some(time);
        }
        beat
    }
}

impl FeatureSource for WavSource {
    fn features_at(&mut self, time: f64) -> AudioFeatures {
        let waveform = self.window(time);
        let energy = rms(&waveform).min(1.0);
        let beat = self.detect_beat(time, energy);
        let spectrum = self.analyzer.band_magnitudes(&waveform, SPECTRUM_BANDS);

        AudioFeatures {
            time,
            energy,
            beat,
            spectrum,
            waveform,
        }
    }

    fn duration(&self) -> Option<f64> {
        Some(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Band magnitudes from one forward FFT per window, planned once.
#[derive(Clone)]
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    pub fn new(len: usize) -> Self {
        let len = len.max(2);
        let mut planner = FftPlanner::<f32>::new();
        Self {
            fft: planner.plan_fft_forward(len),
            buffer: vec![Complex { re: 0.0, im: 0.0 }; len],
        }
    }

    /// Magnitudes of `bands` bins spread evenly over the window's positive
    /// frequencies, scaled so a full-scale sine reads 1.0. The window is
    /// zero-padded or truncated to the planned length.
    pub fn band_magnitudes(&mut self, window: &[f32], bands: usize) -> Vec<f32> {
        let samples = window.iter().copied().chain(std::iter::repeat(0.0));
        for (slot, s) in self.buffer.iter_mut().zip(samples) {
            *slot = Complex { re: s, im: 0.0 };
        }
        self.fft.process(&mut self.buffer);

        let len = self.buffer.len();
        let nyquist = len / 2;
        let buffer = &self.buffer;
        (0..bands)
            .map(|k| {
                let bin = 1 + k * (nyquist - 1) / bands;
                (2.0 * buffer[bin].norm() / len as f32).min(1.0)
            })
            .collect()
    }
}

impl std::fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectrumAnalyzer")
            .field("len", &self.buffer.len())
            .finish()
    }
}

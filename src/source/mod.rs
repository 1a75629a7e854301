//! Feature sources: produce an [`AudioFeatures`] snapshot per frame.

pub mod wav;

pub use wav::{WavError, WavSource};

use crate::engine::AudioFeatures;

/// Bands in generated spectra.
pub const SPECTRUM_BANDS: usize = 32;

/// Samples in generated waveforms.
pub const WAVEFORM_LEN: usize = 512;

/// Something that can be asked for the features at a point in time.
///
/// Calls are expected in increasing `time` order; sources may keep history
/// (for beat detection) between calls.
pub trait FeatureSource {
    fn features_at(&mut self, time: f64) -> AudioFeatures;

    /// Length of the material in seconds, if finite.
    fn duration(&self) -> Option<f64> {
        None
    }
}

/// A tempo-locked pulse: a beat on every quarter note, with energy decaying
/// after each one and a spectrum that leans toward the low bands.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    bpm: f64,
    last_beat: Option<u64>,
}

impl SyntheticSource {
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm: if bpm > 0.0 { bpm } else { 120.0 },
            last_beat: None,
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl FeatureSource for SyntheticSource {
    fn features_at(&mut self, time: f64) -> AudioFeatures {
        let beats = time.max(0.0) * self.bpm / 60.0;
        let index = beats.floor() as u64;
        let phase = beats.fract();

        let beat = self.last_beat != Some(index);
        self.last_beat = Some(index);

        let energy = 0.15 + 0.85 * (-phase * 5.0).exp();

        let spectrum = (0..SPECTRUM_BANDS)
            .map(|k| {
                let tilt = 1.0 - k as f64 / SPECTRUM_BANDS as f64;
                (energy * tilt * tilt) as f32
            })
            .collect();

        let waveform = (0..WAVEFORM_LEN)
            .map(|n| {
                let p = n as f64 / WAVEFORM_LEN as f64;
                (energy * (std::f64::consts::TAU * (4.0 * p + time)).sin()) as f32
            })
            .collect();

        AudioFeatures {
            time,
            energy,
            beat,
            spectrum,
            waveform,
        }
    }
}

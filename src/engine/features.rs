//! Audio feature snapshot: the read-only per-frame input from analysis.

/// Audio analysis results for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioFeatures {
    /// Seconds since playback started.
    pub time: f64,
    /// Instantaneous energy, nominally 0..1.
    pub energy: f64,
    pub beat: bool,
    /// Normalized band amplitudes (0..1), lowest band first.
    pub spectrum: Vec<f32>,
    /// Recent waveform samples in -1..1.
    pub waveform: Vec<f32>,
}

impl AudioFeatures {
    /// A silent snapshot at the given time.
    pub fn silent(time: f64) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    /// The spectrum band nearest to a normalized position `0..=1`, as
    /// `(band index, amplitude)`. An empty spectrum yields `(0, 0.0)`.
    pub fn band_at(&self, position: f64) -> (usize, f64) {
        if self.spectrum.is_empty() {
            return (0, 0.0);
        }
        let last = self.spectrum.len() - 1;
        let band = ((position.clamp(0.0, 1.0) * last as f64) as usize).min(last);
        (band, self.spectrum[band] as f64)
    }
}

/// Root mean square of a sample window; `0.0` for an empty window.
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / samples.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_lookup() {
        let f = AudioFeatures {
            spectrum: vec![0.0, 0.25, 0.5, 1.0],
            ..AudioFeatures::default()
        };
        assert_eq!(f.band_at(0.0), (0, 0.0));
        assert_eq!(f.band_at(1.0), (3, 1.0));
        assert_eq!(f.band_at(0.5), (1, 0.25));
        assert_eq!(f.band_at(7.0), (3, 1.0));
    }

    #[test]
    fn band_lookup_empty() {
        assert_eq!(AudioFeatures::silent(0.0).band_at(0.3), (0, 0.0));
    }

    #[test]
    fn rms_of_empty_is_zero() {
        assert_eq!(rms(&[]), 0.0);
    }
}
